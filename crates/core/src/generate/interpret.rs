use serde::Deserialize;
use serde_json::Value;

use super::modules::extract_modules;
use super::naming::{base_name_from_prompt, canonicalize, normalize_file_name};
use super::sanitize::sanitize;
use super::testbench::synthesize_testbench;
use super::types::{DebugInfo, GeneratedFile, GenerationResult, InterpretOptions};

#[derive(Debug, Default, Deserialize)]
struct RawFile {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawPayload {
    #[serde(rename = "mainFile", default)]
    main_file: Option<RawFile>,
    #[serde(rename = "testbenchFile", default)]
    testbench_file: Option<RawFile>,
    #[serde(rename = "debugInfo", default)]
    debug_info: Option<DebugInfo>,
}

/// Interpret a raw model response with default options.
pub fn interpret(raw_response: &str, prompt: &str) -> GenerationResult {
    interpret_with(raw_response, prompt, &InterpretOptions::default())
}

/// Interpret a raw model response.
///
/// JSON objects carrying `mainFile` or `debugInfo` are tried first, left to
/// right. Without one, the text is scanned for `module ... endmodule`
/// blocks and a testbench is picked or synthesized. When neither works the
/// raw text is handed back untouched.
pub fn interpret_with(
    raw_response: &str,
    prompt: &str,
    options: &InterpretOptions,
) -> GenerationResult {
    if let Some(result) = interpret_json(raw_response, prompt, options) {
        return result;
    }

    log::debug!("No usable JSON object in response, falling back to module extraction");

    let mut modules = extract_modules(raw_response);
    if modules.is_empty() {
        // Markup can split the `module` keyword from its name.
        modules = extract_modules(&sanitize(raw_response));
    }

    let Some(main_module) = modules.first() else {
        log::debug!("No module blocks found, returning raw response");
        return GenerationResult::Raw {
            raw_response: raw_response.to_string(),
        };
    };

    let testbench_module = modules[1..]
        .iter()
        .find(|m| m.to_lowercase().contains("testbench"))
        .or_else(|| modules.get(1))
        .cloned()
        .unwrap_or_else(|| synthesize_testbench(main_module));

    let base_name = base_name_from_prompt(prompt);

    GenerationResult::Files {
        main_file: GeneratedFile {
            name: canonicalize(&base_name, false),
            content: sanitize(main_module.trim()),
        },
        testbench_file: Some(GeneratedFile {
            name: canonicalize(&base_name, true),
            content: sanitize(testbench_module.trim()),
        }),
    }
}

fn interpret_json(
    raw_response: &str,
    prompt: &str,
    options: &InterpretOptions,
) -> Option<GenerationResult> {
    // A rejected candidate falls through to the objects nested in it.
    for (open, close) in balanced_spans(raw_response) {
        let candidate = &raw_response[open..=close];
        if let Some(result) = accept_candidate(candidate, prompt, options) {
            return Some(result);
        }
    }

    None
}

fn accept_candidate(
    candidate: &str,
    prompt: &str,
    options: &InterpretOptions,
) -> Option<GenerationResult> {
    let value: Value = match serde_json::from_str(candidate) {
        Ok(value) => value,
        Err(e) => {
            log::debug!("Rejected JSON candidate: {e}");
            return None;
        }
    };

    let has_key = |key: &str| value.get(key).is_some_and(|v| !v.is_null());
    if !has_key("mainFile") && !has_key("debugInfo") {
        return None;
    }

    let payload: RawPayload = match serde_json::from_value(value) {
        Ok(payload) => payload,
        Err(e) => {
            log::debug!("Rejected JSON candidate with unexpected shape: {e}");
            return None;
        }
    };

    let Some(main) = payload.main_file else {
        return Some(GenerationResult::Debug {
            debug_info: payload.debug_info.unwrap_or_default(),
        });
    };

    let main_file = clean_file(main, false, prompt);
    let testbench_file = match payload.testbench_file {
        Some(testbench) => Some(clean_file(testbench, true, prompt)),
        None if options.synthesize_missing_testbench => {
            Some(synthesize_companion(&main_file, prompt))
        }
        None => None,
    };

    Some(GenerationResult::Files {
        main_file,
        testbench_file,
    })
}

fn clean_file(file: RawFile, is_testbench: bool, prompt: &str) -> GeneratedFile {
    GeneratedFile {
        name: normalize_file_name(file.name.as_deref().unwrap_or_default(), is_testbench, prompt),
        content: sanitize(file.content.as_deref().unwrap_or_default()),
    }
}

fn synthesize_companion(main_file: &GeneratedFile, prompt: &str) -> GeneratedFile {
    let modules = extract_modules(&main_file.content);
    let main_module = modules
        .first()
        .map(String::as_str)
        .unwrap_or(main_file.content.as_str());

    GeneratedFile {
        name: normalize_file_name(&main_file.name, true, prompt),
        content: sanitize(&synthesize_testbench(main_module)),
    }
}

/// Every balanced `{ ... }` span as `(open, close)` byte offsets, ordered by
/// the opening brace. Braces inside string literals are skipped. One pass,
/// so unclosed braces cost nothing extra.
fn balanced_spans(text: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut stack = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for (index, byte) in text.bytes().enumerate() {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match byte {
            // Quotes in prose outside any object are not strings.
            b'"' if !stack.is_empty() => in_string = true,
            b'{' => stack.push(index),
            b'}' => {
                if let Some(open) = stack.pop() {
                    spans.push((open, index));
                }
            }
            _ => {}
        }
    }

    spans.sort_unstable_by_key(|&(open, _)| open);
    spans
}
