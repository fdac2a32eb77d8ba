//! File naming for generated Verilog sources.
//!
//! Every produced file name is lowercase kebab-case, ends in [`EXTENSION`]
//! and, for testbenches, carries the [`TESTBENCH_MARKER`] right before the
//! extension.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

/// Extension of every generated source file.
pub const EXTENSION: &str = ".v";

/// Marker distinguishing a testbench from its main file.
pub const TESTBENCH_MARKER: &str = "-testbench";

/// Base name used when neither the candidate nor the prompt yield one.
pub const FALLBACK_BASE_NAME: &str = "generated-circuit";

const STOP_WORDS: [&str; 5] = ["the", "and", "with", "for", "that"];

/// Turn a model-supplied file name into a base name, falling back to the
/// prompt when the candidate is too short or too generic.
pub fn derive_base_name(candidate: &str, prompt: &str) -> String {
    static RE_EXTENSION: OnceLock<Regex> = OnceLock::new();
    let re_extension = RE_EXTENSION.get_or_init(|| Regex::new(r"(?i)\.v$").unwrap());

    static RE_SUFFIX: OnceLock<Regex> = OnceLock::new();
    let re_suffix =
        RE_SUFFIX.get_or_init(|| Regex::new(r"(?i)(?:_testbench|_tb|-testbench|-tb)$").unwrap());

    static RE_GENERIC: OnceLock<Regex> = OnceLock::new();
    let re_generic = RE_GENERIC.get_or_init(|| Regex::new(r"(?i)^(?:module|test|generated)").unwrap());

    let trimmed = candidate.trim();
    let without_extension = re_extension.replace(trimmed, "");
    let base = re_suffix.replace(&without_extension, "");

    if base.chars().count() < 3 || re_generic.is_match(&base) {
        log::debug!("Candidate name {candidate:?} is too generic, deriving from prompt");
        return base_name_from_prompt(prompt);
    }

    base.to_string()
}

/// Derive a base name from the user's prompt.
///
/// Domain patterns (`4-bit counter`, `uart transmitter`, ...) win over the
/// first meaningful words of the prompt.
pub fn base_name_from_prompt(prompt: &str) -> String {
    static RE_FILLER: OnceLock<Regex> = OnceLock::new();
    let re_filler = RE_FILLER.get_or_init(|| {
        Regex::new(r"\b(?:generate|create|design|build|make|write|verilog|module|code|circuit)\b")
            .unwrap()
    });

    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    let patterns = PATTERNS.get_or_init(|| {
        [
            r"(\d+)[-\s]*bit[-\s]*(adder|counter|alu|multiplier|divider|shifter|register)",
            r"(uart|spi|i2c)[-\s]*(transmitter|receiver|controller)",
            r"(full|half)[-\s]*adder",
            r"(mux|multiplexer|demux|demultiplexer)",
            r"(flip[-\s]*flop|latch)",
            r"(encoder|decoder)",
        ]
        .iter()
        .map(|pattern| Regex::new(pattern).unwrap())
        .collect()
    });

    static RE_HYPHENATE: OnceLock<Regex> = OnceLock::new();
    let re_hyphenate = RE_HYPHENATE.get_or_init(|| Regex::new(r"[\s-]+").unwrap());

    let lowered = prompt.to_lowercase();
    let cleaned = re_filler.replace_all(&lowered, "");
    let cleaned = cleaned.trim();

    if let Some(found) = patterns.iter().find_map(|pattern| pattern.find(cleaned)) {
        return re_hyphenate.replace_all(found.as_str(), "-").to_string();
    }

    let words: Vec<&str> = cleaned
        .split_whitespace()
        .filter(|word| word.chars().count() > 2 && !STOP_WORDS.contains(word))
        .take(3)
        .collect();

    if words.is_empty() {
        return FALLBACK_BASE_NAME.to_string();
    }

    words.join("-")
}

/// Convert any base name into its kebab-case stem, without extension or
/// testbench marker.
pub fn canonical_stem(base: &str) -> String {
    static RE_CAMEL: OnceLock<Regex> = OnceLock::new();
    let re_camel = RE_CAMEL.get_or_init(|| Regex::new(r"([a-z])([A-Z])").unwrap());

    static RE_SEPARATORS: OnceLock<Regex> = OnceLock::new();
    let re_separators = RE_SEPARATORS.get_or_init(|| Regex::new(r"[_\s]+").unwrap());

    static RE_INVALID: OnceLock<Regex> = OnceLock::new();
    let re_invalid = RE_INVALID.get_or_init(|| Regex::new(r"[^a-z0-9-]").unwrap());

    let trimmed = base.trim();
    let without_extension = strip_extension(trimmed);

    let stem = re_camel.replace_all(without_extension, "$1-$2");
    let stem = re_separators.replace_all(&stem, "-").to_lowercase();
    let stem = re_invalid.replace_all(&stem, "");

    // The marker may only appear once, right before the extension.
    let marker = TESTBENCH_MARKER.trim_start_matches('-');
    let stem = stem
        .split('-')
        .filter(|segment| !segment.is_empty() && *segment != marker)
        .collect::<Vec<_>>()
        .join("-");

    if stem.is_empty() {
        return FALLBACK_BASE_NAME.to_string();
    }

    stem
}

/// Build the canonical file name for a base name.
pub fn canonicalize(base: &str, is_testbench: bool) -> String {
    file_name(&canonical_stem(base), None, is_testbench)
}

/// Normalize a model-supplied file name: derive the base, then canonicalize.
pub fn normalize_file_name(candidate: &str, is_testbench: bool, prompt: &str) -> String {
    canonicalize(&derive_base_name(candidate, prompt), is_testbench)
}

/// Return a canonical name for `base` that is not in `existing`.
///
/// Collisions get `-1`, `-2`, ... inserted before the testbench marker and
/// extension.
pub fn make_unique(base: &str, is_testbench: bool, existing: &HashSet<String>) -> String {
    let stem = canonical_stem(base);

    let mut name = file_name(&stem, None, is_testbench);
    let mut counter = 1;
    while existing.contains(&name) {
        name = file_name(&stem, Some(counter), is_testbench);
        counter += 1;
    }

    name
}

/// Return aligned `(main, testbench)` names for a main file name, using the
/// smallest suffix for which neither name is taken.
pub fn make_unique_pair(main_name: &str, existing: &HashSet<String>) -> (String, String) {
    let stem = canonical_stem(main_name);

    let mut suffix = None;
    let mut counter = 1;
    loop {
        let main = file_name(&stem, suffix, false);
        let testbench = file_name(&stem, suffix, true);
        if !existing.contains(&main) && !existing.contains(&testbench) {
            return (main, testbench);
        }
        suffix = Some(counter);
        counter += 1;
    }
}

/// Whether a file name carries the testbench marker.
pub fn is_testbench_name(name: &str) -> bool {
    strip_extension(name).ends_with(TESTBENCH_MARKER)
}

fn strip_extension(name: &str) -> &str {
    let split = name.len().saturating_sub(EXTENSION.len());
    match (name.get(..split), name.get(split..)) {
        (Some(stem), Some(extension)) if extension.eq_ignore_ascii_case(EXTENSION) => stem,
        _ => name,
    }
}

fn file_name(stem: &str, counter: Option<usize>, is_testbench: bool) -> String {
    let counter = counter.map(|n| format!("-{n}")).unwrap_or_default();
    let marker = if is_testbench { TESTBENCH_MARKER } else { "" };
    format!("{stem}{counter}{marker}{EXTENSION}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(items: &[&str]) -> HashSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn is_canonical(name: &str) -> bool {
        let re = Regex::new(r"^[a-z0-9-]+(-testbench)?\.v$").unwrap();
        re.is_match(name) && !name.starts_with('-') && !name.contains("--") && !name.contains("-.v")
    }

    #[test]
    fn test_derive_keeps_specific_candidate() {
        assert_eq!(derive_base_name("full_adder.v", "anything"), "full_adder");
        assert_eq!(derive_base_name("Foo.v", "anything"), "Foo");
    }

    #[test]
    fn test_derive_strips_testbench_suffixes() {
        assert_eq!(derive_base_name("alu_testbench.v", ""), "alu");
        assert_eq!(derive_base_name("shifter_TB.v", ""), "shifter");
        assert_eq!(derive_base_name("foo-tb.v", ""), "foo");
        assert_eq!(derive_base_name("counter-Testbench.V", ""), "counter");
    }

    #[test]
    fn test_derive_falls_back_to_prompt_for_generic_names() {
        let prompt = "generate a 4-bit counter with reset";
        assert_eq!(derive_base_name("module.v", prompt), "4-bit-counter");
        assert_eq!(derive_base_name("test_design.v", prompt), "4-bit-counter");
        assert_eq!(derive_base_name("generated.v", prompt), "4-bit-counter");
        assert_eq!(derive_base_name("ab.v", prompt), "4-bit-counter");
        assert_eq!(derive_base_name("", prompt), "4-bit-counter");
    }

    #[test]
    fn test_prompt_bit_width_pattern() {
        assert_eq!(
            base_name_from_prompt("Generate a 4-bit counter with reset"),
            "4-bit-counter"
        );
        assert_eq!(base_name_from_prompt("design an 8 bit   alu"), "8-bit-alu");
    }

    #[test]
    fn test_prompt_protocol_pattern() {
        assert_eq!(
            base_name_from_prompt("Write a UART transmitter in verilog"),
            "uart-transmitter"
        );
    }

    #[test]
    fn test_prompt_component_patterns() {
        assert_eq!(base_name_from_prompt("create a full adder"), "full-adder");
        assert_eq!(base_name_from_prompt("make a 4 to 1 mux"), "mux");
        assert_eq!(base_name_from_prompt("d flip flop with enable"), "flip-flop");
        assert_eq!(base_name_from_prompt("design a 3 to 8 decoder"), "decoder");
    }

    #[test]
    fn test_prompt_fallback_words() {
        assert_eq!(
            base_name_from_prompt("Generate the traffic light controller for an intersection"),
            "traffic-light-controller"
        );
    }

    #[test]
    fn test_prompt_final_fallback() {
        assert_eq!(base_name_from_prompt(""), FALLBACK_BASE_NAME);
        assert_eq!(base_name_from_prompt("make the verilog code"), FALLBACK_BASE_NAME);
    }

    #[test]
    fn test_canonicalize_kebab_cases() {
        assert_eq!(canonicalize("FullAdder", false), "full-adder.v");
        assert_eq!(canonicalize("full_adder  v2", false), "full-adder-v2.v");
        assert_eq!(canonicalize("--Foo!!__bar--", false), "foo-bar.v");
        assert_eq!(canonicalize("foo", true), "foo-testbench.v");
    }

    #[test]
    fn test_canonicalize_never_doubles_marker_or_extension() {
        assert_eq!(canonicalize("foo.v", false), "foo.v");
        assert_eq!(canonicalize("foo-testbench", true), "foo-testbench.v");
        assert_eq!(canonicalize("foo_testbench.v", false), "foo.v");
        assert_eq!(canonicalize("alu_testbench_top.v", false), "alu-top.v");
        assert_eq!(canonicalize("alu_testbench_top", true), "alu-top-testbench.v");
        assert_eq!(canonicalize("testbench", false), "generated-circuit.v");
    }

    #[test]
    fn test_canonicalize_empty_uses_fallback() {
        assert_eq!(canonicalize("", false), "generated-circuit.v");
        assert_eq!(canonicalize("!!!", true), "generated-circuit-testbench.v");
    }

    #[test]
    fn test_canonical_names_match_invariant() {
        let candidates = [
            "Foo.v",
            "",
            "x",
            "module_top",
            "My Cool_Design",
            "ÜberCounter",
            "a--b",
            "alu_testbench_top.v",
            "alu_testbench_top_tb.v",
            "TestbenchWrapper",
            "top-testbench-testbench",
        ];
        let prompts = ["generate a 4-bit counter", "", "!!!", "uart receiver please"];

        for candidate in candidates {
            for prompt in prompts {
                let main = normalize_file_name(candidate, false, prompt);
                let testbench = normalize_file_name(candidate, true, prompt);
                assert!(is_canonical(&main), "{main}");
                assert!(is_canonical(&testbench), "{testbench}");
                assert!(!main.contains(TESTBENCH_MARKER), "{main}");
                assert!(testbench.ends_with("-testbench.v"), "{testbench}");
            }
        }
    }

    #[test]
    fn test_make_unique_without_collision() {
        assert_eq!(make_unique("adder", false, &names(&[])), "adder.v");
        assert_eq!(make_unique("adder", true, &names(&["adder.v"])), "adder-testbench.v");
    }

    #[test]
    fn test_make_unique_appends_counter() {
        let existing = names(&["adder.v", "adder-1.v"]);
        assert_eq!(make_unique("adder", false, &existing), "adder-2.v");

        let existing = names(&["adder-testbench.v"]);
        assert_eq!(make_unique("adder", true, &existing), "adder-1-testbench.v");
    }

    #[test]
    fn test_make_unique_does_not_mutate_existing() {
        let existing = names(&["adder.v"]);
        let _ = make_unique("adder", false, &existing);
        assert_eq!(existing.len(), 1);
    }

    #[test]
    fn test_make_unique_pair_stays_aligned() {
        let existing = names(&["adder-testbench.v"]);
        assert_eq!(
            make_unique_pair("adder.v", &existing),
            ("adder-1.v".to_string(), "adder-1-testbench.v".to_string())
        );

        let existing = names(&["adder.v", "adder-1-testbench.v"]);
        assert_eq!(
            make_unique_pair("adder.v", &existing),
            ("adder-2.v".to_string(), "adder-2-testbench.v".to_string())
        );
    }

    #[test]
    fn test_is_testbench_name() {
        assert!(is_testbench_name("adder-testbench.v"));
        assert!(!is_testbench_name("adder.v"));
    }
}
