use std::sync::OnceLock;

use regex::Regex;

/// Escape sequences in replacement order. Multi-character sequences come
/// before their single-character prefixes.
const ESCAPES: [(&str, &str); 5] = [
    ("\\r\\n", "\n"),
    ("\\r", "\n"),
    ("\\n", "\n"),
    ("\\t", "    "),
    ("\\\\", "\\"),
];

const ENTITIES: [(&str, &str); 6] = [
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#39;", "'"),
    ("&nbsp;", " "),
    ("&amp;", "&"),
];

/// Clean a block of model-produced source text.
///
/// Strips HTML markup, decodes entities, un-escapes textual escape
/// sequences, normalizes line endings and blank lines. The passes are
/// repeated until the text stops changing, so the result is stable under
/// a second call.
pub fn sanitize(raw: &str) -> String {
    let mut current = sanitize_once(raw);

    // Every pass that changes the text removes a backslash or shortens it.
    loop {
        let next = sanitize_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn sanitize_once(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }

    // 1. Remove HTML tags.
    static RE_TAG: OnceLock<Regex> = OnceLock::new();
    let re_tag = RE_TAG.get_or_init(|| Regex::new(r"</?[A-Za-z!][^<>\r\n]*>").unwrap());
    let mut result = re_tag.replace_all(raw, "").to_string();

    // 2. Decode entities. `&amp;` goes last so `&amp;lt;` decodes one level.
    for (entity, replacement) in &ENTITIES {
        result = result.replace(entity, replacement);
    }

    // 3. Drop attribute fragments left behind by broken markup.
    static RE_ATTR: OnceLock<Regex> = OnceLock::new();
    let re_attr = RE_ATTR.get_or_init(|| {
        Regex::new(r#"(?:style|class)="[^"]*"|"color:[^"]*""#).unwrap()
    });
    result = re_attr.replace_all(&result, "").to_string();

    // 4. Un-escape textual escape sequences.
    for (escape, replacement) in &ESCAPES {
        result = result.replace(escape, replacement);
    }

    // 5. Normalize physical line endings.
    result = result.replace("\r\n", "\n").replace('\r', "\n");

    // 6. Strip trailing whitespace on every line.
    static RE_TRAILING: OnceLock<Regex> = OnceLock::new();
    let re_trailing = RE_TRAILING.get_or_init(|| Regex::new(r"(?m)[ \t]+$").unwrap());
    result = re_trailing.replace_all(&result, "").to_string();

    // 7. At most one blank line in a row.
    static RE_BLANK: OnceLock<Regex> = OnceLock::new();
    let re_blank = RE_BLANK.get_or_init(|| Regex::new(r"\n{3,}").unwrap());
    result = re_blank.replace_all(&result, "\n\n").to_string();

    // 8. Trim the whole block.
    result.trim().to_string()
}

/// Normalize line endings only, leaving every other byte untouched.
///
/// Used for content written to disk, which has already been sanitized but
/// may have been edited by hand.
pub fn normalize_line_endings(content: &str) -> String {
    content.replace("\r\n", "\n").replace('\r', "\n")
}
