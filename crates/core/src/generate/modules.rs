use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Module name used when a block has no recognizable name.
pub const DEFAULT_MODULE_NAME: &str = "generated_module";

/// Direction of a module port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortDirection {
    Input,
    Output,
}

impl PortDirection {
    pub fn keyword(&self) -> &'static str {
        match self {
            PortDirection::Input => "input",
            PortDirection::Output => "output",
        }
    }
}

/// A port declaration as recognized in module text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Port {
    pub name: String,
    /// Bracketed width such as `[3:0]`, when declared.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
}

/// Find every `module ... endmodule` block in `text`, in order of appearance.
///
/// Blocks are minimal and non-overlapping: each ends at the nearest
/// `endmodule` after its `module` keyword.
pub fn extract_modules(text: &str) -> Vec<String> {
    static RE_MODULE: OnceLock<Regex> = OnceLock::new();
    let re_module = RE_MODULE
        .get_or_init(|| Regex::new(r"(?is)\bmodule\s+\w+.*?\bendmodule\b").unwrap());

    re_module
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Name of the module declared in `module_text`.
pub fn extract_module_name(module_text: &str) -> String {
    static RE_NAME: OnceLock<Regex> = OnceLock::new();
    let re_name = RE_NAME.get_or_init(|| Regex::new(r"(?i)\bmodule\s+(\w+)").unwrap());

    re_name
        .captures(module_text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| DEFAULT_MODULE_NAME.to_string())
}

/// Identifiers of every port declared with `direction`, in source order.
pub fn extract_ports(module_text: &str, direction: PortDirection) -> Vec<String> {
    extract_port_declarations(module_text, direction)
        .into_iter()
        .map(|port| port.name)
        .collect()
}

/// Port declarations with their widths, in source order.
///
/// Recognizes `<direction> [net type] [width] <identifier>`; duplicates are
/// kept.
pub fn extract_port_declarations(module_text: &str, direction: PortDirection) -> Vec<Port> {
    static RE_INPUT: OnceLock<Regex> = OnceLock::new();
    static RE_OUTPUT: OnceLock<Regex> = OnceLock::new();

    let re_port = match direction {
        PortDirection::Input => &RE_INPUT,
        PortDirection::Output => &RE_OUTPUT,
    }
    .get_or_init(|| Regex::new(&port_pattern(direction)).unwrap());

    re_port
        .captures_iter(module_text)
        .filter_map(|caps| {
            let name = caps.name("name")?.as_str().to_string();
            let width = caps
                .name("width")
                .map(|m| m.as_str().split_whitespace().collect::<String>());
            Some(Port { name, width })
        })
        .collect()
}

fn port_pattern(direction: PortDirection) -> String {
    format!(
        r"(?i)\b{}\s+(?:(?:wire|reg|logic|signed|unsigned)\s+)*(?P<width>\[[^\]]+\])?\s*(?P<name>[A-Za-z_]\w*)",
        direction.keyword()
    )
}
