use serde::{Deserialize, Serialize};

/// A single generated Verilog source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedFile {
    /// Canonical file name, always ending in `.v`.
    pub name: String,
    /// Cleaned multi-line source text.
    pub content: String,
}

/// Debug analysis returned by the model instead of code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebugInfo {
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(default)]
    pub fixes: Vec<String>,
}

/// Outcome of interpreting a raw model response.
///
/// Serializes to the same shapes the model and the UI exchange:
/// `{"mainFile", "testbenchFile"}`, `{"debugInfo"}` or `{"rawResponse"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GenerationResult {
    Files {
        #[serde(rename = "mainFile")]
        main_file: GeneratedFile,
        /// Absent only when a JSON response omitted it and synthesis was not requested.
        #[serde(rename = "testbenchFile", skip_serializing_if = "Option::is_none")]
        testbench_file: Option<GeneratedFile>,
    },
    Debug {
        #[serde(rename = "debugInfo")]
        debug_info: DebugInfo,
    },
    Raw {
        #[serde(rename = "rawResponse")]
        raw_response: String,
    },
}

impl GenerationResult {
    /// Returns the main and testbench files when both are present.
    pub fn file_pair(&self) -> Option<(&GeneratedFile, &GeneratedFile)> {
        match self {
            GenerationResult::Files {
                main_file,
                testbench_file: Some(testbench_file),
            } => Some((main_file, testbench_file)),
            _ => None,
        }
    }

    pub fn is_raw(&self) -> bool {
        matches!(self, GenerationResult::Raw { .. })
    }
}

/// Knobs for [`crate::generate::interpret_with`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterpretOptions {
    /// Synthesize a testbench when a JSON response only carries `mainFile`.
    #[serde(default)]
    pub synthesize_missing_testbench: bool,
}

/// A request for Verilog code generation.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// The natural-language description of the circuit.
    pub instruction: String,
    /// Optional additional context for the generation.
    pub context: Option<String>,
    /// Project files to include as context.
    pub files: Vec<GeneratedFile>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str) -> GeneratedFile {
        GeneratedFile {
            name: name.to_string(),
            content: "module foo;\nendmodule".to_string(),
        }
    }

    #[test]
    fn test_files_serialize_with_camel_case_keys() {
        let result = GenerationResult::Files {
            main_file: file("foo.v"),
            testbench_file: Some(file("foo-testbench.v")),
        };

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["mainFile"]["name"], "foo.v");
        assert_eq!(value["testbenchFile"]["name"], "foo-testbench.v");
    }

    #[test]
    fn test_missing_testbench_is_not_serialized() {
        let result = GenerationResult::Files {
            main_file: file("foo.v"),
            testbench_file: None,
        };

        let value = serde_json::to_value(&result).unwrap();
        assert!(value.get("testbenchFile").is_none());
        assert!(result.file_pair().is_none());
    }

    #[test]
    fn test_raw_and_debug_shapes() {
        let raw = GenerationResult::Raw {
            raw_response: "nope".to_string(),
        };
        assert_eq!(
            serde_json::to_string(&raw).unwrap(),
            r#"{"rawResponse":"nope"}"#
        );
        assert!(raw.is_raw());

        let debug = GenerationResult::Debug {
            debug_info: DebugInfo {
                errors: vec!["missing semicolon".to_string()],
                fixes: vec![],
            },
        };
        let value = serde_json::to_value(&debug).unwrap();
        assert_eq!(value["debugInfo"]["errors"][0], "missing semicolon");
    }

    #[test]
    fn test_deserialize_round_trips_wire_shape() {
        let json = r#"{"debugInfo":{"errors":["a"],"fixes":["b"]}}"#;
        let parsed: GenerationResult = serde_json::from_str(json).unwrap();
        assert_eq!(
            parsed,
            GenerationResult::Debug {
                debug_info: DebugInfo {
                    errors: vec!["a".to_string()],
                    fixes: vec!["b".to_string()],
                },
            }
        );
    }
}
