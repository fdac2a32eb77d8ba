mod vlsi;

use serde::{Deserialize, Serialize};

// Re-export types needed by tool handlers
pub use super::{JsonRpcError, Tool};

// MCP Protocol types for tools
#[derive(Debug, Serialize)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Serialize)]
pub struct ServerCapabilities {
    pub tools: Option<ToolsCapability>,
}

#[derive(Debug, Serialize)]
pub struct ToolsCapability {}

#[derive(Debug, Serialize)]
pub struct InitializeResult {
    #[serde(rename = "protocolVersion")]
    pub protocol_version: String,
    pub capabilities: ServerCapabilities,
    #[serde(rename = "serverInfo")]
    pub server_info: ServerInfo,
}

#[derive(Debug, Serialize)]
pub struct ToolsList {
    pub tools: Vec<Tool>,
}

#[derive(Debug, Deserialize)]
pub struct CallToolParams {
    pub name: String,
    pub arguments: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct CallToolResult {
    pub content: Vec<Content>,
    #[serde(rename = "isError", skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub enum Content {
    #[serde(rename = "text")]
    Text { text: String },
}

pub fn handle_initialize() -> Result<serde_json::Value, JsonRpcError> {
    let result = InitializeResult {
        protocol_version: "2024-11-05".to_string(),
        capabilities: ServerCapabilities {
            tools: Some(ToolsCapability {}),
        },
        server_info: ServerInfo {
            name: "vlsigen".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
    };

    serde_json::to_value(result).map_err(|e| JsonRpcError {
        code: -32603,
        message: format!("Internal error: {e}"),
        data: None,
    })
}

pub fn handle_tools_list() -> Result<serde_json::Value, JsonRpcError> {
    let tools = vec![
        Tool {
            name: "vlsi_generate".to_string(),
            description: "Generate a Verilog module and its testbench from a natural-language description. Prompts the configured Ollama model, recovers the files from its response and saves them into the project directory under unique names. Uses the OLLAMA_URL, VLSIGEN_MODEL and VLSIGEN_PROJECT_DIR environment variables as defaults.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "prompt": {
                        "type": "string",
                        "description": "Description of the circuit (e.g., '4-bit counter with synchronous reset')"
                    },
                    "context": {
                        "type": "string",
                        "description": "Additional context for the generation (optional)"
                    },
                    "files": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Paths of existing project files to include as context"
                    },
                    "projectDir": {
                        "type": "string",
                        "description": "Directory the generated files are saved to"
                    },
                    "model": {
                        "type": "string",
                        "description": "Model name (default: qwen2.5-coder:32b)"
                    },
                    "synthesizeTestbench": {
                        "type": "boolean",
                        "description": "Synthesize a testbench when the model only returns the main file (default: false)"
                    },
                    "dryRun": {
                        "type": "boolean",
                        "description": "Interpret the response without saving any file (default: false)"
                    }
                },
                "required": ["prompt"]
            }),
        },
        Tool {
            name: "vlsi_interpret".to_string(),
            description: "Recover a Verilog main file and testbench from a raw model response. Accepts a JSON payload, HTML-wrapped or escaped code, or bare module text. Returns the recovered files, debug info or the raw response, plus a user-facing message.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "response": {
                        "type": "string",
                        "description": "Raw text returned by the model"
                    },
                    "prompt": {
                        "type": "string",
                        "description": "The prompt the response was generated for, used to name files"
                    },
                    "projectDir": {
                        "type": "string",
                        "description": "Save the recovered files into this directory (optional)"
                    },
                    "synthesizeTestbench": {
                        "type": "boolean",
                        "description": "Synthesize a testbench when the response only carries the main file (default: false)"
                    }
                },
                "required": ["response"]
            }),
        },
        Tool {
            name: "vlsi_name".to_string(),
            description: "Normalize a candidate Verilog file name. Produces a lowercase hyphenated '.v' name, with a '-testbench' marker for testbenches, optionally made unique against the files of a directory.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "candidate": {
                        "type": "string",
                        "description": "Candidate file name (may be empty)"
                    },
                    "prompt": {
                        "type": "string",
                        "description": "Prompt to derive the name from when the candidate is empty"
                    },
                    "testbench": {
                        "type": "boolean",
                        "description": "Whether the name is for a testbench (default: false)"
                    },
                    "uniqueIn": {
                        "type": "string",
                        "description": "Directory whose existing files the name must not collide with (optional)"
                    }
                }
            }),
        },
    ];

    serde_json::to_value(ToolsList { tools }).map_err(|e| JsonRpcError {
        code: -32603,
        message: format!("Internal error: {e}"),
        data: None,
    })
}

pub async fn handle_tools_call(
    params: Option<serde_json::Value>,
    global: &crate::Global,
) -> Result<serde_json::Value, JsonRpcError> {
    let params: CallToolParams = serde_json::from_value(params.unwrap_or(serde_json::Value::Null))
        .map_err(|e| JsonRpcError {
            code: -32602,
            message: format!("Invalid params: {e}"),
            data: None,
        })?;

    log::debug!("tools/call {}", params.name);

    match params.name.as_str() {
        "vlsi_generate" => vlsi::handle_vlsi_generate(params.arguments, global).await,
        "vlsi_interpret" => vlsi::handle_vlsi_interpret(params.arguments, global).await,
        "vlsi_name" => vlsi::handle_vlsi_name(params.arguments, global).await,
        _ => Err(JsonRpcError {
            code: -32602,
            message: format!("Unknown tool: {}", params.name),
            data: None,
        }),
    }
}
