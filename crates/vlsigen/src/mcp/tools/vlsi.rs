use super::{CallToolResult, Content, JsonRpcError};
use crate::generate::{GenerateConfig, DEFAULT_MODEL, DEFAULT_OLLAMA_URL};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use vlsigen_core::generate::InterpretOptions;

fn invalid_arguments(e: impl std::fmt::Display) -> JsonRpcError {
    JsonRpcError {
        code: -32602,
        message: format!("Invalid arguments: {e}"),
        data: None,
    }
}

fn execution_error(e: impl std::fmt::Display) -> JsonRpcError {
    JsonRpcError {
        code: -32603,
        message: format!("Tool execution error: {e}"),
        data: None,
    }
}

fn text_result<T: Serialize>(data: &T) -> Result<serde_json::Value, JsonRpcError> {
    let json_string = serde_json::to_string_pretty(data).map_err(|e| JsonRpcError {
        code: -32603,
        message: format!("Serialization error: {e}"),
        data: None,
    })?;

    let result = CallToolResult {
        content: vec![Content::Text { text: json_string }],
        is_error: None,
    };

    serde_json::to_value(result).map_err(|e| JsonRpcError {
        code: -32603,
        message: format!("Internal error: {e}"),
        data: None,
    })
}

pub async fn handle_vlsi_generate(
    arguments: Option<serde_json::Value>,
    global: &crate::Global,
) -> Result<serde_json::Value, JsonRpcError> {
    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct GenerateArgs {
        prompt: String,
        #[serde(default)]
        context: Option<String>,
        #[serde(default)]
        files: Vec<PathBuf>,
        #[serde(default)]
        project_dir: Option<PathBuf>,
        #[serde(default)]
        model: Option<String>,
        #[serde(default)]
        synthesize_testbench: bool,
        #[serde(default)]
        dry_run: bool,
    }

    let args: GenerateArgs =
        serde_json::from_value(arguments.unwrap_or(serde_json::Value::Null))
            .map_err(invalid_arguments)?;

    if args.prompt.trim().is_empty() {
        return Err(invalid_arguments("prompt must not be empty"));
    }

    let config = GenerateConfig {
        prompt: args.prompt,
        context: args.context,
        files: args.files,
        project_dir: args
            .project_dir
            .or_else(|| std::env::var("VLSIGEN_PROJECT_DIR").ok().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(".")),
        ollama_url: std::env::var("OLLAMA_URL").unwrap_or_else(|_| DEFAULT_OLLAMA_URL.into()),
        model: args
            .model
            .or_else(|| std::env::var("VLSIGEN_MODEL").ok())
            .unwrap_or_else(|| DEFAULT_MODEL.into()),
        options: InterpretOptions {
            synthesize_missing_testbench: args.synthesize_testbench,
        },
        dry_run: args.dry_run,
    };

    if global.verbose {
        log::info!("vlsi_generate with {} at {}", config.model, config.ollama_url);
    }

    let output = crate::generate::generate_data(config, None)
        .await
        .map_err(execution_error)?;

    text_result(&output)
}

pub async fn handle_vlsi_interpret(
    arguments: Option<serde_json::Value>,
    _global: &crate::Global,
) -> Result<serde_json::Value, JsonRpcError> {
    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct InterpretArgs {
        response: String,
        #[serde(default)]
        prompt: String,
        #[serde(default)]
        project_dir: Option<PathBuf>,
        #[serde(default)]
        synthesize_testbench: bool,
    }

    let args: InterpretArgs =
        serde_json::from_value(arguments.unwrap_or(serde_json::Value::Null))
            .map_err(invalid_arguments)?;

    let output = crate::interpret::interpret_data(
        &args.response,
        &args.prompt,
        args.synthesize_testbench,
        args.project_dir.as_ref(),
    )
    .map_err(execution_error)?;

    text_result(&output)
}

pub async fn handle_vlsi_name(
    arguments: Option<serde_json::Value>,
    _global: &crate::Global,
) -> Result<serde_json::Value, JsonRpcError> {
    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct NameArgs {
        #[serde(default)]
        candidate: String,
        #[serde(default)]
        prompt: String,
        #[serde(default)]
        testbench: bool,
        #[serde(default)]
        unique_in: Option<PathBuf>,
    }

    #[derive(Serialize)]
    struct NameOutput {
        name: String,
    }

    let args: NameArgs = serde_json::from_value(arguments.unwrap_or(serde_json::Value::Null))
        .map_err(invalid_arguments)?;

    let name = crate::name::name_data(
        &args.candidate,
        &args.prompt,
        args.testbench,
        args.unique_in.as_ref(),
    )
    .map_err(execution_error)?;

    text_result(&NameOutput { name })
}
