use crate::generate::{output_formatted, save_result, GenerateOutput};
use crate::prelude::{eprintln, println, *};
use std::path::PathBuf;
use tokio::io::AsyncReadExt;
use vlsigen_core::generate::{interpret_with, render_message, InterpretOptions as CoreOptions};

#[derive(Debug, Clone, clap::Args)]
pub struct InterpretOptions {
    /// File holding the raw model response ("-" or absent reads stdin)
    #[clap(long, short)]
    pub input: Option<PathBuf>,

    /// The prompt the response was generated for
    #[clap(long, short, default_value = "")]
    pub prompt: String,

    /// Save the recovered files into this project directory
    #[clap(long)]
    pub project_dir: Option<PathBuf>,

    /// Synthesize a testbench when the response only carries the main file
    #[arg(long)]
    pub synthesize_testbench: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(options: InterpretOptions, global: crate::Global) -> Result<()> {
    let raw_response = read_response(options.input.as_ref()).await?;

    if global.verbose {
        eprintln!("Read {} chars of model output", raw_response.len());
    }

    let output = interpret_data(
        &raw_response,
        &options.prompt,
        options.synthesize_testbench,
        options.project_dir.as_ref(),
    )?;

    if options.json {
        let json_output = serde_json::to_string_pretty(&output)
            .map_err(|e| eyre!("Failed to serialize output: {}", e))?;
        println!("{}", json_output);
        return Ok(());
    }

    output_formatted(&output);
    Ok(())
}

/// Interpret a raw response and optionally save the result. Public for MCP reuse.
pub fn interpret_data(
    raw_response: &str,
    prompt: &str,
    synthesize_testbench: bool,
    project_dir: Option<&PathBuf>,
) -> Result<GenerateOutput> {
    let options = CoreOptions {
        synthesize_missing_testbench: synthesize_testbench,
    };
    let result = interpret_with(raw_response, prompt, &options);

    let saved = match project_dir {
        Some(dir) => save_result(&result, dir, false)?,
        None => Vec::new(),
    };
    let message = render_message(&result, &saved);

    Ok(GenerateOutput {
        result,
        saved,
        message,
    })
}

async fn read_response(input: Option<&PathBuf>) -> Result<String> {
    match input {
        Some(path) if path.as_os_str() != "-" => tokio::fs::read_to_string(path)
            .await
            .map_err(|e| Error::Input(f!("{}: {}", path.display(), e)).into()),
        _ => {
            let mut buffer = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buffer)
                .await
                .map_err(|e| Error::Input(e.to_string()))?;
            Ok(buffer)
        }
    }
}
