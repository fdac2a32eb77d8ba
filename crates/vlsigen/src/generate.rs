use crate::prelude::{eprintln, println, *};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use rig::client::CompletionClient;
use rig::completion::Prompt;
use rig::providers::ollama;
use serde::Serialize;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use vlsigen_core::generate::{
    build_prompt, interpret_with, make_unique_pair, render_error, render_message, GeneratedFile,
    GenerationRequest, GenerationResult, InterpretOptions, SYSTEM_PREAMBLE,
};
use vlsigen_core::project;

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "qwen2.5-coder:32b";

#[derive(Debug, Clone, clap::Args)]
pub struct GenerateOptions {
    /// Natural-language description of the circuit
    pub prompt: String,

    /// Additional context for the generation
    #[clap(long)]
    pub context: Option<String>,

    /// Project files to include as context
    #[clap(long)]
    pub files: Vec<PathBuf>,

    /// Directory the generated files are saved to
    #[clap(long, env = "VLSIGEN_PROJECT_DIR", default_value = ".")]
    pub project_dir: PathBuf,

    /// Ollama base URL
    #[clap(long, env = "OLLAMA_URL", default_value = DEFAULT_OLLAMA_URL)]
    pub ollama_url: String,

    /// Model name for code generation
    #[clap(long, env = "VLSIGEN_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Synthesize a testbench when the model only returns the main file
    #[arg(long)]
    pub synthesize_testbench: bool,

    /// Interpret the response but do not write any file
    #[arg(long)]
    pub dry_run: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Everything a generation produced, as printed with `--json` and returned
/// by the MCP tool.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateOutput {
    pub result: GenerationResult,
    /// Names the files were saved under, main file first.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub saved: Vec<String>,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct GenerateConfig {
    pub prompt: String,
    pub context: Option<String>,
    pub files: Vec<PathBuf>,
    pub project_dir: PathBuf,
    pub ollama_url: String,
    pub model: String,
    pub options: InterpretOptions,
    pub dry_run: bool,
}

impl From<GenerateOptions> for GenerateConfig {
    fn from(options: GenerateOptions) -> Self {
        Self {
            prompt: options.prompt,
            context: options.context,
            files: options.files,
            project_dir: options.project_dir,
            ollama_url: options.ollama_url,
            model: options.model,
            options: InterpretOptions {
                synthesize_missing_testbench: options.synthesize_testbench,
            },
            dry_run: options.dry_run,
        }
    }
}

pub async fn run(options: GenerateOptions, global: crate::Global) -> Result<()> {
    let json = options.json;
    let config = GenerateConfig::from(options);

    if global.verbose {
        eprintln!("Ollama URL: {}", config.ollama_url);
        eprintln!("Model: {}", config.model);
        eprintln!("Project directory: {}", config.project_dir.display());
    }

    let spinner = (!json && std::io::stderr().is_terminal()).then(|| {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap(),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(100));
        spinner
    });

    let output = generate_data(config, spinner.as_ref()).await;

    if let Some(spinner) = &spinner {
        spinner.finish_and_clear();
    }

    let output = match output {
        Ok(output) => output,
        Err(e) => {
            if !json {
                eprintln!("{}", render_error(&e.to_string()).red());
            }
            return Err(e);
        }
    };

    if json {
        let json_output = serde_json::to_string_pretty(&output)
            .map_err(|e| eyre!("Failed to serialize output: {}", e))?;
        println!("{}", json_output);
        return Ok(());
    }

    output_formatted(&output);
    Ok(())
}

fn set_spinner_msg(spinner: Option<&ProgressBar>, msg: impl Into<String>) {
    if let Some(spinner) = spinner {
        spinner.set_message(msg.into());
    }
}

/// Generate, interpret and save. Public for MCP reuse.
pub async fn generate_data(
    config: GenerateConfig,
    spinner: Option<&ProgressBar>,
) -> Result<GenerateOutput> {
    set_spinner_msg(spinner, "Reading project files...");
    let mut files = Vec::new();
    for path in &config.files {
        files.push(read_context_file(path).await?);
    }

    let request = GenerationRequest {
        instruction: config.prompt.clone(),
        context: config.context.clone(),
        files,
    };
    let prompt = build_prompt(&request);

    set_spinner_msg(spinner, f!("Generating with {}...", config.model));
    let response = complete(&config.ollama_url, &config.model, &prompt).await?;

    set_spinner_msg(spinner, "Interpreting response...");
    let result = interpret_with(&response, &config.prompt, &config.options);

    let saved = save_result(&result, &config.project_dir, config.dry_run)?;
    let message = render_message(&result, &saved);

    Ok(GenerateOutput {
        result,
        saved,
        message,
    })
}

async fn read_context_file(path: &Path) -> Result<GeneratedFile> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| f!("Failed to read file '{}'", path.display()))?;
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_eyre(Error::InvalidFile(path.display().to_string()))?
        .to_string();

    Ok(GeneratedFile { name, content })
}

fn create_client(ollama_url: &str) -> Result<ollama::Client> {
    use rig::client::Nothing;

    ollama::Client::builder()
        .api_key(Nothing)
        .base_url(ollama_url)
        .build()
        .map_err(|e| eyre!("Failed to create Ollama client: {}", e))
}

/// Send the prompt to the model and return its raw text.
pub async fn complete(ollama_url: &str, model: &str, prompt: &str) -> Result<String> {
    log::debug!("Prompting {model} at {ollama_url} ({} chars)", prompt.len());

    let client = create_client(ollama_url)?;
    let agent = client.agent(model).preamble(SYSTEM_PREAMBLE).build();

    let response = agent
        .prompt(prompt)
        .await
        .map_err(|e| Error::Upstream(e.to_string()))?;

    log::debug!("Model returned {} chars", response.len());
    Ok(response)
}

/// Save the generated files under collision-free names.
///
/// Returns the names used, main file first. Nothing is written for debug
/// or raw results, or when `dry_run` is set; the returned names are then
/// the ones that would have been used. The pair is written as a unit: a
/// failed testbench write leaves no main file behind.
pub fn save_result(
    result: &GenerationResult,
    project_dir: &Path,
    dry_run: bool,
) -> Result<Vec<String>> {
    let GenerationResult::Files {
        main_file,
        testbench_file,
    } = result
    else {
        return Ok(Vec::new());
    };

    let existing = project::existing_names(project_dir)?;
    let (main_name, testbench_name) = make_unique_pair(&main_file.name, &existing);

    let mut saved = vec![main_name];
    if testbench_file.is_some() {
        saved.push(testbench_name);
    }

    if dry_run {
        return Ok(saved);
    }

    let testbench = testbench_file
        .as_ref()
        .zip(saved.get(1))
        .map(|(file, name)| (name.as_str(), file.content.as_str()));
    project::save_pair(
        project_dir,
        (saved[0].as_str(), main_file.content.as_str()),
        testbench,
    )?;

    log::info!("Saved {} in {}", saved.join(", "), project_dir.display());

    Ok(saved)
}

pub fn output_formatted(output: &GenerateOutput) {
    let is_tty = std::io::stdout().is_terminal();

    if !is_tty {
        println!("{}", output.message);
        return;
    }

    eprintln!("\n{}", "=".repeat(80).bright_cyan());
    eprintln!("{}", "VERILOG GENERATION".bright_cyan().bold());
    eprintln!("{}", "=".repeat(80).bright_cyan());

    println!("\n{}", output.message);

    if let GenerationResult::Files {
        main_file,
        testbench_file,
    } = &output.result
    {
        let mut table = new_table();
        table.add_row(prettytable::row!["File".green(), "Role".green(), "Lines".green()]);

        let files = std::iter::once(("main", main_file))
            .chain(testbench_file.iter().map(|f| ("testbench", f)));
        for (index, (role, file)) in files.enumerate() {
            let name = output.saved.get(index).unwrap_or(&file.name);
            table.add_row(prettytable::row![
                name.cyan(),
                role,
                file.content.lines().count()
            ]);
        }

        eprintln!();
        table.printstd();
    }
}
