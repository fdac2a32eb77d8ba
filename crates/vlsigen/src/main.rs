use crate::prelude::*;
use clap::Parser;

mod error;
mod generate;
mod interpret;
mod mcp;
mod name;
mod prelude;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Generate Verilog modules and testbenches from natural-language prompts"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Whether to display additional information.
    #[clap(long, env = "VLSIGEN_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Generate a module and its testbench from a prompt
    Generate(crate::generate::GenerateOptions),

    /// Interpret a stored model response without calling the model
    Interpret(crate::interpret::InterpretOptions),

    /// Print the canonical file name for a candidate name or prompt
    Name(crate::name::NameOptions),

    /// Model Context Protocol server
    MCP(crate::mcp::App),
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    match app.command {
        SubCommands::Generate(options) => crate::generate::run(options, app.global).await,
        SubCommands::Interpret(options) => crate::interpret::run(options, app.global).await,
        SubCommands::Name(options) => crate::name::run(options, app.global),
        SubCommands::MCP(sub_app) => crate::mcp::run(sub_app, app.global).await,
    }
    .map_err(|err: color_eyre::eyre::Report| eyre!(err))
}
