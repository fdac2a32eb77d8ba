use crate::prelude::{eprintln, println, *};
use std::path::PathBuf;
use vlsigen_core::generate::{make_unique, naming::derive_base_name, normalize_file_name};
use vlsigen_core::project;

#[derive(Debug, Clone, clap::Args)]
pub struct NameOptions {
    /// Candidate file name (may be empty to derive from the prompt)
    #[clap(default_value = "")]
    pub candidate: String,

    /// Prompt used when the candidate is too generic
    #[clap(long, short, default_value = "")]
    pub prompt: String,

    /// Produce the testbench variant
    #[arg(long)]
    pub testbench: bool,

    /// Avoid names already present in this project directory
    #[clap(long)]
    pub unique_in: Option<PathBuf>,
}

pub fn run(options: NameOptions, global: crate::Global) -> Result<()> {
    let name = name_data(
        &options.candidate,
        &options.prompt,
        options.testbench,
        options.unique_in.as_ref(),
    )?;

    if global.verbose {
        eprintln!("Candidate: {:?}", options.candidate);
    }

    println!("{}", name);
    Ok(())
}

/// Canonical, optionally collision-free, file name.
pub fn name_data(
    candidate: &str,
    prompt: &str,
    testbench: bool,
    unique_in: Option<&PathBuf>,
) -> Result<String> {
    match unique_in {
        Some(dir) => {
            let existing = project::existing_names(dir)?;
            let base = derive_base_name(candidate, prompt);
            Ok(make_unique(&base, testbench, &existing))
        }
        None => Ok(normalize_file_name(candidate, testbench, prompt)),
    }
}
