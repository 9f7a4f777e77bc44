use std::path::PathBuf;

use anyhow::{Context, Result};
use sidenote_core::{Clock, Notebook};

use crate::cli::OutputFormat;
use crate::output;

pub fn execute<C: Clock>(
    notebook: &Notebook<C>,
    note: PathBuf,
    target: String,
    at: Option<usize>,
    format: OutputFormat,
) -> Result<()> {
    let outcome = notebook
        .insert_link(&note, &target, at)
        .with_context(|| format!("Failed to link {} to {target}", note.display()))?;

    match format {
        OutputFormat::Plain => println!("{} -> {}", outcome.source_name, outcome.target_name),
        OutputFormat::Json => println!("{}", output::to_json(&outcome)?),
    }
    Ok(())
}
