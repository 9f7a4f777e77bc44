use anyhow::Result;
use sidenote_core::{Clock, Notebook};

use crate::cli::OutputFormat;
use crate::output;

pub fn execute<C: Clock>(
    notebook: &Notebook<C>,
    category: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    match (category, format) {
        (None, OutputFormat::Json) => {
            println!("{}", output::to_json(&notebook.summaries()?)?);
        }
        (None, OutputFormat::Plain) => {
            output::emit(&output::format_list(&notebook.list_notes()?, format)?);
        }
        (Some(category), format) => {
            let names = notebook.list_notes_in(&category)?;
            output::emit(&output::format_list(&names, format)?);
        }
    }
    Ok(())
}
