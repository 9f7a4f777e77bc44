use anyhow::Result;
use sidenote_core::{Clock, Notebook};

use crate::cli::OutputFormat;
use crate::output;

pub fn execute<C: Clock>(notebook: &Notebook<C>, format: OutputFormat) -> Result<()> {
    let categories = notebook.categories()?;
    output::emit(&output::format_list(&categories, format)?);
    Ok(())
}
