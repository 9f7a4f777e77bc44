use std::path::PathBuf;

use anyhow::{bail, Result};
use sidenote_core::{Clock, Notebook};

use crate::cli::OutputFormat;
use crate::output;

pub fn execute<C: Clock>(
    notebook: &Notebook<C>,
    note: Option<PathBuf>,
    outgoing: bool,
    check: bool,
    repair: bool,
    format: OutputFormat,
) -> Result<()> {
    if check {
        return audit(notebook, repair, format);
    }

    let Some(note) = note else {
        bail!("Either a note path or --check is required");
    };
    let links = if outgoing {
        notebook.list_outgoing(&note)?
    } else {
        notebook.list_links(&note)?
    };
    output::emit(&output::format_list(&links, format)?);
    Ok(())
}

fn audit<C: Clock>(notebook: &Notebook<C>, repair: bool, format: OutputFormat) -> Result<()> {
    let issues = notebook.check_links()?;

    match format {
        OutputFormat::Json => println!("{}", output::to_json(&issues)?),
        OutputFormat::Plain if issues.is_empty() => println!("No link issues found"),
        OutputFormat::Plain => {
            for issue in &issues {
                println!("{issue}");
            }
        }
    }

    if repair {
        let added = notebook.repair_links()?;
        eprintln!("Added {added} missing reference line(s)");
    }
    Ok(())
}
