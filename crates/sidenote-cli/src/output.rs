use anyhow::{Context, Result};
use serde::Serialize;

use crate::cli::OutputFormat;

/// Render a list of strings, one per line or as a JSON array
pub fn format_list(items: &[String], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Plain => Ok(items.join("\n")),
        OutputFormat::Json => to_json(&items),
    }
}

pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize output as JSON")
}

/// Print unless there is nothing to print
pub fn emit(rendered: &str) {
    if !rendered.is_empty() {
        println!("{rendered}");
    }
}
