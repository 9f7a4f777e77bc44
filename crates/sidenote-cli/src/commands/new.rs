use std::io::{self, Read};

use anyhow::{Context, Result};
use sidenote_core::{Clock, Notebook};

pub fn execute<C: Clock>(
    notebook: &Notebook<C>,
    title: String,
    categories: Vec<String>,
    seed: Option<String>,
    seed_stdin: bool,
) -> Result<()> {
    let seed = if seed_stdin {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read seed text from stdin")?;
        Some(text)
    } else {
        seed
    };

    let path = notebook
        .create_note(&title, categories.as_slice(), seed.as_deref())
        .with_context(|| format!("Failed to create note {title:?}"))?;
    println!("{}", path.display());
    Ok(())
}
