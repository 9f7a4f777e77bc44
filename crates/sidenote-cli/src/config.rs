use anyhow::{Context, Result};
use sidenote_config::{ConfigLoader, ListingStrategy, NotesConfig, Overrides};

use crate::cli::Cli;

/// Load configuration with precedence: defaults < file < env < args
pub fn load(cli: &Cli) -> Result<NotesConfig> {
    let overrides = Overrides {
        directory: cli.dir.clone(),
        listing: cli.recursive.then_some(ListingStrategy::Recursive),
    };

    ConfigLoader::new()
        .load(cli.config.clone(), overrides)
        .context("Failed to load configuration")
}
