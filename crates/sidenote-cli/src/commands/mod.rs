use anyhow::Result;
use sidenote_config::NotesConfig;
use sidenote_core::Notebook;

use crate::cli::{Cli, Commands};

pub mod categories;
pub mod config;
pub mod link;
pub mod links;
pub mod list;
pub mod new;

/// Run the parsed command against the resolved configuration
pub fn execute(cli: Cli, config: NotesConfig) -> Result<()> {
    let format = cli.format;
    let notebook = Notebook::open(&config);

    match cli.command {
        Commands::New {
            title,
            categories,
            seed,
            seed_stdin,
        } => new::execute(&notebook, title, categories, seed, seed_stdin),
        Commands::Link { note, target, at } => link::execute(&notebook, note, target, at, format),
        Commands::Links {
            note,
            outgoing,
            check,
            repair,
        } => links::execute(&notebook, note, outgoing, check, repair, format),
        Commands::List { category } => list::execute(&notebook, category, format),
        Commands::Categories => categories::execute(&notebook, format),
        Commands::Config(cmd) => config::execute(cmd, &config, cli.config),
    }
}
