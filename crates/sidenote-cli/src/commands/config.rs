use std::path::PathBuf;

use anyhow::{Context, Result};
use sidenote_config::{create_example, default_config_path, to_toml, NotesConfig};

use crate::cli::ConfigCommands;

pub fn execute(cmd: ConfigCommands, config: &NotesConfig, config_file: Option<PathBuf>) -> Result<()> {
    match cmd {
        ConfigCommands::Show => {
            print!("{}", to_toml(config)?);
        }
        ConfigCommands::Init { path } => {
            let path = match path.or(config_file) {
                Some(path) => path,
                None => default_config_path()?,
            };
            create_example(&path)
                .with_context(|| format!("Failed to create config at {}", path.display()))?;
            println!("Created config file: {}", path.display());
        }
        ConfigCommands::Path => {
            println!("{}", default_config_path()?.display());
        }
    }
    Ok(())
}
