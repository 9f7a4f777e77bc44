//! Layered configuration loading

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::{expand_home, ConfigError, ConfigResult, ListingStrategy, NotesConfig};

/// Environment variable overriding the store directory
pub const ENV_DIRECTORY: &str = "SIDENOTE_DIR";
/// Environment variable overriding the listing strategy
pub const ENV_LISTING: &str = "SIDENOTE_LISTING";

/// Command line values, applied last
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// Replaces the store directory
    pub directory: Option<PathBuf>,
    /// Replaces the listing strategy
    pub listing: Option<ListingStrategy>,
}

/// Resolves a [`NotesConfig`] from defaults, file, environment and overrides
pub struct ConfigLoader {
    env: Option<HashMap<String, String>>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Loader reading the process environment
    pub fn new() -> Self {
        Self { env: None }
    }

    /// Loader reading a fixed set of variables instead of the process environment
    pub fn with_env<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            env: Some(
                vars.into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    fn var(&self, key: &str) -> Option<String> {
        match &self.env {
            Some(vars) => vars.get(key).cloned(),
            None => std::env::var(key).ok(),
        }
    }

    /// Load configuration with precedence: defaults < file < env < overrides
    ///
    /// A missing config file is not an error; defaults are used instead.
    pub fn load(&self, config_file: Option<PathBuf>, overrides: Overrides) -> ConfigResult<NotesConfig> {
        let path = config_file.or_else(|| default_config_path().ok());
        let mut config = match path {
            Some(path) if path.exists() => load_file(&path)?,
            _ => NotesConfig::default(),
        };

        if let Some(dir) = self.var(ENV_DIRECTORY) {
            config.directory = PathBuf::from(dir);
        }
        if let Some(listing) = self.var(ENV_LISTING) {
            config.listing = listing.parse()?;
        }

        if let Some(dir) = overrides.directory {
            config.directory = dir;
        }
        if let Some(listing) = overrides.listing {
            config.listing = listing;
        }

        config.directory = expand_home(config.directory);
        debug!(
            directory = %config.directory.display(),
            listing = %config.listing,
            "configuration resolved"
        );
        Ok(config)
    }
}

/// Parse a config file
pub fn load_file(path: &Path) -> ConfigResult<NotesConfig> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// `~/.config/sidenote/config.toml` or the platform equivalent
pub fn default_config_path() -> ConfigResult<PathBuf> {
    let dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
    Ok(dir.join("sidenote").join("config.toml"))
}

/// Render the effective configuration as TOML
pub fn to_toml(config: &NotesConfig) -> ConfigResult<String> {
    Ok(toml::to_string_pretty(config)?)
}

/// Write a commented example config file, refusing to overwrite
pub fn create_example(path: &Path) -> ConfigResult<()> {
    if path.exists() {
        return Err(ConfigError::AlreadyExists(path.to_path_buf()));
    }

    let example = r#"# Sidenote configuration
# Location: ~/.config/sidenote/config.toml

# Directory holding the note files
# Default: ~/Documents/notes
directory = "~/Documents/notes"

# Categories always offered, in addition to those found in filenames
known_categories = ["economics", "philosophy", "politics"]

# "flat" scans only the top level of the directory,
# "recursive" also descends into non-hidden subdirectories
listing = "flat"

# Default log level for the command line (off, error, warn, info, debug, trace)
# log_level = "warn"
"#;

    let write_err = |source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(write_err)?;
    }
    fs::write(path, example).map_err(write_err)?;
    Ok(())
}
