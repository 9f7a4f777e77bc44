//! Configuration errors

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while locating, reading or writing configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file exists but could not be read
    #[error("Failed to read config file {path}: {source}")]
    Read {
        /// File that failed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The config file could not be written
    #[error("Failed to write config file {path}: {source}")]
    Write {
        /// File that failed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for [`crate::NotesConfig`]
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        /// File that failed
        path: PathBuf,
        /// Underlying TOML error
        #[source]
        source: toml::de::Error,
    },

    /// The effective configuration could not be rendered as TOML
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// An environment variable held a value that does not parse
    #[error("Invalid value {value:?} for {key}")]
    InvalidValue {
        /// Variable or key name
        key: String,
        /// Offending value
        value: String,
    },

    /// Refused to clobber an existing file
    #[error("Config file already exists: {0}")]
    AlreadyExists(PathBuf),

    /// No platform config directory could be determined
    #[error("Could not determine config directory")]
    NoConfigDir,
}

/// Result alias for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;
