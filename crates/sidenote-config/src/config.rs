//! Configuration types

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// How the store directory is scanned for notes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingStrategy {
    /// Only the top level of the store directory
    #[default]
    Flat,
    /// The store directory and every non-hidden subdirectory
    Recursive,
}

impl fmt::Display for ListingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListingStrategy::Flat => write!(f, "flat"),
            ListingStrategy::Recursive => write!(f, "recursive"),
        }
    }
}

impl FromStr for ListingStrategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "flat" => Ok(ListingStrategy::Flat),
            "recursive" => Ok(ListingStrategy::Recursive),
            other => Err(ConfigError::InvalidValue {
                key: "listing".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

/// Effective configuration of the note store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotesConfig {
    /// Directory holding every note file
    pub directory: PathBuf,

    /// Categories offered even when no note uses them yet
    pub known_categories: Vec<String>,

    /// Directory scanning mode
    pub listing: ListingStrategy,

    /// Log level used by the front end when none is given on the command line
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

impl Default for NotesConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            known_categories: Vec::new(),
            listing: ListingStrategy::default(),
            log_level: None,
        }
    }
}

impl NotesConfig {
    /// Config rooted at `directory` with every other value defaulted
    pub fn with_directory(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            ..Self::default()
        }
    }

    /// Builder-style: set the configured categories
    #[must_use]
    pub fn with_known_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.known_categories = categories.into_iter().map(Into::into).collect();
        self
    }

    /// Builder-style: set the listing strategy
    #[must_use]
    pub fn with_listing(mut self, listing: ListingStrategy) -> Self {
        self.listing = listing;
        self
    }
}

/// `~/Documents/notes`, or the platform documents directory equivalent
pub fn default_directory() -> PathBuf {
    dirs::document_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Documents")))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("notes")
}

/// Expand a leading `~` against the home directory
pub fn expand_home(path: PathBuf) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path;
    };
    match dirs::home_dir() {
        Some(home) => home.join(rest),
        None => path,
    }
}
