//! Error types for note store operations

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the note store, codec and link maintainer
///
/// Entries that merely fail to parse while scanning the store are skipped,
/// not reported; only explicitly named lookups and I/O produce errors.
#[derive(Debug, Error)]
pub enum NoteError {
    #[error("No note with id {id}")]
    NotFound { id: String },

    #[error("Unknown category: {category}")]
    UnknownCategory { category: String },

    #[error("Note already exists: {}", path.display())]
    AlreadyExists { path: PathBuf },

    #[error("Malformed note filename: {name}")]
    MalformedFilename { name: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl NoteError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        NoteError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn not_found(id: impl Into<String>) -> Self {
        NoteError::NotFound { id: id.into() }
    }

    /// True for lookups that did not resolve
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            NoteError::NotFound { .. } | NoteError::UnknownCategory { .. }
        )
    }
}

pub type NoteResult<T> = Result<T, NoteError>;
