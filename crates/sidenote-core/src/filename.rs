//! Filename codec
//!
//! The filename is the canonical record of a note:
//! `<id>--<cat1-cat2-...>--<slug>.txt`. A note without categories keeps the
//! empty segment, giving `<id>----<slug>.txt`.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{NoteError, NoteId};

/// Extension of every note file, without the dot
pub const EXTENSION: &str = "txt";

/// Separates the id, category and slug segments
pub const SEGMENT_DELIMITER: &str = "--";

static FILENAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{8}_[0-9]{6})--([^-]*(?:-[^-]+)*)--(.+)\.txt$").expect("filename regex")
});

/// The decoded parts of a note filename
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NoteFilename {
    pub id: NoteId,
    pub categories: Vec<String>,
    pub slug: String,
}

impl NoteFilename {
    /// Categories are lowercased; they are otherwise expected to be
    /// hyphen-free tokens (see [`crate::category_token`])
    pub fn new<I, S>(id: NoteId, categories: I, slug: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            id,
            categories: categories
                .into_iter()
                .map(|c| c.as_ref().to_lowercase())
                .collect(),
            slug: slug.into(),
        }
    }

    pub fn encode(&self) -> String {
        format!(
            "{id}{d}{cats}{d}{slug}.{EXTENSION}",
            id = self.id,
            d = SEGMENT_DELIMITER,
            cats = self.categories.join("-"),
            slug = self.slug,
        )
    }

    /// Decode a bare filename; `None` for anything not shaped like a note
    pub fn parse(name: &str) -> Option<Self> {
        let caps = FILENAME_REGEX.captures(name)?;
        let id = NoteId::parse(caps.get(1)?.as_str())?;
        let categories = caps
            .get(2)?
            .as_str()
            .split('-')
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect();
        let slug = caps.get(3)?.as_str().to_string();

        Some(Self {
            id,
            categories,
            slug,
        })
    }

    pub fn has_category(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }
}

impl fmt::Display for NoteFilename {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for NoteFilename {
    type Err = NoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NoteFilename::parse(s).ok_or_else(|| NoteError::MalformedFilename {
            name: s.to_string(),
        })
    }
}
