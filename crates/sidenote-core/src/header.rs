//! The header block written at the top of each note
//!
//! ```text
//! title: My First Note!
//! date: 2020-10-08
//! category: Economics, Politics
//! orig_name: 20201008_093000--economics-politics--my-first-note.txt
//! orig_id: 20201008_093000
//! ------------------------
//! ```
//!
//! The header repeats what the filename already encodes. It is for display
//! and is never the source of truth.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{NoteFilename, NoteId};

/// Line closing the header block
pub const DELIMITER: &str = "------------------------";

/// Line opening a seeded quotation in a new note body
pub const SEED_SEPARATOR: &str = "* * *";

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteHeader {
    pub title: String,
    pub date: NaiveDate,
    pub categories: Vec<String>,
    pub orig_name: String,
    pub orig_id: NoteId,
}

impl NoteHeader {
    /// Header consistent with `filename`
    pub fn for_filename(title: impl Into<String>, date: NaiveDate, filename: &NoteFilename) -> Self {
        Self {
            title: title.into(),
            date,
            categories: filename.categories.clone(),
            orig_name: filename.encode(),
            orig_id: filename.id.clone(),
        }
    }

    pub fn render(&self) -> String {
        let categories = self
            .categories
            .iter()
            .map(|c| capitalize(c))
            .collect::<Vec<_>>()
            .join(", ");

        let category_line = if categories.is_empty() {
            "category:".to_string()
        } else {
            format!("category: {categories}")
        };

        format!(
            "title: {}\ndate: {}\n{}\norig_name: {}\norig_id: {}\n{}\n",
            self.title,
            self.date.format(DATE_FORMAT),
            category_line,
            self.orig_name,
            self.orig_id,
            DELIMITER,
        )
    }

    /// Read the header back from the start of a note's text
    ///
    /// Returns `None` unless every field is present before the delimiter.
    pub fn parse(text: &str) -> Option<Self> {
        let mut title = None;
        let mut date = None;
        let mut categories = None;
        let mut orig_name = None;
        let mut orig_id = None;

        for line in text.lines() {
            if line.trim_end() == DELIMITER {
                return Some(Self {
                    title: title?,
                    date: date?,
                    categories: categories?,
                    orig_name: orig_name?,
                    orig_id: orig_id?,
                });
            }

            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let value = value.trim();
            match key.trim() {
                "title" => title = Some(value.to_string()),
                "date" => date = NaiveDate::parse_from_str(value, DATE_FORMAT).ok(),
                "category" => {
                    categories = Some(
                        value
                            .split(',')
                            .map(|c| c.trim().to_lowercase())
                            .filter(|c| !c.is_empty())
                            .collect(),
                    )
                }
                "orig_name" => orig_name = Some(value.to_string()),
                "orig_id" => orig_id = NoteId::parse(value),
                _ => {}
            }
        }

        None
    }
}

/// The `title:` value of the header block, even when other fields are missing
pub fn title_of(text: &str) -> Option<String> {
    text.lines()
        .take_while(|line| line.trim_end() != DELIMITER)
        .filter_map(|line| line.split_once(':'))
        .find(|(key, _)| key.trim() == "title")
        .map(|(_, value)| value.trim().to_string())
}

/// Full initial text of a new note: header, blank line, optional quotation
pub fn render_note(header: &NoteHeader, seed: Option<&str>) -> String {
    let mut text = header.render();
    text.push('\n');

    if let Some(seed) = seed.filter(|s| !s.trim().is_empty()) {
        text.push_str(SEED_SEPARATOR);
        text.push_str("\n\n");
        for line in seed.trim_end().lines() {
            if line.is_empty() {
                text.push_str(">\n");
            } else {
                text.push_str("> ");
                text.push_str(line);
                text.push('\n');
            }
        }
        text.push('\n');
    }

    text
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
