//! The operations offered to a front end
//!
//! [`Notebook`] ties the store, the configured categories and a clock
//! together. Front ends hand it user text and note paths and get filenames
//! and paths back; they never build filenames themselves.

use std::path::{Path, PathBuf};

use serde::Serialize;
use sidenote_config::NotesConfig;
use tracing::{debug, info, trace};

use crate::categories::category_index;
use crate::header::title_of;
use crate::links::{self, LinkIssue, LinkOutcome};
use crate::store::read_text;
use crate::{
    category_token, slugify, Clock, NewNote, NoteError, NoteFilename, NoteId, NoteResult,
    NoteStore, SystemClock,
};

/// How many later seconds are tried when the current one is taken
const MAX_ID_ATTEMPTS: usize = 60;

/// A note as shown in listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteSummary {
    pub filename: String,
    pub path: PathBuf,
    pub id: NoteId,
    pub categories: Vec<String>,
    pub slug: String,
    /// From the header block; absent if the header is missing or damaged
    pub title: Option<String>,
}

#[derive(Debug)]
pub struct Notebook<C: Clock = SystemClock> {
    store: NoteStore,
    known_categories: Vec<String>,
    clock: C,
}

impl Notebook<SystemClock> {
    pub fn open(config: &NotesConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> Notebook<C> {
    pub fn with_clock(config: &NotesConfig, clock: C) -> Self {
        Self {
            store: NoteStore::from_config(config),
            known_categories: config.known_categories.clone(),
            clock,
        }
    }

    pub fn store(&self) -> &NoteStore {
        &self.store
    }

    /// Categories in use followed by the configured ones
    pub fn categories(&self) -> NoteResult<Vec<String>> {
        category_index(&self.store, &self.known_categories)
    }

    /// Create a note and return its path
    ///
    /// Categories are normalised to hyphen-free lowercase tokens and
    /// deduplicated in entry order. If a note already holds the current
    /// second's id, the next free second is used instead.
    pub fn create_note<S: AsRef<str>>(
        &self,
        title: &str,
        categories: &[S],
        seed: Option<&str>,
    ) -> NoteResult<PathBuf> {
        let title = title.split_whitespace().collect::<Vec<_>>().join(" ");
        if title.is_empty() {
            return Err(NoteError::InvalidInput("title is empty".to_string()));
        }

        let mut tokens: Vec<String> = Vec::with_capacity(categories.len());
        for token in categories.iter().filter_map(|c| category_token(c.as_ref())) {
            if !tokens.contains(&token) {
                tokens.push(token);
            }
        }

        let id = self.free_id()?;
        let date = id
            .timestamp()
            .map(|at| at.date())
            .unwrap_or_else(|| self.clock.now().date());

        let note = NewNote {
            id,
            categories: tokens,
            slug: slugify(&title),
            title,
            date,
            seed: seed.map(str::to_string),
        };
        let path = self.store.create(&note)?;
        info!(path = %path.display(), "new note");
        Ok(path)
    }

    fn free_id(&self) -> NoteResult<NoteId> {
        let mut candidate = NoteId::generate(&self.clock);
        for _ in 0..MAX_ID_ATTEMPTS {
            if !self.store.id_taken(&candidate)? {
                return Ok(candidate);
            }
            debug!(id = %candidate, "id taken, trying the next second");
            candidate = match candidate.next_second() {
                Some(next) => next,
                None => break,
            };
        }
        Err(NoteError::AlreadyExists {
            path: self.store.resolve(candidate.as_str()),
        })
    }

    /// Link the note at `current` to the note with id `target_id`
    pub fn insert_link(
        &self,
        current: &Path,
        target_id: &str,
        cursor: Option<usize>,
    ) -> NoteResult<LinkOutcome> {
        let id = NoteId::parse(target_id.trim())
            .ok_or_else(|| NoteError::NotFound {
                id: target_id.to_string(),
            })?;
        links::insert_link(&self.store, current, &id, cursor)
    }

    /// Filenames of the notes linking to `current`
    pub fn list_links(&self, current: &Path) -> NoteResult<Vec<String>> {
        Ok(links::gather_links(&read_text(current)?))
    }

    /// Filenames `current` links to
    pub fn list_outgoing(&self, current: &Path) -> NoteResult<Vec<String>> {
        Ok(links::outgoing_links(&read_text(current)?))
    }

    /// Every note filename in the store, oldest first
    pub fn list_notes(&self) -> NoteResult<Vec<String>> {
        let mut names: Vec<String> = self.store.notes()?.map(|(entry, _)| entry.name).collect();
        names.sort();
        Ok(names)
    }

    /// Note filenames carrying `category`, oldest first
    pub fn list_notes_in(&self, category: &str) -> NoteResult<Vec<String>> {
        let wanted = category_token(category).ok_or_else(|| NoteError::UnknownCategory {
            category: category.to_string(),
        })?;
        if !self.categories()?.contains(&wanted) {
            return Err(NoteError::UnknownCategory {
                category: category.to_string(),
            });
        }

        let mut names: Vec<String> = self
            .store
            .notes()?
            .filter(|(_, filename)| filename.has_category(&wanted))
            .map(|(entry, _)| entry.name)
            .collect();
        names.sort();
        Ok(names)
    }

    /// Decoded filenames plus header titles, oldest first
    pub fn summaries(&self) -> NoteResult<Vec<NoteSummary>> {
        let mut summaries = Vec::new();
        for (entry, filename) in self.store.notes()? {
            let title = match read_text(&entry.path) {
                Ok(text) => title_of(&text),
                Err(e) => {
                    trace!(path = %entry.path.display(), error = %e, "no title for unreadable note");
                    None
                }
            };
            let NoteFilename {
                id,
                categories,
                slug,
            } = filename;
            summaries.push(NoteSummary {
                filename: entry.name,
                path: entry.path,
                id,
                categories,
                slug,
                title,
            });
        }
        summaries.sort_by(|a, b| a.filename.cmp(&b.filename));
        Ok(summaries)
    }

    /// One-sided and dangling links across the store
    pub fn check_links(&self) -> NoteResult<Vec<LinkIssue>> {
        links::audit(&self.store)
    }

    /// Complete every one-sided link; returns the number of lines added
    pub fn repair_links(&self) -> NoteResult<usize> {
        let issues = links::audit(&self.store)?;
        links::repair(&self.store, &issues)
    }
}
