//! Sidenote Core
//!
//! Plain-text notes stored as flat files, one note per file. Everything a
//! note needs to be found is in its filename:
//!
//! ```text
//! 20201008_093000--economics-politics--my-first-note.txt
//! ^ id            ^ categories         ^ slug
//! ```
//!
//! There is no index and no database. Categories are recomputed from the
//! directory on every request, and links between notes are plain reference
//! lines appended to both files (`^^ <filename>` for outgoing, `@@ <filename>`
//! for incoming).
//!
//! The [`Notebook`] facade exposes the operations a front end needs; the
//! modules below it can be used on their own.

pub mod categories;
pub mod error;
pub mod filename;
pub mod header;
pub mod id;
pub mod links;
pub mod notebook;
pub mod slug;
pub mod store;

pub use categories::{category_index, infer_categories, merge_categories};
pub use error::{NoteError, NoteResult};
pub use filename::NoteFilename;
pub use header::NoteHeader;
pub use id::{Clock, FixedClock, NoteId, SystemClock};
pub use links::{
    gather_links, insert_link, outgoing_links, Direction, LinkIssue, LinkOutcome, Reference,
};
pub use notebook::{NoteSummary, Notebook};
pub use slug::{category_token, slugify};
pub use store::{FlatLister, NewNote, NoteEntry, NoteLister, NoteStore, RecursiveLister};

// Config types appear in the public API
pub use sidenote_config::{ListingStrategy, NotesConfig};
