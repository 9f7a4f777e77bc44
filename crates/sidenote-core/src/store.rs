//! The note store: a directory of note files
//!
//! Listing is delegated to a [`NoteLister`], chosen by
//! [`ListingStrategy`]. Every lister yields [`NoteEntry`] values carrying both
//! the bare filename (what the codec decodes) and the full path (what gets
//! opened), so callers never care which strategy is active.

use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use sidenote_config::{ListingStrategy, NotesConfig};
use tracing::{debug, trace};
use walkdir::WalkDir;

use crate::header::{render_note, NoteHeader};
use crate::{NoteError, NoteFilename, NoteId, NoteResult};

/// One file found in the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteEntry {
    /// Bare filename, no directories
    pub name: String,
    /// Location on disk
    pub path: PathBuf,
}

impl NoteEntry {
    fn from_path(path: PathBuf) -> Option<Self> {
        let name = path.file_name()?.to_str()?.to_string();
        Some(Self { name, path })
    }

    /// Decoded filename, `None` for files that are not notes
    pub fn filename(&self) -> Option<NoteFilename> {
        NoteFilename::parse(&self.name)
    }
}

/// Entries that never count as notes: dotfiles, editor backups and lock files
fn is_hidden(name: &str) -> bool {
    name.starts_with('.') || name.starts_with('#') || name.ends_with('~')
}

pub type EntryIter = Box<dyn Iterator<Item = NoteEntry>>;

/// Strategy for enumerating the files of a store directory
pub trait NoteLister: fmt::Debug + Send + Sync {
    /// Lazily list candidate files under `root`
    fn list(&self, root: &Path) -> io::Result<EntryIter>;
}

/// Top level of the directory only
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatLister;

impl NoteLister for FlatLister {
    fn list(&self, root: &Path) -> io::Result<EntryIter> {
        let entries = fs::read_dir(root)?.filter_map(|entry| {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    trace!(error = %e, "skipping unreadable directory entry");
                    return None;
                }
            };
            if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
                return None;
            }
            NoteEntry::from_path(entry.path()).filter(|e| !is_hidden(&e.name))
        });
        Ok(Box::new(entries))
    }
}

/// The directory and every non-hidden subdirectory
#[derive(Debug, Clone, Copy, Default)]
pub struct RecursiveLister;

impl NoteLister for RecursiveLister {
    fn list(&self, root: &Path) -> io::Result<EntryIter> {
        // Surface a missing root the same way read_dir does
        fs::metadata(root)?;

        let entries = WalkDir::new(root)
            .min_depth(1)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !e.file_name().to_str().map(is_hidden).unwrap_or(true))
            .filter_map(|entry| match entry {
                Ok(entry) if entry.file_type().is_file() => NoteEntry::from_path(entry.into_path()),
                Ok(_) => None,
                Err(e) => {
                    trace!(error = %e, "skipping unreadable directory entry");
                    None
                }
            });
        Ok(Box::new(entries))
    }
}

pub fn lister_for(strategy: ListingStrategy) -> Box<dyn NoteLister> {
    match strategy {
        ListingStrategy::Flat => Box::new(FlatLister),
        ListingStrategy::Recursive => Box::new(RecursiveLister),
    }
}

/// Everything needed to write a new note
#[derive(Debug, Clone)]
pub struct NewNote {
    pub id: NoteId,
    pub categories: Vec<String>,
    pub slug: String,
    pub title: String,
    pub date: NaiveDate,
    pub seed: Option<String>,
}

impl NewNote {
    pub fn filename(&self) -> NoteFilename {
        NoteFilename::new(self.id.clone(), &self.categories, self.slug.clone())
    }
}

#[derive(Debug)]
pub struct NoteStore {
    root: PathBuf,
    lister: Box<dyn NoteLister>,
}

impl NoteStore {
    pub fn new(root: impl Into<PathBuf>, lister: Box<dyn NoteLister>) -> Self {
        Self {
            root: root.into(),
            lister,
        }
    }

    pub fn from_config(config: &NotesConfig) -> Self {
        Self::new(config.directory.clone(), lister_for(config.listing))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the store directory if it is missing
    pub fn ensure_dir(&self) -> NoteResult<()> {
        if !self.root.is_dir() {
            debug!(path = %self.root.display(), "creating note directory");
            fs::create_dir_all(&self.root).map_err(|e| NoteError::io(&self.root, e))?;
        }
        Ok(())
    }

    /// Every visible file in the store, notes or not
    ///
    /// A missing store directory is created first and lists as empty.
    pub fn list(&self) -> NoteResult<EntryIter> {
        self.ensure_dir()?;
        self.lister
            .list(&self.root)
            .map_err(|e| NoteError::io(&self.root, e))
    }

    /// Entries whose filenames decode; everything else is skipped
    pub fn notes(&self) -> NoteResult<impl Iterator<Item = (NoteEntry, NoteFilename)>> {
        Ok(self.list()?.filter_map(|entry| match entry.filename() {
            Some(filename) => Some((entry, filename)),
            None => {
                trace!(name = %entry.name, "ignoring non-note file");
                None
            }
        }))
    }

    /// Map a bare filename to its path at the top of the store
    pub fn resolve(&self, bare_filename: &str) -> PathBuf {
        self.root.join(bare_filename)
    }

    /// Find the entry for a bare filename wherever the lister sees it
    pub fn locate(&self, bare_filename: &str) -> NoteResult<Option<NoteEntry>> {
        Ok(self.list()?.find(|e| e.name == bare_filename))
    }

    /// First note carrying `id`, skipping the file named `exclude`
    pub fn find_by_id(&self, id: &NoteId, exclude: Option<&str>) -> NoteResult<Option<NoteEntry>> {
        Ok(self
            .notes()?
            .find(|(entry, filename)| &filename.id == id && Some(entry.name.as_str()) != exclude)
            .map(|(entry, _)| entry))
    }

    pub fn id_taken(&self, id: &NoteId) -> NoteResult<bool> {
        Ok(self.find_by_id(id, None)?.is_some())
    }

    /// Write a new note file and return its path
    ///
    /// Fails with [`NoteError::AlreadyExists`] rather than overwrite.
    pub fn create(&self, note: &NewNote) -> NoteResult<PathBuf> {
        self.ensure_dir()?;

        let filename = note.filename();
        let path = self.resolve(&filename.encode());
        let header = NoteHeader::for_filename(note.title.clone(), note.date, &filename);
        let text = render_note(&header, note.seed.as_deref());

        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| match e.kind() {
                io::ErrorKind::AlreadyExists => NoteError::AlreadyExists { path: path.clone() },
                _ => NoteError::io(&path, e),
            })?;
        file.write_all(text.as_bytes())
            .map_err(|e| NoteError::io(&path, e))?;

        debug!(path = %path.display(), "created note");
        Ok(path)
    }
}

/// Read a note's text
pub(crate) fn read_text(path: &Path) -> NoteResult<String> {
    fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => NoteError::not_found(path.display().to_string()),
        _ => NoteError::io(path, e),
    })
}

/// Replace a note's text
pub(crate) fn write_text(path: &Path, text: &str) -> NoteResult<()> {
    fs::write(path, text).map_err(|e| NoteError::io(path, e))
}

/// Bare filename of a path
pub(crate) fn bare_name(path: &Path) -> NoteResult<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| NoteError::InvalidInput(format!("not a file path: {}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn new_note(id: &str, categories: &[&str], slug: &str) -> NewNote {
        NewNote {
            id: NoteId::parse(id).unwrap(),
            categories: categories.iter().map(|c| c.to_string()).collect(),
            slug: slug.to_string(),
            title: slug.to_string(),
            date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            seed: None,
        }
    }

    fn names(store: &NoteStore) -> Vec<String> {
        let mut names: Vec<_> = store.list().unwrap().map(|e| e.name).collect();
        names.sort();
        names
    }

    #[test]
    fn missing_directory_is_created_and_empty() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("notes");
        let store = NoteStore::new(&root, Box::new(FlatLister));

        assert!(names(&store).is_empty());
        assert!(root.is_dir());
    }

    #[test]
    fn create_writes_header_and_refuses_overwrite() {
        let dir = TempDir::new().unwrap();
        let store = NoteStore::new(dir.path(), Box::new(FlatLister));
        let note = new_note("20200101_000000", &["politics"], "a");

        let path = store.create(&note).unwrap();
        assert_eq!(path, dir.path().join("20200101_000000--politics--a.txt"));
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("title: a\n"));
        assert!(text.contains("orig_name: 20200101_000000--politics--a.txt\n"));

        let err = store.create(&note).unwrap_err();
        assert!(matches!(err, NoteError::AlreadyExists { .. }));
    }

    #[test]
    fn flat_listing_skips_hidden_and_subdirectories() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("20200101_000000----a.txt"), "").unwrap();
        fs::write(dir.path().join(".hidden"), "").unwrap();
        fs::write(dir.path().join("draft.txt~"), "").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub").join("20200102_000000----b.txt"), "").unwrap();

        let store = NoteStore::new(dir.path(), Box::new(FlatLister));
        assert_eq!(names(&store), vec!["20200101_000000----a.txt"]);
    }

    #[test]
    fn recursive_listing_yields_bare_names_with_full_paths() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("sub").join("deeper")).unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();
        fs::write(dir.path().join(".git").join("20200103_000000----c.txt"), "").unwrap();
        let nested = dir.path().join("sub").join("deeper").join("20200102_000000----b.txt");
        fs::write(&nested, "").unwrap();

        let store = NoteStore::new(dir.path(), Box::new(RecursiveLister));
        let entries: Vec<_> = store.list().unwrap().collect();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "20200102_000000----b.txt");
        assert_eq!(entries[0].path, nested);

        // resolve ignores the listing mode
        assert_eq!(
            store.resolve("20200102_000000----b.txt"),
            dir.path().join("20200102_000000----b.txt")
        );
        assert_eq!(store.locate("20200102_000000----b.txt").unwrap().unwrap().path, nested);
    }

    #[test]
    fn find_by_id_skips_excluded_and_foreign_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        let store = NoteStore::new(dir.path(), Box::new(FlatLister));
        store.create(&new_note("20200101_000000", &[], "a")).unwrap();

        let id = NoteId::parse("20200101_000000").unwrap();
        let found = store.find_by_id(&id, None).unwrap().unwrap();
        assert_eq!(found.name, "20200101_000000----a.txt");
        assert!(store
            .find_by_id(&id, Some("20200101_000000----a.txt"))
            .unwrap()
            .is_none());
        assert!(store.id_taken(&id).unwrap());
        assert_eq!(store.notes().unwrap().count(), 1);
    }

    #[test]
    fn config_selects_lister() {
        let config = NotesConfig::with_directory("/tmp/x").with_listing(ListingStrategy::Recursive);
        let store = NoteStore::from_config(&config);
        assert_eq!(store.root(), Path::new("/tmp/x"));
        assert!(format!("{:?}", store).contains("RecursiveLister"));
    }
}
