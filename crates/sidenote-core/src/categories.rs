//! Category index
//!
//! Categories have no storage of their own. The set in use is whatever the
//! filenames in the store say, followed by the configured list.

use std::collections::HashSet;

use crate::{category_token, NoteEntry, NoteFilename, NoteResult, NoteStore};

/// Categories of every decodable entry, first-seen order, no duplicates
pub fn infer_categories<I>(entries: I) -> Vec<String>
where
    I: IntoIterator<Item = NoteEntry>,
{
    let mut seen = HashSet::new();
    entries
        .into_iter()
        .filter_map(|entry| NoteFilename::parse(&entry.name))
        .flat_map(|filename| filename.categories)
        .filter(|category| seen.insert(category.clone()))
        .collect()
}

/// `inferred` followed by `configured`, keeping the first occurrence of each
///
/// Configured entries are normalised the same way user input is; any that
/// normalise to nothing are dropped.
pub fn merge_categories<S: AsRef<str>>(inferred: Vec<String>, configured: &[S]) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::with_capacity(inferred.len() + configured.len());
    inferred
        .into_iter()
        .chain(configured.iter().filter_map(|c| category_token(c.as_ref())))
        .filter(|category| seen.insert(category.clone()))
        .collect()
}

/// Scan the store and merge with the configured categories
///
/// Entries are visited in filename order, which is creation order, so the
/// result does not depend on how the filesystem orders the directory.
/// Creates the store directory if it does not exist yet.
pub fn category_index<S: AsRef<str>>(store: &NoteStore, configured: &[S]) -> NoteResult<Vec<String>> {
    let mut entries: Vec<NoteEntry> = store.list()?.collect();
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(merge_categories(infer_categories(entries), configured))
}
