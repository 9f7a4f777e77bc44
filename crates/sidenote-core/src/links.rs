//! Bidirectional links between notes
//!
//! A link from A to B is recorded three times:
//!
//! - an inline marker `@<id-of-B>` in A's body,
//! - a reference line `^^ <filename-of-B>` appended to A,
//! - a reference line `@@ <filename-of-A>` appended to B.
//!
//! [`insert_link`] writes A and then B. The two writes are not atomic: an
//! interruption between them leaves a one-sided link, which [`audit`]
//! reports and [`repair`] completes.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::store::{bare_name, read_text, write_text};
use crate::{NoteError, NoteId, NoteResult, NoteStore};

/// Prefix of the inline marker placed at the point of linking
pub const INLINE_MARKER: char = '@';

static REFERENCE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\^\^|@@) +(\S.*?)\s*$").expect("reference regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// `^^` - this note points at the named note
    Outgoing,
    /// `@@` - the named note points at this one
    Incoming,
}

impl Direction {
    pub fn delimiter(self) -> &'static str {
        match self {
            Direction::Outgoing => "^^",
            Direction::Incoming => "@@",
        }
    }

    pub fn reverse(self) -> Self {
        match self {
            Direction::Outgoing => Direction::Incoming,
            Direction::Incoming => Direction::Outgoing,
        }
    }
}

/// One reference line
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reference {
    pub direction: Direction,
    pub filename: String,
}

impl Reference {
    pub fn outgoing(filename: impl Into<String>) -> Self {
        Self {
            direction: Direction::Outgoing,
            filename: filename.into(),
        }
    }

    pub fn incoming(filename: impl Into<String>) -> Self {
        Self {
            direction: Direction::Incoming,
            filename: filename.into(),
        }
    }

    pub fn parse_line(line: &str) -> Option<Self> {
        let caps = REFERENCE_REGEX.captures(line)?;
        let direction = match caps.get(1)?.as_str() {
            "^^" => Direction::Outgoing,
            _ => Direction::Incoming,
        };
        Some(Self {
            direction,
            filename: caps.get(2)?.as_str().to_string(),
        })
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.direction.delimiter(), self.filename)
    }
}

/// All reference lines in `text`, deduplicated, first-seen order
pub fn references(text: &str) -> Vec<Reference> {
    let mut seen = HashSet::new();
    text.lines()
        .filter_map(Reference::parse_line)
        .filter(|r| seen.insert(r.clone()))
        .collect()
}

fn filenames(text: &str, direction: Direction) -> Vec<String> {
    references(text)
        .into_iter()
        .filter(|r| r.direction == direction)
        .map(|r| r.filename)
        .collect()
}

/// Filenames of the notes linking to this one (`@@` lines)
pub fn gather_links(text: &str) -> Vec<String> {
    filenames(text, Direction::Incoming)
}

/// Filenames this note links to (`^^` lines)
pub fn outgoing_links(text: &str) -> Vec<String> {
    filenames(text, Direction::Outgoing)
}

/// Drop repeated reference lines, keeping the first of each
///
/// Lines that are not references are left untouched, as is the presence or
/// absence of a final newline.
pub fn dedupe_references(text: &str) -> String {
    let mut seen = HashSet::new();
    let mut out = String::with_capacity(text.len());

    for line in text.split_inclusive('\n') {
        let content = line.trim_end_matches(['\n', '\r']);
        if let Some(reference) = Reference::parse_line(content) {
            if !seen.insert(reference) {
                continue;
            }
        }
        out.push_str(line);
    }

    out
}

/// Append `reference` on its own line
pub fn append_reference(text: &str, reference: &Reference) -> String {
    let mut out = String::with_capacity(text.len() + reference.filename.len() + 4);
    out.push_str(text);
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(&reference.to_string());
    out.push('\n');
    out
}

/// Byte offset where the body ends and the trailing reference block begins
fn body_end(text: &str) -> usize {
    let mut end = text.len();
    for line in text.split_inclusive('\n').rev() {
        let content = line.trim_end_matches(['\n', '\r']);
        if content.trim().is_empty() || Reference::parse_line(content).is_some() {
            end -= line.len();
        } else {
            break;
        }
    }
    end
}

/// Insert the inline marker for `target`
///
/// With a cursor, `@<id>` goes exactly there (moved back to the nearest
/// character boundary, clamped to the text). Without one, it goes on its own
/// line at the end of the body, unless the body already carries it.
pub fn insert_marker(text: &str, target: &NoteId, cursor: Option<usize>) -> String {
    let marker = format!("{INLINE_MARKER}{target}");

    let Some(cursor) = cursor else {
        let end = body_end(text);
        let (body, tail) = text.split_at(end);
        if body.contains(&marker) {
            return text.to_string();
        }
        let mut out = String::with_capacity(text.len() + marker.len() + 2);
        out.push_str(body);
        if !body.is_empty() && !body.ends_with('\n') {
            out.push('\n');
        }
        out.push_str(&marker);
        out.push('\n');
        out.push_str(tail);
        return out;
    };

    let mut at = cursor.min(text.len());
    while !text.is_char_boundary(at) {
        at -= 1;
    }
    let mut out = String::with_capacity(text.len() + marker.len());
    out.push_str(&text[..at]);
    out.push_str(&marker);
    out.push_str(&text[at..]);
    out
}

/// Files touched by a successful [`insert_link`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkOutcome {
    pub source: PathBuf,
    pub target: PathBuf,
    pub source_name: String,
    pub target_name: String,
}

/// Link the note at `source` to the note with id `target_id`
///
/// The target is looked up before anything is written, so an unknown id
/// fails with [`NoteError::NotFound`] and leaves `source` untouched.
/// Repeating the call never duplicates reference lines in either file.
pub fn insert_link(
    store: &NoteStore,
    source: &Path,
    target_id: &NoteId,
    cursor: Option<usize>,
) -> NoteResult<LinkOutcome> {
    let source_name = bare_name(source)?;

    // Select target
    let target = store
        .find_by_id(target_id, Some(source_name.as_str()))?
        .ok_or_else(|| NoteError::not_found(target_id.as_str()))?;
    debug!(source = %source_name, target = %target.name, "linking notes");

    // Compose both texts before touching either file
    let source_text = read_text(source)?;
    let target_text = read_text(&target.path)?;
    let with_marker = insert_marker(&source_text, target_id, cursor);
    let source_updated =
        dedupe_references(&append_reference(&with_marker, &Reference::outgoing(&target.name)));
    let target_updated =
        dedupe_references(&append_reference(&target_text, &Reference::incoming(&source_name)));

    write_text(source, &source_updated)?;
    debug!(path = %source.display(), "wrote outgoing reference");

    write_text(&target.path, &target_updated)?;
    debug!(path = %target.path.display(), "wrote incoming reference");

    Ok(LinkOutcome {
        source: source.to_path_buf(),
        target: target.path,
        source_name,
        target_name: target.name,
    })
}

/// A link recorded in only one of its two notes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LinkIssue {
    /// `note` carries `reference`'s counterpart but `missing_in` lacks `reference`
    MissingReference {
        note: String,
        missing_in: String,
        reference: Reference,
    },
    /// `note` references a file that is not in the store
    Dangling { note: String, reference: Reference },
}

impl fmt::Display for LinkIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkIssue::MissingReference {
                note,
                missing_in,
                reference,
            } => write!(f, "{missing_in}: missing `{reference}` (linked from {note})"),
            LinkIssue::Dangling { note, reference } => {
                write!(f, "{note}: `{reference}` points at a missing note")
            }
        }
    }
}

struct Scanned {
    path: PathBuf,
    references: HashSet<Reference>,
    ordered: Vec<Reference>,
}

fn scan(store: &NoteStore) -> NoteResult<(Vec<String>, HashMap<String, Scanned>)> {
    let mut order = Vec::new();
    let mut notes = HashMap::new();

    for (entry, _) in store.notes()? {
        let text = match read_text(&entry.path) {
            Ok(text) => text,
            Err(e) => {
                warn!(path = %entry.path.display(), error = %e, "skipping unreadable note");
                continue;
            }
        };
        let ordered = references(&text);
        order.push(entry.name.clone());
        notes.insert(
            entry.name,
            Scanned {
                path: entry.path,
                references: ordered.iter().cloned().collect(),
                ordered,
            },
        );
    }

    order.sort();
    Ok((order, notes))
}

/// Report every one-sided or dangling link in the store
pub fn audit(store: &NoteStore) -> NoteResult<Vec<LinkIssue>> {
    let (order, notes) = scan(store)?;
    let mut issues = Vec::new();

    for name in &order {
        let note = &notes[name];
        for reference in &note.ordered {
            let Some(other) = notes.get(&reference.filename) else {
                issues.push(LinkIssue::Dangling {
                    note: name.clone(),
                    reference: reference.clone(),
                });
                continue;
            };

            let expected = Reference {
                direction: reference.direction.reverse(),
                filename: name.clone(),
            };
            if !other.references.contains(&expected) {
                issues.push(LinkIssue::MissingReference {
                    note: name.clone(),
                    missing_in: reference.filename.clone(),
                    reference: expected,
                });
            }
        }
    }

    for issue in &issues {
        warn!(%issue, "asymmetric link");
    }
    Ok(issues)
}

/// Append the missing half of every [`LinkIssue::MissingReference`]
///
/// Dangling references are left alone. Returns the number of lines added.
pub fn repair(store: &NoteStore, issues: &[LinkIssue]) -> NoteResult<usize> {
    let mut repaired = 0;

    for issue in issues {
        let LinkIssue::MissingReference {
            missing_in,
            reference,
            ..
        } = issue
        else {
            continue;
        };
        let Some(entry) = store.locate(missing_in)? else {
            continue;
        };

        let text = read_text(&entry.path)?;
        let updated = dedupe_references(&append_reference(&text, reference));
        if updated != text {
            write_text(&entry.path, &updated)?;
            debug!(path = %entry.path.display(), %reference, "repaired link");
            repaired += 1;
        }
    }

    Ok(repaired)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FlatLister;
    use std::fs;
    use tempfile::TempDir;

    const A: &str = "20201008_093000--economics--alpha.txt";
    const B: &str = "20201009_100000--politics--beta.txt";

    fn store_with_two() -> (TempDir, NoteStore) {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(A), "title: alpha\n\nbody of a\n").unwrap();
        fs::write(dir.path().join(B), "title: beta\n\nbody of b\n").unwrap();
        let store = NoteStore::new(dir.path(), Box::new(FlatLister));
        (dir, store)
    }

    fn id(s: &str) -> NoteId {
        NoteId::parse(s).unwrap()
    }

    fn count(text: &str, line: &str) -> usize {
        text.lines().filter(|l| *l == line).count()
    }

    #[test]
    fn parses_reference_lines() {
        assert_eq!(Reference::parse_line("^^ x.txt"), Some(Reference::outgoing("x.txt")));
        assert_eq!(Reference::parse_line("@@  y.txt  "), Some(Reference::incoming("y.txt")));
        assert_eq!(Reference::parse_line("@@"), None);
        assert_eq!(Reference::parse_line(" @@ y.txt"), None);
        assert_eq!(Reference::parse_line("@20201008_093000"), None);
    }

    #[test]
    fn gather_links_reads_incoming_only_in_order() {
        let text = "body\n^^ out.txt\n@@ b.txt\n@@ a.txt\n@@ b.txt\n";
        assert_eq!(gather_links(text), vec!["b.txt", "a.txt"]);
        assert_eq!(outgoing_links(text), vec!["out.txt"]);
    }

    #[test]
    fn dedupe_keeps_first_occurrence_and_other_lines() {
        let text = "x\n^^ a.txt\nprose\n^^ a.txt\n@@ a.txt\n^^ a.txt  \nprose\n";
        assert_eq!(dedupe_references(text), "x\n^^ a.txt\nprose\n@@ a.txt\nprose\n");
        assert_eq!(dedupe_references("no newline"), "no newline");
    }

    #[test]
    fn marker_at_cursor_respects_char_boundaries() {
        let text = "héllo";
        // offset 2 falls inside 'é'
        assert_eq!(insert_marker(text, &id("20200101_000000"), Some(2)), "h@20200101_000000éllo");
        assert_eq!(insert_marker(text, &id("20200101_000000"), Some(99)), "héllo@20200101_000000");
    }

    #[test]
    fn marker_without_cursor_goes_before_reference_block_once() {
        let text = "body\n\n^^ x.txt\n";
        let once = insert_marker(text, &id("20200101_000000"), None);
        assert_eq!(once, "body\n@20200101_000000\n\n^^ x.txt\n");
        assert_eq!(insert_marker(&once, &id("20200101_000000"), None), once);
    }

    #[test]
    fn insert_link_writes_both_sides() {
        let (dir, store) = store_with_two();
        let source = dir.path().join(A);

        let outcome = insert_link(&store, &source, &id("20201009_100000"), None).unwrap();
        assert_eq!(outcome.target_name, B);
        assert_eq!(outcome.source_name, A);

        let a = fs::read_to_string(&source).unwrap();
        let b = fs::read_to_string(dir.path().join(B)).unwrap();
        assert!(a.contains("@20201009_100000"));
        assert_eq!(count(&a, &format!("^^ {B}")), 1);
        assert_eq!(count(&b, &format!("@@ {A}")), 1);
        assert!(b.starts_with("title: beta\n\nbody of b\n"));
    }

    #[test]
    fn insert_link_twice_keeps_single_reference_lines() {
        let (dir, store) = store_with_two();
        let source = dir.path().join(A);

        insert_link(&store, &source, &id("20201009_100000"), None).unwrap();
        insert_link(&store, &source, &id("20201009_100000"), None).unwrap();

        let a = fs::read_to_string(&source).unwrap();
        let b = fs::read_to_string(dir.path().join(B)).unwrap();
        assert_eq!(count(&a, &format!("^^ {B}")), 1);
        assert_eq!(count(&b, &format!("@@ {A}")), 1);
        assert_eq!(gather_links(&b), vec![A.to_string()]);
    }

    #[test]
    fn unknown_target_leaves_source_untouched() {
        let (dir, store) = store_with_two();
        let source = dir.path().join(A);
        let before = fs::read_to_string(&source).unwrap();

        let err = insert_link(&store, &source, &id("19990101_000000"), None).unwrap_err();
        assert!(matches!(err, NoteError::NotFound { ref id } if id == "19990101_000000"));
        assert_eq!(fs::read_to_string(&source).unwrap(), before);
    }

    #[test]
    fn unreadable_target_leaves_both_notes_untouched() {
        let (dir, store) = store_with_two();
        let source = dir.path().join(A);
        let target = dir.path().join(B);
        fs::write(&target, b"\xff\xfe").unwrap();
        let before = fs::read_to_string(&source).unwrap();

        let err = insert_link(&store, &source, &id("20201009_100000"), None).unwrap_err();
        assert!(matches!(err, NoteError::Io { .. }));
        assert_eq!(fs::read_to_string(&source).unwrap(), before);
        assert_eq!(fs::read(&target).unwrap(), b"\xff\xfe");
    }

    #[test]
    fn note_cannot_link_to_itself() {
        let (dir, store) = store_with_two();
        let source = dir.path().join(A);
        let err = insert_link(&store, &source, &id("20201008_093000"), None).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn foreign_files_do_not_break_target_scan() {
        let (dir, store) = store_with_two();
        let foreign = dir.path().join("notes.txt");
        fs::write(&foreign, "^^ nonsense\n").unwrap();
        let source = dir.path().join(A);

        let outcome = insert_link(&store, &source, &id("20201009_100000"), None).unwrap();
        assert_eq!(outcome.target_name, B);
        assert_eq!(outcome.target, dir.path().join(B));
        assert_eq!(fs::read_to_string(&foreign).unwrap(), "^^ nonsense\n");
    }

    #[test]
    fn audit_skips_unreadable_notes() {
        let (dir, store) = store_with_two();
        let a_path = dir.path().join(A);
        let a = fs::read_to_string(&a_path).unwrap();
        fs::write(&a_path, append_reference(&a, &Reference::outgoing(B))).unwrap();
        let latin = dir.path().join("20201010_100000----latin.txt");
        fs::write(&latin, b"\xff\xfe").unwrap();

        let issues = audit(&store).unwrap();
        assert_eq!(
            issues,
            vec![LinkIssue::MissingReference {
                note: A.to_string(),
                missing_in: B.to_string(),
                reference: Reference::incoming(A),
            }]
        );
        assert_eq!(repair(&store, &issues).unwrap(), 1);
        assert!(audit(&store).unwrap().is_empty());
        assert_eq!(fs::read(&latin).unwrap(), b"\xff\xfe");
    }

    #[test]
    fn audit_finds_and_repair_fixes_one_sided_links() {
        let (dir, store) = store_with_two();
        // simulate an interruption after the source write
        let a_path = dir.path().join(A);
        let a = fs::read_to_string(&a_path).unwrap();
        fs::write(&a_path, append_reference(&a, &Reference::outgoing(B))).unwrap();
        let gone = "20200101_000000----gone.txt";
        let b_path = dir.path().join(B);
        let b = fs::read_to_string(&b_path).unwrap();
        fs::write(&b_path, append_reference(&b, &Reference::incoming(gone))).unwrap();

        let issues = audit(&store).unwrap();
        assert_eq!(
            issues,
            vec![
                LinkIssue::MissingReference {
                    note: A.to_string(),
                    missing_in: B.to_string(),
                    reference: Reference::incoming(A),
                },
                LinkIssue::Dangling {
                    note: B.to_string(),
                    reference: Reference::incoming(gone),
                },
            ]
        );

        assert_eq!(repair(&store, &issues).unwrap(), 1);
        let remaining = audit(&store).unwrap();
        assert_eq!(remaining.len(), 1);
        assert!(matches!(remaining[0], LinkIssue::Dangling { .. }));
    }
}
