//! Timestamp identifiers
//!
//! An id is the creation time down to the second, `YYYYMMDD_HHMMSS`. The
//! fixed width makes lexicographic order equal chronological order, so a
//! plain directory sort lists notes oldest first.
//!
//! Two notes created within the same second get the same candidate id.
//! [`crate::Notebook::create_note`] resolves that by moving to the next free
//! second; see [`NoteId::next_second`].

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{Duration, Local, NaiveDateTime};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::NoteError;

/// `strftime` layout of an id
pub const ID_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Width of every id
pub const ID_LEN: usize = 15;

static ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{8}_[0-9]{6}$").expect("id regex"));

/// Source of the current local time
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

/// Reads the system clock in local time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Always reports the same instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// A note identifier, e.g. `20201008_093000`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NoteId(String);

impl NoteId {
    /// Identifier for the current second of `clock`
    pub fn generate(clock: &impl Clock) -> Self {
        Self::from_datetime(&clock.now())
    }

    pub fn from_datetime(at: &NaiveDateTime) -> Self {
        NoteId(at.format(ID_FORMAT).to_string())
    }

    /// Accepts only the fixed-width `YYYYMMDD_HHMMSS` shape
    pub fn parse(s: &str) -> Option<Self> {
        ID_REGEX.is_match(s).then(|| NoteId(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The instant encoded in the id, if it names a real calendar time
    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.0, ID_FORMAT).ok()
    }

    /// The id one second later
    pub fn next_second(&self) -> Option<Self> {
        let at = self.timestamp()?.checked_add_signed(Duration::seconds(1))?;
        Some(Self::from_datetime(&at))
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NoteId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for NoteId {
    type Err = NoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NoteId::parse(s).ok_or_else(|| NoteError::InvalidInput(format!("not a note id: {s}")))
    }
}

impl TryFrom<String> for NoteId {
    type Error = NoteError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<NoteId> for String {
    fn from(id: NoteId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn formats_fixed_width() {
        let id = NoteId::generate(&FixedClock(at(2020, 10, 8, 9, 30, 0)));
        assert_eq!(id.as_str(), "20201008_093000");
        assert_eq!(id.as_str().len(), ID_LEN);
    }

    #[test]
    fn parse_rejects_other_shapes() {
        assert!(NoteId::parse("20201008_093000").is_some());
        assert!(NoteId::parse("20201008-093000").is_none());
        assert!(NoteId::parse("2020108_093000").is_none());
        assert!(NoteId::parse("20201008_0930001").is_none());
        assert!(NoteId::parse("notes").is_none());
        assert!("x".parse::<NoteId>().is_err());
    }

    #[test]
    fn next_second_rolls_over() {
        let id = NoteId::from_datetime(&at(2020, 12, 31, 23, 59, 59));
        assert_eq!(id.next_second().unwrap().as_str(), "20210101_000000");
    }

    #[test]
    fn timestamp_round_trips() {
        let when = at(2021, 2, 3, 4, 5, 6);
        assert_eq!(NoteId::from_datetime(&when).timestamp(), Some(when));
    }

    #[test]
    fn try_from_validates() {
        assert!(NoteId::try_from("20201008_093000".to_string()).is_ok());
        assert!(NoteId::try_from("bogus".to_string()).is_err());
    }

    proptest! {
        #[test]
        fn later_seconds_sort_later(a in 0i64..4_000_000_000, b in 0i64..4_000_000_000) {
            prop_assume!(a != b);
            let base = at(1970, 1, 1, 0, 0, 0);
            let ta = base + Duration::seconds(a);
            let tb = base + Duration::seconds(b);
            let ia = NoteId::from_datetime(&ta);
            let ib = NoteId::from_datetime(&tb);
            prop_assert_eq!(ta < tb, ia < ib);
        }
    }
}
