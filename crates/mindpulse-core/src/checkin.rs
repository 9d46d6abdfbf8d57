//! Check-in entries and the window they belong to.
//!
//! An entry is immutable once appended to the ledger. The engine trusts the
//! 0-100 ratings it is given; [`CheckInEntry::validate`] is only applied on
//! the save path.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Maximum note length in characters.
pub const MAX_NOTE_CHARS: usize = 250;

/// One of the three daily check-in slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CheckInWindow {
    /// Morning
    #[serde(rename = "checkIn1")]
    CheckIn1,
    /// Afternoon
    #[serde(rename = "checkIn2")]
    CheckIn2,
    /// Evening
    #[serde(rename = "checkIn3")]
    CheckIn3,
}

impl CheckInWindow {
    pub const ALL: [CheckInWindow; 3] = [
        CheckInWindow::CheckIn1,
        CheckInWindow::CheckIn2,
        CheckInWindow::CheckIn3,
    ];

    /// Storage key fragment, matches the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckInWindow::CheckIn1 => "checkIn1",
            CheckInWindow::CheckIn2 => "checkIn2",
            CheckInWindow::CheckIn3 => "checkIn3",
        }
    }
}

impl fmt::Display for CheckInWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CheckInWindow {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "1" | "checkin1" | "morning" => Ok(CheckInWindow::CheckIn1),
            "2" | "checkin2" | "afternoon" => Ok(CheckInWindow::CheckIn2),
            "3" | "checkin3" | "evening" => Ok(CheckInWindow::CheckIn3),
            _ => Err(ValidationError::InvalidValue {
                field: "window".to_string(),
                message: format!("'{s}' is not a check-in window (use 1, 2 or 3)"),
            }),
        }
    }
}

/// A single logged check-in.
///
/// Ratings missing from a persisted entry deserialize as 0 and are summed as
/// 0 by every aggregate, which deflates averages rather than skipping the
/// entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckInEntry {
    #[serde(default)]
    pub energy: i64,
    #[serde(default)]
    pub clarity: i64,
    #[serde(default)]
    pub emotion: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub window: CheckInWindow,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

impl CheckInEntry {
    pub fn new(
        energy: i64,
        clarity: i64,
        emotion: i64,
        window: CheckInWindow,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            energy,
            clarity,
            emotion,
            note: None,
            window,
            timestamp,
            tags: BTreeSet::new(),
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn with_tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Calendar day of this entry at the given UTC offset.
    pub fn day(&self, offset_minutes: i32) -> NaiveDate {
        local_day(self.timestamp, offset_minutes)
    }

    /// Check ratings and note length.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("energy", self.energy),
            ("clarity", self.clarity),
            ("emotion", self.emotion),
        ] {
            if !(0..=100).contains(&value) {
                return Err(ValidationError::OutOfRange { field, value });
            }
        }

        if let Some(note) = &self.note {
            let len = note.chars().count();
            if len > MAX_NOTE_CHARS {
                return Err(ValidationError::NoteTooLong {
                    len,
                    max: MAX_NOTE_CHARS,
                });
            }
        }

        Ok(())
    }
}

/// Calendar day of an instant shifted by `offset_minutes` east of UTC.
pub fn local_day(at: DateTime<Utc>, offset_minutes: i32) -> NaiveDate {
    (at + Duration::minutes(i64::from(offset_minutes))).date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, h, 30, 0).unwrap()
    }

    #[test]
    fn window_serializes_with_storage_names() {
        let json = serde_json::to_string(&CheckInWindow::CheckIn3).unwrap();
        assert_eq!(json, "\"checkIn3\"");
        assert_eq!("evening".parse::<CheckInWindow>().unwrap(), CheckInWindow::CheckIn3);
        assert_eq!("2".parse::<CheckInWindow>().unwrap(), CheckInWindow::CheckIn2);
        assert!("4".parse::<CheckInWindow>().is_err());
    }

    #[test]
    fn missing_ratings_deserialize_as_zero() {
        let entry: CheckInEntry = serde_json::from_str(
            r#"{"energy":70,"window":"checkIn1","timestamp":"2026-03-10T08:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(entry.energy, 70);
        assert_eq!(entry.clarity, 0);
        assert_eq!(entry.emotion, 0);
        assert!(entry.tags.is_empty());
    }

    #[test]
    fn day_respects_offset() {
        let entry = CheckInEntry::new(50, 50, 50, CheckInWindow::CheckIn3, at(23));
        assert_eq!(entry.day(0), NaiveDate::from_ymd_opt(2026, 3, 10).unwrap());
        assert_eq!(entry.day(60), NaiveDate::from_ymd_opt(2026, 3, 11).unwrap());

        let early = CheckInEntry::new(50, 50, 50, CheckInWindow::CheckIn1, at(1));
        assert_eq!(early.day(-120), NaiveDate::from_ymd_opt(2026, 3, 9).unwrap());
    }

    #[test]
    fn validate_rejects_out_of_range_and_long_notes() {
        let entry = CheckInEntry::new(101, 50, 50, CheckInWindow::CheckIn1, at(9));
        assert_eq!(
            entry.validate(),
            Err(ValidationError::OutOfRange {
                field: "energy",
                value: 101
            })
        );

        let entry = CheckInEntry::new(50, 50, 50, CheckInWindow::CheckIn1, at(9))
            .with_note("x".repeat(MAX_NOTE_CHARS + 1));
        assert!(matches!(
            entry.validate(),
            Err(ValidationError::NoteTooLong { len: 251, max: 250 })
        ));

        let entry = CheckInEntry::new(0, 100, 50, CheckInWindow::CheckIn1, at(9))
            .with_note("é".repeat(MAX_NOTE_CHARS));
        assert!(entry.validate().is_ok());
    }
}
