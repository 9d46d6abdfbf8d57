//! Per-day history compiled from the check-in ledger.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::checkin::{CheckInEntry, CheckInWindow};
use crate::metrics::{self, Field};

/// Aggregates for one calendar day. Averages are `None` on empty days.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub count: usize,
    pub windows: Vec<CheckInWindow>,
    pub energy: Option<f64>,
    pub clarity: Option<f64>,
    pub emotion: Option<f64>,
    pub focus: Option<f64>,
    /// Mental score of the day's rounded averages.
    pub mental_score: Option<i64>,
    pub tags: BTreeSet<String>,
}

impl DaySummary {
    pub fn summarize(date: NaiveDate, entries: &[&CheckInEntry]) -> Self {
        let avg = |field| metrics::day_average(entries.iter().copied(), field);
        let energy = avg(Field::Energy);
        let clarity = avg(Field::Clarity);
        let emotion = avg(Field::Emotion);

        let mental_score = match (energy, clarity, emotion) {
            (Some(e), Some(c), Some(m)) => Some(metrics::mental_score(
                e.round() as i64,
                c.round() as i64,
                m.round() as i64,
            )),
            _ => None,
        };

        let mut windows: Vec<CheckInWindow> = entries.iter().map(|e| e.window).collect();
        windows.sort();
        windows.dedup();

        Self {
            date,
            count: entries.len(),
            windows,
            energy,
            clarity,
            emotion,
            focus: avg(Field::Focus),
            mental_score,
            tags: entries.iter().flat_map(|e| e.tags.iter().cloned()).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

fn group_by_day(entries: &[CheckInEntry], offset_minutes: i32) -> BTreeMap<NaiveDate, Vec<&CheckInEntry>> {
    let mut by_day: BTreeMap<NaiveDate, Vec<&CheckInEntry>> = BTreeMap::new();
    for entry in entries {
        by_day.entry(entry.day(offset_minutes)).or_default().push(entry);
    }
    by_day
}

/// Every day that has at least one entry, oldest first.
pub fn compile_history(entries: &[CheckInEntry], offset_minutes: i32) -> Vec<DaySummary> {
    group_by_day(entries, offset_minutes)
        .into_iter()
        .map(|(date, day_entries)| DaySummary::summarize(date, &day_entries))
        .collect()
}

/// The `days` days ending at `today`, oldest first, empty days included.
///
/// Returns nothing when the range would start before the first
/// representable date.
pub fn recent_days(
    entries: &[CheckInEntry],
    today: NaiveDate,
    days: u32,
    offset_minutes: i32,
) -> Vec<DaySummary> {
    if days == 0 {
        return Vec::new();
    }
    let Some(first) = today.checked_sub_signed(Duration::days(i64::from(days) - 1)) else {
        return Vec::new();
    };
    let by_day = group_by_day(entries, offset_minutes);

    first
        .iter_days()
        .take(days as usize)
        .map(|date| {
            let day_entries = by_day.get(&date).map(Vec::as_slice).unwrap_or(&[]);
            DaySummary::summarize(date, day_entries)
        })
        .collect()
}
