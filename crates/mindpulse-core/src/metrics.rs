//! Pure metric calculations over check-in entries.
//!
//! Nothing here touches storage. Aggregates sum missing ratings as 0
//! (see [`CheckInEntry`]) instead of skipping the entry.

use std::fmt;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::checkin::CheckInEntry;

/// Focus derived from clarity and energy.
pub fn focus(clarity: i64, energy: i64) -> i64 {
    (0.6 * clarity as f64 + 0.4 * energy as f64).round() as i64
}

/// Overall mental score of a single reading.
pub fn mental_score(energy: i64, clarity: i64, emotion: i64) -> i64 {
    let sum = energy + clarity + emotion + focus(clarity, energy);
    (sum as f64 / 4.0).round() as i64
}

/// A numeric field of a check-in, including the derived ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Energy,
    Clarity,
    Emotion,
    Focus,
    MentalScore,
}

impl Field {
    pub fn of(&self, entry: &CheckInEntry) -> i64 {
        match self {
            Field::Energy => entry.energy,
            Field::Clarity => entry.clarity,
            Field::Emotion => entry.emotion,
            Field::Focus => focus(entry.clarity, entry.energy),
            Field::MentalScore => mental_score(entry.energy, entry.clarity, entry.emotion),
        }
    }
}

/// Mean and population standard deviation of one field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldStats {
    pub mean: f64,
    pub std_dev: f64,
}

impl FieldStats {
    fn from_values(values: &[f64]) -> Self {
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        Self {
            mean,
            std_dev: variance.sqrt(),
        }
    }
}

/// Per-field statistics over a set of entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekStats {
    pub count: usize,
    pub energy: FieldStats,
    pub clarity: FieldStats,
    pub emotion: FieldStats,
    pub focus: FieldStats,
}

/// Mean and population standard deviation (divide by N) per field.
///
/// Returns `None` for an empty set.
pub fn week_stats<'a, I>(entries: I) -> Option<WeekStats>
where
    I: IntoIterator<Item = &'a CheckInEntry>,
{
    let entries: Vec<&CheckInEntry> = entries.into_iter().collect();
    if entries.is_empty() {
        return None;
    }

    let column = |field: Field| -> FieldStats {
        let values: Vec<f64> = entries.iter().map(|e| field.of(e) as f64).collect();
        FieldStats::from_values(&values)
    };

    Some(WeekStats {
        count: entries.len(),
        energy: column(Field::Energy),
        clarity: column(Field::Clarity),
        emotion: column(Field::Emotion),
        focus: column(Field::Focus),
    })
}

/// Entries whose calendar day (at `offset_minutes`) is `day`.
pub fn entries_on(entries: &[CheckInEntry], day: NaiveDate, offset_minutes: i32) -> Vec<&CheckInEntry> {
    entries
        .iter()
        .filter(|e| e.day(offset_minutes) == day)
        .collect()
}

/// Entries whose calendar day falls in `first..=last`.
pub fn entries_between(
    entries: &[CheckInEntry],
    first: NaiveDate,
    last: NaiveDate,
    offset_minutes: i32,
) -> Vec<&CheckInEntry> {
    entries
        .iter()
        .filter(|e| {
            let day = e.day(offset_minutes);
            day >= first && day <= last
        })
        .collect()
}

/// Arithmetic mean of `field`, `None` when there is nothing to average.
pub fn day_average<'a, I>(entries: I, field: Field) -> Option<f64>
where
    I: IntoIterator<Item = &'a CheckInEntry>,
{
    let (sum, count) = entries
        .into_iter()
        .fold((0i64, 0usize), |(sum, count), e| (sum + field.of(e), count + 1));
    (count > 0).then(|| sum as f64 / count as f64)
}

/// A day average that prints as `N/A` when absent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayAverage(pub Option<f64>);

impl fmt::Display for DayAverage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(avg) => write!(f, "{avg:.1}"),
            None => f.write_str("N/A"),
        }
    }
}

/// Current vs previous period average of one field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub field: Field,
    pub current: Option<f64>,
    pub previous: Option<f64>,
}

impl Comparison {
    /// Signed change, only when both sides have data.
    pub fn delta(&self) -> Option<f64> {
        Some(self.current? - self.previous?)
    }
}

/// Today's average of `field` against yesterday's.
pub fn day_over_day(
    entries: &[CheckInEntry],
    today: NaiveDate,
    field: Field,
    offset_minutes: i32,
) -> Comparison {
    let yesterday = today - Duration::days(1);
    Comparison {
        field,
        current: day_average(entries_on(entries, today, offset_minutes), field),
        previous: day_average(entries_on(entries, yesterday, offset_minutes), field),
    }
}

/// The 7 days ending today against the 7 days before them.
pub fn week_over_week(
    entries: &[CheckInEntry],
    today: NaiveDate,
    field: Field,
    offset_minutes: i32,
) -> Comparison {
    let week_start = today - Duration::days(6);
    let prev_end = week_start - Duration::days(1);
    let prev_start = prev_end - Duration::days(6);
    Comparison {
        field,
        current: day_average(entries_between(entries, week_start, today, offset_minutes), field),
        previous: day_average(
            entries_between(entries, prev_start, prev_end, offset_minutes),
            field,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkin::CheckInWindow;
    use chrono::{TimeZone, Utc};

    fn entry(day: u32, energy: i64, clarity: i64, emotion: i64) -> CheckInEntry {
        CheckInEntry::new(
            energy,
            clarity,
            emotion,
            CheckInWindow::CheckIn1,
            Utc.with_ymd_and_hms(2026, 3, day, 9, 0, 0).unwrap(),
        )
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, day).unwrap()
    }

    #[test]
    fn focus_boundaries() {
        assert_eq!(focus(0, 0), 0);
        assert_eq!(focus(100, 100), 100);
        assert_eq!(focus(50, 100), 70);
        assert_eq!(focus(77, 33), 59); // 46.2 + 13.2 = 59.4
    }

    #[test]
    fn mental_score_averages_with_focus() {
        // focus(80, 60) = 72, (60 + 80 + 40 + 72) / 4 = 63
        assert_eq!(mental_score(60, 80, 40), 63);
        assert_eq!(mental_score(100, 100, 100), 100);
        assert_eq!(mental_score(0, 0, 0), 0);
    }

    #[test]
    fn week_stats_uses_population_std_dev() {
        let entries = vec![entry(1, 40, 50, 60), entry(2, 60, 50, 80)];
        let stats = week_stats(&entries).unwrap();
        assert_eq!(stats.count, 2);
        assert_eq!(stats.energy.mean, 50.0);
        assert_eq!(stats.energy.std_dev, 10.0);
        assert_eq!(stats.clarity.std_dev, 0.0);
        assert_eq!(stats.emotion.mean, 70.0);
        // focus 46 and 54
        assert_eq!(stats.focus.mean, 50.0);
        assert_eq!(stats.focus.std_dev, 4.0);

        assert!(week_stats(&Vec::<CheckInEntry>::new()).is_none());
    }

    #[test]
    fn day_average_is_none_when_empty() {
        let entries = vec![entry(1, 40, 50, 60), entry(1, 60, 50, 80), entry(2, 10, 10, 10)];
        let on_first = entries_on(&entries, date(1), 0);
        assert_eq!(day_average(on_first, Field::Energy), Some(50.0));
        assert_eq!(day_average(entries_on(&entries, date(5), 0), Field::Energy), None);
        assert_eq!(DayAverage(None).to_string(), "N/A");
        assert_eq!(DayAverage(Some(0.0)).to_string(), "0.0");
    }

    #[test]
    fn missing_fields_deflate_the_average() {
        let partial: CheckInEntry = serde_json::from_str(
            r#"{"energy":80,"window":"checkIn2","timestamp":"2026-03-01T12:00:00Z"}"#,
        )
        .unwrap();
        let entries = vec![entry(1, 80, 80, 80), partial];
        assert_eq!(day_average(&entries, Field::Clarity), Some(40.0));
    }

    #[test]
    fn comparisons() {
        let entries = vec![
            entry(9, 40, 40, 40),
            entry(10, 70, 70, 70),
            entry(2, 20, 20, 20),
        ];
        let dod = day_over_day(&entries, date(10), Field::Energy, 0);
        assert_eq!(dod.current, Some(70.0));
        assert_eq!(dod.previous, Some(40.0));
        assert_eq!(dod.delta(), Some(30.0));

        let wow = week_over_week(&entries, date(10), Field::Energy, 0);
        assert_eq!(wow.current, Some(55.0));
        assert_eq!(wow.previous, Some(20.0));

        let empty = day_over_day(&entries, date(20), Field::Energy, 0);
        assert_eq!(empty.delta(), None);
    }
}
