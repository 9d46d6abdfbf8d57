//! Mind score: a slow-moving wellbeing index walked one calendar day at a time.
//!
//! ## Day walk
//!
//! On the first call of a new day, every day strictly between the stored
//! date and today is evaluated in order:
//!
//! | Day | Delta |
//! |-----|-------|
//! | no entries | -10 |
//! | daily average >= 85 | +7 |
//! | daily average >= 70 | +5 |
//! | daily average >= 50 | +2 |
//! | daily average >= 30 | -3 |
//! | below 30 | -7 |
//!
//! Days with entries get a further +4 when the current streak is a nonzero
//! multiple of 3. The score is clamped to `[300, 900]` after every day.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::checkin::CheckInEntry;
use crate::error::Result;
use crate::repository::ScoreRepository;

pub const MIN_SCORE: i32 = 300;
pub const MAX_SCORE: i32 = 900;
pub const DEFAULT_SCORE: i32 = 600;
pub const MISSED_DAY_PENALTY: i32 = 10;
pub const STREAK_BONUS: i32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MindScoreState {
    /// Last processed calendar day.
    pub date: NaiveDate,
    pub value: i32,
}

impl MindScoreState {
    pub fn initial(today: NaiveDate) -> Self {
        Self {
            date: today,
            value: DEFAULT_SCORE,
        }
    }
}

/// Rounded mean over entries of `(energy + clarity + emotion) / 3`.
pub fn daily_average(entries: &[&CheckInEntry]) -> Option<i64> {
    if entries.is_empty() {
        return None;
    }
    let total: f64 = entries
        .iter()
        .map(|e| (e.energy + e.clarity + e.emotion) as f64 / 3.0)
        .sum();
    Some((total / entries.len() as f64).round() as i64)
}

/// Tiered delta for a day's average.
pub fn tier_delta(daily_avg: i64) -> i32 {
    match daily_avg {
        avg if avg >= 85 => 7,
        avg if avg >= 70 => 5,
        avg if avg >= 50 => 2,
        avg if avg >= 30 => -3,
        _ => -7,
    }
}

/// Score change for one processed day.
pub fn day_delta(entries: &[&CheckInEntry], current_streak: u32) -> i32 {
    match daily_average(entries) {
        None => -MISSED_DAY_PENALTY,
        Some(avg) => {
            let bonus = if current_streak > 0 && current_streak % 3 == 0 {
                STREAK_BONUS
            } else {
                0
            };
            tier_delta(avg) + bonus
        }
    }
}

/// Walk `state` forward to `today` without touching storage.
///
/// Returns the state to persist and the number of days evaluated.
pub fn walk(
    state: MindScoreState,
    history: &[CheckInEntry],
    today: NaiveDate,
    current_streak: u32,
    offset_minutes: i32,
) -> (MindScoreState, u32) {
    let mut by_day: BTreeMap<NaiveDate, Vec<&CheckInEntry>> = BTreeMap::new();
    for entry in history {
        let day = entry.day(offset_minutes);
        if day > state.date && day < today {
            by_day.entry(day).or_default().push(entry);
        }
    }

    let mut score = state.value;
    let mut processed = 0;
    let mut day = state.date;
    while let Some(next) = day.succ_opt() {
        if next >= today {
            break;
        }
        day = next;
        let entries = by_day.get(&day).map(Vec::as_slice).unwrap_or(&[]);
        let delta = day_delta(entries, current_streak);
        score = (score + delta).clamp(MIN_SCORE, MAX_SCORE);
        processed += 1;
        tracing::debug!(%day, entries = entries.len(), delta, score, "mind score day processed");
    }

    (
        MindScoreState {
            date: today,
            value: score,
        },
        processed,
    )
}

fn try_update_mind_score<R: ScoreRepository + ?Sized>(
    repo: &R,
    today: NaiveDate,
    current_streak: u32,
    offset_minutes: i32,
) -> Result<i32> {
    let Some(state) = repo.mind_score()? else {
        let state = MindScoreState::initial(today);
        repo.set_mind_score(&state)?;
        return Ok(state.value);
    };

    if state.date == today {
        return Ok(state.value);
    }

    let history = repo.check_in_history()?;
    let (next, processed) = walk(state, &history, today, current_streak, offset_minutes);
    repo.set_mind_score(&next)?;
    tracing::debug!(from = state.value, to = next.value, processed, "mind score updated");
    Ok(next.value)
}

/// Bring the mind score up to `today` and return it.
///
/// Idempotent within a day. On any storage error the stored state is left
/// alone and [`DEFAULT_SCORE`] is returned.
pub fn update_mind_score<R: ScoreRepository + ?Sized>(
    repo: &R,
    today: NaiveDate,
    current_streak: u32,
    offset_minutes: i32,
) -> i32 {
    try_update_mind_score(repo, today, current_streak, offset_minutes).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "mind score update failed, using default");
        DEFAULT_SCORE
    })
}

/// Stored mind score without walking, for read-only views.
pub fn current_mind_score<R: ScoreRepository + ?Sized>(repo: &R) -> i32 {
    match repo.mind_score() {
        Ok(state) => state.map_or(DEFAULT_SCORE, |s| s.value),
        Err(e) => {
            tracing::warn!(error = %e, "failed to read mind score");
            DEFAULT_SCORE
        }
    }
}
