//! Consecutive-day check-in streak with a longest-streak high-water mark.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::repository::ScoreRepository;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakState {
    pub last_check_in: Option<NaiveDate>,
    pub current: u32,
    pub longest: u32,
}

impl StreakState {
    /// Count a check-in on `today`.
    ///
    /// Same day is a no-op, the day after extends the streak, anything else
    /// restarts it at 1.
    pub fn advance(&self, today: NaiveDate) -> Self {
        if self.last_check_in == Some(today) {
            return *self;
        }

        let current = match self.last_check_in {
            Some(last) if last + Duration::days(1) == today => self.current + 1,
            _ => 1,
        };

        Self {
            last_check_in: Some(today),
            current,
            longest: self.longest.max(current),
        }
    }

    /// True when more than one day has passed since the last check-in.
    pub fn is_broken(&self, today: NaiveDate) -> bool {
        self.last_check_in
            .is_some_and(|last| (today - last).num_days() > 1)
    }
}

fn try_update_streak<R: ScoreRepository + ?Sized>(repo: &R, today: NaiveDate) -> Result<StreakState> {
    let state = repo.streak()?;
    let next = state.advance(today);
    if next != state {
        repo.set_streak(&next)?;
    }
    Ok(next)
}

/// Count today's check-in and return the resulting streak.
///
/// On storage errors the streak is reported as zero.
pub fn update_streak<R: ScoreRepository + ?Sized>(repo: &R, today: NaiveDate) -> StreakState {
    try_update_streak(repo, today).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "streak update failed");
        StreakState::default()
    })
}

fn try_reset_streak_if_needed<R: ScoreRepository + ?Sized>(
    repo: &R,
    today: NaiveDate,
) -> Result<StreakState> {
    let mut state = repo.streak()?;
    if state.is_broken(today) && state.current != 0 {
        tracing::info!(previous = state.current, "streak broken, resetting");
        state.current = 0;
        repo.set_streak(&state)?;
    }
    Ok(state)
}

/// Zero the current streak if the last check-in is more than a day old.
///
/// Meant to run at process start. Leaves the longest streak alone.
pub fn reset_streak_if_needed<R: ScoreRepository + ?Sized>(repo: &R, today: NaiveDate) -> StreakState {
    try_reset_streak_if_needed(repo, today).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "streak reset check failed");
        StreakState::default()
    })
}

/// Stored streak for read-only views.
pub fn current_streak<R: ScoreRepository + ?Sized>(repo: &R) -> StreakState {
    repo.streak().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "failed to read streak");
        StreakState::default()
    })
}
