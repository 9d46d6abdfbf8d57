//! Experience points and the square-root level curve.
//!
//! ```text
//! level(xp)        = floor(sqrt(xp / 5)) + 1
//! xp_for_level(l)  = 5 * (l - 1)^2
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::checkin::CheckInWindow;
use crate::error::Result;
use crate::repository::ScoreRepository;

/// Per-day and lifetime XP. Level and progress are derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XpState {
    pub date: NaiveDate,
    pub xp_today: u64,
    pub total: u64,
}

impl XpState {
    pub fn initial(today: NaiveDate) -> Self {
        Self {
            date: today,
            xp_today: 0,
            total: 0,
        }
    }

    /// Add `amount`, rolling the daily counter over on a new day.
    pub fn add(&self, today: NaiveDate, amount: u64) -> Self {
        let xp_today = if self.date == today { self.xp_today } else { 0 };
        Self {
            date: today,
            xp_today: xp_today + amount,
            total: self.total + amount,
        }
    }

    /// Today's XP as seen on `today` (0 if the record is from another day).
    pub fn xp_on(&self, today: NaiveDate) -> u64 {
        if self.date == today {
            self.xp_today
        } else {
            0
        }
    }
}

/// Why XP was granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "window", rename_all = "snake_case")]
pub enum XpAward {
    CheckIn(CheckInWindow),
    Reflection,
    DailyGoal,
    RingBonus,
}

impl XpAward {
    pub fn amount(&self) -> u64 {
        match self {
            XpAward::CheckIn(CheckInWindow::CheckIn3) => 15,
            XpAward::CheckIn(_) => 10,
            XpAward::Reflection => 25,
            XpAward::DailyGoal => 10,
            XpAward::RingBonus => 10,
        }
    }
}

/// Total XP needed to reach `level`.
pub fn xp_for_level(level: u32) -> u64 {
    let steps = u64::from(level.saturating_sub(1));
    5 * steps * steps
}

/// Level reached with `xp` total.
pub fn level(xp: u64) -> u32 {
    let mut level = (xp as f64 / 5.0).sqrt().floor() as u32 + 1;
    // Guard the float estimate at exact boundaries.
    while level > 1 && xp_for_level(level) > xp {
        level -= 1;
    }
    while xp_for_level(level + 1) <= xp {
        level += 1;
    }
    level
}

/// Percent of the way from the current level to the next.
pub fn progress_pct(xp: u64) -> u32 {
    let lvl = level(xp);
    let base = xp_for_level(lvl);
    let span = xp_for_level(lvl + 1) - base;
    (100.0 * (xp - base) as f64 / span as f64).round() as u32
}

/// Derived level view of a lifetime total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelInfo {
    pub level: u32,
    pub progress_pct: u32,
    pub xp_into_level: u64,
    pub xp_to_next_level: u64,
}

impl LevelInfo {
    pub fn from_total(total: u64) -> Self {
        let level = level(total);
        let base = xp_for_level(level);
        let next = xp_for_level(level + 1);
        Self {
            level,
            progress_pct: progress_pct(total),
            xp_into_level: total - base,
            xp_to_next_level: next - total,
        }
    }
}

/// Result of a successful XP award.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XpUpdate {
    pub state: XpState,
    pub previous_level: u32,
}

impl XpUpdate {
    pub fn level(&self) -> u32 {
        level(self.state.total)
    }

    pub fn leveled_up(&self) -> bool {
        self.level() > self.previous_level
    }
}

fn try_update_xp<R: ScoreRepository + ?Sized>(
    repo: &R,
    today: NaiveDate,
    amount: u64,
) -> Result<XpUpdate> {
    let state = repo.xp()?.unwrap_or_else(|| XpState::initial(today));
    let next = state.add(today, amount);
    repo.set_xp(&next)?;
    Ok(XpUpdate {
        state: next,
        previous_level: level(state.total),
    })
}

/// Add `amount` XP for `today`. `None` when storage failed.
pub fn update_xp<R: ScoreRepository + ?Sized>(
    repo: &R,
    today: NaiveDate,
    amount: u64,
) -> Option<XpUpdate> {
    match try_update_xp(repo, today, amount) {
        Ok(update) => Some(update),
        Err(e) => {
            tracing::warn!(error = %e, amount, "xp update failed");
            None
        }
    }
}

/// Grant the XP for `award`.
pub fn award<R: ScoreRepository + ?Sized>(
    repo: &R,
    today: NaiveDate,
    award: XpAward,
) -> Option<XpUpdate> {
    tracing::debug!(?award, amount = award.amount(), "awarding xp");
    update_xp(repo, today, award.amount())
}

/// Stored XP for read-only views.
pub fn current_xp<R: ScoreRepository + ?Sized>(repo: &R, today: NaiveDate) -> XpState {
    match repo.xp() {
        Ok(state) => state.unwrap_or_else(|| XpState::initial(today)),
        Err(e) => {
            tracing::warn!(error = %e, "failed to read xp");
            XpState::initial(today)
        }
    }
}
