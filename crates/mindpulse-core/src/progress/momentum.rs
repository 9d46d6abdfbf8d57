//! Momentum: a fast-decaying engagement gauge in `[0, 100]`.
//!
//! Each call decays the stored value by 20 per elapsed day (floored at 0),
//! then adds a flat 34 check-in boost. Calls on the same day stack the boost.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::repository::ScoreRepository;

pub const DECAY_PER_DAY: f64 = 20.0;
pub const CHECK_IN_BOOST: f64 = 34.0;
pub const MAX_MOMENTUM: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MomentumState {
    pub value: f64,
    pub last: NaiveDate,
}

impl MomentumState {
    pub fn initial(today: NaiveDate) -> Self {
        Self {
            value: 0.0,
            last: today,
        }
    }

    /// Value after decaying to `today`, before any boost.
    pub fn decayed(&self, today: NaiveDate) -> f64 {
        let days = (today - self.last).num_days().max(0) as f64;
        (self.value - DECAY_PER_DAY * days).max(0.0)
    }

    /// Decay to `today`, then apply one check-in boost.
    pub fn boosted(&self, today: NaiveDate) -> Self {
        Self {
            value: (self.decayed(today) + CHECK_IN_BOOST).clamp(0.0, MAX_MOMENTUM),
            last: today,
        }
    }
}

fn try_update_momentum<R: ScoreRepository + ?Sized>(repo: &R, today: NaiveDate) -> Result<f64> {
    let state = repo
        .momentum()?
        .unwrap_or_else(|| MomentumState::initial(today));
    let next = state.boosted(today);
    repo.set_momentum(&next)?;
    Ok(next.value)
}

/// Apply decay and the check-in boost, persist, and return the new value.
///
/// Returns 0 on storage errors.
pub fn update_momentum<R: ScoreRepository + ?Sized>(repo: &R, today: NaiveDate) -> f64 {
    try_update_momentum(repo, today).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "momentum update failed");
        0.0
    })
}

/// Momentum as it would read today, without boosting or persisting.
pub fn current_momentum<R: ScoreRepository + ?Sized>(repo: &R, today: NaiveDate) -> f64 {
    match repo.momentum() {
        Ok(state) => state.map_or(0.0, |s| s.decayed(today)),
        Err(e) => {
            tracing::warn!(error = %e, "failed to read momentum");
            0.0
        }
    }
}
