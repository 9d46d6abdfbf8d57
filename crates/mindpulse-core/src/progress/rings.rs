//! Daily streak rings.
//!
//! Three completion flags per day (energy logged, reflection done, insight
//! read). Closing all three grants a one-time bonus for that day.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::xp::{self, XpAward, XpUpdate};
use crate::error::Result;
use crate::repository::ScoreRepository;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ring {
    /// A check-in was logged.
    EnergyLogged,
    /// A reflection was completed.
    ReflectionDone,
    /// The daily insight was read.
    InsightRead,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRings {
    #[serde(default)]
    pub ring1: bool,
    #[serde(default)]
    pub ring2: bool,
    #[serde(default)]
    pub ring3: bool,
    #[serde(default)]
    pub bonus: bool,
}

impl DayRings {
    pub fn is_set(&self, ring: Ring) -> bool {
        match ring {
            Ring::EnergyLogged => self.ring1,
            Ring::ReflectionDone => self.ring2,
            Ring::InsightRead => self.ring3,
        }
    }

    fn set(&mut self, ring: Ring) {
        match ring {
            Ring::EnergyLogged => self.ring1 = true,
            Ring::ReflectionDone => self.ring2 = true,
            Ring::InsightRead => self.ring3 = true,
        }
    }

    pub fn all_closed(&self) -> bool {
        self.ring1 && self.ring2 && self.ring3
    }
}

/// One entry per day, kept indefinitely.
pub type StreakRings = BTreeMap<NaiveDate, DayRings>;

/// Outcome of closing a ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RingUpdate {
    pub rings: DayRings,
    /// The ring was open before this call.
    pub newly_closed: bool,
    /// This call closed the last ring and granted the bonus.
    pub bonus: Option<XpUpdate>,
}

fn try_mark_ring<R: ScoreRepository + ?Sized>(
    repo: &R,
    today: NaiveDate,
    ring: Ring,
) -> Result<(DayRings, bool, bool)> {
    let mut all = repo.streak_rings()?;
    let rings = all.entry(today).or_default();
    let newly_closed = !rings.is_set(ring);
    rings.set(ring);

    let earn_bonus = rings.all_closed() && !rings.bonus;
    if earn_bonus {
        rings.bonus = true;
    }
    let rings = *rings;

    if newly_closed || earn_bonus {
        repo.set_streak_rings(&all)?;
    }
    Ok((rings, newly_closed, earn_bonus))
}

/// Close `ring` for `today`, granting the all-rings bonus at most once per day.
///
/// `None` when storage failed; no XP is awarded in that case.
pub fn mark_ring<R: ScoreRepository + ?Sized>(
    repo: &R,
    today: NaiveDate,
    ring: Ring,
) -> Option<RingUpdate> {
    match try_mark_ring(repo, today, ring) {
        Ok((rings, newly_closed, earn_bonus)) => {
            let bonus = if earn_bonus {
                tracing::info!(%today, "all rings closed, awarding bonus");
                xp::award(repo, today, XpAward::RingBonus)
            } else {
                None
            };
            Some(RingUpdate {
                rings,
                newly_closed,
                bonus,
            })
        }
        Err(e) => {
            tracing::warn!(error = %e, ?ring, "ring update failed");
            None
        }
    }
}

/// Rings for `day`, all open if none were recorded.
pub fn rings_on<R: ScoreRepository + ?Sized>(repo: &R, day: NaiveDate) -> DayRings {
    match repo.streak_rings() {
        Ok(all) => all.get(&day).copied().unwrap_or_default(),
        Err(e) => {
            tracing::warn!(error = %e, "failed to read streak rings");
            DayRings::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::StoreRepository;
    use crate::storage::{KvStore, MemoryStore};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 4, d).unwrap()
    }

    #[test]
    fn bonus_once_per_day() {
        let repo = StoreRepository::new(MemoryStore::new());

        let first = mark_ring(&repo, day(1), Ring::EnergyLogged).unwrap();
        assert!(first.newly_closed);
        assert!(first.bonus.is_none());

        mark_ring(&repo, day(1), Ring::ReflectionDone).unwrap();
        let closing = mark_ring(&repo, day(1), Ring::InsightRead).unwrap();
        assert!(closing.rings.all_closed());
        assert!(closing.rings.bonus);
        assert_eq!(closing.bonus.unwrap().state.total, 10);

        let again = mark_ring(&repo, day(1), Ring::InsightRead).unwrap();
        assert!(!again.newly_closed);
        assert!(again.bonus.is_none());
        assert_eq!(repo.xp().unwrap().unwrap().total, 10);
    }

    #[test]
    fn days_are_independent() {
        let repo = StoreRepository::new(MemoryStore::new());
        mark_ring(&repo, day(1), Ring::EnergyLogged).unwrap();
        mark_ring(&repo, day(2), Ring::InsightRead).unwrap();

        assert_eq!(
            rings_on(&repo, day(1)),
            DayRings {
                ring1: true,
                ..Default::default()
            }
        );
        assert!(rings_on(&repo, day(2)).ring3);
        assert_eq!(rings_on(&repo, day(3)), DayRings::default());
        assert_eq!(repo.streak_rings().unwrap().len(), 2);
    }

    #[test]
    fn stored_as_map_of_days() {
        let repo = StoreRepository::new(MemoryStore::new());
        mark_ring(&repo, day(5), Ring::ReflectionDone).unwrap();
        let raw = repo.store().get(crate::repository::keys::STREAK_RINGS);
        assert_eq!(
            raw.unwrap().as_deref(),
            Some(r#"{"2026-04-05":{"ring1":false,"ring2":true,"ring3":false,"bonus":false}}"#)
        );
    }
}
