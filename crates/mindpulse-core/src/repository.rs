//! Typed access to every engine record.
//!
//! [`ScoreRepository`] is what the engine is written against; the
//! [`StoreRepository`] implementation maps each record onto its key in a
//! [`KvStore`]. Records are independent read-modify-write units; nothing
//! here spans keys transactionally except the streak triple, which is
//! written with a single `multi_set`.

use chrono::NaiveDate;

use crate::checkin::{CheckInEntry, CheckInWindow};
use crate::error::{CoreError, Result};
use crate::progress::daily_goal::DailyGoalState;
use crate::progress::mind_score::MindScoreState;
use crate::progress::momentum::MomentumState;
use crate::progress::rings::StreakRings;
use crate::progress::streak::StreakState;
use crate::progress::traits::TraitXp;
use crate::progress::xp::XpState;
use crate::storage::kv::{get_json, set_json, KvStore};

/// Storage keys.
pub mod keys {
    pub const CHECK_IN_HISTORY: &str = "checkInHistory";
    pub const MIND_SCORE: &str = "mindScore";
    pub const MOMENTUM: &str = "momentum";
    pub const STREAK_RINGS: &str = "streakRings";
    pub const TRAIT_XP: &str = "traitXP";
    pub const XP_DATA: &str = "xpData";
    pub const DAILY_GOAL: &str = "dailyGoal";
    pub const LAST_CHECK_IN: &str = "lastCheckIn";
    pub const CURRENT_STREAK: &str = "currentStreak";
    pub const LONGEST_STREAK: &str = "longestStreak";

    /// Existence marker for one (day, window) pair.
    pub fn window(day: chrono::NaiveDate, window: crate::checkin::CheckInWindow) -> String {
        format!("checkIn:{day}:{window}")
    }
}

/// Typed get/set per engine record.
pub trait ScoreRepository {
    fn check_in_history(&self) -> Result<Vec<CheckInEntry>>;
    /// Append `entry` to the ledger and mark its (day, window) slot taken.
    fn append_check_in(&self, day: NaiveDate, entry: &CheckInEntry) -> Result<()>;
    fn has_window(&self, day: NaiveDate, window: CheckInWindow) -> Result<bool>;

    fn mind_score(&self) -> Result<Option<MindScoreState>>;
    fn set_mind_score(&self, state: &MindScoreState) -> Result<()>;

    fn momentum(&self) -> Result<Option<MomentumState>>;
    fn set_momentum(&self, state: &MomentumState) -> Result<()>;

    fn streak(&self) -> Result<StreakState>;
    fn set_streak(&self, state: &StreakState) -> Result<()>;

    fn xp(&self) -> Result<Option<XpState>>;
    fn set_xp(&self, state: &XpState) -> Result<()>;

    fn daily_goal(&self) -> Result<Option<DailyGoalState>>;
    fn set_daily_goal(&self, state: &DailyGoalState) -> Result<()>;

    fn streak_rings(&self) -> Result<StreakRings>;
    fn set_streak_rings(&self, rings: &StreakRings) -> Result<()>;

    fn trait_xp(&self) -> Result<TraitXp>;
    fn set_trait_xp(&self, traits: &TraitXp) -> Result<()>;
}

/// [`ScoreRepository`] over any [`KvStore`].
#[derive(Debug)]
pub struct StoreRepository<S> {
    store: S,
}

impl<S: KvStore> StoreRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

/// Streak counters are stored as integer strings; bare numbers are accepted too.
fn parse_counter(key: &str, raw: Option<&str>) -> Result<u32> {
    let Some(raw) = raw else {
        return Ok(0);
    };
    let value: serde_json::Value = serde_json::from_str(raw)?;
    let parsed = match &value {
        serde_json::Value::String(s) => s.trim().parse::<u32>().ok(),
        serde_json::Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        serde_json::Value::Null => Some(0),
        _ => None,
    };
    parsed.ok_or_else(|| CoreError::Custom(format!("{key} holds a non-integer value: {raw}")))
}

impl<S: KvStore> ScoreRepository for StoreRepository<S> {
    fn check_in_history(&self) -> Result<Vec<CheckInEntry>> {
        Ok(get_json(&self.store, keys::CHECK_IN_HISTORY)?.unwrap_or_default())
    }

    fn append_check_in(&self, day: NaiveDate, entry: &CheckInEntry) -> Result<()> {
        let mut history = self.check_in_history()?;
        history.push(entry.clone());
        let window_key = keys::window(day, entry.window);
        self.store.multi_set(&[
            (keys::CHECK_IN_HISTORY, serde_json::to_string(&history)?),
            (window_key.as_str(), serde_json::to_string(&true)?),
        ])
    }

    fn has_window(&self, day: NaiveDate, window: CheckInWindow) -> Result<bool> {
        Ok(self.store.get(&keys::window(day, window))?.is_some())
    }

    fn mind_score(&self) -> Result<Option<MindScoreState>> {
        get_json(&self.store, keys::MIND_SCORE)
    }

    fn set_mind_score(&self, state: &MindScoreState) -> Result<()> {
        set_json(&self.store, keys::MIND_SCORE, state)
    }

    fn momentum(&self) -> Result<Option<MomentumState>> {
        get_json(&self.store, keys::MOMENTUM)
    }

    fn set_momentum(&self, state: &MomentumState) -> Result<()> {
        set_json(&self.store, keys::MOMENTUM, state)
    }

    fn streak(&self) -> Result<StreakState> {
        let values = self.store.multi_get(&[
            keys::LAST_CHECK_IN,
            keys::CURRENT_STREAK,
            keys::LONGEST_STREAK,
        ])?;

        let last_check_in = match values[0].1.as_deref() {
            Some(raw) => serde_json::from_str::<Option<NaiveDate>>(raw)?,
            None => None,
        };

        Ok(StreakState {
            last_check_in,
            current: parse_counter(keys::CURRENT_STREAK, values[1].1.as_deref())?,
            longest: parse_counter(keys::LONGEST_STREAK, values[2].1.as_deref())?,
        })
    }

    fn set_streak(&self, state: &StreakState) -> Result<()> {
        self.store.multi_set(&[
            (keys::LAST_CHECK_IN, serde_json::to_string(&state.last_check_in)?),
            (
                keys::CURRENT_STREAK,
                serde_json::to_string(&state.current.to_string())?,
            ),
            (
                keys::LONGEST_STREAK,
                serde_json::to_string(&state.longest.to_string())?,
            ),
        ])
    }

    fn xp(&self) -> Result<Option<XpState>> {
        get_json(&self.store, keys::XP_DATA)
    }

    fn set_xp(&self, state: &XpState) -> Result<()> {
        set_json(&self.store, keys::XP_DATA, state)
    }

    fn daily_goal(&self) -> Result<Option<DailyGoalState>> {
        get_json(&self.store, keys::DAILY_GOAL)
    }

    fn set_daily_goal(&self, state: &DailyGoalState) -> Result<()> {
        set_json(&self.store, keys::DAILY_GOAL, state)
    }

    fn streak_rings(&self) -> Result<StreakRings> {
        Ok(get_json(&self.store, keys::STREAK_RINGS)?.unwrap_or_default())
    }

    fn set_streak_rings(&self, rings: &StreakRings) -> Result<()> {
        set_json(&self.store, keys::STREAK_RINGS, rings)
    }

    fn trait_xp(&self) -> Result<TraitXp> {
        Ok(get_json(&self.store, keys::TRAIT_XP)?.unwrap_or_default())
    }

    fn set_trait_xp(&self, traits: &TraitXp) -> Result<()> {
        set_json(&self.store, keys::TRAIT_XP, traits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use chrono::{TimeZone, Utc};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 5, d).unwrap()
    }

    #[test]
    fn streak_counters_are_integer_strings() {
        let repo = StoreRepository::new(MemoryStore::new());
        repo.set_streak(&StreakState {
            last_check_in: Some(day(4)),
            current: 3,
            longest: 7,
        })
        .unwrap();

        let store = repo.store();
        assert_eq!(store.get(keys::CURRENT_STREAK).unwrap().as_deref(), Some("\"3\""));
        assert_eq!(store.get(keys::LONGEST_STREAK).unwrap().as_deref(), Some("\"7\""));
        assert_eq!(
            store.get(keys::LAST_CHECK_IN).unwrap().as_deref(),
            Some("\"2026-05-04\"")
        );

        let streak = repo.streak().unwrap();
        assert_eq!(streak.current, 3);
        assert_eq!(streak.longest, 7);
    }

    #[test]
    fn streak_accepts_bare_numbers_and_missing_keys() {
        let repo = StoreRepository::new(MemoryStore::new());
        assert_eq!(repo.streak().unwrap(), StreakState::default());

        repo.store().set(keys::CURRENT_STREAK, "5").unwrap();
        assert_eq!(repo.streak().unwrap().current, 5);

        repo.store().set(keys::CURRENT_STREAK, "\"five\"").unwrap();
        assert!(repo.streak().is_err());
    }

    #[test]
    fn history_appends_in_insertion_order() {
        let repo = StoreRepository::new(MemoryStore::new());
        let late = CheckInEntry::new(
            10,
            10,
            10,
            CheckInWindow::CheckIn3,
            Utc.with_ymd_and_hms(2026, 5, 4, 20, 0, 0).unwrap(),
        );
        let early = CheckInEntry::new(
            90,
            90,
            90,
            CheckInWindow::CheckIn1,
            Utc.with_ymd_and_hms(2026, 5, 4, 8, 0, 0).unwrap(),
        );
        repo.append_check_in(day(4), &late).unwrap();
        repo.append_check_in(day(4), &early).unwrap();

        let history = repo.check_in_history().unwrap();
        assert_eq!(history, vec![late, early]);
    }

    #[test]
    fn append_marks_the_window() {
        let repo = StoreRepository::new(MemoryStore::new());
        assert!(!repo.has_window(day(4), CheckInWindow::CheckIn2).unwrap());
        let entry = CheckInEntry::new(
            50,
            50,
            50,
            CheckInWindow::CheckIn2,
            Utc.with_ymd_and_hms(2026, 5, 4, 13, 0, 0).unwrap(),
        );
        repo.append_check_in(day(4), &entry).unwrap();
        assert_eq!(repo.check_in_history().unwrap().len(), 1);
        assert!(repo.has_window(day(4), CheckInWindow::CheckIn2).unwrap());
        assert!(!repo.has_window(day(5), CheckInWindow::CheckIn2).unwrap());
        assert!(repo
            .store()
            .get("checkIn:2026-05-04:checkIn2")
            .unwrap()
            .is_some());
    }
}
