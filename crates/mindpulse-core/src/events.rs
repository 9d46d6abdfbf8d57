use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::checkin::CheckInWindow;
use crate::progress::{Goal, Ring, XpAward};

/// Every notable state change in the engine produces an Event.
/// The front-end reads them from the report returned by each engine call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    CheckInSaved {
        day: NaiveDate,
        window: CheckInWindow,
        at: DateTime<Utc>,
    },
    StreakExtended {
        current: u32,
        longest: u32,
    },
    /// The streak restarted at 1 after a gap.
    StreakRestarted {
        longest: u32,
    },
    MindScoreChanged {
        from: i32,
        to: i32,
    },
    XpAwarded {
        award: XpAward,
        amount: u64,
        total: u64,
    },
    LevelUp {
        level: u32,
    },
    RingClosed {
        ring: Ring,
        day: NaiveDate,
    },
    /// All three rings were closed for the day.
    RingBonus {
        day: NaiveDate,
    },
    GoalCompleted {
        goal: Goal,
        day: NaiveDate,
    },
}
