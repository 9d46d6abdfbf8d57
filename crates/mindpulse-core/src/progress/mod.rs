//! Stateful progression components.
//!
//! Each component owns one record in the [`ScoreRepository`](crate::repository::ScoreRepository)
//! and is a failure boundary: storage or parse errors are logged and answered
//! with a safe default, never propagated to the orchestrator.

pub mod daily_goal;
pub mod mind_score;
pub mod momentum;
pub mod rings;
pub mod streak;
pub mod traits;
pub mod xp;

pub use daily_goal::{DailyGoalState, Goal, GoalAction, GoalUpdate};
pub use mind_score::MindScoreState;
pub use momentum::MomentumState;
pub use rings::{DayRings, Ring, RingUpdate, StreakRings};
pub use streak::StreakState;
pub use traits::{TraitCount, TraitXp};
pub use xp::{LevelInfo, XpAward, XpState};
