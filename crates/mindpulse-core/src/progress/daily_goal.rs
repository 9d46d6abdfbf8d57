//! One randomly assigned goal per calendar day.
//!
//! Completing the goal is the only way to earn the daily-goal XP award, and
//! it can be earned once per day.

use chrono::NaiveDate;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::xp::{self, XpAward, XpUpdate};
use crate::error::Result;
use crate::repository::ScoreRepository;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Goal {
    /// Log all three check-ins today.
    #[serde(rename = "three-checkins")]
    ThreeCheckIns,
    /// Add a tag to a check-in.
    #[serde(rename = "add-tag")]
    AddTag,
    /// Complete a reflection.
    #[serde(rename = "reflect")]
    Reflect,
}

/// Goals eligible for assignment.
pub const CATALOG: [Goal; 3] = [Goal::ThreeCheckIns, Goal::AddTag, Goal::Reflect];

impl Goal {
    pub fn description(&self) -> &'static str {
        match self {
            Goal::ThreeCheckIns => "Log all three check-ins today",
            Goal::AddTag => "Tag a check-in with how you feel",
            Goal::Reflect => "Complete a reflection",
        }
    }

    pub fn is_satisfied_by(&self, action: GoalAction) -> bool {
        match (self, action) {
            (Goal::ThreeCheckIns, GoalAction::CheckInsLogged(count)) => count >= 3,
            (Goal::AddTag, GoalAction::TagAdded) => true,
            (Goal::Reflect, GoalAction::Reflection) => true,
            _ => false,
        }
    }
}

/// Something the user did that may complete today's goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "count", rename_all = "snake_case")]
pub enum GoalAction {
    /// Number of check-ins logged today so far.
    CheckInsLogged(usize),
    TagAdded,
    Reflection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyGoalState {
    pub date: NaiveDate,
    pub goal: Goal,
    pub completed: bool,
}

/// Outcome of reporting an action against today's goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GoalUpdate {
    pub state: DailyGoalState,
    pub newly_completed: bool,
    pub xp: Option<XpUpdate>,
}

fn try_ensure_daily_goal<R, G>(repo: &R, today: NaiveDate, rng: &mut G) -> Result<DailyGoalState>
where
    R: ScoreRepository + ?Sized,
    G: Rng + ?Sized,
{
    if let Some(state) = repo.daily_goal()? {
        if state.date == today {
            return Ok(state);
        }
    }

    let goal = CATALOG[rng.gen_range(0..CATALOG.len())];
    let state = DailyGoalState {
        date: today,
        goal,
        completed: false,
    };
    repo.set_daily_goal(&state)?;
    tracing::debug!(?goal, %today, "assigned daily goal");
    Ok(state)
}

/// Today's goal, drawing a new one uniformly from [`CATALOG`] on a new day.
pub fn ensure_daily_goal<R, G>(repo: &R, today: NaiveDate, rng: &mut G) -> Option<DailyGoalState>
where
    R: ScoreRepository + ?Sized,
    G: Rng + ?Sized,
{
    match try_ensure_daily_goal(repo, today, rng) {
        Ok(state) => Some(state),
        Err(e) => {
            tracing::warn!(error = %e, "daily goal assignment failed");
            None
        }
    }
}

fn try_update_daily_goal<R: ScoreRepository + ?Sized>(
    repo: &R,
    today: NaiveDate,
    action: GoalAction,
) -> Result<Option<GoalUpdate>> {
    let Some(mut state) = repo.daily_goal()? else {
        return Ok(None);
    };
    if state.date != today {
        return Ok(None);
    }

    if state.completed || !state.goal.is_satisfied_by(action) {
        return Ok(Some(GoalUpdate {
            state,
            newly_completed: false,
            xp: None,
        }));
    }

    state.completed = true;
    repo.set_daily_goal(&state)?;
    tracing::info!(goal = ?state.goal, "daily goal completed");
    let xp = xp::award(repo, today, XpAward::DailyGoal);

    Ok(Some(GoalUpdate {
        state,
        newly_completed: true,
        xp,
    }))
}

/// Report `action` against today's goal.
///
/// Marks the goal complete and awards its XP the first time a matching
/// action arrives; later calls are no-ops. `None` when there is no goal for
/// today or storage failed.
pub fn update_daily_goal<R: ScoreRepository + ?Sized>(
    repo: &R,
    today: NaiveDate,
    action: GoalAction,
) -> Option<GoalUpdate> {
    try_update_daily_goal(repo, today, action).unwrap_or_else(|e| {
        tracing::warn!(error = %e, ?action, "daily goal update failed");
        None
    })
}

/// Stored goal if it belongs to `today`.
pub fn current_goal<R: ScoreRepository + ?Sized>(repo: &R, today: NaiveDate) -> Option<DailyGoalState> {
    match repo.daily_goal() {
        Ok(state) => state.filter(|s| s.date == today),
        Err(e) => {
            tracing::warn!(error = %e, "failed to read daily goal");
            None
        }
    }
}
