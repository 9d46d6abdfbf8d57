//! Check-in orchestrator.
//!
//! The engine sequences the progression components after each saved
//! check-in:
//!
//! ```text
//! streak -> mind score -> momentum -> ring1 + goal -> window XP -> trait XP
//! ```
//!
//! Every step is its own failure boundary. There is no rollback: a step that
//! fails leaves the earlier ones applied and the remaining ones still run.
//! Records are updated as independent read-modify-write sequences, so two
//! processes driving the same store can lose an update.

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::checkin::{local_day, CheckInEntry, CheckInWindow};
use crate::clock::{Clock, SystemClock};
use crate::error::{Result, ValidationError};
use crate::events::Event;
use crate::progress::daily_goal::{self, DailyGoalState, GoalAction, GoalUpdate};
use crate::progress::mind_score;
use crate::progress::momentum;
use crate::progress::rings::{self, DayRings, Ring, RingUpdate};
use crate::progress::streak::{self, StreakState};
use crate::progress::traits::{self, TraitCount};
use crate::progress::xp::{self, LevelInfo, XpAward, XpState, XpUpdate};
use crate::repository::ScoreRepository;

/// What a processed check-in produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckInReport {
    pub day: NaiveDate,
    pub streak: StreakState,
    pub mind_score: i32,
    pub momentum: f64,
    pub xp: XpState,
    pub level: LevelInfo,
    pub daily_goal: Option<DailyGoalState>,
    pub rings: DayRings,
    pub events: Vec<Event>,
}

/// What a reflection or insight action produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionReport {
    pub day: NaiveDate,
    pub xp: XpState,
    pub level: LevelInfo,
    pub daily_goal: Option<DailyGoalState>,
    pub rings: DayRings,
    pub events: Vec<Event>,
}

/// Read-only view of every score for the front-end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreSnapshot {
    pub date: NaiveDate,
    pub mind_score: i32,
    pub momentum: f64,
    pub streak: StreakState,
    pub xp_today: u64,
    pub xp_total: u64,
    pub level: LevelInfo,
    pub daily_goal: Option<DailyGoalState>,
    pub rings: DayRings,
    pub traits: Vec<TraitCount>,
    pub check_ins_total: usize,
    pub check_ins_today: Vec<CheckInWindow>,
}

/// Scoring and progression engine over a [`ScoreRepository`].
pub struct ScoringEngine<R> {
    repo: R,
    clock: Box<dyn Clock>,
    rng: Box<dyn RngCore>,
    offset_minutes: i32,
}

impl<R: ScoreRepository> ScoringEngine<R> {
    /// Engine on the system clock with an entropy-seeded RNG.
    ///
    /// `offset_minutes` (east of UTC) decides where calendar days begin.
    pub fn new(repo: R, offset_minutes: i32) -> Self {
        Self {
            repo,
            clock: Box::new(SystemClock),
            rng: Box::new(StdRng::from_entropy()),
            offset_minutes,
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_rng(mut self, rng: impl RngCore + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    pub fn offset_minutes(&self) -> i32 {
        self.offset_minutes
    }

    /// Today's calendar day.
    pub fn today(&self) -> NaiveDate {
        local_day(self.clock.now(), self.offset_minutes)
    }

    /// Process-start housekeeping: break stale streaks and assign today's goal.
    pub fn startup(&mut self) -> StreakState {
        let today = self.today();
        let streak = streak::reset_streak_if_needed(&self.repo, today);
        daily_goal::ensure_daily_goal(&self.repo, today, &mut *self.rng);
        streak
    }

    /// Validate and persist a check-in, then run the progression pipeline.
    ///
    /// Fails only when the entry is invalid, its (day, window) slot is already
    /// taken, or the ledger write fails. Once the entry is stored, derived
    /// statistics are best-effort.
    pub fn save_check_in(&mut self, entry: CheckInEntry) -> Result<CheckInReport> {
        entry.validate()?;

        let day = entry.day(self.offset_minutes);
        if self.repo.has_window(day, entry.window)? {
            return Err(ValidationError::DuplicateWindow {
                date: day,
                window: entry.window.to_string(),
            }
            .into());
        }

        self.repo.append_check_in(day, &entry)?;
        tracing::info!(%day, window = %entry.window, "check-in saved");

        let mut report = self.process_check_in(&entry);
        report.events.insert(
            0,
            Event::CheckInSaved {
                day,
                window: entry.window,
                at: entry.timestamp,
            },
        );
        Ok(report)
    }

    /// Run the progression pipeline for an already persisted check-in.
    ///
    /// Call exactly once per saved check-in. Never fails.
    pub fn process_check_in(&mut self, entry: &CheckInEntry) -> CheckInReport {
        let today = self.today();
        let mut events = Vec::new();

        let before = streak::current_streak(&self.repo);
        let streak = streak::update_streak(&self.repo, today);
        if streak.last_check_in != before.last_check_in && streak.current > 0 {
            // startup may already have zeroed `current`, so judge by the date
            let continued = match before.last_check_in {
                None => true,
                Some(last) => today.pred_opt() == Some(last),
            };
            if continued {
                events.push(Event::StreakExtended {
                    current: streak.current,
                    longest: streak.longest,
                });
            } else {
                events.push(Event::StreakRestarted {
                    longest: streak.longest,
                });
            }
        }

        let score_before = mind_score::current_mind_score(&self.repo);
        let mind_score =
            mind_score::update_mind_score(&self.repo, today, streak.current, self.offset_minutes);
        if mind_score != score_before {
            events.push(Event::MindScoreChanged {
                from: score_before,
                to: mind_score,
            });
        }

        let momentum = momentum::update_momentum(&self.repo, today);

        let ring = rings::mark_ring(&self.repo, today, Ring::EnergyLogged);
        push_ring_events(&mut events, today, Ring::EnergyLogged, ring);

        daily_goal::ensure_daily_goal(&self.repo, today, &mut *self.rng);
        let logged_today = self.windows_on(today).len();
        let goal = daily_goal::update_daily_goal(
            &self.repo,
            today,
            GoalAction::CheckInsLogged(logged_today),
        );
        push_goal_events(&mut events, today, goal);
        if !entry.tags.is_empty() {
            let goal = daily_goal::update_daily_goal(&self.repo, today, GoalAction::TagAdded);
            push_goal_events(&mut events, today, goal);
        }

        let award = XpAward::CheckIn(entry.window);
        push_xp_events(&mut events, award, xp::award(&self.repo, today, award));

        traits::add_trait_xp(&self.repo, &entry.tags);

        let xp = xp::current_xp(&self.repo, today);
        CheckInReport {
            day: today,
            streak,
            mind_score,
            momentum,
            xp,
            level: LevelInfo::from_total(xp.total),
            daily_goal: daily_goal::current_goal(&self.repo, today),
            rings: rings::rings_on(&self.repo, today),
            events,
        }
    }

    /// A reflection was completed: close ring 2, award XP, report to the goal.
    pub fn complete_reflection(&mut self) -> ActionReport {
        let today = self.today();
        let mut events = Vec::new();

        let ring = rings::mark_ring(&self.repo, today, Ring::ReflectionDone);
        push_ring_events(&mut events, today, Ring::ReflectionDone, ring);

        let award = XpAward::Reflection;
        push_xp_events(&mut events, award, xp::award(&self.repo, today, award));

        daily_goal::ensure_daily_goal(&self.repo, today, &mut *self.rng);
        let goal = daily_goal::update_daily_goal(&self.repo, today, GoalAction::Reflection);
        push_goal_events(&mut events, today, goal);

        self.action_report(today, events)
    }

    /// The daily insight was read: close ring 3.
    pub fn mark_insight_read(&mut self) -> ActionReport {
        let today = self.today();
        let mut events = Vec::new();

        let ring = rings::mark_ring(&self.repo, today, Ring::InsightRead);
        push_ring_events(&mut events, today, Ring::InsightRead, ring);

        self.action_report(today, events)
    }

    fn action_report(&self, today: NaiveDate, events: Vec<Event>) -> ActionReport {
        let xp = xp::current_xp(&self.repo, today);
        ActionReport {
            day: today,
            xp,
            level: LevelInfo::from_total(xp.total),
            daily_goal: daily_goal::current_goal(&self.repo, today),
            rings: rings::rings_on(&self.repo, today),
            events,
        }
    }

    /// The check-in ledger, empty if it cannot be read.
    pub fn history(&self) -> Vec<CheckInEntry> {
        self.repo.check_in_history().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to read check-in history");
            Vec::new()
        })
    }

    /// Windows already logged on `day`, in window order.
    pub fn windows_on(&self, day: NaiveDate) -> Vec<CheckInWindow> {
        let mut windows: Vec<CheckInWindow> = self
            .history()
            .iter()
            .filter(|e| e.day(self.offset_minutes) == day)
            .map(|e| e.window)
            .collect();
        windows.sort();
        windows.dedup();
        windows
    }

    /// Snapshot of every score. Reads only.
    pub fn current_scores(&self) -> ScoreSnapshot {
        let today = self.today();
        let xp = xp::current_xp(&self.repo, today);
        let history = self.history();

        ScoreSnapshot {
            date: today,
            mind_score: mind_score::current_mind_score(&self.repo),
            momentum: momentum::current_momentum(&self.repo, today),
            streak: streak::current_streak(&self.repo),
            xp_today: xp.xp_on(today),
            xp_total: xp.total,
            level: LevelInfo::from_total(xp.total),
            daily_goal: daily_goal::current_goal(&self.repo, today),
            rings: rings::rings_on(&self.repo, today),
            traits: traits::ranked(&traits::current_trait_xp(&self.repo)),
            check_ins_total: history.len(),
            check_ins_today: self.windows_on(today),
        }
    }
}

fn push_xp_events(events: &mut Vec<Event>, award: XpAward, update: Option<XpUpdate>) {
    let Some(update) = update else {
        return;
    };
    events.push(Event::XpAwarded {
        award,
        amount: award.amount(),
        total: update.state.total,
    });
    if update.leveled_up() {
        events.push(Event::LevelUp {
            level: update.level(),
        });
    }
}

fn push_ring_events(events: &mut Vec<Event>, day: NaiveDate, ring: Ring, update: Option<RingUpdate>) {
    let Some(update) = update else {
        return;
    };
    if update.newly_closed {
        events.push(Event::RingClosed { ring, day });
    }
    if update.bonus.is_some() {
        events.push(Event::RingBonus { day });
        push_xp_events(events, XpAward::RingBonus, update.bonus);
    }
}

fn push_goal_events(events: &mut Vec<Event>, day: NaiveDate, update: Option<GoalUpdate>) {
    let Some(update) = update else {
        return;
    };
    if update.newly_completed {
        events.push(Event::GoalCompleted {
            goal: update.state.goal,
            day,
        });
        push_xp_events(events, XpAward::DailyGoal, update.xp);
    }
}
