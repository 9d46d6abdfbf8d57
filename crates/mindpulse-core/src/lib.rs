//! # MindPulse Core Library
//!
//! This library provides the scoring and progression engine behind the
//! MindPulse check-in journal. The CLI binary is a thin layer over the same
//! engine, so every operation is available without a front-end.
//!
//! ## Architecture
//!
//! - **Check-ins**: up to three self-reports per day (energy, clarity,
//!   emotion) stored in an append-only ledger
//! - **Progression**: mind score, momentum, streak, XP and levels, daily goal,
//!   daily rings and per-tag trait XP, each an independent component
//! - **Storage**: a key-value store of JSON values backed by SQLite, plus
//!   TOML configuration
//! - **Statistics**: per-day aggregates and day/week comparisons computed from
//!   the ledger
//!
//! ## Key Components
//!
//! - [`ScoringEngine`]: sequences the components after each check-in
//! - [`ScoreRepository`]: typed access to the persisted records
//! - [`Database`]: SQLite-backed [`KvStore`]
//! - [`Config`]: application configuration management

pub mod checkin;
pub mod clock;
pub mod engine;
pub mod error;
pub mod events;
pub mod history;
pub mod metrics;
pub mod progress;
pub mod repository;
pub mod storage;

pub use checkin::{CheckInEntry, CheckInWindow};
pub use clock::{Clock, FixedClock, SystemClock};
pub use engine::{ActionReport, CheckInReport, ScoreSnapshot, ScoringEngine};
pub use error::{ConfigError, CoreError, DatabaseError, ValidationError};
pub use events::Event;
pub use history::DaySummary;
pub use metrics::{Comparison, Field, WeekStats};
pub use progress::{DailyGoalState, DayRings, Goal, LevelInfo, StreakState, XpState};
pub use repository::{ScoreRepository, StoreRepository};
pub use storage::{Config, Database, KvStore, MemoryStore};
