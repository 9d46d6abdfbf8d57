use chrono::{NaiveDate, Utc};
use clap::Subcommand;
use mindpulse_core::{CheckInEntry, CheckInWindow};

use super::{open_engine, print_json};
use mindpulse_core::Config;

#[derive(Subcommand)]
pub enum CheckinAction {
    /// Log a check-in for one of today's windows
    Log {
        /// Energy, 0-100
        #[arg(long)]
        energy: i64,
        /// Clarity, 0-100
        #[arg(long)]
        clarity: i64,
        /// Emotion, 0-100
        #[arg(long)]
        emotion: i64,
        /// Window: 1/morning, 2/afternoon, 3/evening
        #[arg(long)]
        window: CheckInWindow,
        /// Free-text note
        #[arg(long)]
        note: Option<String>,
        /// Tag (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// List stored check-ins
    List {
        /// Only check-ins on this day (YYYY-MM-DD)
        #[arg(long)]
        day: Option<NaiveDate>,
    },
}

pub fn run(action: CheckinAction, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let mut engine = open_engine(config)?;

    match action {
        CheckinAction::Log {
            energy,
            clarity,
            emotion,
            window,
            note,
            tags,
        } => {
            let mut entry =
                CheckInEntry::new(energy, clarity, emotion, window, Utc::now()).with_tags(tags);
            if let Some(note) = note {
                entry = entry.with_note(note);
            }
            let report = engine.save_check_in(entry)?;
            print_json(&report)?;
        }
        CheckinAction::List { day } => {
            let offset = engine.offset_minutes();
            let entries: Vec<CheckInEntry> = engine
                .history()
                .into_iter()
                .filter(|e| day.map_or(true, |d| e.day(offset) == d))
                .collect();
            print_json(&entries)?;
        }
    }
    Ok(())
}
