use chrono::Duration;
use clap::Subcommand;
use mindpulse_core::history::{self, DaySummary};
use mindpulse_core::metrics::{self, Comparison, DayAverage, Field, WeekStats};
use mindpulse_core::Config;
use serde::Serialize;

use super::{open_engine, print_json};

const COMPARED: [Field; 5] = [
    Field::Energy,
    Field::Clarity,
    Field::Emotion,
    Field::Focus,
    Field::MentalScore,
];

#[derive(Subcommand)]
pub enum StatsAction {
    /// Today's averages against yesterday's
    Today,
    /// The last 7 days against the 7 before them
    Week,
    /// Per-day summaries
    History {
        /// Number of days ending today
        #[arg(long, default_value = "7", value_parser = clap::value_parser!(u32).range(1..=3650))]
        days: u32,
    },
}

#[derive(Serialize)]
struct TodayStats {
    summary: DaySummary,
    display: DisplayAverages,
    vs_yesterday: Vec<Comparison>,
}

/// Averages formatted to one decimal, `N/A` for a day without data.
#[derive(Serialize)]
struct DisplayAverages {
    energy: String,
    clarity: String,
    emotion: String,
    focus: String,
}

impl DisplayAverages {
    fn of(summary: &DaySummary) -> Self {
        Self {
            energy: DayAverage(summary.energy).to_string(),
            clarity: DayAverage(summary.clarity).to_string(),
            emotion: DayAverage(summary.emotion).to_string(),
            focus: DayAverage(summary.focus).to_string(),
        }
    }
}

#[derive(Serialize)]
struct WeekReport {
    stats: Option<WeekStats>,
    vs_previous_week: Vec<Comparison>,
}

pub fn run(action: StatsAction, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let engine = open_engine(config)?;
    let entries = engine.history();
    let today = engine.today();
    let offset = engine.offset_minutes();

    match action {
        StatsAction::Today => {
            let todays = metrics::entries_on(&entries, today, offset);
            let summary = DaySummary::summarize(today, &todays);
            let stats = TodayStats {
                display: DisplayAverages::of(&summary),
                summary,
                vs_yesterday: COMPARED
                    .iter()
                    .map(|&f| metrics::day_over_day(&entries, today, f, offset))
                    .collect(),
            };
            print_json(&stats)?;
        }
        StatsAction::Week => {
            let week = metrics::entries_between(&entries, today - Duration::days(6), today, offset);
            let report = WeekReport {
                stats: metrics::week_stats(week),
                vs_previous_week: COMPARED
                    .iter()
                    .map(|&f| metrics::week_over_week(&entries, today, f, offset))
                    .collect(),
            };
            print_json(&report)?;
        }
        StatsAction::History { days } => {
            let summaries = history::recent_days(&entries, today, days, offset);
            print_json(&summaries)?;
        }
    }
    Ok(())
}
