use clap::Subcommand;
use mindpulse_core::progress::daily_goal;
use mindpulse_core::{Config, Goal};
use serde::Serialize;

use super::{open_engine, print_json};

#[derive(Subcommand)]
pub enum GoalCommand {
    /// Show today's goal
    Show,
}

#[derive(Serialize)]
struct GoalView {
    goal: Goal,
    description: &'static str,
    completed: bool,
}

pub fn run(action: GoalCommand, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    // startup assigns today's goal
    let engine = open_engine(config)?;

    match action {
        GoalCommand::Show => {
            let state = daily_goal::current_goal(engine.repo(), engine.today())
                .ok_or("no goal assigned for today")?;
            print_json(&GoalView {
                goal: state.goal,
                description: state.goal.description(),
                completed: state.completed,
            })?;
        }
    }
    Ok(())
}
