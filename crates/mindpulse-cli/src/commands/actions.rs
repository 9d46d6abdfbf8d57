//! Ring-closing actions that happen outside a check-in.

use mindpulse_core::Config;

use super::{open_engine, print_json};

pub fn reflect(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let mut engine = open_engine(config)?;
    print_json(&engine.complete_reflection())
}

pub fn insight(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let mut engine = open_engine(config)?;
    print_json(&engine.mark_insight_read())
}
