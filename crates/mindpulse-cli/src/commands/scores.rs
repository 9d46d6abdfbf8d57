use mindpulse_core::Config;

use super::{open_engine, print_json};

pub fn run(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let engine = open_engine(config)?;
    print_json(&engine.current_scores())
}
