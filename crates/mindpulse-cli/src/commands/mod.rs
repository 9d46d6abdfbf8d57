pub mod actions;
pub mod checkin;
pub mod config;
pub mod goal;
pub mod scores;
pub mod stats;

use mindpulse_core::{Config, Database, ScoringEngine, StoreRepository};

pub type Engine = ScoringEngine<StoreRepository<Database>>;

/// Open the data-dir database and run startup housekeeping.
pub fn open_engine(config: &Config) -> Result<Engine, Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let offset = config.engine.resolved_offset_minutes();
    tracing::debug!(offset, "opening scoring engine");
    let mut engine = ScoringEngine::new(StoreRepository::new(db), offset);
    engine.startup();
    Ok(engine)
}

pub fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
