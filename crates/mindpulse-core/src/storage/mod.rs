mod config;
pub mod database;
pub mod kv;
pub mod memory;
pub mod migrations;

pub use config::{Config, EngineConfig, LoggingConfig};
pub use database::Database;
pub use kv::KvStore;
pub use memory::MemoryStore;

use std::path::PathBuf;

use crate::error::Result;

/// Returns the data directory, creating it if needed.
///
/// `MINDPULSE_DATA_DIR` wins when set. Otherwise this is
/// `~/.config/mindpulse[-dev]/`, selected by `MINDPULSE_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("MINDPULSE_DATA_DIR") {
        Some(custom) => PathBuf::from(custom),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("MINDPULSE_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("mindpulse-dev")
            } else {
                base_dir.join("mindpulse")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
