pub mod config;
pub mod metrics_db;

pub use config::{AirportConfig, EngineConfig, ScoringConfig, SelectionConfig};
pub use metrics_db::SqliteMetricsStore;

use std::path::PathBuf;

/// Returns `~/.config/layover[-dev]/` based on LAYOVER_ENV.
///
/// Set LAYOVER_ENV=dev to use a development data directory.
///
/// # Errors
/// Returns an error if the config directory cannot be created.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("LAYOVER_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("layover-dev")
    } else {
        base_dir.join("layover")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
