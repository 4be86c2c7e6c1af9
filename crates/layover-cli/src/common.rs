//! Shared argument types and loading helpers for the CLI commands.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use layover_core::catalog::Catalog;
use layover_core::context::{TravelerContext, TravelerType};
use layover_core::metrics::MetricsStore;
use layover_core::storage::{EngineConfig, SqliteMetricsStore};

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Flags describing the traveler's moment, shared by every command
/// that evaluates recommendations.
#[derive(clap::Args)]
pub struct ContextArgs {
    /// Evaluation instant, RFC 3339 (defaults to now)
    #[arg(long)]
    pub at: Option<DateTime<Utc>>,
    /// Boarding deadline, RFC 3339
    #[arg(long)]
    pub deadline: Option<DateTime<Utc>>,
    /// Minutes until boarding, as an alternative to --deadline
    #[arg(long, conflicts_with = "deadline")]
    pub minutes: Option<f64>,
    /// Traveler segment (business, leisure, family, transit)
    #[arg(long)]
    pub traveler: Option<TravelerType>,
    /// Seed for display-variety shuffling
    #[arg(long)]
    pub seed: Option<u64>,
}

impl ContextArgs {
    pub fn build(&self, config: &EngineConfig) -> TravelerContext {
        let now = self.at.unwrap_or_else(Utc::now);
        let mut context =
            TravelerContext::new(now).with_utc_offset(config.airport.utc_offset_minutes);
        if let Some(deadline) = self.deadline {
            context = context.with_deadline(deadline);
        } else if let Some(minutes) = self.minutes {
            context = context.with_deadline(now + Duration::seconds((minutes * 60.0) as i64));
        }
        if let Some(traveler) = self.traveler {
            context = context.with_traveler_type(traveler);
        }
        if let Some(seed) = self.seed {
            context = context.with_variety_seed(seed);
        }
        context
    }
}

pub fn load_config(path: Option<&Path>) -> Result<EngineConfig, Box<dyn std::error::Error>> {
    let config = match path {
        Some(path) => EngineConfig::load_from(path)?,
        None => EngineConfig::load()?,
    };
    Ok(config)
}

pub fn open_store(path: Option<&Path>) -> Result<Arc<dyn MetricsStore>, Box<dyn std::error::Error>> {
    let store: Arc<dyn MetricsStore> = match path {
        Some(path) => Arc::new(SqliteMetricsStore::open(path)?),
        None => Arc::new(SqliteMetricsStore::open_default()?),
    };
    Ok(store)
}

pub fn load_catalog(path: &Path) -> Result<Catalog, Box<dyn std::error::Error>> {
    Ok(Catalog::load(path)?)
}
