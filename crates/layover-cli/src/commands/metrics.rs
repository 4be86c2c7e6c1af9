use std::path::PathBuf;

use clap::Subcommand;

use crate::common::{open_store, CliResult};

#[derive(Subcommand)]
pub enum MetricsAction {
    /// Print the record for one slug (null when absent)
    Show {
        /// Collection or amenity slug
        slug: String,
        /// Metrics database path (defaults to the user data dir)
        #[arg(long)]
        db: Option<PathBuf>,
    },
    /// Print every record ranked by engagement
    Summary {
        /// Metrics database path (defaults to the user data dir)
        #[arg(long)]
        db: Option<PathBuf>,
    },
    /// Drop every record and logged event
    Reset {
        /// Metrics database path (defaults to the user data dir)
        #[arg(long)]
        db: Option<PathBuf>,
    },
}

pub fn run(action: MetricsAction) -> CliResult {
    match action {
        MetricsAction::Show { slug, db } => {
            let store = open_store(db.as_deref())?;
            let record = store.get(&slug)?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        MetricsAction::Summary { db } => {
            let store = open_store(db.as_deref())?;
            let summary = store.summary()?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        MetricsAction::Reset { db } => {
            let store = open_store(db.as_deref())?;
            store.reset()?;
            println!("metrics reset");
        }
    }
    Ok(())
}
