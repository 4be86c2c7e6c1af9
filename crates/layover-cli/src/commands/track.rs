use std::path::PathBuf;

use clap::Args;
use layover_core::metrics::Interaction;

use crate::common::{open_store, CliResult};

#[derive(Args)]
pub struct TrackArgs {
    /// Collection or amenity slug
    pub slug: String,
    /// Interaction kind (view, click, conversion, satisfaction, time-spent)
    pub kind: Interaction,
    /// Interaction value (rating, minutes); defaults to 1.0
    #[arg(long)]
    pub value: Option<f64>,
    /// Metrics database path (defaults to the user data dir)
    #[arg(long)]
    pub db: Option<PathBuf>,
}

pub fn run(args: TrackArgs) -> CliResult {
    let store = open_store(args.db.as_deref())?;
    store.record(&args.slug, args.kind, args.value)?;
    println!("recorded {} for {}", args.kind, args.slug);
    Ok(())
}
