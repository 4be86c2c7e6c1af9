use std::path::PathBuf;

use clap::Args;
use layover_core::rotation::{show_next_window, ScoredAmenity};
use layover_core::RecommendationEngine;
use serde::Serialize;

use crate::common::{load_catalog, load_config, open_store, CliResult, ContextArgs};

#[derive(Args)]
pub struct AmenitiesArgs {
    /// Catalog JSON file
    #[arg(long)]
    pub catalog: PathBuf,
    /// Collection slug to rank
    #[arg(long)]
    pub collection: String,
    /// Rotation cursor held by the caller
    #[arg(long, default_value = "0")]
    pub cursor: usize,
    /// Print every window instead of the one at the cursor
    #[arg(long)]
    pub all: bool,
    #[command(flatten)]
    pub context: ContextArgs,
    /// Config file path
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Metrics database path (defaults to the user data dir)
    #[arg(long)]
    pub db: Option<PathBuf>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AmenityRow {
    id: String,
    name: String,
    walking_minutes: u32,
    total: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AmenitiesOutput {
    collection: String,
    hero: Option<AmenityRow>,
    total_windows: usize,
    cursor: usize,
    next_cursor: usize,
    window: Vec<AmenityRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    all_windows: Option<Vec<Vec<AmenityRow>>>,
}

fn row(scored: &ScoredAmenity) -> AmenityRow {
    AmenityRow {
        id: scored.amenity.id.clone(),
        name: scored.amenity.name.clone(),
        walking_minutes: scored.amenity.walking_minutes,
        total: scored.score.total,
    }
}

pub fn run(args: AmenitiesArgs) -> CliResult {
    let config = load_config(args.config.as_deref())?;
    let catalog = load_catalog(&args.catalog)?;
    let context = args.context.build(&config);
    let store = open_store(args.db.as_deref())?;
    let engine = RecommendationEngine::new(config, store)?;

    let collection = catalog
        .collections
        .iter()
        .find(|c| c.slug == args.collection)
        .ok_or_else(|| format!("unknown collection '{}'", args.collection))?;

    let ranked = engine.rank_collection(&catalog, collection, &context);
    let total_windows = ranked.total_windows();
    let output = AmenitiesOutput {
        collection: collection.slug.clone(),
        hero: ranked.hero.as_ref().map(row),
        total_windows,
        cursor: args.cursor,
        next_cursor: show_next_window(args.cursor, total_windows),
        window: ranked.window_at(args.cursor).iter().map(row).collect(),
        all_windows: args
            .all
            .then(|| ranked.windows.iter().map(|w| w.iter().map(row).collect()).collect()),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
