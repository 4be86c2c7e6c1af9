use std::path::PathBuf;

use clap::Args;
use layover_core::vibe::Vibe;
use layover_core::RecommendationEngine;
use serde::Serialize;

use crate::common::{load_catalog, load_config, open_store, CliResult, ContextArgs};

#[derive(Args)]
pub struct CollectionsArgs {
    /// Catalog JSON file
    #[arg(long)]
    pub catalog: PathBuf,
    /// Vibe to select for (refuel, discover, chill, comfort, work, shop, quick)
    #[arg(long)]
    pub vibe: Vibe,
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
struct CollectionRow {
    slug: String,
    name: String,
    subtitle: String,
    is_core: bool,
    amenity_count: usize,
}

pub fn run(args: CollectionsArgs) -> CliResult {
    let config = load_config(args.config.as_deref())?;
    let catalog = load_catalog(&args.catalog)?;
    let context = args.context.build(&config);
    let store = open_store(args.db.as_deref())?;
    let engine = RecommendationEngine::new(config, store)?;

    let shelf = engine.shelf_for(&catalog, args.vibe, &context)?;
    let rows: Vec<CollectionRow> = shelf
        .into_iter()
        .map(|c| CollectionRow {
            amenity_count: c.amenity_ids.len(),
            slug: c.slug,
            name: c.name,
            subtitle: c.subtitle,
            is_core: c.is_core,
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&rows)?);
    Ok(())
}
