use std::path::PathBuf;

use clap::Args;
use layover_core::RecommendationEngine;

use crate::common::{load_catalog, load_config, open_store, CliResult, ContextArgs};

#[derive(Args)]
pub struct RecommendArgs {
    /// Catalog JSON file
    #[arg(long)]
    pub catalog: PathBuf,
    #[command(flatten)]
    pub context: ContextArgs,
    /// Config file path
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Metrics database path (defaults to the user data dir)
    #[arg(long)]
    pub db: Option<PathBuf>,
}

pub fn run(args: RecommendArgs) -> CliResult {
    let config = load_config(args.config.as_deref())?;
    let catalog = load_catalog(&args.catalog)?;
    let context = args.context.build(&config);
    let store = open_store(args.db.as_deref())?;
    let engine = RecommendationEngine::new(config, store)?;

    let recommendations = engine.recommend(&catalog, &context)?;
    println!("{}", serde_json::to_string_pretty(&recommendations)?);
    Ok(())
}
