use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use layover_core::metrics::InMemoryMetricsStore;
use layover_core::RecommendationEngine;

use crate::common::{load_config, CliResult, ContextArgs};

#[derive(Args)]
pub struct ClassifyArgs {
    #[command(flatten)]
    pub context: ContextArgs,
    /// Config file path (defaults to the user config dir)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

pub fn run(args: ClassifyArgs) -> CliResult {
    let config = load_config(args.config.as_deref())?;
    let context = args.context.build(&config);
    let engine = RecommendationEngine::new(config, Arc::new(InMemoryMetricsStore::new()))?;
    let classification = engine.classify(&context);
    println!("{}", serde_json::to_string_pretty(&classification)?);
    Ok(())
}
