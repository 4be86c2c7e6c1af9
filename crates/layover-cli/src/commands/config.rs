use std::path::PathBuf;

use clap::Subcommand;
use layover_core::storage::EngineConfig;

use crate::common::{load_config, CliResult};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the full config as JSON
    Show {
        /// Config file path (defaults to the user config dir)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Get a config value
    Get {
        /// Config key (e.g. "urgency.rush_max", "selection.window_size")
        key: String,
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// New value
        value: String,
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Reset config to defaults
    Reset {
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

pub fn run(action: ConfigAction) -> CliResult {
    match action {
        ConfigAction::Show { config } => {
            let config = load_config(config.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        ConfigAction::Get { key, config } => {
            let config = load_config(config.as_deref())?;
            match config.get(&key) {
                Some(value) => println!("{value}"),
                None => {
                    eprintln!("unknown key: {key}");
                    std::process::exit(1);
                }
            }
        }
        ConfigAction::Set { key, value, config } => {
            let path = config;
            let mut config = load_config(path.as_deref())?;
            config.set(&key, &value)?;
            match &path {
                Some(p) => config.save_to(p)?,
                None => config.save()?,
            }
            println!("ok");
        }
        ConfigAction::Reset { config } => {
            let defaults = EngineConfig::default();
            match &config {
                Some(p) => defaults.save_to(p)?,
                None => defaults.save()?,
            }
            println!("config reset to defaults");
        }
    }
    Ok(())
}
