//! Ranking policy export/import commands.
//!
//! Policies carry the tunable ranking surface (urgency thresholds,
//! scoring weights, selection counts) between deployments, with
//! semantic-version compatibility checks on import.

use std::fs;
use std::path::PathBuf;

use clap::Subcommand;
use layover_core::policy::{
    builtin_packs, check_compatibility, find_pack, Compatibility, PolicyBundle, PolicyMetadata,
    POLICY_VERSION,
};

use crate::common::{load_config, CliResult};

#[derive(Subcommand)]
pub enum PolicyAction {
    /// Export the current ranking policy to a JSON file
    Export {
        /// Output file path (prints to stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Policy name
        #[arg(long)]
        name: Option<String>,
        /// Author identifier
        #[arg(long)]
        author: Option<String>,
        /// Intended use case
        #[arg(long)]
        intent: Option<String>,
        /// Additional notes
        #[arg(long)]
        notes: Option<String>,
        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Import a ranking policy from a JSON file
    Import {
        /// Input file path
        file: PathBuf,
        /// Validate without applying changes
        #[arg(long)]
        dry_run: bool,
        /// Skip compatibility checks
        #[arg(long)]
        force: bool,
        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// List built-in policy packs, or apply one
    Packs {
        /// Pack id to show in full
        id: Option<String>,
        /// Apply the pack to the config
        #[arg(long, requires = "id")]
        apply: bool,
        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Show the current policy schema version
    Version,
}

pub fn run(action: PolicyAction) -> CliResult {
    match action {
        PolicyAction::Export {
            output,
            name,
            author,
            intent,
            notes,
            config,
        } => export_policy(output, name, author, intent, notes, config),
        PolicyAction::Import {
            file,
            dry_run,
            force,
            config,
        } => import_policy(file, dry_run, force, config),
        PolicyAction::Packs { id, apply, config } => packs(id, apply, config),
        PolicyAction::Version => {
            println!("Policy schema version: {}", POLICY_VERSION);
            Ok(())
        }
    }
}

fn export_policy(
    output: Option<PathBuf>,
    name: Option<String>,
    author: Option<String>,
    intent: Option<String>,
    notes: Option<String>,
    config_path: Option<PathBuf>,
) -> CliResult {
    let config = load_config(config_path.as_deref())?;

    let metadata = PolicyMetadata {
        name: name.unwrap_or_else(|| "Exported Policy".to_string()),
        author: author.unwrap_or_default(),
        intent: intent.unwrap_or_default(),
        notes: notes.unwrap_or_default(),
        created_at: chrono::Utc::now(),
    };
    let mut bundle = PolicyBundle::from_config(&metadata.name, &config);
    bundle.metadata = metadata;

    let json = bundle.to_json()?;
    match output {
        Some(path) => {
            fs::write(&path, &json)?;
            println!("Policy exported to: {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn import_policy(
    file: PathBuf,
    dry_run: bool,
    force: bool,
    config_path: Option<PathBuf>,
) -> CliResult {
    let json = fs::read_to_string(&file)?;
    let bundle = PolicyBundle::from_json(&json)?;

    println!("Policy: {}", bundle.metadata.name);
    println!("Version: {}", bundle.version);
    println!("Author: {}", bundle.metadata.author);
    println!(
        "Created: {}",
        bundle.metadata.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    if !bundle.metadata.intent.is_empty() {
        println!("Intent: {}", bundle.metadata.intent);
    }
    if !bundle.metadata.notes.is_empty() {
        println!("Notes: {}", bundle.metadata.notes);
    }

    let compatibility = check_compatibility(POLICY_VERSION, &bundle.version);
    match &compatibility {
        Compatibility::Compatible => {
            println!("\nCompatibility: OK");
        }
        Compatibility::MinorNewer { .. } => {
            println!("\nWarning: {compatibility}");
        }
        Compatibility::Incompatible { .. } => {
            println!("\nError: {compatibility}");
            if !force {
                return Err("Incompatible policy version. Use --force to override.".into());
            }
            println!("\nProceeding due to --force flag.");
        }
    }

    println!("\nPolicy Settings:");
    println!(
        "  Urgency bands (min): rush {} / imminent {} / soon {} / normal {}",
        bundle.policy.urgency.rush_max,
        bundle.policy.urgency.imminent_max,
        bundle.policy.urgency.soon_max,
        bundle.policy.urgency.normal_max
    );
    println!(
        "  Mode profiles: {}",
        if bundle.policy.mode_profiles { "on" } else { "off" }
    );
    println!(
        "  Shelf: {} core + {} dynamic, window {}",
        bundle.policy.core_count, bundle.policy.dynamic_count, bundle.policy.window_size
    );

    if dry_run {
        println!("\nDry run complete. No changes applied.");
        return Ok(());
    }

    let mut config = load_config(config_path.as_deref())?;
    bundle.apply_to_config(&mut config);
    config.validate()?;
    match &config_path {
        Some(path) => config.save_to(path)?,
        None => config.save()?,
    }
    println!("\nPolicy applied successfully.");
    Ok(())
}

fn packs(id: Option<String>, apply: bool, config_path: Option<PathBuf>) -> CliResult {
    let Some(id) = id else {
        for pack in builtin_packs() {
            println!("{}: {}", pack.id, pack.name);
            println!("  {}", pack.description);
        }
        return Ok(());
    };

    let pack = find_pack(&id).ok_or_else(|| format!("unknown pack '{id}'"))?;
    println!("{}: {}", pack.id, pack.name);
    println!("{}", pack.description);
    println!("\n{}", pack.rationale);

    if !apply {
        return Ok(());
    }

    let mut config = load_config(config_path.as_deref())?;
    pack.bundle.apply_to_config(&mut config);
    config.validate()?;
    match &config_path {
        Some(path) => config.save_to(path)?,
        None => config.save()?,
    }
    println!("Pack applied: {}", pack.id);
    Ok(())
}
