use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

mod commands;
mod common;

#[derive(Parser)]
#[command(name = "layover-cli", version, about = "Layover recommendation CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify urgency and time of day for a moment
    Classify(commands::classify::ClassifyArgs),
    /// Show the vibe ordering for a moment
    Vibes(commands::vibes::VibesArgs),
    /// Select the collection shelf for one vibe
    Collections(commands::collections::CollectionsArgs),
    /// Rank amenities inside one collection
    Amenities(commands::amenities::AmenitiesArgs),
    /// Produce the full recommendation payload
    Recommend(commands::recommend::RecommendArgs),
    /// Record a traveler interaction
    Track(commands::track::TrackArgs),
    /// Engagement metrics
    Metrics {
        #[command(subcommand)]
        action: commands::metrics::MetricsAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Ranking policy export/import
    Policy {
        #[command(subcommand)]
        action: commands::policy::PolicyAction,
    },
    /// Generate shell completions
    Completions {
        /// Target shell
        shell: Shell,
    },
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Classify(args) => commands::classify::run(args),
        Commands::Vibes(args) => commands::vibes::run(args),
        Commands::Collections(args) => commands::collections::run(args),
        Commands::Amenities(args) => commands::amenities::run(args),
        Commands::Recommend(args) => commands::recommend::run(args),
        Commands::Track(args) => commands::track::run(args),
        Commands::Metrics { action } => commands::metrics::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Policy { action } => commands::policy::run(action),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "layover-cli", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
