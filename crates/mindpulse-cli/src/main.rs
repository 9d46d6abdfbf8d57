use clap::{Parser, Subcommand};
use mindpulse_core::Config;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "mindpulse-cli", version, about = "MindPulse check-in CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log and list check-ins
    Checkin {
        #[command(subcommand)]
        action: commands::checkin::CheckinAction,
    },
    /// Print every score as JSON
    Scores,
    /// Record a completed reflection
    Reflect,
    /// Record that today's insight was read
    Insight,
    /// Daily goal
    Goal {
        #[command(subcommand)]
        action: commands::goal::GoalCommand,
    },
    /// Check-in statistics
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    let config = Config::load_or_default();
    init_tracing(&config);

    let result = match cli.command {
        Commands::Checkin { action } => commands::checkin::run(action, &config),
        Commands::Scores => commands::scores::run(&config),
        Commands::Reflect => commands::actions::reflect(&config),
        Commands::Insight => commands::actions::insight(&config),
        Commands::Goal { action } => commands::goal::run(action, &config),
        Commands::Stats { action } => commands::stats::run(action, &config),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
