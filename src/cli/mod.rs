//! CLI command handlers
//!
//! Each subcommand has its own module with handler functions.

pub mod config;
pub mod explore;
pub mod history;
pub mod sample;
pub mod serve;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Discover random and named places in Latvia
#[derive(Parser)]
#[command(name = "latvia-explorer")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Find and describe a place
    Explore(explore::ExploreArgs),

    /// Sample random points inside Latvia (no provider call)
    Sample(sample::SampleArgs),

    /// Start web server (foreground)
    Serve(serve::ServeArgs),

    /// Manage configuration
    Config(config::ConfigArgs),

    /// View and manage history
    History(history::HistoryArgs),
}

/// Install the global subscriber, honouring `RUST_LOG`
fn init_logging(default_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Run the CLI
pub async fn run() -> crate::error::Result<()> {
    let cli = Cli::parse();

    init_logging(match cli.command {
        Commands::Serve(_) => "info",
        _ => "warn",
    });

    match cli.command {
        Commands::Explore(args) => explore::run(args).await,
        Commands::Sample(args) => sample::run(args),
        Commands::Serve(args) => serve::run(args).await,
        Commands::Config(args) => config::run(args),
        Commands::History(args) => history::run(args),
    }
}
