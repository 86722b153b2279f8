//! Know Your Fruit - identify fruit from a photo.
//!
//! Serves the upload-and-browse web front end, or classifies a single photo
//! from the command line against the hosted fruit model.
//!
//! # Usage
//!
//! ```bash
//! # Run the web front end
//! knowfruit serve --bind 0.0.0.0:5000
//!
//! # Rank a local photo
//! knowfruit classify banana.jpg --top-k 3
//!
//! # View configuration
//! knowfruit config show
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod cli;
mod logging;
mod server;

/// Know Your Fruit - identify fruit from a photo.
#[derive(Parser, Debug)]
#[command(name = "knowfruit")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    /// Config file to use instead of the default location
    #[arg(short, long, global = true, env = "KNOWFRUIT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the web front end
    Serve(cli::serve::ServeArgs),

    /// Classify a single image and print the ranked labels
    Classify(cli::classify::ClassifyArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => knowfruit_core::Config::load_from(path),
        None => knowfruit_core::Config::load(),
    };

    // Logging must come up before a config error can be reported through it.
    let logging = loaded
        .as_ref()
        .map(|config| config.logging.clone())
        .unwrap_or_default();
    logging::init_from_config(&logging, cli.verbose, cli.json_logs);

    tracing::debug!("Know Your Fruit v{}", knowfruit_core::VERSION);

    match cli.command {
        Commands::Serve(args) => cli::serve::execute(args, loaded?).await,
        Commands::Classify(args) => cli::classify::execute(args, loaded?).await,
        Commands::Config(args) => cli::config::execute(args, cli.config.as_deref()).await,
    }
}
