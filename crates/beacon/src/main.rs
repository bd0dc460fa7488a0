//! Beacon - customer-success analytics dashboard service
//!
//! # Usage
//!
//! ```bash
//! # Run the server (default)
//! beacon
//! beacon --config configs/beacon.toml
//!
//! # Provision the warehouse and document store
//! beacon setup
//!
//! # Load a demo dataset
//! beacon demo --users 200
//!
//! # Compute one card from the command line
//! beacon card --customer Altostrat --card calls_count_7d_window_30d
//! ```

mod cmd;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use beacon_config::{Config, LogFormat};

/// Beacon - customer-success analytics dashboard service
#[derive(Parser, Debug)]
#[command(name = "beacon")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<std::path::PathBuf>,

    /// Log level (trace, debug, info, warn, error). Overrides config.
    #[arg(short, long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server
    Serve,

    /// Provision the warehouse dataset/tables and docstore collections
    Setup,

    /// Generate and load a demo dataset
    Demo(cmd::demo::DemoArgs),

    /// Compute one metric card and print it
    Card(cmd::card::CardArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?;
    config.validate()?;

    init_logging(&config, cli.log_level.as_deref())?;

    match cli.command {
        Some(Command::Setup) => cmd::setup::run(config).await,
        Some(Command::Demo(args)) => cmd::demo::run(config, args).await,
        Some(Command::Card(args)) => cmd::card::run(config, args).await,
        // No subcommand = run the server
        Some(Command::Serve) | None => cmd::serve::run(config).await,
    }
}

fn init_logging(config: &Config, override_level: Option<&str>) -> Result<()> {
    let level = override_level.unwrap_or_else(|| config.log.level.as_str());
    let filter = EnvFilter::try_new(level)
        .or_else(|_| EnvFilter::try_new("info"))
        .expect("default filter is valid");

    match config.log.format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json())
                .init();
        }
        LogFormat::Console => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer())
                .init();
        }
    }

    Ok(())
}
