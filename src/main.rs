//! # Storefront Insights CLI (`storefront`)
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `storefront run` | Fetch, load, report, and render charts (default) |
//! | `storefront init` | Drop and recreate the database schema |
//! | `storefront report` | Print analytics for the current database |
//! | `storefront charts` | Render charts for the current database |
//!
//! ## Examples
//!
//! ```bash
//! # Full run with built-in defaults
//! storefront
//!
//! # Full run against a custom endpoint, no charts
//! storefront --config ./config/storefront.toml run --no-charts
//!
//! # Verbose logging
//! STOREFRONT_LOG=storefront_insights=debug storefront run
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use storefront_insights::{config, pipeline};

/// Load a product catalog into SQLite and report on it.
#[derive(Parser)]
#[command(name = "storefront", version)]
struct Cli {
    /// Path to a TOML configuration file.
    ///
    /// When omitted, built-in defaults are used (the public fake store
    /// endpoint, `fakestore_advanced.db`, charts in the current directory).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the catalog, rebuild the database, print reports, and draw charts.
    Run {
        /// Skip chart rendering.
        #[arg(long)]
        no_charts: bool,
    },

    /// Drop and recreate the catalog tables.
    ///
    /// Safe to repeat: every call leaves the same empty tables.
    Init,

    /// Print the four analytics reports for the current database.
    Report,

    /// Render the three charts for the current database.
    Charts,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("STOREFRONT_LOG")
        .unwrap_or_else(|_| EnvFilter::new("storefront_insights=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let cfg = config::resolve(cli.config.as_deref())?;

    match cli.command.unwrap_or(Commands::Run { no_charts: false }) {
        Commands::Run { no_charts } => {
            pipeline::run(&cfg, !no_charts).await?;
        }
        Commands::Init => {
            pipeline::run_init(&cfg).await?;
        }
        Commands::Report => {
            pipeline::run_report(&cfg).await?;
        }
        Commands::Charts => {
            pipeline::run_charts(&cfg).await?;
        }
    }

    Ok(())
}
