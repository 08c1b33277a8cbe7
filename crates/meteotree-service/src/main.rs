//! Meteotree Service - Background Open-Meteo sync daemon.
//!
//! Run with: `cargo run -p meteotree-service`

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::{info, warn};

use meteotree_core::{SyncController, SyncOptions};
use meteotree_service::{Config, OpenMeteoClient};
use meteotree_store::SqliteStore;

/// Meteotree Service - Background Open-Meteo sync daemon.
#[derive(Parser, Debug)]
#[command(name = "meteotree-service")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Database path (overrides config).
    #[arg(short, long)]
    database: Option<PathBuf>,

    /// Run one sync cycle, print its report as JSON, and exit.
    #[arg(long)]
    once: bool,

    /// Skip the startup reconciliation pass.
    #[arg(long)]
    no_reconcile: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("meteotree_service=info".parse()?)
                .add_directive("meteotree_core=info".parse()?),
        )
        .init();

    // Load configuration
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::load_default()?,
    };

    // Override config with CLI args
    if let Some(db_path) = args.database {
        config.storage.path = db_path;
    }

    config.validate()?;

    // Open the database
    info!("Opening database at {:?}", config.storage.path);
    let store = SqliteStore::open(&config.storage.path)?;

    let client = OpenMeteoClient::new(config.sync.units)?;

    let options = SyncOptions {
        locations: config.locations.clone(),
        units: config.sync.units,
        locale: config.sync.locale,
    };
    let controller = SyncController::new(Arc::new(store), Arc::new(client), options);

    // Drop subtrees the configuration no longer covers
    if !args.no_reconcile {
        let report = controller.reconcile().await?;
        if report.points_deleted > 0 {
            info!(
                "reconciliation removed {} points in {} subtrees",
                report.points_deleted, report.subtrees_deleted
            );
        }
    }

    if args.once {
        let report = controller.run_cycle().await?;
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    info!(
        "Starting sync loop ({} locations, every {} minutes)",
        config.locations.len(),
        config.sync.interval_minutes
    );

    // The first tick fires immediately, so startup syncs right away
    let mut interval = tokio::time::interval(config.sync.interval());
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                if let Err(e) = controller.run_cycle().await {
                    warn!("sync cycle failed: {}", e);
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down");
                break;
            }
        }
    }

    Ok(())
}
