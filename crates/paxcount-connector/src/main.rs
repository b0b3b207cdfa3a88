//! paxcount-connector - TTN uplink ingest.
//!
//! Run with: `cargo run -p paxcount-connector`

use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use paxcount_connector::{Config, ingest};
use paxcount_store::Store;

/// TTN MQTT connector that persists PAX counter uplinks.
#[derive(Parser, Debug)]
#[command(name = "paxcount-connector")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// MQTT broker URL (overrides config).
    #[arg(short, long)]
    broker: Option<String>,

    /// Database path (overrides config).
    #[arg(short, long)]
    database: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("paxcount_connector=info".parse()?),
        )
        .init();

    // Load configuration
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::load_default().unwrap_or_default(),
    };

    // Override config with CLI args
    if let Some(broker) = args.broker {
        config.mqtt.broker = broker;
    }
    if let Some(db_path) = args.database {
        config.storage.path = db_path;
    }
    config.validate()?;

    // Open the database
    info!("Opening database at {:?}", config.storage.path);
    let store = Store::open(&config.storage.path)?;

    // Run the ingest loop
    ingest::run(config, store).await
}
