//! paxcount-udf - UDF server for PAX counter payloads.
//!
//! Run with: `cargo run -p paxcount-udf`

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tower_http::trace::TraceLayer;
use tracing::info;

use paxcount_udf::{Config, PayloadDecoder, UdfRegistry, api};

/// UDF server exposing the PAX counter payload decoder.
#[derive(Parser, Debug)]
#[command(name = "paxcount-udf")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bind address (overrides config).
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("paxcount_udf=info".parse()?)
                .add_directive("tower_http=debug".parse()?),
        )
        .init();

    // Load configuration
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::load_default().unwrap_or_default(),
    };

    // Override config with CLI args
    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }
    config.validate()?;

    // Build the function table
    let mut registry = UdfRegistry::new();
    registry.register(Arc::new(PayloadDecoder));
    for name in registry.names() {
        info!("Registered UDF '{}'", name);
    }

    // Build the router
    let app = api::router()
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(registry));

    // Parse bind address
    let addr: SocketAddr = config.server.bind.parse()?;

    info!("Starting UDF server on {}", addr);

    // Run the server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
