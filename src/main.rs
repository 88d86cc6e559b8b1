//! Climate Pledge - pledge ingestion and aggregation service

use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};

use climate_pledge::{config::Args, logging, open_store, server, PledgeService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    logging::init(&args.log_level, args.log_format);

    if let Err(e) = args.validate() {
        error!("Configuration error: {}", e);
        std::process::exit(1);
    }
    let target = args.target().map_err(anyhow::Error::msg)?;

    info!("======================================");
    info!("  Climate Pledge Service");
    info!("======================================");
    info!("Node ID: {}", args.node_id);
    info!("Listen: {}", args.listen);
    info!("Mode: {}", if args.dev_mode { "DEVELOPMENT" } else { "PRODUCTION" });
    info!("Store: {:?}", args.store);
    info!("Pledge target: {}", target);
    info!("======================================");

    let store = open_store(&args).await?;
    let pledges = PledgeService::new(store, target);
    let state = Arc::new(server::AppState::new(args, pledges));

    server::run(state).await?;
    Ok(())
}
