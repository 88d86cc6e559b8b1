//! Climate Pledge - pledge ingestion and aggregation service
//!
//! Collects pledges from the campaign form, keeps them in a pluggable store,
//! and serves the public pledge wall and campaign KPIs.
//!
//! ## Components
//!
//! - **Validator**: raw submission → canonical pledge, or a precise rejection
//! - **Store**: append-only persistence (MongoDB, memory, or local file)
//! - **Aggregator**: per-profile counts and progress toward the target
//! - **Server**: hyper HTTP front end

pub mod aggregate;
pub mod config;
pub mod db;
pub mod logging;
pub mod pledge;
pub mod routes;
pub mod server;
pub mod service;
pub mod store;
pub mod taxonomy;
pub mod types;
pub mod validator;

pub use config::Args;
pub use server::{run, AppState};
pub use service::PledgeService;
pub use types::{PledgeError, Result};

use std::sync::Arc;
use tracing::{error, warn};

use crate::config::StoreKind;
use crate::db::LazyCollection;
use crate::store::{LocalPledgeStore, MemoryPledgeStore, MongoPledgeStore, PledgeStore};

/// Build the store selected by `args`.
///
/// The Mongo store is warmed up with one connection attempt. On failure
/// dev mode falls back to memory; otherwise the store keeps its lazy
/// handle and retries on the first request.
pub async fn open_store(args: &Args) -> Result<Arc<dyn PledgeStore>> {
    match args.store {
        StoreKind::Memory => Ok(Arc::new(MemoryPledgeStore::new())),
        StoreKind::Local => Ok(Arc::new(LocalPledgeStore::open(&args.local_store_path)?)),
        StoreKind::Mongo => {
            let store = MongoPledgeStore::new(LazyCollection::new(
                &args.mongodb_uri,
                &args.mongodb_db,
                &args.pledge_collection,
            ));
            match store.connect().await {
                Ok(()) => Ok(Arc::new(store)),
                Err(e) if args.dev_mode => {
                    warn!("MongoDB connection failed (dev mode, using memory store): {}", e);
                    Ok(Arc::new(MemoryPledgeStore::new()))
                }
                Err(e) => {
                    error!("MongoDB connection failed, will retry on first request: {}", e);
                    Ok(Arc::new(store))
                }
            }
        }
    }
}
