//! Configuration for the pledge service
//!
//! CLI arguments and environment variable handling using clap.

use clap::{Parser, ValueEnum};
use std::net::SocketAddr;
use std::num::NonZeroU64;
use std::path::PathBuf;
use uuid::Uuid;

use crate::aggregate::DEFAULT_TARGET;
use crate::db::schemas::PLEDGE_COLLECTION;
use crate::store::{DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};

/// Which persistence backend to run against
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    /// Shared MongoDB collection
    Mongo,
    /// Process memory (lost on restart)
    Memory,
    /// JSON-lines file on local disk
    Local,
}

/// Log output format
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Climate pledge service
#[derive(Parser, Debug, Clone)]
#[command(name = "climate-pledge")]
#[command(about = "Collects climate pledges and serves the public pledge wall")]
pub struct Args {
    /// Unique node identifier for this instance
    #[arg(long, env = "NODE_ID", default_value_t = Uuid::new_v4())]
    pub node_id: Uuid,

    /// Address to listen on
    #[arg(long, env = "LISTEN", default_value = "0.0.0.0:8080")]
    pub listen: SocketAddr,

    /// Persistence backend
    #[arg(long, env = "STORE", value_enum, default_value = "mongo")]
    pub store: StoreKind,

    /// MongoDB connection URI
    #[arg(long, env = "MONGODB_URI", default_value = "mongodb://localhost:27017")]
    pub mongodb_uri: String,

    /// MongoDB database name
    #[arg(long, env = "MONGODB_DB", default_value = "climate_action")]
    pub mongodb_db: String,

    /// MongoDB collection holding pledges
    #[arg(long, env = "PLEDGE_COLLECTION", default_value = PLEDGE_COLLECTION)]
    pub pledge_collection: String,

    /// File used by the local store
    #[arg(long, env = "LOCAL_STORE_PATH", default_value = "pledges.jsonl")]
    pub local_store_path: PathBuf,

    /// Campaign pledge target (must be greater than zero)
    #[arg(long, env = "PLEDGE_TARGET", default_value_t = DEFAULT_TARGET)]
    pub pledge_target: u64,

    /// Listing size when the caller gives none
    #[arg(long, env = "LIST_DEFAULT_LIMIT", default_value_t = DEFAULT_LIST_LIMIT)]
    pub list_default_limit: usize,

    /// Enable development mode (memory fallback, error detail in responses)
    #[arg(long, env = "DEV_MODE", default_value = "false")]
    pub dev_mode: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Log output format
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value = "pretty")]
    pub log_format: LogFormat,
}

impl Args {
    /// Pledge target, validated non-zero
    pub fn target(&self) -> Result<NonZeroU64, String> {
        NonZeroU64::new(self.pledge_target)
            .ok_or_else(|| "PLEDGE_TARGET must be greater than zero".to_string())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        self.target()?;

        if self.list_default_limit == 0 || self.list_default_limit > MAX_LIST_LIMIT {
            return Err(format!(
                "LIST_DEFAULT_LIMIT must be between 1 and {}",
                MAX_LIST_LIMIT
            ));
        }

        if self.store == StoreKind::Mongo && self.mongodb_uri.trim().is_empty() {
            return Err("MONGODB_URI is required for the mongo store".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(extra: &[&str]) -> Args {
        let mut argv = vec!["climate-pledge"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults_are_valid() {
        let args = parse(&[]);
        assert_eq!(args.pledge_target, 1_000_000);
        assert_eq!(args.list_default_limit, 50);
        assert_eq!(args.mongodb_db, "climate_action");
        assert_eq!(args.pledge_collection, "pledges");
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_zero_target_rejected() {
        let args = parse(&["--pledge-target", "0"]);
        assert!(args.validate().is_err());
        assert!(args.target().is_err());
    }

    #[test]
    fn test_default_limit_bounds() {
        assert!(parse(&["--list-default-limit", "0"]).validate().is_err());
        assert!(parse(&["--list-default-limit", "201"]).validate().is_err());
        assert!(parse(&["--list-default-limit", "200"]).validate().is_ok());
    }

    #[test]
    fn test_store_kind_parsing() {
        assert_eq!(parse(&["--store", "local"]).store, StoreKind::Local);
        assert_eq!(parse(&["--store", "memory"]).store, StoreKind::Memory);
    }
}
