//! Pledge seeder
//!
//! Inserts the campaign's demonstration pledges into the configured store.
//! Runs every record through the validator, so seeded data obeys the same
//! rules as live submissions. Existing records are left untouched.

use clap::Parser;
use serde_json::{json, Value};
use tracing::{error, info};

use climate_pledge::{config::Args, logging, open_store, PledgeService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let args = Args::parse();
    logging::init(&args.log_level, args.log_format);

    if let Err(e) = args.validate() {
        error!("Configuration error: {}", e);
        std::process::exit(1);
    }
    let target = args.target().map_err(anyhow::Error::msg)?;

    let store = open_store(&args).await?;
    let pledges = PledgeService::new(store, target);

    let demo = [
        json!({
            "name": "Janice Fernandes",
            "email": "janice@example.com",
            "mobile": "1234567890",
            "state": "Maharashtra",
            "profileType": "Working Professional",
            "commitments": ["Energy", "Transportation"]
        }),
        json!({
            "name": "Amit Singh",
            "email": "amit@example.com",
            "mobile": "8765432109",
            "state": "Uttar Pradesh",
            "profileType": "Student",
            "commitments": ["Transportation"]
        }),
        json!({
            "name": "Diya Gupta",
            "email": "diya@example.com",
            "mobile": "7654321098",
            "state": "Karnataka",
            "profileType": "Workshops",
            "commitments": ["Energy", "Transportation", "Consumption"]
        }),
    ];

    for raw in &demo {
        let id = pledges.submit(raw).await?;
        info!(id = %id, "Seeded pledge for {}", pledge_name(raw));
    }

    let total = pledges.store().total_count().await?;
    info!(
        "Inserted {} demo pledges ({} total in {} store)",
        demo.len(),
        total,
        pledges.store().backend()
    );
    Ok(())
}

/// Submitted name as plain text for log lines
fn pledge_name(raw: &Value) -> &str {
    raw["name"].as_str().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pledge_name_is_unquoted() {
        let raw = json!({ "name": "Amit Singh" });
        assert_eq!(pledge_name(&raw), "Amit Singh");
        assert_eq!(
            format!("Seeded pledge for {}", pledge_name(&raw)),
            "Seeded pledge for Amit Singh"
        );
        assert_eq!(pledge_name(&json!({})), "");
    }
}
