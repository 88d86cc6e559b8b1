//! Aggregate statistics over stored pledges
//!
//! Drives the campaign KPIs: total pledges, per-profile counts, and
//! progress toward the pledge target.

use serde::Serialize;
use std::collections::BTreeMap;
use std::num::NonZeroU64;
use std::sync::Arc;

use crate::store::PledgeStore;
use crate::taxonomy::{ProfileType, TAXONOMY_VERSION};
use crate::types::Result;

/// Default campaign target
pub const DEFAULT_TARGET: u64 = 1_000_000;

/// `min(1, total / target)`
pub fn progress_ratio(total: u64, target: NonZeroU64) -> f64 {
    (total as f64 / target.get() as f64).min(1.0)
}

/// KPI summary for the campaign page
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PledgeStats {
    pub target: u64,
    pub total: u64,
    pub progress_ratio: f64,
    /// Ratio as a percentage, one decimal place
    pub progress_percent: f64,
    pub by_profile_type: BTreeMap<&'static str, u64>,
    pub taxonomy_version: &'static str,
}

/// Computes derived statistics from a pledge store
#[derive(Clone)]
pub struct Aggregator {
    store: Arc<dyn PledgeStore>,
    target: NonZeroU64,
}

impl Aggregator {
    pub fn new(store: Arc<dyn PledgeStore>, target: NonZeroU64) -> Self {
        Self { store, target }
    }

    pub fn target(&self) -> NonZeroU64 {
        self.target
    }

    /// Count by a raw label. Labels outside the taxonomy count zero.
    pub async fn count_by_label(&self, label: &str) -> Result<u64> {
        match ProfileType::from_label(label) {
            Some(profile_type) => self.store.count_by_profile_type(profile_type).await,
            None => Ok(0),
        }
    }

    /// Progress toward the target in `[0, 1]`
    pub async fn progress(&self) -> Result<f64> {
        let total = self.store.total_count().await?;
        Ok(progress_ratio(total, self.target))
    }

    /// Full KPI summary
    pub async fn summary(&self) -> Result<PledgeStats> {
        let total = self.store.total_count().await?;

        let mut by_profile_type = BTreeMap::new();
        for profile_type in ProfileType::ALL {
            let count = self.store.count_by_profile_type(profile_type).await?;
            by_profile_type.insert(profile_type.label(), count);
        }

        let ratio = progress_ratio(total, self.target);
        Ok(PledgeStats {
            target: self.target.get(),
            total,
            progress_ratio: ratio,
            progress_percent: (ratio * 1000.0).round() / 10.0,
            by_profile_type,
            taxonomy_version: TAXONOMY_VERSION,
        })
    }
}
