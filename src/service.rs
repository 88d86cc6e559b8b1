//! Pledge service
//!
//! Ties the validator, the store and the aggregator together. Validation
//! always completes before the store is touched.

use serde_json::Value;
use std::num::NonZeroU64;
use std::sync::Arc;
use tracing::{info, warn};

use crate::aggregate::Aggregator;
use crate::pledge::{PledgeId, PublicPledgeView};
use crate::store::PledgeStore;
use crate::types::Result;
use crate::validator;

#[derive(Clone)]
pub struct PledgeService {
    store: Arc<dyn PledgeStore>,
    aggregator: Aggregator,
}

impl PledgeService {
    pub fn new(store: Arc<dyn PledgeStore>, target: NonZeroU64) -> Self {
        let aggregator = Aggregator::new(Arc::clone(&store), target);
        Self { store, aggregator }
    }

    /// Validate a raw submission and store it
    pub async fn submit(&self, raw: &Value) -> Result<PledgeId> {
        let pledge = match validator::validate(raw) {
            Ok(p) => p,
            Err(e) => {
                warn!(error = %e, "Pledge rejected");
                return Err(e);
            }
        };

        let profile_type = pledge.profile_type;
        let commitments = pledge.commitments.len();
        let id = self.store.insert(pledge).await?;

        info!(
            id = %id,
            profile_type = %profile_type,
            commitments,
            backend = self.store.backend(),
            "Pledge accepted"
        );
        Ok(id)
    }

    /// Public pledge wall, newest first
    pub async fn list(&self, limit: usize) -> Result<Vec<PublicPledgeView>> {
        self.store.list(limit).await
    }

    pub fn store(&self) -> &Arc<dyn PledgeStore> {
        &self.store
    }

    pub fn aggregator(&self) -> &Aggregator {
        &self.aggregator
    }
}
