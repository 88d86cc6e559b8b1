//! MongoDB-backed pledge store
//!
//! The shared store used in production. The connection is owned by the
//! store and established on first use.

use bson::doc;
use tracing::{debug, info, warn};

use super::{clamp_limit, PledgeStore};
use crate::db::schemas::{known_profile_filter, profile_type_filter, PledgeDoc, PublicPledgeDoc};
use crate::db::LazyCollection;
use crate::pledge::{CanonicalPledge, PledgeId, PublicPledgeView};
use crate::taxonomy::ProfileType;
use crate::types::Result;

/// Pledge store on a MongoDB collection
pub struct MongoPledgeStore {
    pledges: LazyCollection<PledgeDoc>,
}

impl MongoPledgeStore {
    /// Create a store over an (unconnected) collection handle
    pub fn new(pledges: LazyCollection<PledgeDoc>) -> Self {
        info!(
            "MongoPledgeStore configured for collection '{}' (connects on first use)",
            pledges.collection_name()
        );
        Self { pledges }
    }

    /// Connect now instead of on the first request
    pub async fn connect(&self) -> Result<()> {
        self.pledges.get().await.map(|_| ())
    }
}

#[async_trait::async_trait]
impl PledgeStore for MongoPledgeStore {
    fn backend(&self) -> &'static str {
        "mongo"
    }

    async fn is_ready(&self) -> bool {
        self.pledges.is_connected().await
    }

    async fn insert(&self, pledge: CanonicalPledge) -> Result<PledgeId> {
        let collection = self.pledges.get().await?;
        let oid = collection.insert_one(PledgeDoc::new(pledge)).await?;
        debug!(id = %oid, "Pledge inserted into MongoDB");
        Ok(PledgeId::from(oid))
    }

    async fn list(&self, limit: usize) -> Result<Vec<PublicPledgeView>> {
        let limit = clamp_limit(limit);
        // A zero limit means "no limit" to MongoDB
        if limit == 0 {
            return Ok(Vec::new());
        }

        let collection = self.pledges.get().await?;
        let docs: Vec<PublicPledgeDoc> = collection
            .find_projected(
                known_profile_filter(),
                PublicPledgeDoc::projection(),
                doc! { "createdAt": -1, "_id": -1 },
                limit as i64,
            )
            .await?;

        Ok(docs
            .into_iter()
            .filter_map(|doc| {
                let id = doc.id;
                let view = doc.into_view();
                if view.is_none() {
                    warn!(id = %id, "Skipping stored pledge with unknown profile type");
                }
                view
            })
            .collect())
    }

    async fn count_by_profile_type(&self, profile_type: ProfileType) -> Result<u64> {
        let collection = self.pledges.get().await?;
        collection.count(profile_type_filter(profile_type)).await
    }

    async fn total_count(&self) -> Result<u64> {
        let collection = self.pledges.get().await?;
        collection.count(doc! {}).await
    }
}
