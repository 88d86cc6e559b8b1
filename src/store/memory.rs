//! In-memory pledge store
//!
//! Holds records in a process-local vector. Used in dev mode when MongoDB
//! is unavailable, and as the backing table for [`super::LocalPledgeStore`].

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::{clamp_limit, PledgeStore};
use crate::pledge::{CanonicalPledge, PledgeId, PublicPledgeView, StoredPledge};
use crate::taxonomy::ProfileType;
use crate::types::Result;

/// Process-local pledge store
pub struct MemoryPledgeStore {
    records: RwLock<Vec<StoredPledge>>,
}

impl MemoryPledgeStore {
    pub fn new() -> Self {
        warn!("MemoryPledgeStore running in memory-only mode (pledges are lost on restart)");
        Self::from_records(Vec::new())
    }

    /// Start from previously stored records (insertion order)
    pub fn from_records(records: Vec<StoredPledge>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    /// Append an already stamped record
    pub(crate) async fn push(&self, stored: StoredPledge) {
        self.records.write().await.push(stored);
    }
}

impl Default for MemoryPledgeStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Newest-first public views of `records`.
///
/// Later insertions win ties on `created_at`.
pub(crate) fn newest_first(records: &[StoredPledge], limit: usize) -> Vec<PublicPledgeView> {
    let mut ordered: Vec<&StoredPledge> = records.iter().rev().collect();
    // Stable sort keeps reverse insertion order among equal timestamps
    ordered.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    ordered
        .into_iter()
        .take(clamp_limit(limit))
        .map(StoredPledge::to_public)
        .collect()
}

#[async_trait::async_trait]
impl PledgeStore for MemoryPledgeStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn insert(&self, pledge: CanonicalPledge) -> Result<PledgeId> {
        let id = PledgeId::generate();
        {
            // Stamp under the write lock so insertion order matches created_at
            let mut records = self.records.write().await;
            records.push(StoredPledge::new(id.clone(), pledge, Utc::now()));
        }
        debug!(id = %id, "Pledge stored in memory");
        Ok(id)
    }

    async fn list(&self, limit: usize) -> Result<Vec<PublicPledgeView>> {
        let records = self.records.read().await;
        Ok(newest_first(&records, limit))
    }

    async fn count_by_profile_type(&self, profile_type: ProfileType) -> Result<u64> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|r| r.pledge.profile_type == profile_type)
            .count() as u64)
    }

    async fn total_count(&self) -> Result<u64> {
        Ok(self.records.read().await.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::Commitment;
    use chrono::Duration;

    fn pledge(name: &str, profile_type: ProfileType) -> CanonicalPledge {
        CanonicalPledge {
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            mobile: "1234567890".to_string(),
            state: "Maharashtra".to_string(),
            profile_type,
            commitments: vec![Commitment::Energy],
            message: String::new(),
        }
    }

    #[tokio::test]
    async fn test_insert_then_list_newest_first() {
        let store = MemoryPledgeStore::new();
        let a = store.insert(pledge("A", ProfileType::Student)).await.unwrap();
        let b = store.insert(pledge("B", ProfileType::Other)).await.unwrap();

        let listed = store.list(10).await.unwrap();
        let ids: Vec<_> = listed.iter().map(|v| v.id.clone()).collect();
        assert_eq!(ids, vec![b, a]);
    }

    #[tokio::test]
    async fn test_list_respects_limit_and_ceiling() {
        let store = MemoryPledgeStore::new();
        for i in 0..205 {
            store
                .insert(pledge(&format!("P{}", i), ProfileType::Student))
                .await
                .unwrap();
        }

        assert_eq!(store.list(3).await.unwrap().len(), 3);
        assert_eq!(store.list(0).await.unwrap().len(), 0);
        assert_eq!(store.list(1_000).await.unwrap().len(), 200);
        assert_eq!(store.total_count().await.unwrap(), 205);
    }

    #[tokio::test]
    async fn test_counts_by_profile_type() {
        let store = MemoryPledgeStore::new();
        store.insert(pledge("A", ProfileType::Student)).await.unwrap();
        store.insert(pledge("B", ProfileType::Student)).await.unwrap();
        store
            .insert(pledge("C", ProfileType::WorkingProfessional))
            .await
            .unwrap();

        assert_eq!(store.count_by_profile_type(ProfileType::Student).await.unwrap(), 2);
        assert_eq!(
            store
                .count_by_profile_type(ProfileType::WorkingProfessional)
                .await
                .unwrap(),
            1
        );
        assert_eq!(store.count_by_profile_type(ProfileType::Other).await.unwrap(), 0);
    }

    #[test]
    fn test_newest_first_orders_by_timestamp() {
        let now = Utc::now();
        let older = StoredPledge::new(
            PledgeId::generate(),
            pledge("Old", ProfileType::Other),
            now - Duration::days(1),
        );
        let newer = StoredPledge::new(PledgeId::generate(), pledge("New", ProfileType::Other), now);

        // Inserted out of timestamp order
        let views = newest_first(&[newer.clone(), older.clone()], 10);
        assert_eq!(views[0].id, newer.id);
        assert_eq!(views[1].id, older.id);
    }
}
