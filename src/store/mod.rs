//! Pledge persistence
//!
//! [`PledgeStore`] is the capability the rest of the service depends on.
//! Backends:
//! - [`MongoPledgeStore`]: shared document store (production)
//! - [`MemoryPledgeStore`]: process-local, for development and tests
//! - [`LocalPledgeStore`]: JSON-lines file on local disk
//!
//! Records are append-only: the trait has no update or delete.

pub mod local;
pub mod memory;
pub mod mongo;

pub use local::LocalPledgeStore;
pub use memory::MemoryPledgeStore;
pub use mongo::MongoPledgeStore;

use crate::pledge::{CanonicalPledge, PledgeId, PublicPledgeView};
use crate::taxonomy::ProfileType;
use crate::types::Result;

/// Upper bound on records returned by a single listing
pub const MAX_LIST_LIMIT: usize = 200;

/// Default number of records returned when no limit is given
pub const DEFAULT_LIST_LIMIT: usize = 50;

/// Clamp a requested listing size to [`MAX_LIST_LIMIT`]
pub fn clamp_limit(limit: usize) -> usize {
    limit.min(MAX_LIST_LIMIT)
}

/// Trait for pledge persistence - allows swapping backends
/// (shared MongoDB in production, memory or local file elsewhere)
#[async_trait::async_trait]
pub trait PledgeStore: Send + Sync {
    /// Short backend name for logs and health output
    fn backend(&self) -> &'static str;

    /// Whether the backend is reachable without further setup
    async fn is_ready(&self) -> bool {
        true
    }

    /// Append a pledge, assigning its identity and creation time
    async fn insert(&self, pledge: CanonicalPledge) -> Result<PledgeId>;

    /// Newest-first public views, at most `clamp_limit(limit)` of them
    async fn list(&self, limit: usize) -> Result<Vec<PublicPledgeView>>;

    /// Number of stored pledges with the given profile type
    async fn count_by_profile_type(&self, profile_type: ProfileType) -> Result<u64>;

    /// Total number of stored pledges
    async fn total_count(&self) -> Result<u64>;
}
