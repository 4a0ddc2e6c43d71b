use crate::domain::{StoreError, VoteRecord};
use shared_types::{CandidateId, CategoryId};

/// Durable store abstraction shared by application state and the tally.
///
/// Each mutating call is atomic on its own.
pub trait DurableStore: Send + Sync {
    /// Read a state variable; `None` if it was never written.
    fn get_integer(&self, name: &str) -> Result<Option<i64>, StoreError>;

    /// Create or overwrite a state variable.
    fn set_integer(&self, name: &str, value: i64) -> Result<(), StoreError>;

    /// Upsert the vote keyed by `(voter_id, category)`.
    fn record_vote(
        &self,
        voter_id: &str,
        category: CategoryId,
        candidate_id: CandidateId,
    ) -> Result<(), StoreError>;

    /// Delete every vote recorded for `category`.
    fn reset_votes(&self, category: CategoryId) -> Result<(), StoreError>;

    /// All votes recorded for `category`, ordered by voter id.
    fn list_votes(&self, category: CategoryId) -> Result<Vec<VoteRecord>, StoreError>;
}
