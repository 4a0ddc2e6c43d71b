use shared_types::{CandidateId, CategoryId};

/// Name of the state variable holding the active category.
pub const CATEGORY_KEY: &str = "category";

/// Name of the state variable holding the open/closed flag (0 or 1).
pub const VOTING_KEY: &str = "voting";

/// A durable vote: `(voter_id, category) -> candidate_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteRecord {
    pub voter_id: String,
    pub category: CategoryId,
    pub candidate_id: CandidateId,
}
