//! # Tally Engine
//!
//! Owns the per-category tally cache and keeps it in step with the durable
//! vote records.

use crate::domain::{CategoryTally, TallyError};
use ff_01_durable_store::DurableStore;
use shared_types::{CandidateId, CategoryId};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Result of an accepted vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteChange {
    /// The voter's candidate before this vote, if they had voted.
    pub previous: Option<CandidateId>,
    pub current: CandidateId,
}

/// Tally cache over a [`DurableStore`].
///
/// Not internally synchronized: a single owner (the dispatch actor) drives it.
pub struct TallyEngine {
    store: Arc<dyn DurableStore>,
    cache: HashMap<CategoryId, CategoryTally>,
}

impl TallyEngine {
    pub fn new(store: Arc<dyn DurableStore>) -> Self {
        Self {
            store,
            cache: HashMap::new(),
        }
    }

    /// The tally for `category`, loading it from the store on first access.
    pub fn get_tally(&mut self, category: CategoryId) -> Result<&CategoryTally, TallyError> {
        self.tally_mut(category).map(|tally| &*tally)
    }

    /// Record `voter_id`'s choice of `candidate_id` in `category`.
    ///
    /// The cached tally and the store agree when this returns, on success and
    /// on failure alike.
    pub fn cast_vote(
        &mut self,
        category: CategoryId,
        voter_id: &str,
        candidate_id: CandidateId,
    ) -> Result<VoteChange, TallyError> {
        let store = Arc::clone(&self.store);
        let tally = self.tally_mut(category)?;

        let undo = tally.apply(voter_id, candidate_id);
        let previous = undo.previous_choice();
        if let Err(e) = store.record_vote(voter_id, category, candidate_id) {
            tally.revert(undo);
            error!(category, voter_id = %voter_id, error = %e, "Failed to persist vote");
            return Err(e.into());
        }

        debug!(category, voter_id = %voter_id, candidate = candidate_id, ?previous, "Vote recorded");
        Ok(VoteChange {
            previous,
            current: candidate_id,
        })
    }

    /// Delete every vote in `category` and rebuild its tally from the store.
    ///
    /// On failure the cache entry is dropped, so the next access reloads
    /// whatever the store still holds.
    pub fn reset_category(&mut self, category: CategoryId) -> Result<&CategoryTally, TallyError> {
        self.cache.insert(category, CategoryTally::empty(category));
        if let Err(e) = self.store.reset_votes(category) {
            self.cache.remove(&category);
            return Err(e.into());
        }
        let rebuilt = match self.rebuild(category) {
            Ok(tally) => tally,
            Err(e) => {
                self.cache.remove(&category);
                return Err(e);
            }
        };
        info!(category, voters = rebuilt.voter_count(), "Category reset");
        self.cache.insert(category, rebuilt);
        self.get_tally(category)
    }

    /// Build a fresh tally for `category` from the store, bypassing the cache.
    pub fn rebuild(&self, category: CategoryId) -> Result<CategoryTally, TallyError> {
        load(self.store.as_ref(), category)
    }

    /// Drop the cached tally for `category`.
    pub fn invalidate(&mut self, category: CategoryId) {
        self.cache.remove(&category);
    }

    pub fn is_cached(&self, category: CategoryId) -> bool {
        self.cache.contains_key(&category)
    }

    fn tally_mut(&mut self, category: CategoryId) -> Result<&mut CategoryTally, TallyError> {
        match self.cache.entry(category) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let tally = load(self.store.as_ref(), category)?;
                debug!(category, voters = tally.voter_count(), "Tally loaded");
                Ok(entry.insert(tally))
            }
        }
    }
}

fn load(store: &dyn DurableStore, category: CategoryId) -> Result<CategoryTally, TallyError> {
    let records = store.list_votes(category)?;
    Ok(CategoryTally::from_records(category, &records))
}
