use crate::domain::{StoreError, VoteRecord};
use crate::ports::DurableStore;
use parking_lot::Mutex;
use shared_types::{CandidateId, CategoryId};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

#[derive(Default)]
struct Tables {
    integers: HashMap<String, i64>,
    votes: BTreeMap<(CategoryId, String), CandidateId>,
}

/// In-memory implementation of DurableStore for testing.
///
/// Counts successful writes and can be switched to fail every write, which
/// lets callers check write-through and rollback-on-failure behaviour.
#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
    writes: AtomicU64,
    fail_writes: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of writes that reached the tables.
    pub fn writes(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }

    fn begin_write(&self) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("writes disabled".into()));
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

impl DurableStore for InMemoryStore {
    fn get_integer(&self, name: &str) -> Result<Option<i64>, StoreError> {
        Ok(self.tables.lock().integers.get(name).copied())
    }

    fn set_integer(&self, name: &str, value: i64) -> Result<(), StoreError> {
        self.begin_write()?;
        self.tables.lock().integers.insert(name.to_string(), value);
        Ok(())
    }

    fn record_vote(
        &self,
        voter_id: &str,
        category: CategoryId,
        candidate_id: CandidateId,
    ) -> Result<(), StoreError> {
        self.begin_write()?;
        self.tables
            .lock()
            .votes
            .insert((category, voter_id.to_string()), candidate_id);
        Ok(())
    }

    fn reset_votes(&self, category: CategoryId) -> Result<(), StoreError> {
        self.begin_write()?;
        self.tables
            .lock()
            .votes
            .retain(|(vote_category, _), _| *vote_category != category);
        Ok(())
    }

    fn list_votes(&self, category: CategoryId) -> Result<Vec<VoteRecord>, StoreError> {
        let tables = self.tables.lock();
        Ok(tables
            .votes
            .iter()
            .filter(|((vote_category, _), _)| *vote_category == category)
            .map(|((_, voter_id), candidate_id)| VoteRecord {
                voter_id: voter_id.clone(),
                category,
                candidate_id: *candidate_id,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_writes() {
        let store = InMemoryStore::new();
        store.set_integer("category", 1).unwrap();
        store.record_vote("u1", 1, 0).unwrap();
        assert_eq!(store.get_integer("category").unwrap(), Some(1));
        assert_eq!(store.writes(), 2);
    }

    #[test]
    fn test_failed_writes_change_nothing() {
        let store = InMemoryStore::new();
        store.record_vote("u1", 0, 1).unwrap();
        store.set_fail_writes(true);

        assert!(store.record_vote("u1", 0, 2).is_err());
        assert!(store.reset_votes(0).is_err());
        assert!(store.set_integer("voting", 1).is_err());

        assert_eq!(store.list_votes(0).unwrap()[0].candidate_id, 1);
        assert_eq!(store.get_integer("voting").unwrap(), None);
        assert_eq!(store.writes(), 1);
    }

    #[test]
    fn test_upsert_and_reset() {
        let store = InMemoryStore::new();
        store.record_vote("u1", 0, 2).unwrap();
        store.record_vote("u1", 0, 0).unwrap();
        store.record_vote("u2", 1, 0).unwrap();
        assert_eq!(store.list_votes(0).unwrap().len(), 1);

        store.reset_votes(0).unwrap();
        assert!(store.list_votes(0).unwrap().is_empty());
        assert_eq!(store.list_votes(1).unwrap().len(), 1);
    }
}
