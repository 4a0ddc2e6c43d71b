//! # Restart Persistence
//!
//! Everything the dispatcher accepted must be visible after the store is
//! closed and reopened: the active category, the voting flag and every
//! tally.

#[cfg(test)]
mod tests {
    use ff_01_durable_store::{DurableStore, SqliteStore};
    use ff_03_vote_tally::TallyEngine;
    use ff_04_app_state::AppState;
    use std::path::Path;
    use std::sync::Arc;

    fn open(path: &Path) -> Arc<SqliteStore> {
        Arc::new(SqliteStore::open(path).unwrap())
    }

    #[test]
    fn test_state_and_tallies_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("restart.sqlite3");

        let expected = {
            let store = open(&path);
            let mut state = AppState::load(store.clone()).unwrap();
            let mut tally = TallyEngine::new(store.clone());

            state.set_category(2).unwrap();
            state.set_voting(true).unwrap();
            tally.cast_vote(2, "u1", 3).unwrap();
            tally.cast_vote(2, "u2", 1).unwrap();
            tally.cast_vote(2, "u1", 1).unwrap();
            tally.cast_vote(0, "u3", 0).unwrap();
            tally.get_tally(2).unwrap().clone()
        };

        let store = open(&path);
        assert!(store.migration_report().is_noop());

        let state = AppState::load(store.clone()).unwrap();
        assert_eq!(state.category(), 2);
        assert!(state.voting());

        let mut tally = TallyEngine::new(store);
        let reloaded = tally.get_tally(2).unwrap();
        assert_eq!(*reloaded, expected);
        assert_eq!(reloaded.dense_counts(), vec![0, 2]);
        assert_eq!(tally.get_tally(0).unwrap().dense_counts(), vec![1]);
    }

    #[test]
    fn test_reset_is_durable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reset.sqlite3");
        {
            let store = open(&path);
            let mut tally = TallyEngine::new(store.clone());
            tally.cast_vote(0, "u1", 1).unwrap();
            tally.cast_vote(1, "u1", 1).unwrap();
            tally.reset_category(0).unwrap();
        }

        let store = open(&path);
        assert!(store.list_votes(0).unwrap().is_empty());
        assert_eq!(store.list_votes(1).unwrap().len(), 1);
    }

    #[test]
    fn test_falsy_category_is_stored_as_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("falsy.sqlite3");
        {
            let mut state = AppState::load(open(&path)).unwrap();
            state.set_category(5).unwrap();
            state.set_category(0).unwrap();
        }

        let store = open(&path);
        assert_eq!(store.get_integer("category").unwrap(), Some(0));
        assert_eq!(AppState::load(store).unwrap().category(), 0);
    }
}
