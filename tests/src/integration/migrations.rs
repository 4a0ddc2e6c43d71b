//! # Migration Divergence on a Live Database
//!
//! Runs edited migration lists against a database the store created and
//! filled, checking what survives.

#[cfg(test)]
mod tests {
    use ff_01_durable_store::{DurableStore, SqliteStore, StoreError, MIGRATIONS};
    use ff_02_schema_migrations::{Migration, MigrationError, MigrationReport, Migrator};
    use rusqlite::Connection;
    use std::path::{Path, PathBuf};

    fn seeded(dir: &tempfile::TempDir) -> PathBuf {
        let path = dir.path().join("live.sqlite3");
        let store = SqliteStore::open(&path).unwrap();
        store.set_integer("category", 4).unwrap();
        store.record_vote("u1", 4, 2).unwrap();
        store.record_vote("u2", 4, 0).unwrap();
        path
    }

    fn run(path: &Path, known: &[Migration]) -> Result<MigrationReport, MigrationError> {
        let mut conn = Connection::open(path).unwrap();
        Migrator::new(known).run(&mut conn)
    }

    #[test]
    fn test_rerun_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let path = seeded(&dir);

        let report = run(&path, &MIGRATIONS).unwrap();
        assert!(report.is_noop());
    }

    #[test]
    fn test_edited_index_migration_keeps_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = seeded(&dir);

        let mut edited = MIGRATIONS;
        edited[2] = Migration::new(
            "CREATE INDEX idx_votes_category ON votes (category, candidate_id);",
            "DROP INDEX idx_votes_category;",
        );
        let report = run(&path, &edited).unwrap();
        assert_eq!(report.rolled_back, vec![2]);
        assert_eq!(report.applied, vec![2]);

        // Only the index was rebuilt; votes are intact.
        let mut conn = Connection::open(&path).unwrap();
        let report = Migrator::new(&edited).run(&mut conn).unwrap();
        assert!(report.is_noop());
        let votes: i64 = conn
            .query_row("SELECT COUNT(*) FROM votes", [], |row| row.get(0))
            .unwrap();
        assert_eq!(votes, 2);
    }

    #[test]
    fn test_edited_votes_migration_discards_votes_but_keeps_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = seeded(&dir);

        let mut edited = MIGRATIONS;
        edited[1] = Migration::new(
            "CREATE TABLE votes (
                voter_id     TEXT    NOT NULL,
                category     INTEGER NOT NULL,
                candidate_id INTEGER NOT NULL,
                cast_at      INTEGER NOT NULL DEFAULT 0,
                PRIMARY KEY (voter_id, category)
            );",
            "DROP TABLE votes;",
        );
        let report = run(&path, &edited).unwrap();
        assert_eq!(report.rolled_back, vec![2, 1]);
        assert_eq!(report.applied, vec![1, 2]);

        let conn = Connection::open(&path).unwrap();
        let votes: i64 = conn
            .query_row("SELECT COUNT(*) FROM votes", [], |row| row.get(0))
            .unwrap();
        assert_eq!(votes, 0);
        let category: i64 = conn
            .query_row("SELECT value FROM state WHERE name = 'category'", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(category, 4);

        // Going back to the shipped list rolls the edit back again.
        let report = run(&path, &MIGRATIONS).unwrap();
        assert_eq!(report.rolled_back, vec![2, 1]);
        assert!(SqliteStore::open(&path).unwrap().migration_report().is_noop());
    }

    #[test]
    fn test_store_refuses_database_from_newer_code() {
        let dir = tempfile::tempdir().unwrap();
        let path = seeded(&dir);

        let mut newer = MIGRATIONS.to_vec();
        newer.push(Migration::new(
            "CREATE TABLE audit (line TEXT);",
            "DROP TABLE audit;",
        ));
        run(&path, &newer).unwrap();

        match SqliteStore::open(&path) {
            Err(StoreError::Migration(MigrationError::SchemaAhead { found, supported })) => {
                assert_eq!((found, supported), (4, 3));
            }
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("opened a database from newer code"),
        }
    }

    #[test]
    fn test_store_refuses_pointer_without_history() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("legacy.sqlite3");
        {
            let conn = Connection::open(&path).unwrap();
            conn.execute_batch(
                "CREATE TABLE state (name TEXT PRIMARY KEY, value INTEGER);
                 PRAGMA user_version = 2;",
            )
            .unwrap();
        }

        assert!(matches!(
            SqliteStore::open(&path),
            Err(StoreError::Migration(MigrationError::PointerMismatch {
                pointer: 2,
                recorded: 0
            }))
        ));
    }
}
