//! SQLite-backed [`DurableStore`].

use crate::domain::{StoreError, VoteRecord};
use crate::ports::DurableStore;
use crate::schema::MIGRATIONS;
use ff_02_schema_migrations::{Migration, MigrationReport, Migrator};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use shared_types::{CandidateId, CategoryId};
use std::path::Path;
use std::time::Duration;
use tracing::info;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Durable store over a single SQLite connection.
///
/// The connection sits behind a mutex so the store can be shared as
/// `Arc<dyn DurableStore>`; in practice only the dispatch actor calls it.
pub struct SqliteStore {
    conn: Mutex<Connection>,
    migration_report: MigrationReport,
}

impl SqliteStore {
    /// Open (creating if needed) and migrate the database at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        info!(path = %path.display(), "Opened SQLite store");
        Self::from_connection(conn, &MIGRATIONS)
    }

    /// Open and migrate a private in-memory database.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?, &MIGRATIONS)
    }

    fn from_connection(mut conn: Connection, known: &[Migration]) -> Result<Self, StoreError> {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        let migration_report = Migrator::new(known).run(&mut conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            migration_report,
        })
    }

    /// What the migration engine did while opening this store.
    pub fn migration_report(&self) -> &MigrationReport {
        &self.migration_report
    }
}

impl DurableStore for SqliteStore {
    fn get_integer(&self, name: &str) -> Result<Option<i64>, StoreError> {
        let conn = self.conn.lock();
        let value = conn
            .prepare_cached("SELECT value FROM state WHERE name = ?1")?
            .query_row(params![name], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    fn set_integer(&self, name: &str, value: i64) -> Result<(), StoreError> {
        let conn = self.conn.lock();
        conn.prepare_cached(
            "INSERT INTO state (name, value) VALUES (?1, ?2)
             ON CONFLICT(name) DO UPDATE SET value = excluded.value",
        )?
        .execute(params![name, value])?;
        Ok(())
    }

    fn record_vote(
        &self,
        voter_id: &str,
        category: CategoryId,
        candidate_id: CandidateId,
    ) -> Result<(), StoreError> {
        let conn = self.conn.lock();
        conn.prepare_cached(
            "INSERT INTO votes (voter_id, category, candidate_id) VALUES (?1, ?2, ?3)
             ON CONFLICT(voter_id, category) DO UPDATE SET candidate_id = excluded.candidate_id",
        )?
        .execute(params![voter_id, category, candidate_id])?;
        Ok(())
    }

    fn reset_votes(&self, category: CategoryId) -> Result<(), StoreError> {
        let conn = self.conn.lock();
        let deleted = conn
            .prepare_cached("DELETE FROM votes WHERE category = ?1")?
            .execute(params![category])?;
        info!(category, deleted, "Reset votes");
        Ok(())
    }

    fn list_votes(&self, category: CategoryId) -> Result<Vec<VoteRecord>, StoreError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare_cached(
            "SELECT voter_id, candidate_id FROM votes WHERE category = ?1 ORDER BY voter_id",
        )?;
        let rows = stmt.query_map(params![category], |row| {
            Ok(VoteRecord {
                voter_id: row.get(0)?,
                category,
                candidate_id: row.get(1)?,
            })
        })?;
        let votes = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(votes)
    }
}
