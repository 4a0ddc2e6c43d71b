//! # SQLite Migration Runner
//!
//! Executes a [`MigrationPlan`](crate::MigrationPlan) against a `rusqlite`
//! connection. History lives in [`HISTORY_TABLE`]; the version pointer is
//! `PRAGMA user_version` and holds the number of applied migrations, not
//! the index of the last one: applying `i` sets it to `i + 1` and rolling
//! back `i` sets it to `i`, so 0 always means an empty history.
//!
//! Every rollback and every apply runs in its own transaction that also
//! updates the history row and the pointer, so a crash leaves the database
//! at a step boundary, never between a schema change and its bookkeeping.

use crate::domain::{
    plan, AppliedMigration, Direction, Migration, MigrationError, MigrationReport,
};
use rusqlite::{params, Connection};
use tracing::{debug, info};

/// Engine-owned table recording what was applied, version by version.
pub const HISTORY_TABLE: &str = "schema_migrations";

const CREATE_HISTORY: &str = "
CREATE TABLE IF NOT EXISTS schema_migrations (
    version INTEGER PRIMARY KEY,
    up      TEXT NOT NULL,
    down    TEXT NOT NULL
);
";

/// Runs the compiled-in migration list against a database.
pub struct Migrator<'a> {
    known: &'a [Migration],
}

impl<'a> Migrator<'a> {
    pub fn new(known: &'a [Migration]) -> Self {
        Self { known }
    }

    /// Bring `conn` to exactly the known list.
    ///
    /// Any error is fatal: the caller must abort startup.
    pub fn run(&self, conn: &mut Connection) -> Result<MigrationReport, MigrationError> {
        conn.execute_batch(CREATE_HISTORY)?;

        let applied = read_history(conn)?;
        let pointer = read_pointer(conn)?;
        if pointer != applied.len() as i64 {
            return Err(MigrationError::PointerMismatch {
                pointer,
                recorded: applied.len(),
            });
        }

        let plan = plan(&applied, self.known)?;
        debug!(
            divergence = plan.divergence,
            recorded = applied.len(),
            known = self.known.len(),
            "Migration plan computed"
        );

        let mut report = MigrationReport::default();

        if !plan.repairs.is_empty() {
            let tx = conn.transaction()?;
            for &version in &plan.repairs {
                tx.execute(
                    "UPDATE schema_migrations SET down = ?2 WHERE version = ?1",
                    params![version as i64, self.known[version].down],
                )?;
                info!(version, "Repaired stored down migration");
            }
            tx.commit()?;
            report.repaired = plan.repairs.clone();
        }

        for &version in &plan.rollbacks {
            let record = &applied[version];
            let tx = conn.transaction()?;
            tx.execute_batch(&record.down)
                .map_err(|source| MigrationError::Step {
                    version,
                    direction: Direction::Down,
                    source,
                })?;
            tx.execute(
                "DELETE FROM schema_migrations WHERE version = ?1",
                params![version as i64],
            )?;
            tx.pragma_update(None, "user_version", version as i64)?;
            tx.commit()?;
            info!(version, "Rolled back migration");
            report.rolled_back.push(version);
        }

        for &version in &plan.applies {
            let migration = &self.known[version];
            let tx = conn.transaction()?;
            tx.execute_batch(migration.up)
                .map_err(|source| MigrationError::Step {
                    version,
                    direction: Direction::Up,
                    source,
                })?;
            tx.execute(
                "INSERT INTO schema_migrations (version, up, down) VALUES (?1, ?2, ?3)",
                params![version as i64, migration.up, migration.down],
            )?;
            tx.pragma_update(None, "user_version", version as i64 + 1)?;
            tx.commit()?;
            info!(version, "Applied migration");
            report.applied.push(version);
        }

        if report.is_noop() {
            info!(version = self.known.len(), "Schema is current, migration finished");
        }

        Ok(report)
    }
}

fn read_history(conn: &Connection) -> Result<Vec<AppliedMigration>, MigrationError> {
    let mut stmt = conn.prepare("SELECT version, up, down FROM schema_migrations ORDER BY version")?;
    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, i64>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
        ))
    })?;

    let mut history = Vec::new();
    for row in rows {
        let (version, up, down) = row?;
        let expected = history.len();
        if version != expected as i64 {
            return Err(MigrationError::CorruptHistory {
                expected,
                found: version,
            });
        }
        history.push(AppliedMigration {
            version: expected,
            up,
            down,
        });
    }
    Ok(history)
}

fn read_pointer(conn: &Connection) -> Result<i64, MigrationError> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}
