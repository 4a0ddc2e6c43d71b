use super::types::Direction;
use thiserror::Error;

/// Every variant is fatal to startup: the process must not run against a
/// partially migrated or partially rolled-back schema.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A single migration step failed; its transaction was rolled back.
    #[error("Migration {version} {direction} failed: {source}")]
    Step {
        version: usize,
        direction: Direction,
        #[source]
        source: rusqlite::Error,
    },

    /// The store records more than the code knows about.
    #[error("Schema version {found} is ahead of the {supported} migrations this build knows")]
    SchemaAhead { found: usize, supported: usize },

    /// History rows are not the contiguous sequence 0, 1, 2, ...
    #[error("Corrupt migration history: expected version {expected}, found {found}")]
    CorruptHistory { expected: usize, found: i64 },

    /// The version pointer disagrees with the history table.
    #[error("Version pointer {pointer} disagrees with {recorded} recorded migrations")]
    PointerMismatch { pointer: i64, recorded: usize },
}
