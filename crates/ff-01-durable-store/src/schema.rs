//! Compiled-in schema history.
//!
//! Append only. Editing an entry that has shipped rolls back every later
//! migration on the next start and discards the data those tables held.

use ff_02_schema_migrations::Migration;

pub const MIGRATIONS: [Migration; 3] = [
    Migration::new(
        "CREATE TABLE state (
            name  TEXT PRIMARY KEY,
            value INTEGER NOT NULL
        );",
        "DROP TABLE state;",
    ),
    Migration::new(
        "CREATE TABLE votes (
            voter_id     TEXT    NOT NULL,
            category     INTEGER NOT NULL,
            candidate_id INTEGER NOT NULL,
            PRIMARY KEY (voter_id, category)
        );",
        "DROP TABLE votes;",
    ),
    Migration::new(
        "CREATE INDEX idx_votes_category ON votes (category);",
        "DROP INDEX idx_votes_category;",
    ),
];
