//! # ff-01-durable-store
//!
//! Durable persistence for Firefly.
//!
//! ## Role in System
//!
//! - **Scalar state**: named integer variables (`category`, `voting`).
//! - **Vote records**: one row per `(voter, category)`, upserted on every
//!   cast and bulk-deleted on category reset.
//! - **Migrated on open**: `SqliteStore::open` runs the schema migrations
//!   before returning, so no caller can observe an unmigrated database.
//!
//! ## Failure Mode
//!
//! Every I/O error propagates to the caller. This layer never retries.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod schema;

pub use adapters::*;
pub use domain::*;
pub use ports::*;
pub use schema::MIGRATIONS;
