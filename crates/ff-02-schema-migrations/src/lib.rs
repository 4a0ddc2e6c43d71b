//! # ff-02-schema-migrations
//!
//! Brings a SQLite database to the schema the running code expects.
//!
//! ## Role in System
//!
//! - **Runs once, first**: called by the durable store before the handle is
//!   returned, so nothing can touch an unmigrated database.
//! - **Code always wins**: the compiled-in migration list is authoritative.
//!   If a historical migration's `up` text was edited, every migration from
//!   the edit point onward is rolled back with its *stored* `down` text and
//!   reapplied from the code.
//!
//! ## DANGER
//!
//! Rollback is destructive. Editing migration `i` in code drops whatever
//! migrations `i..` created (tables and their rows) the next time the
//! process starts. This is deliberate: schema/code consistency is traded
//! for data loss.
//!
//! ```text
//!   applied:  [A0] [A1] [A2]          known: [A0] [B1] [B2] [B3]
//!                   ^ divergence d = 1
//!   rollback: down(A2), down(A1)      apply: up(B1), up(B2), up(B3)
//! ```

pub mod adapters;
pub mod domain;

pub use adapters::sqlite::{Migrator, HISTORY_TABLE};
pub use domain::*;
