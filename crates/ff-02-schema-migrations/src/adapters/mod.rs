//! Execution of migration plans against concrete databases.

pub mod sqlite;
