//! # Firefly Test Suite
//!
//! Cross-crate flows that no single crate can test on its own.
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── flows.rs       # Dispatcher + SQLite store + RoomBus, frame level
//!     ├── restart.rs     # State and tallies survive reopening the store
//!     └── migrations.rs  # Divergent migration history on a real database
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p ff-tests
//! ```

pub mod integration;
