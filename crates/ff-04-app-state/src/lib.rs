//! # ff-04-app-state
//!
//! The single source of truth for which category is active and whether
//! voting is open.
//!
//! Reads are served from a cache loaded once at startup. Writes normalize the
//! value, skip the store entirely when nothing changes, and otherwise write
//! through before returning. A failed write leaves the cache on its previous
//! value.

pub mod domain;
pub mod service;

pub use domain::*;
pub use service::AppState;
