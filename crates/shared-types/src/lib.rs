//! # Shared Types Crate
//!
//! Vocabulary shared by every Firefly subsystem that touches the wire:
//! message kinds, their payloads, admin commands, connection identities and
//! broadcast targets.
//!
//! ## Design Principles
//!
//! - **Closed set of kinds**: `EventKind` is the only set of frame tags the
//!   server understands. Tags carry no security property; access control
//!   lives in signon role elevation only.
//! - **Validate at the edge**: `parse_frame` rejects structurally malformed
//!   frames before any handler sees them.
//! - **Dense tallies on the wire**: `StatsPayload::votes` is always
//!   zero-filled, never sparse.

pub mod entities;
pub mod errors;
pub mod ipc;

pub use entities::*;
pub use errors::*;
pub use ipc::*;
