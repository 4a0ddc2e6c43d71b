//! # Shared Bus - Broadcast Registry
//!
//! The outbound half of the transport contract: a registry of live
//! connections, the rooms they joined, and per-connection frame channels.
//!
//! ```text
//!   Dispatch actor ──emit(Target, msg)──→ RoomBus
//!                                           │  serialize once
//!            ┌──────────────────────────────┼─────────────────────────┐
//!            ↓                              ↓                         ↓
//!      conn A (voter)               conn B (admins)           conn C (monitors)
//!      mpsc → socket writer         mpsc → socket writer      mpsc → socket writer
//! ```
//!
//! Delivery is best-effort: a peer whose channel is full loses that frame,
//! a peer whose channel is closed is dropped from the registry.

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod publisher;

pub use publisher::{Broadcaster, BusError, RoomBus};

/// Frames buffered per connection before new frames are dropped.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

