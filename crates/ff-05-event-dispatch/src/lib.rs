//! # ff-05-event-dispatch
//!
//! Routes validated inbound messages to the state and tally components and
//! fans the results back out through a [`shared_bus::Broadcaster`].
//!
//! ## Admin State Machine
//!
//! | Command          | Effect                                                     |
//! |------------------|------------------------------------------------------------|
//! | `open_category`  | `voting = true`, State to everyone                         |
//! | `close_category` | `voting = false`, State to everyone                        |
//! | `next_category`  | `voting = false`, `category + 1`, State to everyone        |
//! | `prev_category`  | `voting = false`, `max(0, category - 1)`, State to everyone|
//! | `reset_category` | tally reset; if voting, closed State then real State; Stats to monitors |
//!
//! ## Concurrency
//!
//! [`DispatchActor`] owns the [`Dispatcher`] and drains a bounded inbox one
//! event at a time. Store writes block the actor until they commit, so no
//! broadcast ever runs ahead of durability.

pub mod actor;
pub mod domain;
pub mod service;

pub use actor::{channel, DispatchActor, DispatchHandle, Inbound};
pub use domain::*;
pub use service::Dispatcher;
