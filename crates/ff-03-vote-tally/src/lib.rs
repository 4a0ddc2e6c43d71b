//! # ff-03-vote-tally
//!
//! Per-category vote counts for Firefly.
//!
//! ## Role in System
//!
//! A tally is a cache over the durable vote records of one category: which
//! voter chose which candidate, and how many votes each candidate holds.
//! It is built lazily from the store on first access and can always be
//! rebuilt from the store alone.
//!
//! ## Write Discipline
//!
//! `TallyEngine::cast_vote` mutates the cached tally first and then persists.
//! If persistence fails the in-memory mutation is undone before the error is
//! returned, so the cache never runs ahead of the store.

pub mod domain;
pub mod service;

pub use domain::*;
pub use service::{TallyEngine, VoteChange};
