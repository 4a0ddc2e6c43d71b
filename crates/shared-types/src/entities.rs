//! # Core Entities
//!
//! Identifiers and routing targets used across the dispatch surface and the
//! transport.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// A votable round, identified by a non-negative integer.
pub type CategoryId = u32;

/// A choice within a category, identified by a non-negative index.
pub type CandidateId = u32;

/// Server-side identity of one live connection.
///
/// Generated by the transport when a socket is accepted. Never sent to
/// clients and unrelated to the voter id a client reports in its votes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    /// Generate a new random connection id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Privilege level of a connection.
///
/// Every connection starts as a `Voter`; a successful signon elevates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    Voter,
    Admin,
    Monitor,
}

/// Named broadcast group a connection joins after signon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Room {
    Admins,
    Monitors,
}

impl Room {
    pub fn as_str(&self) -> &'static str {
        match self {
            Room::Admins => "admins",
            Room::Monitors => "monitors",
        }
    }
}

impl Role {
    /// The room a connection of this role belongs to, if any.
    pub fn room(&self) -> Option<Room> {
        match self {
            Role::Voter => None,
            Role::Admin => Some(Room::Admins),
            Role::Monitor => Some(Room::Monitors),
        }
    }
}

/// Where an outbound message is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// Every connected peer, regardless of role.
    Everyone,
    /// Members of one room.
    Room(Room),
    /// One specific connection.
    Connection(ConnectionId),
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Everyone => write!(f, "everyone"),
            Target::Room(room) => write!(f, "room:{}", room.as_str()),
            Target::Connection(id) => write!(f, "conn:{id}"),
        }
    }
}
