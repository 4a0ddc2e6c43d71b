//! # Broadcast Publisher
//!
//! Defines the outbound port used by the dispatch surface and its in-process
//! implementation.

use crate::DEFAULT_CHANNEL_CAPACITY;
use dashmap::DashMap;
use shared_types::{ConnectionId, OutboundMessage, Room, Target};
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Errors from registry operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BusError {
    /// The connection is not (or no longer) registered.
    #[error("Unknown connection: {0}")]
    UnknownConnection(ConnectionId),
}

/// Trait for delivering messages to connected peers.
///
/// This is the interface the dispatch surface uses to reach peers; it knows
/// nothing about sockets.
pub trait Broadcaster: Send + Sync {
    /// Deliver a message to every connection matching `target`.
    ///
    /// # Returns
    ///
    /// The number of connections the frame was queued for.
    fn emit(&self, target: Target, message: &OutboundMessage) -> usize;

    /// Add a connection to a room.
    fn join(&self, connection: ConnectionId, room: Room) -> Result<(), BusError>;
}

struct Peer {
    sender: mpsc::Sender<Arc<str>>,
    rooms: HashSet<Room>,
}

impl Peer {
    fn matches(&self, target: &Target) -> bool {
        match target {
            Target::Everyone => true,
            Target::Room(room) => self.rooms.contains(room),
            Target::Connection(_) => true,
        }
    }
}

/// In-process connection registry.
///
/// The transport registers each accepted socket and drains the returned
/// receiver into it.
pub struct RoomBus {
    peers: DashMap<ConnectionId, Peer>,
    frames_sent: AtomicU64,
    frames_dropped: AtomicU64,
    capacity: usize,
}

impl RoomBus {
    /// Create a registry with the default per-connection capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a registry with the specified per-connection capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            peers: DashMap::new(),
            frames_sent: AtomicU64::new(0),
            frames_dropped: AtomicU64::new(0),
            capacity: capacity.max(1),
        }
    }

    /// Register a connection and get the receiving end of its frame channel.
    pub fn register(&self, connection: ConnectionId) -> mpsc::Receiver<Arc<str>> {
        let (sender, receiver) = mpsc::channel(self.capacity);
        self.peers.insert(
            connection,
            Peer {
                sender,
                rooms: HashSet::new(),
            },
        );
        debug!(connection_id = %connection, "Connection registered");
        receiver
    }

    /// Remove a connection from the registry and all rooms.
    pub fn remove(&self, connection: &ConnectionId) -> bool {
        let removed = self.peers.remove(connection).is_some();
        if removed {
            debug!(connection_id = %connection, "Connection removed");
        }
        removed
    }

    /// Number of registered connections.
    #[must_use]
    pub fn connection_count(&self) -> usize {
        self.peers.len()
    }

    /// Number of connections in a room.
    #[must_use]
    pub fn room_size(&self, room: Room) -> usize {
        self.peers
            .iter()
            .filter(|peer| peer.rooms.contains(&room))
            .count()
    }

    /// Total frames queued since creation.
    pub fn frames_sent(&self) -> u64 {
        self.frames_sent.load(Ordering::Relaxed)
    }

    /// Total frames dropped because a peer's channel was full.
    pub fn frames_dropped(&self) -> u64 {
        self.frames_dropped.load(Ordering::Relaxed)
    }

    fn deliver(&self, id: &ConnectionId, peer: &Peer, frame: &Arc<str>) -> Delivery {
        match peer.sender.try_send(Arc::clone(frame)) {
            Ok(()) => Delivery::Queued,
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!(connection_id = %id, "Peer channel full, frame dropped");
                self.frames_dropped.fetch_add(1, Ordering::Relaxed);
                Delivery::Dropped
            }
            Err(mpsc::error::TrySendError::Closed(_)) => Delivery::Closed,
        }
    }
}

enum Delivery {
    Queued,
    Dropped,
    Closed,
}

impl Default for RoomBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Broadcaster for RoomBus {
    fn emit(&self, target: Target, message: &OutboundMessage) -> usize {
        let frame: Arc<str> = match message.to_frame() {
            Ok(frame) => frame.into(),
            Err(e) => {
                warn!(error = %e, kind = ?message.kind(), "Failed to encode frame");
                return 0;
            }
        };

        let mut queued = 0;
        let mut closed = Vec::new();

        if let Target::Connection(id) = target {
            if let Some(peer) = self.peers.get(&id) {
                match self.deliver(&id, &peer, &frame) {
                    Delivery::Queued => queued += 1,
                    Delivery::Dropped => {}
                    Delivery::Closed => closed.push(id),
                }
            }
        } else {
            for entry in self.peers.iter() {
                if !entry.matches(&target) {
                    continue;
                }
                match self.deliver(entry.key(), entry.value(), &frame) {
                    Delivery::Queued => queued += 1,
                    Delivery::Dropped => {}
                    Delivery::Closed => closed.push(*entry.key()),
                }
            }
        }

        for id in closed {
            self.remove(&id);
        }

        self.frames_sent.fetch_add(queued as u64, Ordering::Relaxed);
        debug!(to = %target, kind = ?message.kind(), receivers = queued, "Frame emitted");
        queued
    }

    fn join(&self, connection: ConnectionId, room: Room) -> Result<(), BusError> {
        let mut peer = self
            .peers
            .get_mut(&connection)
            .ok_or(BusError::UnknownConnection(connection))?;
        peer.rooms.insert(room);
        debug!(connection_id = %connection, room = room.as_str(), "Joined room");
        Ok(())
    }
}
