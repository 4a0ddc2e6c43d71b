//! # Dispatch Actor
//!
//! Single task that owns the [`Dispatcher`]. Transports talk to it through a
//! cloneable [`DispatchHandle`]; everything they send is processed in arrival
//! order, one event at a time.

use crate::domain::DispatchError;
use crate::service::Dispatcher;
use shared_types::ConnectionId;
use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info};

/// Events a transport feeds into the actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    Connected(ConnectionId),
    Disconnected(ConnectionId),
    Frame {
        connection: ConnectionId,
        text: String,
    },
}

/// Sending side of the actor's inbox.
#[derive(Debug, Clone)]
pub struct DispatchHandle {
    sender: mpsc::Sender<Inbound>,
}

impl DispatchHandle {
    pub async fn send(&self, event: Inbound) -> Result<(), DispatchError> {
        self.sender
            .send(event)
            .await
            .map_err(|_| DispatchError::InboxClosed)
    }

    pub async fn connected(&self, connection: ConnectionId) -> Result<(), DispatchError> {
        self.send(Inbound::Connected(connection)).await
    }

    pub async fn disconnected(&self, connection: ConnectionId) -> Result<(), DispatchError> {
        self.send(Inbound::Disconnected(connection)).await
    }

    pub async fn frame(&self, connection: ConnectionId, text: String) -> Result<(), DispatchError> {
        self.send(Inbound::Frame { connection, text }).await
    }
}

pub struct DispatchActor {
    dispatcher: Dispatcher,
    inbox: mpsc::Receiver<Inbound>,
}

/// Create an actor around `dispatcher` with a bounded inbox.
pub fn channel(dispatcher: Dispatcher, capacity: usize) -> (DispatchHandle, DispatchActor) {
    let (sender, inbox) = mpsc::channel(capacity.max(1));
    (
        DispatchHandle { sender },
        DispatchActor { dispatcher, inbox },
    )
}

impl DispatchActor {
    /// Process events until every handle is dropped.
    ///
    /// Returns the dispatcher so callers can inspect its final state.
    pub async fn run(mut self) -> Dispatcher {
        info!("Dispatch actor started");
        loop {
            let deadline = self.dispatcher.throttle_deadline();
            tokio::select! {
                event = self.inbox.recv() => match event {
                    Some(event) => self.process(event),
                    None => break,
                },
                _ = wait_until(deadline) => {
                    self.dispatcher.on_throttle_deadline(Instant::now());
                }
            }
        }
        info!("Dispatch actor stopped");
        self.dispatcher
    }

    fn process(&mut self, event: Inbound) {
        match event {
            Inbound::Connected(connection) => self.dispatcher.on_connect(connection),
            Inbound::Disconnected(connection) => self.dispatcher.on_disconnect(connection),
            Inbound::Frame { connection, text } => {
                debug!(connection_id = %connection, len = text.len(), "Frame received");
                self.dispatcher.on_frame(connection, &text, Instant::now());
            }
        }
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
