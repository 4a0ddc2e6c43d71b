//! WebSocket session handling.
//!
//! Each accepted socket is registered with the [`RoomBus`] before the
//! dispatcher hears about it, so the initial state frame has somewhere to go.
//! A writer task drains the bus channel into the socket while the reader
//! forwards text frames to the dispatch inbox.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use ff_05_event_dispatch::DispatchHandle;
use futures::{SinkExt, StreamExt};
use shared_bus::RoomBus;
use shared_types::ConnectionId;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Shared state for the socket route.
#[derive(Clone)]
pub struct SocketState {
    pub bus: Arc<RoomBus>,
    pub dispatch: DispatchHandle,
    pub max_message_size: usize,
}

pub async fn upgrade(ws: WebSocketUpgrade, State(state): State<SocketState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| SocketSession::new(state).run(socket))
}

/// One live connection.
pub struct SocketSession {
    connection_id: ConnectionId,
    state: SocketState,
}

impl SocketSession {
    pub fn new(state: SocketState) -> Self {
        Self {
            connection_id: ConnectionId::new(),
            state,
        }
    }

    fn oversized(&self, size: usize) -> bool {
        if size > self.state.max_message_size {
            warn!(
                connection_id = %self.connection_id,
                size,
                max = self.state.max_message_size,
                "Message exceeds size limit, dropped"
            );
            return true;
        }
        false
    }

    pub async fn run(self, socket: WebSocket) {
        let id = self.connection_id;
        info!(connection_id = %id, "New WebSocket connection");

        let (mut sink, mut stream) = socket.split();
        let mut outbound = self.state.bus.register(id);

        if self.state.dispatch.connected(id).await.is_err() {
            warn!(connection_id = %id, "Dispatcher unavailable, closing socket");
            self.state.bus.remove(&id);
            return;
        }

        let writer = tokio::spawn(async move {
            while let Some(frame) = outbound.recv().await {
                if let Err(e) = sink.send(Message::Text(frame.to_string())).await {
                    debug!(connection_id = %id, error = %e, "Socket write failed");
                    break;
                }
            }
            let _ = sink.close().await;
        });

        while let Some(result) = stream.next().await {
            let text = match result {
                Ok(Message::Text(text)) => {
                    if self.oversized(text.len()) {
                        continue;
                    }
                    text
                }
                Ok(Message::Binary(data)) => {
                    if self.oversized(data.len()) {
                        continue;
                    }
                    match String::from_utf8(data) {
                        Ok(text) => text,
                        Err(_) => {
                            debug!(connection_id = %id, "Non UTF-8 binary frame dropped");
                            continue;
                        }
                    }
                }
                // Pongs for incoming pings are queued by the protocol layer.
                Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => continue,
                Ok(Message::Close(_)) => {
                    debug!(connection_id = %id, "WebSocket close received");
                    break;
                }
                Err(e) => {
                    warn!(connection_id = %id, error = %e, "WebSocket error");
                    break;
                }
            };

            if self.state.dispatch.frame(id, text).await.is_err() {
                break;
            }
        }

        self.state.bus.remove(&id);
        let _ = self.state.dispatch.disconnected(id).await;
        writer.abort();

        info!(connection_id = %id, "WebSocket connection closed");
    }
}
