//! Network transport: a single WebSocket route under the configured base path.

pub mod ws;

pub use ws::{SocketSession, SocketState};

use axum::routing::get;
use axum::Router;

/// Build the router serving the socket endpoint at `path`.
pub fn router(path: &str, state: SocketState) -> Router {
    Router::new()
        .route(path, get(ws::upgrade))
        .with_state(state)
}
