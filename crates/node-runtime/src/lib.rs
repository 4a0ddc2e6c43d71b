//! # Firefly Node Runtime
//!
//! Wires the Firefly components into one server process.
//!
//! ## Startup Sequence
//!
//! 1. Load and validate configuration (environment over defaults)
//! 2. Open the SQLite store; schema migrations run to completion or abort
//!    startup
//! 3. Load application state, build the tally engine and the dispatcher
//! 4. Spawn the dispatch actor
//! 5. Serve the WebSocket endpoint until shutdown
//!
//! ```text
//!  socket ──text──→ SocketSession ──Inbound──→ DispatchActor
//!     ↑                                          │ AppState / TallyEngine
//!     │                                          │ (write-through to SQLite)
//!     └──── writer task ←── RoomBus ←──emit──────┘
//! ```

pub mod container;
pub mod transport;

pub use container::{ConfigError, FireflyContainer, NodeConfig};

use anyhow::{Context, Result};
use axum::Router;
use ff_05_event_dispatch::{DispatchHandle, Dispatcher};
use std::future::Future;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::info;
use transport::SocketState;

/// A running dispatch actor plus everything needed to serve it.
pub struct FireflyRuntime {
    container: FireflyContainer,
    handle: DispatchHandle,
    actor: JoinHandle<Dispatcher>,
}

impl FireflyRuntime {
    /// Build the dispatcher and spawn its actor.
    ///
    /// Must be called inside a Tokio runtime.
    pub fn start(container: FireflyContainer) -> Result<Self> {
        let dispatcher = container
            .dispatcher()
            .context("Failed to load application state")?;
        let (handle, actor) =
            ff_05_event_dispatch::channel(dispatcher, container.config.dispatch.inbox_capacity);
        let actor = tokio::spawn(actor.run());
        Ok(Self {
            container,
            handle,
            actor,
        })
    }

    pub fn container(&self) -> &FireflyContainer {
        &self.container
    }

    pub fn handle(&self) -> DispatchHandle {
        self.handle.clone()
    }

    pub fn router(&self) -> Router {
        let server = &self.container.config.server;
        transport::router(
            &server.socket_path(),
            SocketState {
                bus: self.container.bus.clone(),
                dispatch: self.handle.clone(),
                max_message_size: server.max_message_size,
            },
        )
    }

    /// Serve on `listener` until `shutdown` resolves.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let router = self.router();
        info!(
            addr = %listener.local_addr()?,
            path = %self.container.config.server.socket_path(),
            "Serving WebSocket endpoint"
        );
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await
            .context("WebSocket server failed")?;

        // Upgraded sockets hold their own handles; the actor does not outlive
        // the server.
        self.actor.abort();
        info!("Firefly stopped");
        Ok(())
    }
}
