//! # Component Container
//!
//! Builds the components in dependency order:
//!
//! 1. Durable store (migrations run inside `open`, before anything else
//!    can touch the database)
//! 2. Broadcast registry
//! 3. Application state and tally engine over the shared store
//! 4. Dispatcher wiring them together

pub mod config;

pub use config::{ConfigError, NodeConfig, ServerConfig, StorageConfig};

use ff_01_durable_store::{DurableStore, SqliteStore, StoreError};
use ff_03_vote_tally::TallyEngine;
use ff_04_app_state::{AppState, StateError};
use ff_05_event_dispatch::Dispatcher;
use shared_bus::RoomBus;
use std::sync::Arc;
use tracing::info;

/// Holds the shared components of one running node.
pub struct FireflyContainer {
    pub config: NodeConfig,
    pub store: Arc<dyn DurableStore>,
    pub bus: Arc<RoomBus>,
}

impl FireflyContainer {
    /// Open the configured SQLite store and create the registry.
    pub fn open(config: NodeConfig) -> Result<Self, StoreError> {
        let store = SqliteStore::open(&config.storage.db_path)?;
        let report = store.migration_report();
        info!(
            repaired = ?report.repaired,
            rolled_back = ?report.rolled_back,
            applied = ?report.applied,
            "Store ready"
        );
        Ok(Self::with_store(config, Arc::new(store)))
    }

    /// Use an already-open store.
    pub fn with_store(config: NodeConfig, store: Arc<dyn DurableStore>) -> Self {
        Self {
            config,
            store,
            bus: Arc::new(RoomBus::new()),
        }
    }

    /// Load state from the store and build the dispatcher.
    pub fn dispatcher(&self) -> Result<Dispatcher, StateError> {
        let state = AppState::load(Arc::clone(&self.store))?;
        let tally = TallyEngine::new(Arc::clone(&self.store));
        Ok(Dispatcher::new(
            state,
            tally,
            self.bus.clone(),
            &self.config.dispatch,
        ))
    }
}
