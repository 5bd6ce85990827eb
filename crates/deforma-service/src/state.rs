//! Application state shared across handlers.

use std::sync::Arc;

use tokio::sync::Mutex;

use deforma_store::Store;

use crate::config::Config;

/// Shared application state.
///
/// The store is behind a mutex so handlers serialize access to the
/// single SQLite connection. Configuration is read-only after startup;
/// nothing mutates it at runtime.
pub struct AppState {
    /// The data store.
    pub store: Mutex<Store>,
    /// Resolved configuration.
    pub config: Config,
}

impl AppState {
    /// Create new application state.
    pub fn new(store: Store, config: Config) -> Arc<Self> {
        Arc::new(Self {
            store: Mutex::new(store),
            config,
        })
    }
}
