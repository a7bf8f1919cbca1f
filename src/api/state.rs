//! Application state for the Seller Fee Engine API.

use std::sync::Arc;

use crate::config::{ConfigLoader, RateTable};

/// Shared application state.
///
/// Holds the rate sheets loaded at startup. They are read-only, so handlers
/// share them through an `Arc` without locking.
#[derive(Clone)]
pub struct AppState {
    /// The loaded rate sheets.
    config: Arc<ConfigLoader>,
}

impl AppState {
    /// Creates a new application state with the given configuration loader.
    pub fn new(config: ConfigLoader) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Returns the rate table fees are resolved against.
    pub fn rate_table(&self) -> &RateTable {
        self.config.rate_table()
    }
}
