// Application state
// Shared, read-only handles every request handler needs

use crate::config::Config;
use crate::dataset::DatasetStore;

/// Main application state
///
/// Nothing here is mutated after startup, so handlers share it through a
/// plain `Arc` without a lock.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Configuration the server was started with
    pub config: Config,
    /// Dataset files under `config.data.data_dir`
    pub store: DatasetStore,
}

impl AppState {
    /// Create application state from configuration
    pub fn new(config: Config) -> Self {
        let store = DatasetStore::new(config.data.data_dir.clone());
        Self { config, store }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
