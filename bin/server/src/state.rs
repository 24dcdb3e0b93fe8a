//! Server application state management

use crypto::KeyStore;
use std::sync::Arc;
use storage::Storage;

/// State shared by every worker. Immutable once the server starts.
pub struct AppState {
    /// Secrets used to authorize uploads
    pub key_store: KeyStore,
    /// Backend uploaded files are stored in
    pub storage: Arc<dyn Storage>,
    /// Accepted distance in seconds between request timestamp and server clock
    pub tolerance_secs: u64,
}

impl AppState {
    pub fn new(key_store: KeyStore, storage: Arc<dyn Storage>, tolerance_secs: u64) -> Self {
        Self {
            key_store,
            storage,
            tolerance_secs,
        }
    }
}
