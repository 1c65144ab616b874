//! Application state for the VROOM API

use std::sync::Arc;
use std::time::Duration;

use vroom_core::{MemoryStore, VroomStore};

use crate::session::SessionManager;

/// Runtime knobs for the API layer
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// How long a login token stays valid
    pub session_ttl: Duration,
    /// Minimum accepted password length, in characters
    pub min_password_length: usize,
    /// Maximum number of adapter responses in one scan upload
    pub max_scan_responses: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            session_ttl: Duration::from_secs(24 * 60 * 60),
            min_password_length: 8,
            max_scan_responses: 512,
        }
    }
}

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn VroomStore>,
    sessions: Arc<SessionManager>,
    config: Arc<ApiConfig>,
}

impl AppState {
    /// Create a new AppState over the given store
    pub fn new(store: Arc<dyn VroomStore>, config: ApiConfig) -> Self {
        Self {
            store,
            sessions: Arc::new(SessionManager::new(config.session_ttl)),
            config: Arc::new(config),
        }
    }

    /// Create AppState backed by a fresh in-memory store
    pub fn in_memory(config: ApiConfig) -> Self {
        Self::new(Arc::new(MemoryStore::new()), config)
    }

    pub fn store(&self) -> &dyn VroomStore {
        self.store.as_ref()
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    /// Get the session manager Arc (for background tasks)
    pub fn sessions_arc(&self) -> Arc<SessionManager> {
        self.sessions.clone()
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }
}
