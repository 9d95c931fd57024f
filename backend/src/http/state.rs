//! Application state for the HTTP server.

use std::sync::Arc;

use crate::db::AgendaRepository;
use crate::services::SyncService;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Repository instance for database operations
    pub repository: Arc<dyn AgendaRepository>,
    /// Spreadsheet sync; `None` when no spreadsheet is configured
    pub sync: Option<Arc<SyncService>>,
}

impl AppState {
    /// Create a state without a sync service.
    pub fn new(repository: Arc<dyn AgendaRepository>) -> Self {
        Self {
            repository,
            sync: None,
        }
    }

    pub fn with_sync(mut self, sync: SyncService) -> Self {
        self.sync = Some(Arc::new(sync));
        self
    }
}
