//! Spreadsheet → repository synchronization.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

use super::consolidation::consolidate;
use crate::config::{ConsolidationSettings, SheetSource};
use crate::db::{AgendaRepository, RepositoryError};
use crate::sheets::{SheetReader, SheetsError};

/// Result of a successful sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncOutcome {
    /// Human-readable summary shown to the user
    pub message: String,
    /// Number of schedule dates stored
    pub count: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum SyncServiceError {
    #[error("Failed to read spreadsheet: {0}")]
    Sheets(#[from] SheetsError),
    #[error("Failed to store consolidated agenda: {0}")]
    Repository(#[from] RepositoryError),
}

/// Consolidates the configured sheets and replaces the stored agenda.
#[derive(Clone)]
pub struct SyncService {
    reader: Arc<dyn SheetReader>,
    repository: Arc<dyn AgendaRepository>,
    sources: Vec<SheetSource>,
    settings: ConsolidationSettings,
}

impl SyncService {
    pub fn new(
        reader: Arc<dyn SheetReader>,
        repository: Arc<dyn AgendaRepository>,
        sources: Vec<SheetSource>,
        settings: ConsolidationSettings,
    ) -> Self {
        Self {
            reader,
            repository,
            sources,
            settings,
        }
    }

    /// Run one sync. Stored data is left untouched when any step fails.
    pub async fn sync(&self) -> Result<SyncOutcome, SyncServiceError> {
        let started = Instant::now();

        let records = consolidate(self.reader.as_ref(), &self.sources, &self.settings)
            .await
            .inspect_err(|e| error!("Sync failed while reading sheets: {}", e))?;

        let count = self
            .repository
            .replace_consolidated(records)
            .await
            .map_err(|e| e.with_operation("sync"))
            .inspect_err(|e| error!("Sync failed while storing records: {}", e))?;

        info!("Sync stored {} schedule dates in {:?}", count, started.elapsed());
        Ok(SyncOutcome {
            message: format!("Sync completed: {} dates processed", count),
            count,
        })
    }
}
