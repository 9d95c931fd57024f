//! In-memory local repository implementation.
//!
//! Suitable for unit testing and local development. Data lives in memory
//! behind a `parking_lot::RwLock` and is lost when the process exits.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use std::sync::Arc;

use crate::db::repository::{
    ensure_unique_dates, AgendaRepository, ErrorContext, RepositoryError, RepositoryResult,
};
use crate::models::ConsolidatedRecord;

/// In-memory local repository.
///
/// # Example
/// ```
/// use agenda_cad::db::{AgendaRepository, LocalRepository};
/// use agenda_cad::models::ConsolidatedRecord;
///
/// # tokio_test_block_on(async {
/// let repo = LocalRepository::new();
/// repo.replace_consolidated(vec![ConsolidatedRecord::zeroed("01/03/2024")]).await.unwrap();
/// assert_eq!(repo.list_consolidated().await.unwrap().len(), 1);
/// # });
/// # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Runtime::new().unwrap().block_on(f)
/// # }
/// ```
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    records: Vec<ConsolidatedRecord>,
    // Connection health
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            is_healthy: true,
        }
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
        }
    }

    /// Create a repository pre-populated with records, stored as given.
    pub fn with_records(records: Vec<ConsolidatedRecord>) -> Self {
        let repo = Self::new();
        repo.data.write().records = records;
        repo
    }

    /// Set the health status for testing connection failures.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Number of records stored.
    pub fn record_count(&self) -> usize {
        self.data.read().records.len()
    }

    fn check_health(&self, operation: &str) -> RepositoryResult<()> {
        if !self.data.read().is_healthy {
            return Err(RepositoryError::connection_with_context(
                "Database is not healthy",
                ErrorContext::new(operation),
            ));
        }
        Ok(())
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AgendaRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().is_healthy)
    }

    async fn replace_consolidated(
        &self,
        mut records: Vec<ConsolidatedRecord>,
    ) -> RepositoryResult<usize> {
        self.check_health("replace_consolidated")?;
        ensure_unique_dates(&records)?;

        let now = Utc::now();
        for record in &mut records {
            record.last_updated = Some(now);
        }

        let count = records.len();
        self.data.write().records = records;
        Ok(count)
    }

    async fn list_consolidated(&self) -> RepositoryResult<Vec<ConsolidatedRecord>> {
        self.check_health("list_consolidated")?;
        Ok(self.data.read().records.clone())
    }
}
