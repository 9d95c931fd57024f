//! Repository trait for consolidated agenda storage.

pub mod error;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

use async_trait::async_trait;
use std::collections::HashSet;

use crate::models::ConsolidatedRecord;

/// Storage of the consolidated agenda.
///
/// A sync replaces the whole list at once; readers always see either the
/// previous list or the new one, never a mix.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait AgendaRepository: Send + Sync {
    /// Check that the storage backend is reachable.
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// Replace every stored record with `records`.
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of records stored
    /// * `Err(RepositoryError::ValidationError)` - If two records share a schedule date
    async fn replace_consolidated(&self, records: Vec<ConsolidatedRecord>)
        -> RepositoryResult<usize>;

    /// List stored records in the order they were stored.
    async fn list_consolidated(&self) -> RepositoryResult<Vec<ConsolidatedRecord>>;
}

/// Reject a record list in which two records share a schedule date.
pub(crate) fn ensure_unique_dates(records: &[ConsolidatedRecord]) -> RepositoryResult<()> {
    let mut seen = HashSet::with_capacity(records.len());
    for record in records {
        if !seen.insert(record.schedule_date.as_str()) {
            return Err(RepositoryError::validation_with_context(
                "Duplicate schedule date",
                ErrorContext::new("replace_consolidated")
                    .with_entity("consolidated_record")
                    .with_entity_id(&record.schedule_date),
            ));
        }
    }
    Ok(())
}
