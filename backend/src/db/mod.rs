//! Storage of consolidated agenda records.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  HTTP handlers / SyncService                            │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  AgendaRepository trait - Abstract Interface            │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌───────────────┴───────────────┐
//!     │                               │
//! ┌───▼──────────────┐    ┌───────────▼─────────┐
//! │ Local Repository │    │ Postgres Repository │
//! │   (in-memory)    │    │  (postgres-repo)    │
//! └──────────────────┘    └─────────────────────┘
//! ```
//!
//! `database.url` (or `DATABASE_URL`) selects Postgres; without it the agenda
//! is kept in memory.

#[cfg(not(feature = "local-repo"))]
compile_error!("The local-repo feature is required; it backs servers without a database URL.");

pub mod repositories;
pub mod repository;

pub use repositories::LocalRepository;
#[cfg(feature = "postgres-repo")]
pub use repositories::{PostgresConfig, PostgresRepository};
pub use repository::{
    AgendaRepository, ErrorContext, RepositoryError, RepositoryResult,
};

use std::sync::Arc;
use tracing::info;

use crate::config::DatabaseSettings;

/// Create the repository selected by `settings`.
///
/// An empty or missing URL selects the in-memory repository.
pub async fn create_repository(
    settings: &DatabaseSettings,
) -> RepositoryResult<Arc<dyn AgendaRepository>> {
    match settings.url() {
        None => {
            info!("No database URL configured, keeping the agenda in memory");
            Ok(Arc::new(LocalRepository::new()))
        }
        Some(url) => open_database(url, settings).await,
    }
}

#[cfg(feature = "postgres-repo")]
async fn open_database(
    url: &str,
    settings: &DatabaseSettings,
) -> RepositoryResult<Arc<dyn AgendaRepository>> {
    let config = PostgresConfig::from_settings(url, settings);
    let repository = tokio::task::spawn_blocking(move || PostgresRepository::new(config))
        .await
        .map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Task join error: {}", e),
                ErrorContext::new("create_repository"),
            )
        })??;
    Ok(Arc::new(repository))
}

#[cfg(not(feature = "postgres-repo"))]
async fn open_database(
    _url: &str,
    _settings: &DatabaseSettings,
) -> RepositoryResult<Arc<dyn AgendaRepository>> {
    Err(
        RepositoryError::configuration("database.url is set but postgres-repo is not enabled")
            .with_operation("create_repository"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_no_url_uses_memory() {
        let repository = create_repository(&DatabaseSettings::default()).await.unwrap();
        assert!(repository.health_check().await.unwrap());
        assert!(repository.list_consolidated().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_blank_url_uses_memory() {
        let settings = DatabaseSettings {
            url: Some("   ".to_string()),
            ..DatabaseSettings::default()
        };
        assert!(create_repository(&settings).await.is_ok());
    }

    #[cfg(not(feature = "postgres-repo"))]
    #[tokio::test]
    async fn test_url_without_postgres_feature_is_rejected() {
        let settings = DatabaseSettings {
            url: Some("postgres://agenda@localhost/agenda".to_string()),
            ..DatabaseSettings::default()
        };

        let err = create_repository(&settings).await.err().unwrap();
        assert!(matches!(err, RepositoryError::ConfigurationError { .. }));
        assert_eq!(err.context().operation.as_deref(), Some("create_repository"));
    }
}
