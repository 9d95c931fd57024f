#![cfg(feature = "postgres-repo")]

//! Runs against a real database when `AGENDA_TEST_DATABASE_URL` is set and
//! returns early otherwise. Every test replaces the whole table, so they
//! share one lock.

mod support;

use std::env;
use tokio::sync::Mutex;

use agenda_cad::db::{AgendaRepository, PostgresConfig, PostgresRepository, RepositoryError};
use support::{march_records, record};

static DATABASE_LOCK: Mutex<()> = Mutex::const_new(());

async fn repository() -> Option<PostgresRepository> {
    let url = env::var("AGENDA_TEST_DATABASE_URL").ok()?;
    let repository = tokio::task::spawn_blocking(move || {
        PostgresRepository::new(PostgresConfig::with_url(url))
    })
    .await
    .unwrap()
    .unwrap();
    Some(repository)
}

#[tokio::test]
async fn test_replace_then_list_keeps_order() {
    let _guard = DATABASE_LOCK.lock().await;
    let Some(repository) = repository().await else {
        return;
    };

    assert!(repository.health_check().await.unwrap());
    assert_eq!(repository.replace_consolidated(march_records()).await.unwrap(), 3);

    let stored = repository.list_consolidated().await.unwrap();
    let dates: Vec<_> = stored.iter().map(|r| r.schedule_date.as_str()).collect();
    assert_eq!(dates, vec!["01/03/2024", "03/03/2024", "02/03/2024"]);
    assert_eq!(stored[1].total_count, Some(30));
    assert_eq!(stored[0].source2_count, None);
    assert!(stored.iter().all(|r| r.last_updated.is_some()));

    assert_eq!(repository.replace_consolidated(Vec::new()).await.unwrap(), 0);
    assert!(repository.list_consolidated().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_duplicate_dates_keep_previous_agenda() {
    let _guard = DATABASE_LOCK.lock().await;
    let Some(repository) = repository().await else {
        return;
    };

    repository.replace_consolidated(march_records()).await.unwrap();

    let err = repository
        .replace_consolidated(vec![record("04/03/2024", 1), record("04/03/2024", 2)])
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::ValidationError { .. }));
    assert_eq!(repository.list_consolidated().await.unwrap().len(), 3);
}
