//! Postgres repository implementation using Diesel.
//!
//! The consolidated agenda lives in a single `consolidated_agenda` table with
//! a unique `schedule_date` column. A replace runs inside one transaction, so
//! readers keep seeing the previous agenda until it commits.
//!
//! ## Features
//!
//! - Connection pooling with r2d2
//! - Automatic retry for transient failures
//! - Automatic migration execution

use async_trait::async_trait;
use chrono::Utc;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_query;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::time::Duration;
use tokio::task;
use tracing::{debug, info};

use crate::config::DatabaseSettings;
use crate::db::repository::{
    ensure_unique_dates, AgendaRepository, ErrorContext, RepositoryError, RepositoryResult,
};
use crate::models::ConsolidatedRecord;

mod models;
mod schema;

use models::{AgendaRow, NewAgendaRow};
use schema::consolidated_agenda;

type PgPool = Pool<ConnectionManager<PgConnection>>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("src/db/repositories/postgres/migrations");

/// Configuration for connecting to Postgres.
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub database_url: String,
    /// Maximum number of connections in the pool
    pub max_pool_size: u32,
    /// Connection timeout in seconds
    pub connection_timeout_sec: u64,
    /// Maximum number of retry attempts for transient failures
    pub max_retries: u32,
    /// Initial retry delay in milliseconds (doubles with each retry)
    pub retry_delay_ms: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            max_pool_size: 10,
            connection_timeout_sec: 30,
            max_retries: 3,
            retry_delay_ms: 100,
        }
    }
}

impl PostgresConfig {
    /// Build the pool configuration from the `[database]` settings.
    pub fn from_settings(database_url: impl Into<String>, settings: &DatabaseSettings) -> Self {
        Self {
            database_url: database_url.into(),
            max_pool_size: settings.max_pool_size,
            connection_timeout_sec: settings.connection_timeout_secs,
            max_retries: settings.max_retries,
            ..Default::default()
        }
    }

    pub fn with_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Default::default()
        }
    }
}

/// Diesel-backed agenda repository.
#[derive(Clone)]
pub struct PostgresRepository {
    pool: PgPool,
    config: PostgresConfig,
}

impl PostgresRepository {
    /// Create a new repository and run pending migrations.
    ///
    /// Blocks while the pool connects; call it from `spawn_blocking` inside
    /// a runtime.
    pub fn new(config: PostgresConfig) -> RepositoryResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(&config.database_url);

        let pool = Pool::builder()
            .max_size(config.max_pool_size)
            .connection_timeout(Duration::from_secs(config.connection_timeout_sec))
            .test_on_check_out(true)
            .build(manager)
            .map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("create_pool")
                        .with_details(format!("max_size={}", config.max_pool_size)),
                )
            })?;

        {
            let mut conn = pool.get().map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("get_connection_for_migrations"),
                )
            })?;
            Self::run_migrations(&mut conn)?;
        }

        info!(
            max_pool_size = config.max_pool_size,
            "Postgres repository ready"
        );
        Ok(Self { pool, config })
    }

    fn run_migrations(conn: &mut PgConnection) -> RepositoryResult<()> {
        conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Migration failed: {}", e),
                ErrorContext::new("run_migrations"),
            )
        })?;

        Ok(())
    }

    /// Execute a database operation with automatic retry for transient failures.
    async fn with_conn<T, F>(&self, operation: &'static str, f: F) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> RepositoryResult<T> + Send + 'static + Clone,
    {
        let pool = self.pool.clone();
        let max_retries = self.config.max_retries;
        let retry_delay_ms = self.config.retry_delay_ms;

        task::spawn_blocking(move || {
            let mut retry_delay = Duration::from_millis(retry_delay_ms);
            let mut attempt = 0;

            loop {
                let result = pool
                    .get()
                    .map_err(|e| {
                        RepositoryError::connection_with_context(
                            e.to_string(),
                            ErrorContext::new("get_connection")
                                .with_details(format!("attempt={}", attempt + 1)),
                        )
                    })
                    .and_then(|mut conn| f.clone()(&mut conn));

                match result {
                    Err(e) if e.is_retryable() && attempt < max_retries => {
                        debug!(operation, attempt, "Retrying after transient error: {}", e);
                        std::thread::sleep(retry_delay);
                        retry_delay *= 2;
                        attempt += 1;
                    }
                    other => return other.map_err(|e| e.with_operation(operation)),
                }
            }
        })
        .await
        .map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Task join error: {}", e),
                ErrorContext::new("spawn_blocking"),
            )
        })?
    }
}

#[async_trait]
impl AgendaRepository for PostgresRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        self.with_conn("health_check", |conn| {
            sql_query("SELECT 1")
                .execute(conn)
                .map(|_| true)
                .map_err(RepositoryError::from)
        })
        .await
    }

    async fn replace_consolidated(
        &self,
        records: Vec<ConsolidatedRecord>,
    ) -> RepositoryResult<usize> {
        ensure_unique_dates(&records)?;

        let stamped_at = Utc::now();
        let rows: Vec<NewAgendaRow> = records
            .iter()
            .map(|record| NewAgendaRow::from_record(record, stamped_at))
            .collect();

        self.with_conn("replace_consolidated", move |conn| {
            conn.transaction::<_, diesel::result::Error, _>(|tx| {
                diesel::delete(consolidated_agenda::table).execute(tx)?;
                if rows.is_empty() {
                    return Ok(0);
                }
                diesel::insert_into(consolidated_agenda::table)
                    .values(&rows)
                    .execute(tx)
            })
            .map_err(RepositoryError::from)
        })
        .await
    }

    async fn list_consolidated(&self) -> RepositoryResult<Vec<ConsolidatedRecord>> {
        let rows = self
            .with_conn("list_consolidated", |conn| {
                consolidated_agenda::table
                    .order(consolidated_agenda::id.asc())
                    .select(AgendaRow::as_select())
                    .load::<AgendaRow>(conn)
                    .map_err(RepositoryError::from)
            })
            .await?;

        Ok(rows.into_iter().map(ConsolidatedRecord::from).collect())
    }
}
