//! Agenda HTTP Server Binary
//!
//! Loads configuration, wires the repository and the spreadsheet sync, and
//! serves the REST API.
//!
//! # Usage
//!
//! ```bash
//! SPREADSHEET_ID=... GOOGLE_SHEETS_API_KEY=... cargo run --bin agenda-server
//! ```
//!
//! # Environment Variables
//!
//! - `AGENDA_CONFIG`: Path to a TOML config file (default: `agenda.toml`)
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 5000)
//! - `SPREADSHEET_ID`, `GOOGLE_SHEETS_API_KEY`, `SHEETS_API_URL`: spreadsheet access
//! - `DATABASE_URL`: Postgres connection string (requires `postgres-repo`; default: in-memory)
//! - `RUST_LOG`: Log filter (default: info)

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use agenda_cad::config::AppConfig;
use agenda_cad::db;
use agenda_cad::http::{create_router, AppState};
use agenda_cad::services::SyncService;
use agenda_cad::sheets::GoogleSheetsClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting agenda server");

    let config = AppConfig::load()?;
    let repository = db::create_repository(&config.database).await?;
    info!("Repository initialized successfully");

    let mut state = AppState::new(Arc::clone(&repository));

    match GoogleSheetsClient::new(&config.sheets) {
        Ok(client) => {
            let sync = SyncService::new(
                Arc::new(client),
                Arc::clone(&repository),
                config.sheets.sources.clone(),
                config.consolidation.clone(),
            );

            if config.sync.on_startup {
                match sync.sync().await {
                    Ok(outcome) => info!("Startup sync: {}", outcome.message),
                    Err(e) => error!("Startup sync failed: {}", e),
                }
            }

            state = state.with_sync(sync);
        }
        Err(e) => warn!("Spreadsheet sync disabled: {}", e),
    }

    let app = create_router(state);

    let addr: SocketAddr = config.bind_address().parse()?;
    info!("Server listening on http://{}", addr);
    info!("Health check: http://{}/api/health", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
