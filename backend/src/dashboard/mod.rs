//! Dashboard core.
//!
//! The [`DashboardController`] drives one dashboard session: it fetches the
//! consolidated agenda through an [`AgendaApi`], keeps the normalized and
//! sorted chart records, applies the user's date filter, aggregates stats,
//! and runs the spreadsheet sync for admin users. Rendering is left to the
//! caller, which reads a [`DashboardView`] snapshot whenever it redraws.

pub mod client;
pub mod controller;

pub use client::HttpAgendaApi;
pub use controller::{
    DashboardController, DashboardError, DashboardOptions, DashboardPhase, DashboardView,
    FlashKind, FlashMessage, UserCapability, DEFAULT_SYNC_ERROR, MESSAGE_DURATION,
    NEVER_UPDATED, NON_ADMIN_NOTICE,
};

use async_trait::async_trait;

use crate::api::ConsolidatedResponse;
use crate::services::SyncOutcome;

/// Failure of a sync request. The message may be missing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", .message.as_deref().unwrap_or(DEFAULT_SYNC_ERROR))]
pub struct SyncError {
    pub message: Option<String>,
}

impl SyncError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }

    /// Failure without any message.
    pub fn silent() -> Self {
        Self { message: None }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiClientError {
    #[error("HTTP: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error {status}: {message}")]
    Status { status: u16, message: String },
}

/// Remote operations the dashboard depends on.
#[async_trait]
pub trait AgendaApi: Send + Sync {
    /// Read the consolidated agenda. Idempotent.
    async fn fetch_consolidated(&self) -> Result<ConsolidatedResponse, ApiClientError>;

    /// Trigger a spreadsheet sync.
    async fn sync(&self) -> Result<SyncOutcome, SyncError>;
}
