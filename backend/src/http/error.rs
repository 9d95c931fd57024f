//! HTTP error handling and response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::api::ApiErrorBody;
use crate::db::RepositoryError;
use crate::services::SyncServiceError;

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Invalid request (validation error)
    BadRequest(String),
    /// Feature not configured on this server
    ServiceUnavailable(String),
    Repository(RepositoryError),
    Sync(SyncServiceError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ApiErrorBody::new("BAD_REQUEST", msg))
            }
            AppError::ServiceUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                ApiErrorBody::new("SERVICE_UNAVAILABLE", msg),
            ),
            AppError::Repository(e) => {
                let details = e.context().to_string();
                let status = match e {
                    RepositoryError::ConnectionError { .. } => StatusCode::SERVICE_UNAVAILABLE,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (
                    status,
                    ApiErrorBody::new("REPOSITORY_ERROR", e.to_string()).with_details(details),
                )
            }
            AppError::Sync(e) => {
                let code = match e {
                    SyncServiceError::Sheets(_) => "SHEETS_ERROR",
                    SyncServiceError::Repository(_) => "REPOSITORY_ERROR",
                };
                (
                    StatusCode::BAD_GATEWAY,
                    ApiErrorBody::new(code, format!("Failed to sync agenda: {}", e)),
                )
            }
        };

        (status, Json(error)).into_response()
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        AppError::Repository(err)
    }
}

impl From<SyncServiceError> for AppError {
    fn from(err: SyncServiceError) -> Self {
        AppError::Sync(err)
    }
}
