//! Data Transfer Objects for the HTTP API.
//!
//! The DTOs live in [`crate::api`] so the dashboard client can share them.

pub use crate::api::{
    ApiErrorBody, ConsolidatedResponse, HealthResponse, StatsQuery, SyncResponse,
};
pub use crate::models::Stats;
