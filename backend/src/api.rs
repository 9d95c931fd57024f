//! Wire types of the agenda HTTP API.
//!
//! Serialized by the server's handlers and deserialized by the dashboard's
//! HTTP client, so they are available without the `http-server` feature.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{ConsolidatedRecord, DateRange};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// Consolidated agenda listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsolidatedResponse {
    #[serde(default = "default_true")]
    pub success: bool,
    pub data: Vec<ConsolidatedRecord>,
    #[serde(default)]
    pub count: usize,
}

impl ConsolidatedResponse {
    pub fn new(data: Vec<ConsolidatedRecord>) -> Self {
        Self {
            success: true,
            count: data.len(),
            data,
        }
    }
}

/// Response for a completed sync.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncResponse {
    pub success: bool,
    pub message: String,
    pub count: usize,
}

fn default_true() -> bool {
    true
}

/// Error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorBody {
    /// Always `false`
    #[serde(default)]
    pub success: bool,
    /// Error code for programmatic handling
    #[serde(default)]
    pub code: String,
    /// Human-readable error message
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiErrorBody {
    pub fn new(code: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            code: code.into(),
            error: Some(error.into()),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Query parameters for the stats endpoint.
///
/// Dates use the ISO `YYYY-MM-DD` form produced by HTML date inputs.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StatsQuery {
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
}

impl StatsQuery {
    /// Parse the bounds. Empty strings count as absent.
    pub fn to_range(&self) -> Result<DateRange, String> {
        Ok(DateRange::new(
            parse_bound("start", self.start.as_deref())?,
            parse_bound("end", self.end.as_deref())?,
        ))
    }
}

fn parse_bound(name: &str, value: Option<&str>) -> Result<Option<NaiveDate>, String> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .map(Some)
            .map_err(|e| format!("Invalid {} date '{}': {}", name, text, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_query_to_range() {
        let query = StatsQuery {
            start: Some("2024-03-02".to_string()),
            end: Some("".to_string()),
        };
        let range = query.to_range().unwrap();
        assert_eq!(range.start, NaiveDate::from_ymd_opt(2024, 3, 2));
        assert_eq!(range.end, None);
    }

    #[test]
    fn test_stats_query_rejects_bad_date() {
        let query = StatsQuery {
            start: None,
            end: Some("02/03/2024".to_string()),
        };
        let err = query.to_range().unwrap_err();
        assert!(err.contains("end"));
    }

    #[test]
    fn test_consolidated_response_counts() {
        let response = ConsolidatedResponse::new(vec![ConsolidatedRecord::zeroed("01/03/2024")]);
        assert!(response.success);
        assert_eq!(response.count, 1);
    }
}
