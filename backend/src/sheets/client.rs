//! Google Sheets v4 values API client over `reqwest`.

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::{rows_from_values, SheetReader, SheetRow, SheetsError};
use crate::config::SheetsSettings;

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff_ms: 250,
            max_backoff_ms: 2_000,
        }
    }
}

impl RetryPolicy {
    /// Backoff before retry number `attempt` (1-based), doubling each time.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = 2u64.saturating_pow(attempt.saturating_sub(1));
        let millis = self
            .initial_backoff_ms
            .saturating_mul(exponent)
            .min(self.max_backoff_ms);
        Duration::from_millis(millis)
    }
}

fn is_retryable_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS
        || status == StatusCode::REQUEST_TIMEOUT
        || status.is_server_error()
}

#[derive(Debug, Deserialize)]
struct ValuesResponse {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

/// Reads sheet tabs through `GET {api_url}/{spreadsheet_id}/values/{sheet}?key=...`.
#[derive(Debug, Clone)]
pub struct GoogleSheetsClient {
    http: reqwest::Client,
    api_url: String,
    spreadsheet_id: String,
    api_key: String,
    retry: RetryPolicy,
}

impl GoogleSheetsClient {
    pub fn new(settings: &SheetsSettings) -> Result<Self, SheetsError> {
        if settings.spreadsheet_id.is_empty() {
            return Err(SheetsError::NotConfigured(
                "spreadsheet_id is empty".to_string(),
            ));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            api_url: settings.api_url.trim_end_matches('/').to_string(),
            spreadsheet_id: settings.spreadsheet_id.clone(),
            api_key: settings.api_key.clone(),
            retry: RetryPolicy {
                max_attempts: settings.max_attempts,
                ..RetryPolicy::default()
            },
        })
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Values URL for a sheet; the sheet name is percent-encoded as a path segment.
    pub fn values_url(&self, sheet: &str) -> Result<Url, SheetsError> {
        let mut url = Url::parse(&self.api_url)
            .map_err(|e| SheetsError::NotConfigured(format!("invalid api_url: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| SheetsError::NotConfigured("api_url cannot be a base".to_string()))?
            .pop_if_empty()
            .push(&self.spreadsheet_id)
            .push("values")
            .push(sheet);
        if !self.api_key.is_empty() {
            url.query_pairs_mut().append_pair("key", &self.api_key);
        }
        Ok(url)
    }

    async fn send_with_retry(&self, url: Url) -> Result<reqwest::Response, SheetsError> {
        let attempts = self.retry.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match self.http.get(url.clone()).send().await {
                Ok(response) => {
                    let status = response.status();
                    if is_retryable_status(status) && attempt < attempts {
                        let delay = self.retry.delay_for(attempt);
                        warn!(
                            "sheets retry {}/{} after status {} (sleep {:?})",
                            attempt, attempts, status, delay
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                        continue;
                    }
                    return Ok(response);
                }
                Err(err) => {
                    if (err.is_timeout() || err.is_connect()) && attempt < attempts {
                        let delay = self.retry.delay_for(attempt);
                        warn!(
                            "sheets retry {}/{} after transport error: {} (sleep {:?})",
                            attempt, attempts, err, delay
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                        continue;
                    }
                    return Err(SheetsError::Http(err));
                }
            }
        }
    }
}

#[async_trait]
impl SheetReader for GoogleSheetsClient {
    async fn read_sheet(&self, sheet: &str) -> Result<Vec<SheetRow>, SheetsError> {
        let url = self.values_url(sheet)?;
        let response = self.send_with_retry(url).await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<empty response>".to_string());
            return Err(SheetsError::Api {
                sheet: sheet.to_string(),
                status: status.as_u16(),
                message: body.trim().to_string(),
            });
        }

        let payload: ValuesResponse = response.json().await?;
        let rows = rows_from_values(payload.values);
        debug!(sheet, rows = rows.len(), "read sheet");
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> SheetsSettings {
        SheetsSettings {
            spreadsheet_id: "abc123".to_string(),
            api_key: "secret".to_string(),
            ..SheetsSettings::default()
        }
    }

    #[test]
    fn test_requires_spreadsheet_id() {
        let err = GoogleSheetsClient::new(&SheetsSettings::default()).unwrap_err();
        assert!(matches!(err, SheetsError::NotConfigured(_)));
    }

    #[test]
    fn test_values_url_encodes_sheet_name() {
        let client = GoogleSheetsClient::new(&settings()).unwrap();
        let url = client.values_url("Base 1").unwrap();
        assert_eq!(
            url.as_str(),
            "https://sheets.googleapis.com/v4/spreadsheets/abc123/values/Base%201?key=secret"
        );
    }

    #[test]
    fn test_values_url_without_key() {
        let mut settings = settings();
        settings.api_key.clear();
        let client = GoogleSheetsClient::new(&settings).unwrap();
        assert!(client.values_url("Base1").unwrap().query().is_none());
    }

    #[test]
    fn test_retryable_statuses() {
        assert!(is_retryable_status(StatusCode::TOO_MANY_REQUESTS));
        assert!(is_retryable_status(StatusCode::REQUEST_TIMEOUT));
        assert!(is_retryable_status(StatusCode::BAD_GATEWAY));
        assert!(!is_retryable_status(StatusCode::NOT_FOUND));
        assert!(!is_retryable_status(StatusCode::FORBIDDEN));
    }

    #[test]
    fn test_backoff_doubles_and_caps() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(1), Duration::from_millis(250));
        assert_eq!(policy.delay_for(2), Duration::from_millis(500));
        assert_eq!(policy.delay_for(3), Duration::from_millis(1_000));
        assert_eq!(policy.delay_for(10), Duration::from_millis(2_000));
    }
}
