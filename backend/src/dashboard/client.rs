//! [`AgendaApi`] over the agenda server's REST endpoints.

use async_trait::async_trait;
use std::time::Duration;

use super::{AgendaApi, ApiClientError, SyncError};
use crate::api::{ApiErrorBody, ConsolidatedResponse, SyncResponse};
use crate::config::DashboardSettings;
use crate::services::SyncOutcome;

/// HTTP client for `/api/agenda/*`.
#[derive(Debug, Clone)]
pub struct HttpAgendaApi {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl HttpAgendaApi {
    /// Create a client for a server such as `http://localhost:5000`.
    ///
    /// `timeout` bounds each request, including a sync that reads every sheet.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiClientError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        })
    }

    /// Create a client from the `[dashboard]` settings.
    pub fn from_settings(settings: &DashboardSettings) -> Result<Self, ApiClientError> {
        Self::new(
            settings.api_url.as_str(),
            Duration::from_secs(settings.timeout_secs),
        )
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/agenda/{}", self.base_url, path)
    }
}

/// Pull the human-readable message out of an error response body.
fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.error)
        .filter(|message| !message.trim().is_empty())
}

#[async_trait]
impl AgendaApi for HttpAgendaApi {
    async fn fetch_consolidated(&self) -> Result<ConsolidatedResponse, ApiClientError> {
        let response = self.http.get(self.endpoint("consolidated")).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiClientError::Status {
                status: status.as_u16(),
                message: error_message(&body).unwrap_or_else(|| body.trim().to_string()),
            });
        }

        Ok(response.json().await?)
    }

    async fn sync(&self) -> Result<SyncOutcome, SyncError> {
        let response = self
            .http
            .post(self.endpoint("sync"))
            .send()
            .await
            .map_err(|e| SyncError::new(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SyncError::new(e.to_string()))?;

        if !status.is_success() {
            return Err(SyncError {
                message: error_message(&body),
            });
        }

        let parsed: SyncResponse =
            serde_json::from_str(&body).map_err(|e| SyncError::new(e.to_string()))?;
        Ok(SyncOutcome {
            message: parsed.message,
            count: parsed.count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let api = HttpAgendaApi::new("http://localhost:5000/", Duration::from_secs(5)).unwrap();
        assert_eq!(
            api.endpoint("sync"),
            "http://localhost:5000/api/agenda/sync"
        );
    }

    #[test]
    fn test_from_settings_uses_configured_timeout() {
        let settings = DashboardSettings {
            api_url: "http://agenda.internal:5000".to_string(),
            timeout_secs: 15,
        };
        let api = HttpAgendaApi::from_settings(&settings).unwrap();
        assert_eq!(api.timeout(), Duration::from_secs(15));
        assert_eq!(
            api.endpoint("consolidated"),
            "http://agenda.internal:5000/api/agenda/consolidated"
        );

        let default = HttpAgendaApi::from_settings(&DashboardSettings::default()).unwrap();
        assert_eq!(default.timeout(), Duration::from_secs(120));
    }

    #[test]
    fn test_error_message_extraction() {
        let body = r#"{"success":false,"code":"SHEETS_ERROR","error":"sheet missing"}"#;
        assert_eq!(error_message(body).as_deref(), Some("sheet missing"));
        assert_eq!(error_message(r#"{"success":false,"error":"  "}"#), None);
        assert_eq!(error_message("<html>bad gateway</html>"), None);
    }
}
