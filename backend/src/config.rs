//! Application configuration.
//!
//! Settings are read from a TOML file and then overridden by environment
//! variables. Every section has defaults matching the production spreadsheet
//! layout, so an empty file (or no file at all) is a valid configuration.
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 5000
//!
//! [sheets]
//! spreadsheet_id = "..."
//! api_key = "..."
//!
//! [[sheets.sources]]
//! sheet = "Base1"
//! date_column = "Data Agenda"
//! status_filter = "aprovado"
//! source_index = 0
//!
//! [consolidation]
//! weekday_bonus = 100
//! bonus_weekdays = ["Wed", "Fri"]
//!
//! [sync]
//! on_startup = true
//!
//! [database]
//! url = "postgres://agenda@localhost/agenda"
//!
//! [dashboard]
//! api_url = "http://localhost:5000"
//! timeout_secs = 120
//! ```

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::models::SOURCE_COUNT;

/// Default Google Sheets v4 endpoint.
pub const DEFAULT_SHEETS_API_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// Environment variable pointing at an explicit configuration file.
pub const CONFIG_PATH_ENV: &str = "AGENDA_CONFIG";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub sheets: SheetsSettings,
    #[serde(default)]
    pub consolidation: ConsolidationSettings,
    #[serde(default)]
    pub sync: SyncSettings,
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub dashboard: DashboardSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

/// Spreadsheet access settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetsSettings {
    #[serde(default = "default_sheets_api_url")]
    pub api_url: String,
    #[serde(default)]
    pub spreadsheet_id: String,
    #[serde(default)]
    pub api_key: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_sources")]
    pub sources: Vec<SheetSource>,
}

impl Default for SheetsSettings {
    fn default() -> Self {
        Self {
            api_url: default_sheets_api_url(),
            spreadsheet_id: String::new(),
            api_key: String::new(),
            timeout_secs: default_timeout_secs(),
            max_attempts: default_max_attempts(),
            sources: default_sources(),
        }
    }
}

fn default_sheets_api_url() -> String {
    DEFAULT_SHEETS_API_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    20
}

fn default_max_attempts() -> u32 {
    3
}

/// One spreadsheet tab feeding a source slot of the consolidated record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetSource {
    pub sheet: String,
    #[serde(default = "default_date_column")]
    pub date_column: String,
    #[serde(default = "default_count_column")]
    pub count_column: String,
    #[serde(default = "default_status_column")]
    pub status_column: String,
    /// Rows are kept only when the status matches (case-insensitive)
    #[serde(default)]
    pub status_filter: Option<String>,
    /// 0-based slot in the consolidated record
    pub source_index: usize,
}

impl SheetSource {
    pub fn new(sheet: impl Into<String>, source_index: usize) -> Self {
        Self {
            sheet: sheet.into(),
            date_column: default_date_column(),
            count_column: default_count_column(),
            status_column: default_status_column(),
            status_filter: None,
            source_index,
        }
    }

    pub fn with_date_column(mut self, column: impl Into<String>) -> Self {
        self.date_column = column.into();
        self
    }

    pub fn with_status_filter(mut self, status: impl Into<String>) -> Self {
        self.status_filter = Some(status.into());
        self
    }
}

fn default_date_column() -> String {
    "Data Agenda".to_string()
}

fn default_count_column() -> String {
    "Pallet".to_string()
}

fn default_status_column() -> String {
    "Status".to_string()
}

fn default_sources() -> Vec<SheetSource> {
    vec![
        SheetSource::new("Base1", 0).with_status_filter("aprovado"),
        SheetSource::new("Base2", 1).with_status_filter("aprovado"),
        SheetSource::new("Base3", 2).with_date_column("Data"),
    ]
}

/// Consolidation rules applied after merging all sources.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsolidationSettings {
    /// Pallets added on bonus weekdays (0 disables the bonus)
    #[serde(default = "default_weekday_bonus")]
    pub weekday_bonus: u32,
    #[serde(default = "default_bonus_weekdays")]
    pub bonus_weekdays: Vec<Weekday>,
    /// Source slot receiving the bonus
    #[serde(default = "default_bonus_source_index")]
    pub bonus_source_index: usize,
}

impl Default for ConsolidationSettings {
    fn default() -> Self {
        Self {
            weekday_bonus: default_weekday_bonus(),
            bonus_weekdays: default_bonus_weekdays(),
            bonus_source_index: default_bonus_source_index(),
        }
    }
}

fn default_weekday_bonus() -> u32 {
    100
}

fn default_bonus_weekdays() -> Vec<Weekday> {
    vec![Weekday::Wed, Weekday::Fri]
}

fn default_bonus_source_index() -> usize {
    2
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncSettings {
    /// Run one sync when the server starts
    #[serde(default)]
    pub on_startup: bool,
}

/// Persistent storage settings.
///
/// Without a URL the agenda is kept in memory and lost on restart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSettings {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_max_pool_size")]
    pub max_pool_size: u32,
    #[serde(default = "default_connection_timeout_secs")]
    pub connection_timeout_secs: u64,
    /// Retries for transient failures, per operation
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl DatabaseSettings {
    /// The configured URL, ignoring blank values.
    pub fn url(&self) -> Option<&str> {
        self.url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: None,
            max_pool_size: default_max_pool_size(),
            connection_timeout_secs: default_connection_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }
}

fn default_max_pool_size() -> u32 {
    10
}

fn default_connection_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

/// How the dashboard reaches the agenda server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSettings {
    #[serde(default = "default_dashboard_api_url")]
    pub api_url: String,
    /// Per-request timeout in seconds; a sync reads every sheet before answering
    #[serde(default = "default_dashboard_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            api_url: default_dashboard_api_url(),
            timeout_secs: default_dashboard_timeout_secs(),
        }
    }
}

fn default_dashboard_api_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_dashboard_timeout_secs() -> u64 {
    120
}

impl AppConfig {
    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Load configuration the way the server binary does.
    ///
    /// Uses `AGENDA_CONFIG` when set, otherwise the first of `agenda.toml` or
    /// `backend/agenda.toml` that exists, otherwise defaults. Environment
    /// overrides are applied last.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::from_file(path)?,
            Err(_) => {
                let search_paths = [PathBuf::from("agenda.toml"), PathBuf::from("backend/agenda.toml")];
                match search_paths.iter().find(|path| path.exists()) {
                    Some(path) => Self::from_file(path)?,
                    None => Self::default(),
                }
            }
        };
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `HOST`, `PORT`, `SPREADSHEET_ID`, `GOOGLE_SHEETS_API_KEY`,
    /// `SHEETS_API_URL` and `DATABASE_URL` from the environment.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(host) = env::var("HOST") {
            self.server.host = host;
        }
        if let Ok(port) = env::var("PORT") {
            self.server.port = port.parse().map_err(|_| ConfigError::InvalidValue {
                key: "PORT".to_string(),
                message: format!("'{}' is not a valid port number", port),
            })?;
        }
        if let Ok(id) = env::var("SPREADSHEET_ID") {
            self.sheets.spreadsheet_id = id;
        }
        if let Ok(key) = env::var("GOOGLE_SHEETS_API_KEY") {
            self.sheets.api_key = key;
        }
        if let Ok(url) = env::var("SHEETS_API_URL") {
            self.sheets.api_url = url;
        }
        if let Ok(url) = env::var("DATABASE_URL") {
            self.database.url = Some(url);
        }
        Ok(())
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sheets.sources.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "sheets.sources".to_string(),
                message: "at least one source sheet is required".to_string(),
            });
        }
        for source in &self.sheets.sources {
            if source.source_index >= SOURCE_COUNT {
                return Err(ConfigError::InvalidValue {
                    key: format!("sheets.sources[{}].source_index", source.sheet),
                    message: format!("must be below {}", SOURCE_COUNT),
                });
            }
        }
        if self.dashboard.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "dashboard.timeout_secs".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.consolidation.bonus_source_index >= SOURCE_COUNT {
            return Err(ConfigError::InvalidValue {
                key: "consolidation.bonus_source_index".to_string(),
                message: format!("must be below {}", SOURCE_COUNT),
            });
        }
        Ok(())
    }

    /// Socket address string for the HTTP listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
