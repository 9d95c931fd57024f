//! Spreadsheet access.
//!
//! A [`SheetReader`] returns one tab of a spreadsheet as header-keyed rows.
//! [`GoogleSheetsClient`] implements it against the Google Sheets v4 values
//! API; tests substitute [`StaticSheetReader`].

mod client;

pub use client::{GoogleSheetsClient, RetryPolicy};

use async_trait::async_trait;
use std::collections::HashMap;

/// One data row of a sheet, keyed by the header row's cell text.
pub type SheetRow = HashMap<String, String>;

#[derive(Debug, thiserror::Error)]
pub enum SheetsError {
    #[error("HTTP: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Sheets API error {status} reading '{sheet}': {message}")]
    Api {
        sheet: String,
        status: u16,
        message: String,
    },
    #[error("Sheet '{0}' not found")]
    SheetNotFound(String),
    #[error("Sheets client is not configured: {0}")]
    NotConfigured(String),
}

/// Source of spreadsheet rows.
#[async_trait]
pub trait SheetReader: Send + Sync {
    /// Read every data row of `sheet`.
    async fn read_sheet(&self, sheet: &str) -> Result<Vec<SheetRow>, SheetsError>;
}

/// Turn a raw values grid into header-keyed rows.
///
/// The first row is the header. Cells missing at the end of a shorter row
/// are filled with empty strings; extra cells beyond the header are dropped.
pub fn rows_from_values(values: Vec<Vec<String>>) -> Vec<SheetRow> {
    let mut iter = values.into_iter();
    let Some(headers) = iter.next() else {
        return Vec::new();
    };

    iter.map(|cells| {
        let mut cells = cells.into_iter();
        headers
            .iter()
            .map(|header| (header.clone(), cells.next().unwrap_or_default()))
            .collect()
    })
    .collect()
}

/// In-memory reader serving fixed rows per sheet name.
#[derive(Debug, Clone, Default)]
pub struct StaticSheetReader {
    sheets: HashMap<String, Vec<SheetRow>>,
}

impl StaticSheetReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a sheet from a header row and data rows.
    pub fn with_sheet(mut self, name: &str, headers: &[&str], rows: &[&[&str]]) -> Self {
        let mut values = vec![headers.iter().map(|h| h.to_string()).collect::<Vec<_>>()];
        values.extend(
            rows.iter()
                .map(|row| row.iter().map(|cell| cell.to_string()).collect::<Vec<_>>()),
        );
        self.sheets.insert(name.to_string(), rows_from_values(values));
        self
    }
}

#[async_trait]
impl SheetReader for StaticSheetReader {
    async fn read_sheet(&self, sheet: &str) -> Result<Vec<SheetRow>, SheetsError> {
        self.sheets
            .get(sheet)
            .cloned()
            .ok_or_else(|| SheetsError::SheetNotFound(sheet.to_string()))
    }
}
