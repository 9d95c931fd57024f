//! Consolidation of spreadsheet rows into one record per schedule date.
//!
//! Each configured source sheet contributes its pallet counts to a fixed
//! slot of the consolidated record. After merging, the weekday bonus is
//! applied and the result is sorted by schedule date.

use chrono::Datelike;
use std::collections::HashMap;
use tracing::{debug, info};

use crate::config::{ConsolidationSettings, SheetSource};
use crate::models::{parse_schedule_date, try_parse_schedule_date, ConsolidatedRecord};
use crate::sheets::{SheetReader, SheetRow, SheetsError};

/// Parse a pallet count cell.
///
/// Only a non-empty run of ASCII digits counts; anything else is zero.
pub fn parse_pallet_count(cell: &str) -> u32 {
    let cell = cell.trim();
    if cell.is_empty() || !cell.bytes().all(|b| b.is_ascii_digit()) {
        return 0;
    }
    cell.parse().unwrap_or(0)
}

/// Case-insensitive exact match; surrounding whitespace makes the row fail.
fn status_matches(row: &SheetRow, source: &SheetSource) -> bool {
    match &source.status_filter {
        None => true,
        Some(expected) => row
            .get(&source.status_column)
            .map(|status| status.eq_ignore_ascii_case(expected))
            .unwrap_or(false),
    }
}

/// Merges rows from several sources keyed by schedule date.
///
/// Records are kept in first-seen order until [`Consolidator::finish`].
#[derive(Debug, Default)]
pub struct Consolidator {
    records: Vec<ConsolidatedRecord>,
    index: HashMap<String, usize>,
}

impl Consolidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add every accepted row of one source sheet. Returns the number of rows accepted.
    pub fn add_rows(&mut self, source: &SheetSource, rows: &[SheetRow]) -> usize {
        let mut accepted = 0;
        for row in rows {
            if !status_matches(row, source) {
                continue;
            }
            let Some(date) = row.get(&source.date_column).filter(|d| !d.is_empty()) else {
                continue;
            };
            let count = row
                .get(&source.count_column)
                .map(|cell| parse_pallet_count(cell))
                .unwrap_or(0);

            self.entry(date).add_to_source(source.source_index, count);
            accepted += 1;
        }
        accepted
    }

    fn entry(&mut self, date: &str) -> &mut ConsolidatedRecord {
        let position = match self.index.get(date) {
            Some(&position) => position,
            None => {
                self.records.push(ConsolidatedRecord::zeroed(date));
                self.index.insert(date.to_string(), self.records.len() - 1);
                self.records.len() - 1
            }
        };
        &mut self.records[position]
    }

    /// Apply the weekday bonus and return records sorted by schedule date.
    pub fn finish(self, settings: &ConsolidationSettings) -> Vec<ConsolidatedRecord> {
        let mut records = self.records;
        apply_weekday_bonus(&mut records, settings);
        sort_records(&mut records);
        records
    }
}

/// Add the configured bonus to records falling on a bonus weekday.
///
/// Records whose date cannot be parsed never receive the bonus.
pub fn apply_weekday_bonus(records: &mut [ConsolidatedRecord], settings: &ConsolidationSettings) {
    if settings.weekday_bonus == 0 {
        return;
    }
    for record in records.iter_mut() {
        let Some(date) = try_parse_schedule_date(&record.schedule_date) else {
            continue;
        };
        if settings.bonus_weekdays.contains(&date.weekday()) {
            record.add_to_source(settings.bonus_source_index, settings.weekday_bonus);
        }
    }
}

/// Stable ascending sort by parsed schedule date; malformed dates first.
pub fn sort_records(records: &mut [ConsolidatedRecord]) {
    records.sort_by_cached_key(|record| parse_schedule_date(&record.schedule_date));
}

/// Read every source sheet and consolidate the rows.
///
/// A sheet that cannot be read aborts the whole consolidation.
pub async fn consolidate(
    reader: &dyn SheetReader,
    sources: &[SheetSource],
    settings: &ConsolidationSettings,
) -> Result<Vec<ConsolidatedRecord>, SheetsError> {
    let mut consolidator = Consolidator::new();
    for source in sources {
        let rows = reader.read_sheet(&source.sheet).await?;
        let accepted = consolidator.add_rows(source, &rows);
        debug!(
            sheet = %source.sheet,
            rows = rows.len(),
            accepted,
            "consolidated sheet"
        );
    }

    let records = consolidator.finish(settings);
    info!("Consolidated {} schedule dates from {} sheets", records.len(), sources.len());
    Ok(records)
}
