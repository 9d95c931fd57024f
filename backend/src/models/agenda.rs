use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Number of upstream sources combined per schedule date.
pub const SOURCE_COUNT: usize = 3;

/// One schedule date's combined pallet counts across all sources.
///
/// Counts are optional on the wire: a missing value is read as zero by the
/// dashboard. `total_count` is trusted from upstream and never recomputed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsolidatedRecord {
    /// Schedule date in `DD/MM/YYYY` form
    pub schedule_date: String,
    #[serde(default)]
    pub source1_count: Option<u32>,
    #[serde(default)]
    pub source2_count: Option<u32>,
    #[serde(default)]
    pub source3_count: Option<u32>,
    #[serde(default)]
    pub total_count: Option<u32>,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

impl ConsolidatedRecord {
    /// Empty record for a schedule date, with every count at zero.
    pub fn zeroed(schedule_date: impl Into<String>) -> Self {
        Self {
            schedule_date: schedule_date.into(),
            source1_count: Some(0),
            source2_count: Some(0),
            source3_count: Some(0),
            total_count: Some(0),
            last_updated: None,
        }
    }

    /// Count of the source at `index` (0-based), zero when absent.
    pub fn source_count(&self, index: usize) -> u32 {
        let value = match index {
            0 => self.source1_count,
            1 => self.source2_count,
            2 => self.source3_count,
            _ => None,
        };
        value.unwrap_or(0)
    }

    /// Add `amount` to the source at `index` (0-based) and to the total.
    ///
    /// Indices outside the known sources only touch the total.
    pub fn add_to_source(&mut self, index: usize, amount: u32) {
        let slot = match index {
            0 => Some(&mut self.source1_count),
            1 => Some(&mut self.source2_count),
            2 => Some(&mut self.source3_count),
            _ => None,
        };
        if let Some(slot) = slot {
            *slot = Some(slot.unwrap_or(0).saturating_add(amount));
        }
        self.total_count = Some(self.total_count.unwrap_or(0).saturating_add(amount));
    }
}

/// Flat record consumed by the chart and the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartRecord {
    pub display_date: String,
    pub total: u32,
    /// Counts indexed by source
    pub per_source: [u32; SOURCE_COUNT],
}

/// Optional inclusive date bounds. An absent bound is unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    /// Range with neither bound set.
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Whether `date` lies inside the inclusive bounds.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |start| date >= start) && self.end.map_or(true, |end| date <= end)
    }
}

/// Summary statistics over a list of chart records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub total: u64,
    pub mean: u64,
    pub max: u64,
    pub min: u64,
}
