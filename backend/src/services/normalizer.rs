//! Conversion of consolidated records into chart/table records.

use crate::models::{parse_schedule_date, ChartRecord, ConsolidatedRecord, SOURCE_COUNT};

/// Map a consolidated record into a flat chart record.
///
/// Absent counts are read as zero. The total is taken as provided.
pub fn normalize(record: &ConsolidatedRecord) -> ChartRecord {
    let mut per_source = [0u32; SOURCE_COUNT];
    for (index, slot) in per_source.iter_mut().enumerate() {
        *slot = record.source_count(index);
    }

    ChartRecord {
        display_date: record.schedule_date.clone(),
        total: record.total_count.unwrap_or(0),
        per_source,
    }
}

/// Sort chart records ascending by parsed schedule date.
///
/// The sort is stable; records with malformed dates sort first.
pub fn sort_by_schedule_date(records: &mut [ChartRecord]) {
    records.sort_by_cached_key(|record| parse_schedule_date(&record.display_date));
}

/// Normalize every record, then sort the result by schedule date.
pub fn normalize_and_sort(records: &[ConsolidatedRecord]) -> Vec<ChartRecord> {
    let mut chart: Vec<ChartRecord> = records.iter().map(normalize).collect();
    sort_by_schedule_date(&mut chart);
    chart
}
