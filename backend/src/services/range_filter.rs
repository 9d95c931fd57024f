//! Client-side date range filtering of chart records.

use crate::models::{parse_schedule_date, ChartRecord, DateRange};

/// Keep the records whose schedule date falls within `range`.
///
/// Bounds are inclusive. With both bounds absent the input is returned
/// unchanged. Input order is preserved; an inverted range (start after end)
/// selects nothing.
pub fn filter_by_range(records: &[ChartRecord], range: &DateRange) -> Vec<ChartRecord> {
    if range.is_unbounded() {
        return records.to_vec();
    }

    records
        .iter()
        .filter(|record| range.contains(parse_schedule_date(&record.display_date)))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn chart(date: &str, total: u32) -> ChartRecord {
        ChartRecord {
            display_date: date.to_string(),
            total,
            per_source: [total, 0, 0],
        }
    }

    fn march(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    fn sorted_fixture() -> Vec<ChartRecord> {
        vec![
            chart("01/03/2024", 10),
            chart("02/03/2024", 20),
            chart("03/03/2024", 30),
        ]
    }

    fn totals(records: &[ChartRecord]) -> Vec<u32> {
        records.iter().map(|r| r.total).collect()
    }

    #[test]
    fn test_unbounded_is_identity() {
        let input = vec![chart("03/03/2024", 30), chart("bad", 1), chart("01/03/2024", 10)];
        let output = filter_by_range(&input, &DateRange::unbounded());
        assert_eq!(output, input);
    }

    #[test]
    fn test_start_only() {
        let range = DateRange::new(Some(march(2)), None);
        assert_eq!(totals(&filter_by_range(&sorted_fixture(), &range)), vec![20, 30]);
    }

    #[test]
    fn test_end_only() {
        let range = DateRange::new(None, Some(march(2)));
        assert_eq!(totals(&filter_by_range(&sorted_fixture(), &range)), vec![10, 20]);
    }

    #[test]
    fn test_closed_interval_includes_endpoints() {
        let range = DateRange::new(Some(march(1)), Some(march(3)));
        assert_eq!(totals(&filter_by_range(&sorted_fixture(), &range)), vec![10, 20, 30]);
    }

    #[test]
    fn test_single_day_interval() {
        let mut input = sorted_fixture();
        input.push(chart("02/03/2024", 25));
        let range = DateRange::new(Some(march(2)), Some(march(2)));
        assert_eq!(totals(&filter_by_range(&input, &range)), vec![20, 25]);
    }

    #[test]
    fn test_inverted_range_is_empty() {
        let range = DateRange::new(Some(march(3)), Some(march(1)));
        assert!(filter_by_range(&sorted_fixture(), &range).is_empty());
    }

    #[test]
    fn test_malformed_dates_behave_as_epoch() {
        let input = vec![chart("bad", 1), chart("01/03/2024", 10)];
        let start_only = DateRange::new(Some(march(1)), None);
        assert_eq!(totals(&filter_by_range(&input, &start_only)), vec![10]);

        let end_only = DateRange::new(None, Some(march(1)));
        assert_eq!(totals(&filter_by_range(&input, &end_only)), vec![1, 10]);
    }
}
