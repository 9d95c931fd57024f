mod support;

use chrono::NaiveDate;

use agenda_cad::models::{
    format_schedule_date, parse_schedule_date, ConsolidatedRecord, DateRange, Stats,
};
use agenda_cad::services::{compute_stats, filter_by_range, normalize, normalize_and_sort};
use support::march_records;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_sorted_pipeline_over_all_records() {
    let chart = normalize_and_sort(&march_records());

    let dates: Vec<_> = chart.iter().map(|r| r.display_date.as_str()).collect();
    assert_eq!(dates, vec!["01/03/2024", "02/03/2024", "03/03/2024"]);
    assert_eq!(
        compute_stats(&chart),
        Stats {
            total: 60,
            mean: 20,
            max: 30,
            min: 10
        }
    );
}

#[test]
fn test_start_bound_pipeline() {
    let chart = normalize_and_sort(&march_records());
    let filtered = filter_by_range(&chart, &DateRange::new(Some(date(2024, 3, 2)), None));

    let totals: Vec<_> = filtered.iter().map(|r| r.total).collect();
    assert_eq!(totals, vec![20, 30]);
    assert_eq!(
        compute_stats(&filtered),
        Stats {
            total: 50,
            mean: 25,
            max: 30,
            min: 20
        }
    );
}

#[test]
fn test_single_day_range() {
    let chart = normalize_and_sort(&march_records());
    let day = date(2024, 3, 3);
    let filtered = filter_by_range(&chart, &DateRange::new(Some(day), Some(day)));

    assert_eq!(filtered.len(), 1);
    assert_eq!(parse_schedule_date(&filtered[0].display_date), day);
}

#[test]
fn test_missing_sources_read_as_zero() {
    let record = ConsolidatedRecord {
        schedule_date: "05/04/2024".to_string(),
        source1_count: Some(5),
        source2_count: None,
        source3_count: None,
        total_count: Some(5),
        last_updated: None,
    };

    let chart = normalize(&record);
    assert_eq!(chart.per_source, [5, 0, 0]);
    assert_eq!(chart.total, 5);
    assert_eq!(format_schedule_date(parse_schedule_date(&chart.display_date)), "05/04/2024");
}

#[test]
fn test_malformed_dates_sort_first_and_survive_unbounded_filter() {
    let mut records = march_records();
    records.push(support::record("2024-03-01", 7));

    let chart = normalize_and_sort(&records);
    assert_eq!(chart[0].display_date, "2024-03-01");

    let unfiltered = filter_by_range(&chart, &DateRange::unbounded());
    assert_eq!(unfiltered, chart);

    // Epoch sentinel falls outside any 2024 range
    let filtered = filter_by_range(&chart, &DateRange::new(Some(date(2024, 1, 1)), None));
    assert_eq!(filtered.len(), 3);
}
