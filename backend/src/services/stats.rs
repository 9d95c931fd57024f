//! Summary statistics over chart records.

use crate::models::{ChartRecord, Stats};

/// Compute total, mean, max and min of the record totals.
///
/// An empty slice yields all-zero stats. The mean is rounded half up.
pub fn compute_stats(records: &[ChartRecord]) -> Stats {
    if records.is_empty() {
        return Stats::default();
    }

    let mut total: u64 = 0;
    let mut max = u64::MIN;
    let mut min = u64::MAX;
    for record in records {
        let value = u64::from(record.total);
        total += value;
        max = max.max(value);
        min = min.min(value);
    }

    Stats {
        total,
        mean: round_half_up_div(total, records.len() as u64),
        max,
        min,
    }
}

/// `round(numerator / denominator)` with halves rounded up.
fn round_half_up_div(numerator: u64, denominator: u64) -> u64 {
    (2 * numerator + denominator) / (2 * denominator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn chart(total: u32) -> ChartRecord {
        ChartRecord {
            display_date: "01/01/2024".to_string(),
            total,
            per_source: [total, 0, 0],
        }
    }

    #[test]
    fn test_empty_is_zero() {
        assert_eq!(
            compute_stats(&[]),
            Stats {
                total: 0,
                mean: 0,
                max: 0,
                min: 0
            }
        );
    }

    #[test]
    fn test_basic_stats() {
        let stats = compute_stats(&[chart(10), chart(30), chart(20)]);
        assert_eq!(stats.total, 60);
        assert_eq!(stats.mean, 20);
        assert_eq!(stats.max, 30);
        assert_eq!(stats.min, 10);
    }

    #[test]
    fn test_mean_rounds_half_up() {
        // 5 / 2 = 2.5
        assert_eq!(compute_stats(&[chart(2), chart(3)]).mean, 3);
        // 7 / 3 = 2.33
        assert_eq!(compute_stats(&[chart(2), chart(2), chart(3)]).mean, 2);
        // 8 / 3 = 2.67
        assert_eq!(compute_stats(&[chart(2), chart(3), chart(3)]).mean, 3);
    }

    #[test]
    fn test_single_record() {
        let stats = compute_stats(&[chart(42)]);
        assert_eq!(stats, Stats { total: 42, mean: 42, max: 42, min: 42 });
    }

    #[test]
    fn test_large_totals_do_not_overflow() {
        let stats = compute_stats(&[chart(u32::MAX), chart(u32::MAX)]);
        assert_eq!(stats.total, 2 * u64::from(u32::MAX));
        assert_eq!(stats.mean, u64::from(u32::MAX));
    }

    proptest! {
        #[test]
        fn prop_order_independent(mut totals in proptest::collection::vec(0u32..10_000, 0..40)) {
            let forward: Vec<ChartRecord> = totals.iter().copied().map(chart).collect();
            totals.reverse();
            let mid = totals.len() / 2;
            totals.rotate_left(mid);
            let shuffled: Vec<ChartRecord> = totals.iter().copied().map(chart).collect();
            prop_assert_eq!(compute_stats(&forward), compute_stats(&shuffled));
        }

        #[test]
        fn prop_min_le_mean_le_max(totals in proptest::collection::vec(0u32..10_000, 1..40)) {
            let records: Vec<ChartRecord> = totals.into_iter().map(chart).collect();
            let stats = compute_stats(&records);
            prop_assert!(stats.min <= stats.mean);
            prop_assert!(stats.mean <= stats.max);
        }
    }
}
