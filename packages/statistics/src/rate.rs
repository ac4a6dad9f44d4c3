//! Congestion rate arithmetic.

/// Rounds to two decimal places, halves to even.
#[must_use]
pub fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// `pending / (pending + closed) * 100`, rounded to two decimals.
///
/// Returns `None` when both counts are zero.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn congestion_rate(pending: u64, closed: u64) -> Option<f64> {
    let total = pending + closed;
    if total == 0 {
        return None;
    }
    Some(round_to_hundredths(pending as f64 / total as f64 * 100.0))
}

/// Like [`congestion_rate`], but `0` when both counts are zero.
///
/// Snapshot tables use this so that every row, including the totals row,
/// carries a number.
#[must_use]
pub fn congestion_rate_or_zero(pending: u64, closed: u64) -> f64 {
    congestion_rate(pending, closed).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_pending_is_fifty_percent() {
        assert_eq!(congestion_rate(1, 1), Some(50.0));
    }

    #[test]
    fn rounds_to_two_decimals() {
        assert_eq!(congestion_rate(1, 2), Some(33.33));
        assert_eq!(congestion_rate(2, 1), Some(66.67));
        assert_eq!(congestion_rate(1, 6), Some(14.29));
    }

    #[test]
    fn halves_round_to_even() {
        // 1/32 and 5/32 scale to exact halves
        assert_eq!(congestion_rate(1, 31), Some(3.12));
        assert_eq!(congestion_rate(5, 27), Some(15.62));
        assert!((round_to_hundredths(0.375) - 0.38).abs() < f64::EPSILON);
    }

    #[test]
    fn bounds() {
        assert_eq!(congestion_rate(5, 0), Some(100.0));
        assert_eq!(congestion_rate(0, 5), Some(0.0));
    }

    #[test]
    fn zero_denominator_policies() {
        assert_eq!(congestion_rate(0, 0), None);
        assert!(congestion_rate_or_zero(0, 0).abs() < f64::EPSILON);
    }

    #[test]
    fn rate_stays_within_percentage_range() {
        for pending in 0..40u64 {
            for closed in 0..40u64 {
                if let Some(rate) = congestion_rate(pending, closed) {
                    assert!(
                        (0.0..=100.0).contains(&rate),
                        "{pending}/{closed} gave {rate}"
                    );
                }
            }
        }
    }
}
