//! Period-over-period growth computation
//!
//! Growth over a zero-valued previous period is a defined null result, not
//! an error and never infinity. `None` is therefore distinguishable from a
//! genuine `Some(0.0)` flat period.

use serde::{Deserialize, Serialize};
use streamlens_common::{PeriodWindow, Result, StreamRecord};
use tracing::debug;

use crate::rollup::{BucketWidth, RollupAggregator};

/// Percentage growth between two totals, `None` when the previous total is zero
pub fn growth_pct(current: f64, previous: f64) -> Option<f64> {
    if previous == 0.0 {
        return None;
    }
    Some((current - previous) / previous * 100.0)
}

/// Render a growth value for display, the null sentinel becomes "n/a"
pub fn format_growth(growth: Option<f64>) -> String {
    match growth {
        Some(pct) if pct >= 0.0 => format!("+{:.1}%", pct),
        Some(pct) => format!("{:.1}%", pct),
        None => "n/a".to_string(),
    }
}

/// Totals of a window and its preceding window of equal length
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodComparison {
    pub window: PeriodWindow,
    pub current_streams: u64,
    pub previous_streams: u64,
    pub current_revenue: f64,
    pub previous_revenue: f64,
    /// Null sentinel when the previous period had zero streams
    pub stream_growth_pct: Option<f64>,
    /// Null sentinel when the previous period had zero revenue
    pub revenue_growth_pct: Option<f64>,
}

/// Compare a window against the adjacent preceding window.
///
/// `current` must contain only records inside `window`, `previous` only
/// records inside `window.preceding()`; anything else fails as invalid input.
pub fn compare_periods(
    window: PeriodWindow,
    current: &[StreamRecord],
    previous: &[StreamRecord],
) -> Result<PeriodComparison> {
    let current_totals = RollupAggregator::new(window, BucketWidth::Day).totals(current)?;
    let previous_totals =
        RollupAggregator::new(window.preceding(), BucketWidth::Day).totals(previous)?;

    debug!(
        window = %window,
        current = current_totals.streams,
        previous = previous_totals.streams,
        "compared adjacent periods"
    );

    Ok(PeriodComparison {
        window,
        current_streams: current_totals.streams,
        previous_streams: previous_totals.streams,
        current_revenue: current_totals.revenue,
        previous_revenue: previous_totals.revenue,
        stream_growth_pct: growth_pct(
            current_totals.streams as f64,
            previous_totals.streams as f64,
        ),
        revenue_growth_pct: growth_pct(current_totals.revenue, previous_totals.revenue),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use streamlens_common::test_utils::{assert_approx_eq, date, record, window};
    use streamlens_common::Platform;

    #[test]
    fn test_growth_pct_basic() {
        assert_approx_eq(growth_pct(150.0, 100.0).unwrap(), 50.0, 1e-9);
        assert_approx_eq(growth_pct(75.0, 100.0).unwrap(), -25.0, 1e-9);
        assert_eq!(growth_pct(100.0, 100.0), Some(0.0));
    }

    #[test]
    fn test_zero_previous_is_null_sentinel_not_infinity() {
        // 0 -> 500 must be the sentinel, not an error and not inf
        assert_eq!(growth_pct(500.0, 0.0), None);
        // and distinguishable from genuine 0% growth
        assert_ne!(growth_pct(0.0, 100.0), None);
    }

    #[test]
    fn test_growth_is_finite_for_nonzero_previous() {
        for previous in [1.0, 10.0, 1e6] {
            for current in [0.0, 5.0, 1e9] {
                let pct = growth_pct(current, previous).unwrap();
                assert!(pct.is_finite());
            }
        }
    }

    #[test]
    fn test_format_growth() {
        assert_eq!(format_growth(Some(12.34)), "+12.3%");
        assert_eq!(format_growth(Some(-4.0)), "-4.0%");
        assert_eq!(format_growth(Some(0.0)), "+0.0%");
        assert_eq!(format_growth(None), "n/a");
    }

    #[test]
    fn test_compare_periods() {
        let win = window(date(2024, 3, 8), date(2024, 3, 15));
        let current = vec![record(Platform::Spotify, date(2024, 3, 9), "song-1", 300)];
        let previous = vec![record(Platform::Spotify, date(2024, 3, 2), "song-1", 200)];

        let comparison = compare_periods(win, &current, &previous).unwrap();
        assert_eq!(comparison.current_streams, 300);
        assert_eq!(comparison.previous_streams, 200);
        assert_approx_eq(comparison.stream_growth_pct.unwrap(), 50.0, 1e-9);
    }

    #[test]
    fn test_compare_periods_with_empty_previous() {
        let win = window(date(2024, 3, 8), date(2024, 3, 15));
        let current = vec![record(Platform::Spotify, date(2024, 3, 9), "song-1", 500)];

        let comparison = compare_periods(win, &current, &[]).unwrap();
        assert_eq!(comparison.stream_growth_pct, None);
        assert_eq!(comparison.revenue_growth_pct, None);
    }

    #[test]
    fn test_compare_periods_rejects_misplaced_records() {
        let win = window(date(2024, 3, 8), date(2024, 3, 15));
        // record dated inside the current window handed in as previous
        let misplaced = vec![record(Platform::Spotify, date(2024, 3, 9), "song-1", 10)];
        assert!(compare_periods(win, &[], &misplaced).is_err());
    }
}
