//! Revenue analytics for the revenue page
//!
//! Per-platform breakdowns, revenue-per-thousand-streams, and a linear
//! projection of upcoming revenue from daily totals.

use serde::{Deserialize, Serialize};
use streamlens_common::{PeriodWindow, Result, StreamRecord};

use crate::rollup::{BucketWidth, RollupAggregator};
use crate::share::{platform_revenue_share, ShareEntry};
use crate::trend::{forecast, ForecastMethod};

/// Revenue summary across one window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueBreakdown {
    pub total_revenue: f64,
    pub average_daily_revenue: f64,
    /// Revenue earned per thousand streams across the window
    pub revenue_per_thousand: f64,
    pub platform_share: Vec<ShareEntry>,
}

/// Revenue per thousand streams, zero when there were no streams
pub fn revenue_per_thousand(streams: u64, revenue: f64) -> f64 {
    if streams == 0 {
        return 0.0;
    }
    revenue / streams as f64 * 1000.0
}

/// Summarize revenue across a window
pub fn revenue_breakdown(
    window: PeriodWindow,
    records: &[StreamRecord],
) -> Result<RevenueBreakdown> {
    let totals = RollupAggregator::new(window, BucketWidth::Day).totals(records)?;

    Ok(RevenueBreakdown {
        total_revenue: totals.revenue,
        average_daily_revenue: totals.revenue / window.days() as f64,
        revenue_per_thousand: revenue_per_thousand(totals.streams, totals.revenue),
        platform_share: platform_revenue_share(records),
    })
}

/// Project revenue for the next `periods` days from the window's daily totals
pub fn project_revenue(
    window: PeriodWindow,
    records: &[StreamRecord],
    periods: usize,
) -> Result<Vec<f64>> {
    let buckets = RollupAggregator::new(window, BucketWidth::Day).aggregate(records)?;
    let daily: Vec<f64> = buckets.iter().map(|b| b.revenue).collect();
    forecast(&daily, periods, ForecastMethod::Linear)
}
