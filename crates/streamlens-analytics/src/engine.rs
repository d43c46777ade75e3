//! Convenience facade assembling dashboard metrics
//!
//! Each dashboard render triggers one pass over the currently loaded
//! snapshot: independent pure computations, no shared mutable state.

use std::collections::HashMap;
use streamlens_common::{AggregatedMetric, PeriodWindow, Platform, Result, StreamRecord};
use tracing::{info, instrument};

use crate::growth::compare_periods;
use crate::ranking::{RankedEntry, TopRanking};
use crate::rollup::{BucketWidth, PlatformTotals, RollupAggregator, StreamBucket};
use crate::share::{platform_stream_share, ShareEntry};

/// Analytics engine for one immutable input snapshot
#[derive(Debug, Clone)]
pub struct AnalyticsEngine {
    top_n: usize,
}

impl AnalyticsEngine {
    pub fn new(top_n: usize) -> Self {
        Self { top_n }
    }

    /// Daily buckets for the window's stream chart
    pub fn daily_buckets(
        &self,
        window: PeriodWindow,
        records: &[StreamRecord],
    ) -> Result<Vec<StreamBucket>> {
        RollupAggregator::new(window, BucketWidth::Day).aggregate(records)
    }

    /// Platform share of streams for the window's pie chart
    pub fn platform_shares(&self, records: &[StreamRecord]) -> Vec<ShareEntry> {
        platform_stream_share(records)
    }

    /// Top songs for the content page
    pub fn top_songs(&self, records: &[StreamRecord]) -> Vec<RankedEntry> {
        TopRanking::new(self.top_n).top_songs(records)
    }

    /// Window-wide totals per platform
    pub fn platform_totals(
        &self,
        window: PeriodWindow,
        records: &[StreamRecord],
    ) -> Result<HashMap<Platform, PlatformTotals>> {
        RollupAggregator::new(window, BucketWidth::Day).totals_by_platform(records)
    }

    /// Headline metrics for the overview page: totals for the window with
    /// the preceding window's totals attached for growth display.
    ///
    /// `current` holds the window's records, `previous` the preceding
    /// window's; either may be empty.
    #[instrument(skip(self, current, previous), fields(window = %window))]
    pub fn overview_metrics(
        &self,
        window: PeriodWindow,
        current: &[StreamRecord],
        previous: &[StreamRecord],
    ) -> Result<Vec<AggregatedMetric>> {
        let comparison = compare_periods(window, current, previous)?;

        let metrics = vec![
            AggregatedMetric::new("total_streams", window, comparison.current_streams as f64)
                .with_previous(comparison.previous_streams as f64),
            AggregatedMetric::new("total_revenue", window, comparison.current_revenue)
                .with_previous(comparison.previous_revenue),
            AggregatedMetric::new(
                "average_daily_streams",
                window,
                comparison.current_streams as f64 / window.days() as f64,
            )
            .with_previous(comparison.previous_streams as f64 / window.days() as f64),
        ];

        info!("assembled {} overview metrics", metrics.len());
        Ok(metrics)
    }
}

impl Default for AnalyticsEngine {
    fn default() -> Self {
        Self::new(10)
    }
}
