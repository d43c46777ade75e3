//! Metric aggregation and rollups for streamlens
//!
//! Pure data-shaping: every operation reads an immutable record snapshot and
//! returns new values. Nothing here performs I/O or mutates shared state.

pub mod demographics;
pub mod engagement;
pub mod engine;
pub mod growth;
pub mod ranking;
pub mod revenue;
pub mod rollup;
pub mod share;
pub mod trend;

pub use demographics::{audience_breakdown, AudienceBreakdown};
pub use engagement::{engagement_score, EngagementInput};
pub use engine::AnalyticsEngine;
pub use growth::{compare_periods, format_growth, growth_pct, PeriodComparison};
pub use ranking::{RankedEntry, TopRanking};
pub use revenue::{project_revenue, revenue_breakdown, revenue_per_thousand, RevenueBreakdown};
pub use rollup::{BucketWidth, PlatformTotals, RollupAggregator, StreamBucket};
pub use share::{platform_revenue_share, platform_stream_share, share_of_total, ShareEntry};
pub use trend::{cumulative_sum, forecast, running_average, ForecastMethod};
