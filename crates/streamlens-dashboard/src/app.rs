//! Dashboard application: fetch a snapshot, run the analytics, keep going
//! when individual platforms or pages fail
//!
//! All platforms are queried concurrently. A platform that reports itself
//! unavailable or rejects its credentials contributes nothing to the
//! snapshot, and a page computation that fails on bad input takes down
//! only that page; the report renders placeholder lines for both instead
//! of aborting the run.

use futures::future::join_all;
use streamlens_analytics::{
    audience_breakdown, project_revenue, revenue_breakdown, AnalyticsEngine, AudienceBreakdown,
    RankedEntry, RevenueBreakdown, ShareEntry, StreamBucket,
};
use streamlens_common::{
    AggregatedMetric, DemographicSlice, PeriodWindow, Platform, Result, StreamRecord,
};
use streamlens_config::{Config, SourceKind};
use streamlens_sources::{
    build_source, ApiClientConfig, ApiClientConfigOption, LiveSourceConfig, PlatformCredentials,
    SourceStrategy, StreamSource,
};
use tracing::{info, instrument, warn};

/// Days of revenue projected past the end of the window
const PROJECTION_DAYS: usize = 7;

/// One snapshot of raw data for a window, with per-platform failures kept
/// alongside the records that did arrive
#[derive(Debug, Default)]
pub struct Snapshot {
    pub records: Vec<StreamRecord>,
    pub demographics: Vec<DemographicSlice>,
    /// Platforms that failed, with the failure message shown in the report
    pub unavailable: Vec<(Platform, String)>,
}

/// Everything the report renderer needs for one dashboard run
#[derive(Debug)]
pub struct DashboardData {
    pub window: PeriodWindow,
    pub overview: Vec<AggregatedMetric>,
    pub daily_buckets: Vec<StreamBucket>,
    pub platform_shares: Vec<ShareEntry>,
    pub top_songs: Vec<RankedEntry>,
    pub audience: AudienceBreakdown,
    /// `None` when the revenue page failed to compute
    pub revenue: Option<RevenueBreakdown>,
    pub projected_revenue: Vec<f64>,
    pub unavailable: Vec<(Platform, String)>,
    /// Pages whose computation failed, with the failure message shown in
    /// place of the page content
    pub failed_pages: Vec<(&'static str, String)>,
    pub source_name: String,
}

impl DashboardData {
    /// The failure message for a page, if its computation failed
    pub fn page_failure(&self, page: &str) -> Option<&str> {
        self.failed_pages
            .iter()
            .find(|(name, _)| *name == page)
            .map(|(_, reason)| reason.as_str())
    }
}

/// Unwrap a page computation, recording a failure placeholder instead of
/// propagating the error
fn page<T>(
    failed: &mut Vec<(&'static str, String)>,
    name: &'static str,
    result: Result<T>,
) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(page = name, error = %e, "page computation failed");
            failed.push((name, e.to_string()));
            None
        }
    }
}

/// Dashboard application wiring a data source to the analytics engine
pub struct DashboardApp {
    source: Box<dyn StreamSource>,
    engine: AnalyticsEngine,
}

impl DashboardApp {
    pub fn new(config: &Config) -> Result<Self> {
        let source = build_source(source_strategy(config))?;
        Ok(Self::with_source(source, config.analytics.top_n))
    }

    /// Build an app around an already-constructed data source
    pub fn with_source(source: Box<dyn StreamSource>, top_n: usize) -> Self {
        Self {
            source,
            engine: AnalyticsEngine::new(top_n),
        }
    }

    /// Fetch the window's snapshot from every platform concurrently.
    /// Failed platforms are recorded, not propagated.
    async fn fetch_snapshot(&self, window: PeriodWindow) -> Snapshot {
        let stream_fetches = join_all(
            Platform::ALL
                .iter()
                .map(|&platform| async move { (platform, self.source.fetch(platform, window).await) }),
        );
        let demographic_fetches = join_all(Platform::ALL.iter().map(|&platform| async move {
            (
                platform,
                self.source.fetch_demographics(platform, window).await,
            )
        }));
        let (stream_results, demographic_results) =
            futures::join!(stream_fetches, demographic_fetches);

        let mut snapshot = Snapshot::default();
        for (platform, result) in stream_results {
            match result {
                Ok(records) => snapshot.records.extend(records),
                Err(e) => {
                    warn!(platform = %platform, error = %e, "platform fetch failed");
                    snapshot.unavailable.push((platform, e.to_string()));
                }
            }
        }
        for (platform, result) in demographic_results {
            match result {
                Ok(slices) => snapshot.demographics.extend(slices),
                // Stream fetch failures already flag the platform; a
                // demographics-only failure is not worth a placeholder.
                Err(e) => warn!(platform = %platform, error = %e, "demographics fetch failed"),
            }
        }
        snapshot
    }

    /// Run one full dashboard pass for the window.
    ///
    /// Each page is computed independently: a failure (say, a live API
    /// handing back a record dated outside the window) is recorded in
    /// `failed_pages` and the remaining pages still come back populated.
    #[instrument(skip(self))]
    pub async fn run(&self, window: PeriodWindow) -> DashboardData {
        let current = self.fetch_snapshot(window).await;
        let previous = self.fetch_snapshot(window.preceding()).await;

        info!(
            window = %window,
            records = current.records.len(),
            unavailable = current.unavailable.len(),
            "snapshot loaded"
        );

        let mut failed_pages = Vec::new();

        let overview = page(
            &mut failed_pages,
            "overview",
            self.engine
                .overview_metrics(window, &current.records, &previous.records),
        )
        .unwrap_or_default();
        let daily_buckets = page(
            &mut failed_pages,
            "streams",
            self.engine.daily_buckets(window, &current.records),
        )
        .unwrap_or_default();
        let revenue = page(
            &mut failed_pages,
            "revenue",
            revenue_breakdown(window, &current.records),
        );
        let projected_revenue = if current.records.is_empty() || revenue.is_none() {
            Vec::new()
        } else {
            page(
                &mut failed_pages,
                "revenue projection",
                project_revenue(window, &current.records, PROJECTION_DAYS),
            )
            .unwrap_or_default()
        };

        DashboardData {
            window,
            overview,
            daily_buckets,
            platform_shares: self.engine.platform_shares(&current.records),
            top_songs: self.engine.top_songs(&current.records),
            audience: audience_breakdown(&current.demographics),
            revenue,
            projected_revenue,
            unavailable: current.unavailable,
            failed_pages,
            source_name: self.source.name().to_string(),
        }
    }
}

/// Map the validated configuration onto a source strategy
fn source_strategy(config: &Config) -> SourceStrategy {
    match config.source.kind {
        SourceKind::Sample => SourceStrategy::Sample {
            seed: config.source.seed,
        },
        SourceKind::Live => SourceStrategy::Live(LiveSourceConfig {
            artist_id: config.source.artist_id.clone(),
            spotify: config.source.spotify.as_ref().map(|c| PlatformCredentials {
                client_id: c.client_id.clone(),
                client_secret: c.client_secret.clone(),
            }),
            apple_music: config
                .source
                .apple_music
                .as_ref()
                .map(|c| PlatformCredentials {
                    client_id: c.client_id.clone(),
                    client_secret: c.client_secret.clone(),
                }),
            youtube_api_key: config.source.youtube_api_key.clone(),
            client: ApiClientConfigOption(
                ApiClientConfig::default()
                    .with_timeout(config.api.timeout_seconds)
                    .with_rate_limit(config.api.rate_limit_per_sec)
                    .with_max_retries(config.api.max_retries as usize),
            ),
        }),
    }
}
