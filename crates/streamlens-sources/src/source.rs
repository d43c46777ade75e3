//! The raw data source contract and strategy selection
//!
//! One interface, interchangeable implementations: the synthetic sample
//! generator and the live per-platform API clients both satisfy
//! `StreamSource`, and the caller picks a strategy once at construction.
//! No sample-vs-live flag is threaded through business logic.

use async_trait::async_trait;
use streamlens_common::{
    DemographicSlice, PeriodWindow, Platform, Result, StreamRecord, StreamlensError,
};
use tracing::info;

use crate::amazon_music::AmazonMusicClient;
use crate::apple_music::AppleMusicClient;
use crate::client::{ApiClient, ApiClientConfig};
use crate::sample::SampleSource;
use crate::spotify::SpotifyClient;
use crate::youtube_music::YouTubeMusicClient;

/// OAuth client credentials for one platform
#[derive(Debug, Clone)]
pub struct PlatformCredentials {
    pub client_id: String,
    pub client_secret: String,
}

/// Everything the live source needs: the artist to report on, per-platform
/// credentials, and HTTP client settings. Platforms without credentials are
/// simply not queried.
#[derive(Debug, Clone, Default)]
pub struct LiveSourceConfig {
    pub artist_id: String,
    pub spotify: Option<PlatformCredentials>,
    pub apple_music: Option<PlatformCredentials>,
    pub youtube_api_key: Option<String>,
    pub client: ApiClientConfigOption,
}

/// Wrapper so `LiveSourceConfig` can derive Default
#[derive(Debug, Clone)]
pub struct ApiClientConfigOption(pub ApiClientConfig);

impl Default for ApiClientConfigOption {
    fn default() -> Self {
        Self(ApiClientConfig::default())
    }
}

/// Contract every raw data source satisfies.
///
/// Failures are `SourceUnavailable` or `InvalidCredentials`; callers treat
/// both as pass-through failures and never retry at this level.
#[async_trait]
pub trait StreamSource: Send + Sync {
    /// Source name for logging and the dashboard footer
    fn name(&self) -> &str;

    /// Fetch stream records for one platform across a window
    async fn fetch(&self, platform: Platform, window: PeriodWindow) -> Result<Vec<StreamRecord>>;

    /// Fetch the demographic breakdown for one platform across a window.
    /// Sources without demographic data return an empty sequence.
    async fn fetch_demographics(
        &self,
        platform: Platform,
        window: PeriodWindow,
    ) -> Result<Vec<DemographicSlice>>;
}

/// Live data source dispatching to per-platform API clients
pub struct LiveSource {
    artist_id: String,
    spotify: Option<SpotifyClient>,
    apple_music: Option<AppleMusicClient>,
    youtube_music: Option<YouTubeMusicClient>,
    amazon_music: AmazonMusicClient,
}

impl LiveSource {
    pub fn new(config: LiveSourceConfig) -> Result<Self> {
        let api_client = ApiClient::new(config.client.0)?;

        Ok(Self {
            artist_id: config.artist_id,
            spotify: config
                .spotify
                .map(|creds| SpotifyClient::new(api_client.clone(), creds)),
            apple_music: config
                .apple_music
                .map(|creds| AppleMusicClient::new(api_client.clone(), creds)),
            youtube_music: config
                .youtube_api_key
                .map(|key| YouTubeMusicClient::new(api_client.clone(), key)),
            amazon_music: AmazonMusicClient::new(),
        })
    }

    fn missing_credentials(platform: Platform) -> StreamlensError {
        StreamlensError::invalid_credentials(format!(
            "no credentials configured for {}",
            platform
        ))
    }
}

#[async_trait]
impl StreamSource for LiveSource {
    fn name(&self) -> &str {
        "live"
    }

    async fn fetch(&self, platform: Platform, window: PeriodWindow) -> Result<Vec<StreamRecord>> {
        match platform {
            Platform::Spotify => match &self.spotify {
                Some(client) => client.fetch_streams(&self.artist_id, window).await,
                None => Err(Self::missing_credentials(platform)),
            },
            Platform::AppleMusic => match &self.apple_music {
                Some(client) => client.fetch_streams(&self.artist_id, window).await,
                None => Err(Self::missing_credentials(platform)),
            },
            Platform::YouTubeMusic => match &self.youtube_music {
                Some(client) => client.fetch_streams(&self.artist_id, window).await,
                None => Err(Self::missing_credentials(platform)),
            },
            Platform::AmazonMusic => self.amazon_music.fetch_streams(&self.artist_id, window).await,
        }
    }

    async fn fetch_demographics(
        &self,
        platform: Platform,
        window: PeriodWindow,
    ) -> Result<Vec<DemographicSlice>> {
        match platform {
            Platform::Spotify => match &self.spotify {
                Some(client) => client.fetch_demographics(&self.artist_id, window).await,
                None => Err(Self::missing_credentials(platform)),
            },
            // Neither API exposes audience breakdowns; the dashboard falls
            // back to the platforms that do.
            Platform::AppleMusic | Platform::YouTubeMusic => Ok(Vec::new()),
            Platform::AmazonMusic => {
                self.amazon_music
                    .fetch_demographics(&self.artist_id, window)
                    .await
            }
        }
    }
}

/// Which data source strategy to construct
#[derive(Debug, Clone)]
pub enum SourceStrategy {
    /// Deterministic synthetic data, seeded
    Sample { seed: u64 },
    /// Live platform APIs
    Live(LiveSourceConfig),
}

/// Build the selected data source
pub fn build_source(strategy: SourceStrategy) -> Result<Box<dyn StreamSource>> {
    match strategy {
        SourceStrategy::Sample { seed } => {
            info!(seed, "using sample data source");
            Ok(Box::new(SampleSource::new(seed)))
        }
        SourceStrategy::Live(config) => {
            info!(artist_id = %config.artist_id, "using live data source");
            Ok(Box::new(LiveSource::new(config)?))
        }
    }
}
