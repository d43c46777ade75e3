//! Application configuration structures

use serde::{Deserialize, Serialize};
use streamlens_common::Period;
use validator::Validate;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Config {
    /// Data source configuration
    #[validate]
    pub source: SourceConfig,

    /// Analytics configuration
    #[validate]
    pub analytics: AnalyticsConfig,

    /// HTTP client configuration for live sources
    #[validate]
    pub api: ApiConfig,

    /// Logging configuration
    #[validate]
    pub logging: LoggingSettings,
}

impl Config {
    /// Validate the whole configuration tree
    pub fn validate_all(&self) -> Result<(), validator::ValidationErrors> {
        self.validate()
    }
}

/// Which data source strategy to run with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Deterministic synthetic data
    Sample,
    /// Live platform APIs
    Live,
}

/// Data source configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(
    function = "crate::validation::validate_source_config",
    skip_on_field_errors = true
))]
pub struct SourceConfig {
    /// Source strategy: sample or live
    pub kind: SourceKind,

    /// Seed for the sample data generator
    pub seed: u64,

    /// Artist identifier queried on the live platforms
    pub artist_id: String,

    /// Spotify client credentials
    #[validate]
    pub spotify: Option<CredentialsConfig>,

    /// Apple Music client credentials
    #[validate]
    pub apple_music: Option<CredentialsConfig>,

    /// YouTube Music API key
    pub youtube_api_key: Option<String>,
}

/// OAuth client credentials for one platform
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CredentialsConfig {
    #[validate(length(min = 1, message = "Client ID cannot be empty"))]
    pub client_id: String,

    #[validate(length(min = 1, message = "Client secret cannot be empty"))]
    pub client_secret: String,
}

/// Analytics configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AnalyticsConfig {
    /// Default reporting period for the dashboard
    pub default_period: Period,

    /// Number of entries in top-N rankings
    #[validate(range(min = 1, max = 100, message = "Top-N limit must be between 1 and 100"))]
    pub top_n: usize,
}

/// HTTP client configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ApiConfig {
    /// Request timeout in seconds
    #[validate(range(min = 1, max = 300, message = "Timeout must be between 1 and 300 seconds"))]
    pub timeout_seconds: u64,

    /// Rate limit in requests per second
    #[validate(range(min = 1, max = 100, message = "Rate limit must be between 1 and 100"))]
    pub rate_limit_per_sec: u32,

    /// Maximum number of retries for failed requests
    #[validate(range(max = 10, message = "Max retries cannot exceed 10"))]
    pub max_retries: u32,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoggingSettings {
    /// Log level filter (trace, debug, info, warn, error)
    #[validate(custom(
        function = "crate::validation::validate_log_level",
        message = "Invalid log level"
    ))]
    pub level: String,

    /// Optional log file path; stdout when unset
    pub file: Option<String>,

    /// Use the compact single-line format
    pub compact: bool,

    /// Include span enter/exit events
    pub include_spans: bool,
}
