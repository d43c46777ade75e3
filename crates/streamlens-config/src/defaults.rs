//! Default configuration values
//!
//! The defaults describe a working sample-data setup: the dashboard runs
//! out of the box with no credentials configured.

use crate::settings::{
    AnalyticsConfig, ApiConfig, Config, LoggingSettings, SourceConfig, SourceKind,
};
use streamlens_common::Period;

impl Default for Config {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            analytics: AnalyticsConfig::default(),
            api: ApiConfig::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: SourceKind::Sample,
            seed: 42,
            artist_id: String::new(),
            spotify: None,
            apple_music: None,
            youtube_api_key: None,
        }
    }
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            default_period: Period::Month,
            top_n: 10,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            rate_limit_per_sec: 10,
            max_retries: 3,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            compact: true,
            include_spans: false,
        }
    }
}
