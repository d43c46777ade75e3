//! Configuration loading utilities

use crate::settings::{Config, CredentialsConfig, SourceKind};
use std::env;
use std::path::Path;
use streamlens_common::{Period, Result as StreamlensResult};
use thiserror::Error;
use tracing::debug;

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error when reading configuration file
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// TOML parsing error
    #[error("Failed to parse TOML configuration: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] validator::ValidationErrors),

    /// Environment variable parsing error
    #[error("Failed to parse environment variable '{var}': {source}")]
    EnvParseError {
        var: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl From<ConfigError> for streamlens_common::StreamlensError {
    fn from(err: ConfigError) -> Self {
        streamlens_common::StreamlensError::config(err.to_string())
    }
}

/// Configuration loader for the application
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a TOML file with environment variable overrides
    pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let mut config: Config = toml::from_str(&content)?;

        Self::apply_env_overrides(&mut config)?;
        config.validate_all()?;

        Ok(config)
    }

    /// Load configuration from the conventional locations: the path named
    /// by STREAMLENS_CONFIG_PATH, then ./streamlens.toml, then defaults
    /// with environment overrides.
    pub fn load() -> StreamlensResult<Config> {
        let config = if let Ok(config_path) = env::var("STREAMLENS_CONFIG_PATH") {
            debug!(path = %config_path, "loading configuration from env-specified path");
            Self::load_config(&config_path)?
        } else if Path::new("streamlens.toml").exists() {
            Self::load_config("streamlens.toml")?
        } else {
            let mut config = Config::default();
            Self::apply_env_overrides(&mut config)?;
            config.validate_all().map_err(ConfigError::ValidationError)?;
            config
        };

        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> StreamlensResult<Config> {
        Ok(Self::load_config(path)?)
    }

    fn parse_env<T>(var: &str, raw: String) -> Result<T, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        raw.parse().map_err(|e| ConfigError::EnvParseError {
            var: var.to_string(),
            source: Box::new(e),
        })
    }

    /// Apply environment variable overrides to configuration
    fn apply_env_overrides(config: &mut Config) -> Result<(), ConfigError> {
        // Source overrides
        if let Ok(kind) = env::var("STREAMLENS_SOURCE") {
            config.source.kind = match kind.to_ascii_lowercase().as_str() {
                "sample" => SourceKind::Sample,
                "live" => SourceKind::Live,
                other => {
                    return Err(ConfigError::EnvParseError {
                        var: "STREAMLENS_SOURCE".to_string(),
                        source: format!("expected 'sample' or 'live', got '{}'", other).into(),
                    })
                }
            };
        }

        if let Ok(seed) = env::var("STREAMLENS_SEED") {
            config.source.seed = Self::parse_env("STREAMLENS_SEED", seed)?;
        }

        if let Ok(artist_id) = env::var("STREAMLENS_ARTIST_ID") {
            config.source.artist_id = artist_id;
        }

        if let (Ok(id), Ok(secret)) = (
            env::var("SPOTIFY_CLIENT_ID"),
            env::var("SPOTIFY_CLIENT_SECRET"),
        ) {
            config.source.spotify = Some(CredentialsConfig {
                client_id: id,
                client_secret: secret,
            });
        }

        if let (Ok(id), Ok(secret)) = (
            env::var("APPLE_MUSIC_CLIENT_ID"),
            env::var("APPLE_MUSIC_CLIENT_SECRET"),
        ) {
            config.source.apple_music = Some(CredentialsConfig {
                client_id: id,
                client_secret: secret,
            });
        }

        if let Ok(key) = env::var("YOUTUBE_API_KEY") {
            config.source.youtube_api_key = Some(key);
        }

        // Analytics overrides
        if let Ok(period) = env::var("STREAMLENS_PERIOD") {
            config.analytics.default_period = match period.to_ascii_lowercase().as_str() {
                "day" => Period::Day,
                "week" => Period::Week,
                "month" => Period::Month,
                "year" => Period::Year,
                other => {
                    return Err(ConfigError::EnvParseError {
                        var: "STREAMLENS_PERIOD".to_string(),
                        source: format!("unknown period '{}'", other).into(),
                    })
                }
            };
        }

        if let Ok(top_n) = env::var("STREAMLENS_TOP_N") {
            config.analytics.top_n = Self::parse_env("STREAMLENS_TOP_N", top_n)?;
        }

        // API overrides
        if let Ok(timeout) = env::var("STREAMLENS_API_TIMEOUT") {
            config.api.timeout_seconds = Self::parse_env("STREAMLENS_API_TIMEOUT", timeout)?;
        }

        if let Ok(rate) = env::var("STREAMLENS_API_RATE_LIMIT") {
            config.api.rate_limit_per_sec = Self::parse_env("STREAMLENS_API_RATE_LIMIT", rate)?;
        }

        if let Ok(retries) = env::var("STREAMLENS_API_MAX_RETRIES") {
            config.api.max_retries = Self::parse_env("STREAMLENS_API_MAX_RETRIES", retries)?;
        }

        // Logging overrides
        if let Ok(level) = env::var("LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Ok(file) = env::var("LOG_FILE") {
            config.logging.file = Some(file);
        }

        Ok(())
    }
}
