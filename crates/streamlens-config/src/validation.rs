//! Custom validation functions for configuration values

use crate::settings::{SourceConfig, SourceKind};
use validator::ValidationError;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Accepts the standard tracing level names, case-insensitive
pub fn validate_log_level(level: &str) -> Result<(), ValidationError> {
    if LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str()) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_log_level"))
    }
}

/// A live source needs an artist to query and credentials for at least one
/// platform. Sample sources need neither.
pub fn validate_source_config(source: &SourceConfig) -> Result<(), ValidationError> {
    if source.kind == SourceKind::Sample {
        return Ok(());
    }

    if source.artist_id.trim().is_empty() {
        return Err(ValidationError::new("live_source_requires_artist_id"));
    }

    let has_any_credentials = source.spotify.is_some()
        || source.apple_music.is_some()
        || source.youtube_api_key.is_some();
    if !has_any_credentials {
        return Err(ValidationError::new("live_source_requires_credentials"));
    }

    Ok(())
}
