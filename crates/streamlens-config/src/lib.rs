//! Configuration loading and validation for streamlens
//!
//! TOML file plus environment variable overrides, validated with the
//! validator derive before anything else starts up.

pub mod defaults;
pub mod loader;
pub mod settings;
pub mod validation;

pub use loader::{ConfigError, ConfigLoader};
pub use settings::{
    AnalyticsConfig, ApiConfig, Config, CredentialsConfig, LoggingSettings, SourceConfig,
    SourceKind,
};
