//! Raw data sources for streamlens
//!
//! A single `StreamSource` trait with two strategies behind it: the seeded
//! sample generator and the live platform API clients. The shared HTTP
//! layer handles pooling, rate limiting, and retry policy for all live
//! clients.

pub mod amazon_music;
pub mod apple_music;
pub mod client;
pub mod sample;
pub mod source;
pub mod spotify;
pub mod youtube_music;

pub use amazon_music::AmazonMusicClient;
pub use apple_music::AppleMusicClient;
pub use client::{ApiClient, ApiClientConfig};
pub use sample::SampleSource;
pub use source::{
    build_source, ApiClientConfigOption, LiveSource, LiveSourceConfig, PlatformCredentials,
    SourceStrategy, StreamSource,
};
pub use spotify::SpotifyClient;
pub use youtube_music::YouTubeMusicClient;
