//! Apple Music live data client
//!
//! Uses a pre-issued developer token as the secret half of the credentials.
//! Apple reports plays per song per day; it exposes no audience breakdown,
//! so demographics come back empty.

use chrono::NaiveDate;
use serde::Deserialize;
use streamlens_common::{PeriodWindow, Platform, Result, StreamRecord};
use tracing::instrument;

use crate::client::ApiClient;
use crate::source::PlatformCredentials;

const API_BASE: &str = "https://api.music.apple.com/v1/catalog/analytics";

#[derive(Debug, Deserialize)]
struct PlaysResponse {
    data: Vec<PlayEntry>,
}

#[derive(Debug, Deserialize)]
struct PlayEntry {
    date: NaiveDate,
    song_id: String,
    plays: u64,
    #[serde(default)]
    royalties: f64,
}

/// Client for the Apple Music analytics endpoints
pub struct AppleMusicClient {
    api: ApiClient,
    credentials: PlatformCredentials,
    base_url: String,
}

impl AppleMusicClient {
    pub fn new(api: ApiClient, credentials: PlatformCredentials) -> Self {
        Self {
            api,
            credentials,
            base_url: API_BASE.to_string(),
        }
    }

    #[instrument(skip(self), fields(artist_id = %artist_id, window = %window))]
    pub async fn fetch_streams(
        &self,
        artist_id: &str,
        window: PeriodWindow,
    ) -> Result<Vec<StreamRecord>> {
        let url = format!("{}/artists/{}/plays", self.base_url, artist_id);
        let query = [
            ("start", window.start().format("%Y-%m-%d").to_string()),
            ("end", window.end().format("%Y-%m-%d").to_string()),
        ];

        let response: PlaysResponse = self
            .api
            .get_json(&url, &query, Some(&self.credentials.client_secret))
            .await?;

        let records = response
            .data
            .into_iter()
            .map(|entry| {
                StreamRecord::new(
                    Platform::AppleMusic,
                    entry.date,
                    entry.song_id,
                    entry.plays,
                    entry.royalties,
                )
            })
            .collect();
        Ok(records)
    }
}
