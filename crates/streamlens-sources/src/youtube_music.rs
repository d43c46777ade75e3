//! YouTube Music live data client
//!
//! Authenticates with an API key passed as a query parameter. Like Apple
//! Music, the analytics endpoint reports plays only; no demographics.

use chrono::NaiveDate;
use serde::Deserialize;
use streamlens_common::{PeriodWindow, Platform, Result, StreamRecord};
use tracing::instrument;

use crate::client::ApiClient;

const API_BASE: &str = "https://music.youtube.com/youtubei/v1/analytics";

#[derive(Debug, Deserialize)]
struct ViewsResponse {
    rows: Vec<ViewRow>,
}

#[derive(Debug, Deserialize)]
struct ViewRow {
    date: NaiveDate,
    video_id: String,
    views: u64,
    #[serde(default)]
    estimated_revenue: f64,
}

/// Client for the YouTube Music analytics endpoints
pub struct YouTubeMusicClient {
    api: ApiClient,
    api_key: String,
    base_url: String,
}

impl YouTubeMusicClient {
    pub fn new(api: ApiClient, api_key: String) -> Self {
        Self {
            api,
            api_key,
            base_url: API_BASE.to_string(),
        }
    }

    #[instrument(skip(self), fields(artist_id = %artist_id, window = %window))]
    pub async fn fetch_streams(
        &self,
        artist_id: &str,
        window: PeriodWindow,
    ) -> Result<Vec<StreamRecord>> {
        let url = format!("{}/channels/{}/views", self.base_url, artist_id);
        let query = [
            ("startDate", window.start().format("%Y-%m-%d").to_string()),
            ("endDate", window.end().format("%Y-%m-%d").to_string()),
            ("key", self.api_key.clone()),
        ];

        let response: ViewsResponse = self.api.get_json(&url, &query, None).await?;

        let records = response
            .rows
            .into_iter()
            .map(|row| {
                StreamRecord::new(
                    Platform::YouTubeMusic,
                    row.date,
                    row.video_id,
                    row.views,
                    row.estimated_revenue,
                )
            })
            .collect();
        Ok(records)
    }
}
