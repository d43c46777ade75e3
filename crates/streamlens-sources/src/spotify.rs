//! Spotify live data client
//!
//! Authenticates with the client-credentials flow, caches the bearer token
//! until shortly before expiry, and maps the artist streams and audience
//! endpoints into domain records.

use chrono::NaiveDate;
use parking_lot::Mutex;
use serde::Deserialize;
use std::time::{Duration, Instant};
use streamlens_common::{
    AgeBracket, DemographicSlice, Gender, PeriodWindow, Platform, Result, StreamRecord,
    StreamlensError,
};
use tracing::{debug, instrument};

use crate::client::ApiClient;
use crate::source::PlatformCredentials;

const TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
const API_BASE: &str = "https://api.spotify.com/v1";

/// Renew the token this long before the server-reported expiry
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

#[derive(Debug, Deserialize)]
struct StreamsResponse {
    items: Vec<StreamItem>,
}

#[derive(Debug, Deserialize)]
struct StreamItem {
    date: NaiveDate,
    track_id: String,
    stream_count: u64,
    #[serde(default)]
    revenue: f64,
}

#[derive(Debug, Deserialize)]
struct AudienceResponse {
    segments: Vec<AudienceSegment>,
}

#[derive(Debug, Deserialize)]
struct AudienceSegment {
    age_range: String,
    gender: String,
    country: String,
    listeners: u64,
}

struct CachedToken {
    token: String,
    expires_at: Instant,
}

/// Client for the Spotify artist analytics endpoints
pub struct SpotifyClient {
    api: ApiClient,
    credentials: PlatformCredentials,
    base_url: String,
    token: Mutex<Option<CachedToken>>,
}

impl SpotifyClient {
    pub fn new(api: ApiClient, credentials: PlatformCredentials) -> Self {
        Self {
            api,
            credentials,
            base_url: API_BASE.to_string(),
            token: Mutex::new(None),
        }
    }

    /// Return a valid bearer token, fetching a fresh one when the cached
    /// token is missing or about to expire.
    async fn bearer_token(&self) -> Result<String> {
        if let Some(cached) = self.token.lock().as_ref() {
            if cached.expires_at > Instant::now() {
                return Ok(cached.token.clone());
            }
        }

        debug!("requesting fresh Spotify access token");
        let response: TokenResponse = self
            .api
            .post_form(
                TOKEN_URL,
                &self.credentials.client_id,
                &self.credentials.client_secret,
                &[("grant_type", "client_credentials")],
            )
            .await?;

        let lifetime = Duration::from_secs(response.expires_in)
            .saturating_sub(TOKEN_EXPIRY_MARGIN);
        *self.token.lock() = Some(CachedToken {
            token: response.access_token.clone(),
            expires_at: Instant::now() + lifetime,
        });
        Ok(response.access_token)
    }

    #[instrument(skip(self), fields(artist_id = %artist_id, window = %window))]
    pub async fn fetch_streams(
        &self,
        artist_id: &str,
        window: PeriodWindow,
    ) -> Result<Vec<StreamRecord>> {
        let token = self.bearer_token().await?;
        let url = format!("{}/artists/{}/streams", self.base_url, artist_id);
        let query = window_query(window);

        let response: StreamsResponse = self.api.get_json(&url, &query, Some(&token)).await?;

        let records = response
            .items
            .into_iter()
            .map(|item| {
                StreamRecord::new(
                    Platform::Spotify,
                    item.date,
                    item.track_id,
                    item.stream_count,
                    item.revenue,
                )
            })
            .collect();
        Ok(records)
    }

    #[instrument(skip(self), fields(artist_id = %artist_id, window = %window))]
    pub async fn fetch_demographics(
        &self,
        artist_id: &str,
        window: PeriodWindow,
    ) -> Result<Vec<DemographicSlice>> {
        let token = self.bearer_token().await?;
        let url = format!("{}/artists/{}/audience", self.base_url, artist_id);
        let query = window_query(window);

        let response: AudienceResponse = self.api.get_json(&url, &query, Some(&token)).await?;

        response
            .segments
            .into_iter()
            .map(|segment| {
                Ok(DemographicSlice {
                    age_bracket: parse_age_range(&segment.age_range)?,
                    gender: parse_gender(&segment.gender)?,
                    country: segment.country,
                    listener_count: segment.listeners,
                })
            })
            .collect()
    }
}

fn window_query(window: PeriodWindow) -> [(&'static str, String); 2] {
    [
        ("start_date", window.start().format("%Y-%m-%d").to_string()),
        ("end_date", window.end().format("%Y-%m-%d").to_string()),
    ]
}

fn parse_age_range(raw: &str) -> Result<AgeBracket> {
    AgeBracket::ALL
        .into_iter()
        .find(|bracket| bracket.label() == raw)
        .ok_or_else(|| {
            StreamlensError::invalid_input_record(
                "unrecognized age range in audience response",
                raw,
            )
        })
}

fn parse_gender(raw: &str) -> Result<Gender> {
    match raw {
        "female" => Ok(Gender::Female),
        "male" => Ok(Gender::Male),
        "non_binary" | "other" => Ok(Gender::NonBinary),
        _ => Err(StreamlensError::invalid_input_record(
            "unrecognized gender in audience response",
            raw,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_streams_response() {
        let body = r#"{
            "items": [
                {"date": "2024-03-01", "track_id": "tr-1", "stream_count": 1200, "revenue": 5.24},
                {"date": "2024-03-02", "track_id": "tr-1", "stream_count": 900}
            ]
        }"#;
        let parsed: StreamsResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.items.len(), 2);
        assert_eq!(parsed.items[0].stream_count, 1200);
        // Missing revenue defaults to zero
        assert_eq!(parsed.items[1].revenue, 0.0);
    }

    #[test]
    fn test_parse_audience_response() {
        let body = r#"{
            "segments": [
                {"age_range": "18-24", "gender": "female", "country": "US", "listeners": 4200}
            ]
        }"#;
        let parsed: AudienceResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.segments.len(), 1);
        assert_eq!(parse_age_range(&parsed.segments[0].age_range).unwrap(), AgeBracket::From18To24);
        assert_eq!(parse_gender(&parsed.segments[0].gender).unwrap(), Gender::Female);
    }

    #[test]
    fn test_unknown_age_range_is_invalid_input() {
        let err = parse_age_range("12-15").unwrap_err();
        assert!(matches!(err, StreamlensError::InvalidInput { .. }));
    }

    #[test]
    fn test_window_query_uses_half_open_bounds() {
        let window = PeriodWindow::new(
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 8).unwrap(),
        )
        .unwrap();
        let query = window_query(window);
        assert_eq!(query[0], ("start_date", "2024-03-01".to_string()));
        assert_eq!(query[1], ("end_date", "2024-03-08".to_string()));
    }
}
