//! Amazon Music placeholder client
//!
//! Amazon has no public artist analytics API, so every call reports the
//! source as unavailable. The dashboard renders a placeholder for the
//! platform instead of failing the whole page.

use streamlens_common::{DemographicSlice, PeriodWindow, Result, StreamRecord, StreamlensError};
use tracing::debug;

pub struct AmazonMusicClient;

impl AmazonMusicClient {
    pub fn new() -> Self {
        Self
    }

    fn unavailable() -> StreamlensError {
        StreamlensError::source_unavailable(
            "Amazon Music does not expose an artist analytics API",
        )
    }

    pub async fn fetch_streams(
        &self,
        artist_id: &str,
        window: PeriodWindow,
    ) -> Result<Vec<StreamRecord>> {
        debug!(artist_id, %window, "Amazon Music fetch requested, reporting unavailable");
        Err(Self::unavailable())
    }

    pub async fn fetch_demographics(
        &self,
        artist_id: &str,
        window: PeriodWindow,
    ) -> Result<Vec<DemographicSlice>> {
        debug!(artist_id, %window, "Amazon Music demographics requested, reporting unavailable");
        Err(Self::unavailable())
    }
}

impl Default for AmazonMusicClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use streamlens_common::test_utils::{date, window};

    #[tokio::test]
    async fn test_streams_report_unavailable() {
        let client = AmazonMusicClient::new();
        let win = window(date(2024, 3, 1), date(2024, 3, 8));
        let err = client.fetch_streams("artist-1", win).await.unwrap_err();
        assert!(matches!(err, StreamlensError::SourceUnavailable { .. }));
    }
}
