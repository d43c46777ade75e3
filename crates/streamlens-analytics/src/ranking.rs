//! Top-N rankings over songs, platforms, and countries
//!
//! Ties are broken by ascending key identifier so repeated runs over the
//! same input always produce the same order.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use streamlens_common::{DemographicSlice, StreamRecord};
use tracing::debug;

/// One ranked entry with its summed metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub key: String,
    pub streams: u64,
    pub revenue: f64,
}

/// Top-N ranking over a grouping dimension
#[derive(Debug, Clone)]
pub struct TopRanking {
    limit: usize,
}

impl TopRanking {
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }

    fn rank(&self, mut entries: Vec<RankedEntry>) -> Vec<RankedEntry> {
        // Descending by streams, ascending by key for deterministic ties
        entries.sort_by(|a, b| b.streams.cmp(&a.streams).then_with(|| a.key.cmp(&b.key)));
        entries.truncate(self.limit);
        debug!("ranked {} entries", entries.len());
        entries
    }

    /// N songs with the most streams
    pub fn top_songs(&self, records: &[StreamRecord]) -> Vec<RankedEntry> {
        let mut totals: HashMap<&str, (u64, f64)> = HashMap::new();
        for record in records {
            let entry = totals.entry(record.song_id.as_str()).or_default();
            entry.0 += record.streams;
            entry.1 += record.revenue;
        }
        self.rank(
            totals
                .into_iter()
                .map(|(key, (streams, revenue))| RankedEntry {
                    key: key.to_string(),
                    streams,
                    revenue,
                })
                .collect(),
        )
    }

    /// N platforms with the most streams
    pub fn top_platforms(&self, records: &[StreamRecord]) -> Vec<RankedEntry> {
        let mut totals: HashMap<&'static str, (u64, f64)> = HashMap::new();
        for record in records {
            let entry = totals.entry(record.platform.display_name()).or_default();
            entry.0 += record.streams;
            entry.1 += record.revenue;
        }
        self.rank(
            totals
                .into_iter()
                .map(|(key, (streams, revenue))| RankedEntry {
                    key: key.to_string(),
                    streams,
                    revenue,
                })
                .collect(),
        )
    }

    /// N countries with the most listeners
    pub fn top_countries(&self, slices: &[DemographicSlice]) -> Vec<RankedEntry> {
        let mut totals: HashMap<&str, u64> = HashMap::new();
        for slice in slices {
            *totals.entry(slice.country.as_str()).or_default() += slice.listener_count;
        }
        self.rank(
            totals
                .into_iter()
                .map(|(key, listeners)| RankedEntry {
                    key: key.to_string(),
                    streams: listeners,
                    revenue: 0.0,
                })
                .collect(),
        )
    }
}

impl Default for TopRanking {
    fn default() -> Self {
        Self::new(10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use streamlens_common::test_utils::{date, record, slice};
    use streamlens_common::{AgeBracket, Gender, Platform};

    #[test]
    fn test_top_songs_orders_by_streams() {
        let day = date(2024, 3, 1);
        let records = vec![
            record(Platform::Spotify, day, "song-b", 100),
            record(Platform::Spotify, day, "song-a", 300),
            record(Platform::AppleMusic, day, "song-b", 50),
            record(Platform::Spotify, day, "song-c", 200),
        ];

        let top = TopRanking::new(2).top_songs(&records);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].key, "song-a");
        assert_eq!(top[0].streams, 300);
        assert_eq!(top[1].key, "song-c");
    }

    #[test]
    fn test_ties_break_by_ascending_key() {
        let day = date(2024, 3, 1);
        let records = vec![
            record(Platform::Spotify, day, "song-z", 100),
            record(Platform::Spotify, day, "song-a", 100),
            record(Platform::Spotify, day, "song-m", 100),
        ];

        let top = TopRanking::new(3).top_songs(&records);
        let keys: Vec<&str> = top.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["song-a", "song-m", "song-z"]);
    }

    #[test]
    fn test_ranking_is_stable_across_runs() {
        let day = date(2024, 3, 1);
        let records = vec![
            record(Platform::Spotify, day, "song-1", 10),
            record(Platform::AppleMusic, day, "song-2", 10),
            record(Platform::YouTubeMusic, day, "song-3", 10),
        ];

        let ranking = TopRanking::new(3);
        let first = ranking.top_songs(&records);
        let second = ranking.top_songs(&records);
        assert_eq!(first, second);
    }

    #[test]
    fn test_top_platforms() {
        let day = date(2024, 3, 1);
        let records = vec![
            record(Platform::Spotify, day, "song-1", 400),
            record(Platform::AppleMusic, day, "song-1", 250),
            record(Platform::Spotify, day, "song-2", 100),
        ];

        let top = TopRanking::default().top_platforms(&records);
        assert_eq!(top[0].key, "Spotify");
        assert_eq!(top[0].streams, 500);
        assert_eq!(top[1].key, "Apple Music");
    }

    #[test]
    fn test_top_countries() {
        let slices = vec![
            slice(AgeBracket::From18To24, Gender::Female, "US", 900),
            slice(AgeBracket::From25To34, Gender::Male, "DE", 400),
            slice(AgeBracket::From18To24, Gender::Male, "US", 600),
            slice(AgeBracket::From35To44, Gender::NonBinary, "GB", 500),
        ];

        let top = TopRanking::new(2).top_countries(&slices);
        assert_eq!(top[0].key, "US");
        assert_eq!(top[0].streams, 1500);
        assert_eq!(top[1].key, "GB");
    }

    #[test]
    fn test_empty_input_yields_empty_ranking() {
        assert!(TopRanking::default().top_songs(&[]).is_empty());
        assert!(TopRanking::default().top_countries(&[]).is_empty());
    }
}
