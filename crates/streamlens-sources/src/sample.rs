//! Deterministic synthetic data source
//!
//! Produces plausible streaming data without any network access. The
//! random fluctuation and weekend boost are a pure function of the
//! configured seed, the platform, and the calendar day, so repeated
//! fetches of the same window always agree. The upward trend is applied
//! per day *within* the fetched window, so the same calendar day carries
//! a different trend multiplier when reached through windows with
//! different start dates.

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use fastrand::Rng;
use streamlens_common::{
    utils::is_weekend, AgeBracket, DemographicSlice, Gender, PeriodWindow, Platform, Result,
    StreamRecord,
};
use tracing::debug;

use crate::source::StreamSource;

/// Song catalog with each song's share of daily plays
const SONG_CATALOG: [(&str, f64); 5] = [
    ("eternal-echoes", 0.30),
    ("midnight-dreams", 0.25),
    ("solar-flare", 0.20),
    ("ocean-waves", 0.15),
    ("mountain-peak", 0.10),
];

/// Baseline artist-wide plays per day, split across platforms
const BASE_DAILY_STREAMS: f64 = 2_500.0;

/// Weekend listening bump
const WEEKEND_BOOST: f64 = 1.3;

/// Daily random fluctuation range
const FLUCTUATION_MIN: f64 = 0.85;
const FLUCTUATION_MAX: f64 = 1.15;

/// Gentle upward trend applied per day within the fetched window
const DAILY_TREND: f64 = 1.01;

/// Baseline monthly listeners used to scale demographic slices
const BASE_LISTENERS: f64 = 48_000.0;

const AGE_DISTRIBUTION: [f64; 6] = [0.12, 0.35, 0.28, 0.15, 0.07, 0.03];
const GENDER_DISTRIBUTION: [f64; 3] = [0.58, 0.40, 0.02];
const COUNTRY_DISTRIBUTION: [(&str, f64); 9] = [
    ("US", 0.35),
    ("GB", 0.15),
    ("DE", 0.10),
    ("CA", 0.08),
    ("AU", 0.07),
    ("FR", 0.06),
    ("BR", 0.05),
    ("MX", 0.04),
    ("JP", 0.03),
];

/// Each platform's share of total plays and its per-stream payout rate
fn platform_profile(platform: Platform) -> (f64, f64) {
    match platform {
        Platform::Spotify => (0.47, 0.00437),
        Platform::AppleMusic => (0.26, 0.00735),
        Platform::YouTubeMusic => (0.16, 0.00069),
        Platform::AmazonMusic => (0.11, 0.00402),
    }
}

/// Seeded synthetic data source
pub struct SampleSource {
    seed: u64,
}

impl SampleSource {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Per-day RNG derived from the seed, the platform, and the calendar
    /// day. Stable across fetches, distinct across all three inputs.
    fn day_rng(&self, platform: Platform, day: NaiveDate) -> Rng {
        let platform_tag = Platform::ALL
            .iter()
            .position(|p| *p == platform)
            .unwrap_or(0) as u64;
        let day_tag = day.num_days_from_ce() as u64;
        let mixed = self
            .seed
            .wrapping_mul(0x9E37_79B9_7F4A_7C15)
            .wrapping_add(platform_tag.wrapping_mul(0x2545_F491_4F6C_DD1D))
            .wrapping_add(day_tag);
        Rng::with_seed(mixed)
    }

    fn records_for_day(
        &self,
        platform: Platform,
        day: NaiveDate,
        day_index: usize,
    ) -> Vec<StreamRecord> {
        let (weight, rate) = platform_profile(platform);
        let mut rng = self.day_rng(platform, day);

        let fluctuation = FLUCTUATION_MIN + rng.f64() * (FLUCTUATION_MAX - FLUCTUATION_MIN);
        let mut daily = BASE_DAILY_STREAMS * weight * fluctuation;
        daily *= DAILY_TREND.powi(day_index as i32);
        if is_weekend(day) {
            daily *= WEEKEND_BOOST;
        }

        SONG_CATALOG
            .iter()
            .map(|(song_id, share)| {
                let streams = (daily * share).round() as u64;
                StreamRecord::new(platform, day, *song_id, streams, streams as f64 * rate)
            })
            .collect()
    }
}

#[async_trait]
impl StreamSource for SampleSource {
    fn name(&self) -> &str {
        "sample"
    }

    async fn fetch(&self, platform: Platform, window: PeriodWindow) -> Result<Vec<StreamRecord>> {
        let records: Vec<StreamRecord> = window
            .iter_days()
            .enumerate()
            .flat_map(|(day_index, day)| self.records_for_day(platform, day, day_index))
            .collect();

        debug!(
            platform = %platform,
            window = %window,
            count = records.len(),
            "generated sample stream records"
        );
        Ok(records)
    }

    async fn fetch_demographics(
        &self,
        platform: Platform,
        window: PeriodWindow,
    ) -> Result<Vec<DemographicSlice>> {
        let (weight, _) = platform_profile(platform);
        let mut rng = self.day_rng(platform, window.start());
        let fluctuation = FLUCTUATION_MIN + rng.f64() * (FLUCTUATION_MAX - FLUCTUATION_MIN);

        // Scale the monthly listener base to the window length
        let total = BASE_LISTENERS * weight * fluctuation * (window.days() as f64 / 30.0);

        let mut slices = Vec::new();
        for (age_index, age) in AgeBracket::ALL.iter().enumerate() {
            for (gender_index, gender) in Gender::ALL.iter().enumerate() {
                for (country, country_share) in COUNTRY_DISTRIBUTION {
                    let listeners = (total
                        * AGE_DISTRIBUTION[age_index]
                        * GENDER_DISTRIBUTION[gender_index]
                        * country_share)
                        .round() as u64;
                    if listeners > 0 {
                        slices.push(DemographicSlice {
                            age_bracket: *age,
                            gender: *gender,
                            country: country.to_string(),
                            listener_count: listeners,
                        });
                    }
                }
            }
        }

        debug!(
            platform = %platform,
            window = %window,
            count = slices.len(),
            "generated sample demographic slices"
        );
        Ok(slices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use streamlens_common::test_utils::{date, window};

    #[tokio::test]
    async fn test_same_seed_yields_identical_records() {
        let win = window(date(2024, 3, 1), date(2024, 3, 15));
        let a = SampleSource::new(42)
            .fetch(Platform::Spotify, win)
            .await
            .unwrap();
        let b = SampleSource::new(42)
            .fetch(Platform::Spotify, win)
            .await
            .unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_different_seeds_diverge() {
        let win = window(date(2024, 3, 1), date(2024, 3, 15));
        let a = SampleSource::new(1)
            .fetch(Platform::Spotify, win)
            .await
            .unwrap();
        let b = SampleSource::new(2)
            .fetch(Platform::Spotify, win)
            .await
            .unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_all_records_fall_inside_the_window() {
        let win = window(date(2024, 3, 1), date(2024, 3, 8));
        let records = SampleSource::new(7)
            .fetch(Platform::AppleMusic, win)
            .await
            .unwrap();

        assert_eq!(records.len(), 7 * SONG_CATALOG.len());
        for record in &records {
            assert!(win.contains(record.date));
            assert_eq!(record.platform, Platform::AppleMusic);
        }
    }

    #[tokio::test]
    async fn test_full_catalog_present_each_day() {
        let win = window(date(2024, 3, 4), date(2024, 3, 5));
        let records = SampleSource::new(7)
            .fetch(Platform::Spotify, win)
            .await
            .unwrap();

        let song_ids: Vec<&str> = records.iter().map(|r| r.song_id.as_str()).collect();
        for (song_id, _) in SONG_CATALOG {
            assert!(song_ids.contains(&song_id));
        }
    }

    #[tokio::test]
    async fn test_weekend_days_run_hotter_than_weekdays() {
        // 2024-03-02 is a Saturday, 2024-03-04 a Monday. Average over many
        // seeds so fluctuation cannot mask the boost.
        let saturday = window(date(2024, 3, 2), date(2024, 3, 3));
        let monday = window(date(2024, 3, 4), date(2024, 3, 5));

        let mut saturday_total = 0u64;
        let mut monday_total = 0u64;
        for seed in 0..50 {
            let source = SampleSource::new(seed);
            saturday_total += source
                .fetch(Platform::Spotify, saturday)
                .await
                .unwrap()
                .iter()
                .map(|r| r.streams)
                .sum::<u64>();
            monday_total += source
                .fetch(Platform::Spotify, monday)
                .await
                .unwrap()
                .iter()
                .map(|r| r.streams)
                .sum::<u64>();
        }
        assert!(saturday_total > monday_total);
    }

    #[tokio::test]
    async fn test_trend_is_relative_to_the_window_start() {
        let source = SampleSource::new(42);

        // The opening day of a window carries no trend multiplier, so it
        // agrees across windows sharing a start date.
        let short = window(date(2024, 3, 1), date(2024, 3, 2));
        let long = window(date(2024, 3, 1), date(2024, 3, 15));
        let opening_short = source.fetch(Platform::Spotify, short).await.unwrap();
        let opening_long: Vec<_> = source
            .fetch(Platform::Spotify, long)
            .await
            .unwrap()
            .into_iter()
            .filter(|r| r.date == date(2024, 3, 1))
            .collect();
        assert_eq!(opening_short, opening_long);

        // The same calendar day reached mid-window has accrued trend, so
        // it runs hotter than when it opens a window of its own.
        let offset = window(date(2024, 3, 5), date(2024, 3, 6));
        let mid_window: u64 = source
            .fetch(Platform::Spotify, long)
            .await
            .unwrap()
            .iter()
            .filter(|r| r.date == date(2024, 3, 5))
            .map(|r| r.streams)
            .sum();
        let own_window: u64 = source
            .fetch(Platform::Spotify, offset)
            .await
            .unwrap()
            .iter()
            .map(|r| r.streams)
            .sum();
        assert!(mid_window > own_window);
    }

    #[tokio::test]
    async fn test_revenue_matches_per_stream_rate() {
        let win = window(date(2024, 3, 1), date(2024, 3, 2));
        for platform in Platform::ALL {
            let (_, rate) = platform_profile(platform);
            let records = SampleSource::new(11).fetch(platform, win).await.unwrap();
            for record in records {
                let expected = record.streams as f64 * rate;
                assert!((record.revenue - expected).abs() < 1e-9);
            }
        }
    }

    #[tokio::test]
    async fn test_demographics_are_deterministic_and_nonempty() {
        let win = window(date(2024, 3, 1), date(2024, 4, 1));
        let a = SampleSource::new(5)
            .fetch_demographics(Platform::Spotify, win)
            .await
            .unwrap();
        let b = SampleSource::new(5)
            .fetch_demographics(Platform::Spotify, win)
            .await
            .unwrap();

        assert_eq!(a, b);
        assert!(!a.is_empty());
        let total: u64 = a.iter().map(|s| s.listener_count).sum();
        assert!(total > 0);
    }
}
