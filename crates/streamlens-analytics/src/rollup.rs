//! Bucket-and-sum rollups of raw stream records
//!
//! Partitions the records of a window into day, week, or month buckets and
//! sums streams and revenue per bucket, overall and per platform. Buckets
//! come back in chronological order regardless of input order.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use streamlens_common::{PeriodWindow, Platform, Result, StreamRecord, StreamlensError};
use tracing::{debug, instrument};

/// Width of the sub-windows a rollup partitions into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BucketWidth {
    Day,
    Week,
    Month,
}

impl BucketWidth {
    /// First day of the bucket the given date falls into.
    /// Weeks start on Monday, months on the 1st.
    fn bucket_start(&self, date: NaiveDate) -> NaiveDate {
        match self {
            BucketWidth::Day => date,
            BucketWidth::Week => {
                let offset = date.weekday().num_days_from_monday() as i64;
                date - Duration::days(offset)
            }
            BucketWidth::Month => date.with_day(1).unwrap_or(date),
        }
    }
}

/// Per-platform totals inside one bucket
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlatformTotals {
    pub streams: u64,
    pub revenue: f64,
}

/// One sub-window of a rollup with its partial sums
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamBucket {
    /// First day of the bucket
    pub start: NaiveDate,
    pub streams: u64,
    pub revenue: f64,
    pub by_platform: HashMap<Platform, PlatformTotals>,
}

/// Bucket-and-sum aggregator for one window
#[derive(Debug, Clone)]
pub struct RollupAggregator {
    window: PeriodWindow,
    width: BucketWidth,
}

impl RollupAggregator {
    pub fn new(window: PeriodWindow, width: BucketWidth) -> Self {
        Self { window, width }
    }

    pub fn window(&self) -> PeriodWindow {
        self.window
    }

    /// Reject records the aggregator must not silently clamp or drop:
    /// dates outside the window and negative or non-finite revenue.
    fn validate(&self, record: &StreamRecord) -> Result<()> {
        if !self.window.contains(record.date) {
            return Err(StreamlensError::invalid_input_record(
                format!(
                    "record dated {} falls outside window {}",
                    record.date, self.window
                ),
                record.song_id.clone(),
            ));
        }
        if !record.revenue.is_finite() || record.revenue < 0.0 {
            return Err(StreamlensError::invalid_input_record(
                format!("record carries invalid revenue {}", record.revenue),
                record.song_id.clone(),
            ));
        }
        Ok(())
    }

    /// Partition the records into buckets and sum streams and revenue.
    ///
    /// Returns an empty sequence for empty input. Fails with `InvalidInput`
    /// on the first malformed record. Input is read only, never mutated.
    #[instrument(skip(self, records), fields(window = %self.window))]
    pub fn aggregate(&self, records: &[StreamRecord]) -> Result<Vec<StreamBucket>> {
        // BTreeMap keeps buckets chronologically ordered for free
        let mut buckets: BTreeMap<NaiveDate, StreamBucket> = BTreeMap::new();

        for record in records {
            self.validate(record)?;

            let start = self.width.bucket_start(record.date).max(self.window.start());
            let bucket = buckets.entry(start).or_insert_with(|| StreamBucket {
                start,
                streams: 0,
                revenue: 0.0,
                by_platform: HashMap::new(),
            });

            bucket.streams += record.streams;
            bucket.revenue += record.revenue;

            let totals = bucket.by_platform.entry(record.platform).or_default();
            totals.streams += record.streams;
            totals.revenue += record.revenue;
        }

        let result: Vec<StreamBucket> = buckets.into_values().collect();
        debug!("rolled up {} records into {} buckets", records.len(), result.len());
        Ok(result)
    }

    /// Window-wide totals, computed from the same validated pass
    pub fn totals(&self, records: &[StreamRecord]) -> Result<PlatformTotals> {
        let buckets = self.aggregate(records)?;
        Ok(PlatformTotals {
            streams: buckets.iter().map(|b| b.streams).sum(),
            revenue: buckets.iter().map(|b| b.revenue).sum(),
        })
    }

    /// Window-wide totals per platform
    pub fn totals_by_platform(
        &self,
        records: &[StreamRecord],
    ) -> Result<HashMap<Platform, PlatformTotals>> {
        let buckets = self.aggregate(records)?;
        let mut totals: HashMap<Platform, PlatformTotals> = HashMap::new();
        for bucket in buckets {
            for (platform, partial) in bucket.by_platform {
                let entry = totals.entry(platform).or_default();
                entry.streams += partial.streams;
                entry.revenue += partial.revenue;
            }
        }
        Ok(totals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use streamlens_common::test_utils::{date, record, window};

    #[test]
    fn test_three_day_window_sums_to_450() {
        let win = window(date(2024, 3, 1), date(2024, 3, 4));
        let records = vec![
            record(Platform::Spotify, date(2024, 3, 1), "song-1", 100),
            record(Platform::Spotify, date(2024, 3, 2), "song-1", 150),
            record(Platform::Spotify, date(2024, 3, 3), "song-1", 200),
        ];

        let daily = RollupAggregator::new(win, BucketWidth::Day)
            .aggregate(&records)
            .unwrap();
        assert_eq!(daily.len(), 3);
        assert_eq!(daily.iter().map(|b| b.streams).sum::<u64>(), 450);

        let weekly = RollupAggregator::new(win, BucketWidth::Week)
            .aggregate(&records)
            .unwrap();
        assert_eq!(weekly.len(), 1);
        assert_eq!(weekly[0].streams, 450);
    }

    #[test]
    fn test_buckets_are_chronological_regardless_of_input_order() {
        let win = window(date(2024, 3, 1), date(2024, 3, 11));
        let records = vec![
            record(Platform::Spotify, date(2024, 3, 9), "song-1", 10),
            record(Platform::Spotify, date(2024, 3, 2), "song-1", 20),
            record(Platform::AppleMusic, date(2024, 3, 5), "song-2", 30),
        ];

        let buckets = RollupAggregator::new(win, BucketWidth::Day)
            .aggregate(&records)
            .unwrap();
        let starts: Vec<NaiveDate> = buckets.iter().map(|b| b.start).collect();
        assert_eq!(starts, vec![date(2024, 3, 2), date(2024, 3, 5), date(2024, 3, 9)]);
    }

    #[test]
    fn test_record_outside_window_is_rejected_with_identity() {
        let win = window(date(2024, 3, 1), date(2024, 3, 4));
        let records = vec![record(Platform::Spotify, date(2024, 3, 10), "stray-song", 5)];

        let err = RollupAggregator::new(win, BucketWidth::Day)
            .aggregate(&records)
            .unwrap_err();
        match err {
            StreamlensError::InvalidInput { record, .. } => {
                assert_eq!(record.as_deref(), Some("stray-song"));
            }
            other => panic!("expected InvalidInput, got {other}"),
        }
    }

    #[test]
    fn test_negative_revenue_is_rejected() {
        let win = window(date(2024, 3, 1), date(2024, 3, 4));
        let mut bad = record(Platform::Spotify, date(2024, 3, 1), "song-1", 10);
        bad.revenue = -0.5;

        let result = RollupAggregator::new(win, BucketWidth::Day).aggregate(&[bad]);
        assert!(matches!(result, Err(StreamlensError::InvalidInput { .. })));
    }

    #[test]
    fn test_empty_input_returns_empty_sequence() {
        let win = window(date(2024, 3, 1), date(2024, 3, 4));
        let buckets = RollupAggregator::new(win, BucketWidth::Day)
            .aggregate(&[])
            .unwrap();
        assert!(buckets.is_empty());
    }

    #[test]
    fn test_conservation_over_window() {
        // Totals equal the sum of every in-window record
        let win = window(date(2024, 1, 1), date(2024, 2, 1));
        let records: Vec<StreamRecord> = (0..31)
            .map(|i| {
                record(
                    Platform::ALL[(i % 4) as usize],
                    date(2024, 1, 1 + i as u32),
                    "song-1",
                    (i * 7 + 3) as u64,
                )
            })
            .collect();
        let expected: u64 = records.iter().map(|r| r.streams).sum();

        let aggregator = RollupAggregator::new(win, BucketWidth::Week);
        let totals = aggregator.totals(&records).unwrap();
        assert_eq!(totals.streams, expected);

        let per_platform = aggregator.totals_by_platform(&records).unwrap();
        assert_eq!(per_platform.values().map(|t| t.streams).sum::<u64>(), expected);
    }

    #[test]
    fn test_partition_consistency_across_adjacent_windows() {
        let combined = window(date(2024, 3, 1), date(2024, 3, 15));
        let second = window(date(2024, 3, 8), date(2024, 3, 15));
        let first = second.preceding();

        let records: Vec<StreamRecord> = combined
            .iter_days()
            .enumerate()
            .map(|(i, day)| record(Platform::Spotify, day, "song-1", 100 + i as u64))
            .collect();

        let in_window = |w: PeriodWindow| -> Vec<StreamRecord> {
            records.iter().filter(|r| w.contains(r.date)).cloned().collect()
        };

        let combined_buckets = RollupAggregator::new(combined, BucketWidth::Day)
            .aggregate(&records)
            .unwrap();
        let mut split_buckets = RollupAggregator::new(first, BucketWidth::Day)
            .aggregate(&in_window(first))
            .unwrap();
        split_buckets.extend(
            RollupAggregator::new(second, BucketWidth::Day)
                .aggregate(&in_window(second))
                .unwrap(),
        );

        assert_eq!(combined_buckets, split_buckets);
    }

    #[test]
    fn test_week_buckets_clamp_to_window_start() {
        // Window opens mid-week; the first bucket must not predate it
        let win = window(date(2024, 3, 6), date(2024, 3, 13));
        let records = vec![record(Platform::Spotify, date(2024, 3, 6), "song-1", 10)];

        let buckets = RollupAggregator::new(win, BucketWidth::Week)
            .aggregate(&records)
            .unwrap();
        assert_eq!(buckets[0].start, date(2024, 3, 6));
    }

    #[test]
    fn test_input_records_are_not_mutated() {
        let win = window(date(2024, 3, 1), date(2024, 3, 4));
        let records = vec![record(Platform::Spotify, date(2024, 3, 1), "song-1", 100)];
        let snapshot = records.clone();

        RollupAggregator::new(win, BucketWidth::Day)
            .aggregate(&records)
            .unwrap();
        assert_eq!(records, snapshot);
    }
}
