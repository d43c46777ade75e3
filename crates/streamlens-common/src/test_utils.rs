//! Shared test helpers for the streamlens workspace.
//!
//! Fixtures for building records and windows, plus a floating point
//! approximate-equality assertion used by the analytics tests.

use crate::types::{DemographicSlice, Platform, PeriodWindow, StreamRecord};
use crate::types::{AgeBracket, Gender};
use chrono::NaiveDate;
use std::sync::Once;
use tracing_subscriber::{fmt, EnvFilter};

static INIT: Once = Once::new();

/// Initialize logging for tests. Safe to call multiple times.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
        fmt().with_test_writer().with_env_filter(filter).init();
    });
}

/// Build a date without the Option dance
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Build a window covering `[start, end)`
pub fn window(start: NaiveDate, end: NaiveDate) -> PeriodWindow {
    PeriodWindow::new(start, end).unwrap()
}

/// Build a stream record with a plausible per-stream revenue
pub fn record(platform: Platform, day: NaiveDate, song_id: &str, streams: u64) -> StreamRecord {
    StreamRecord::new(platform, day, song_id, streams, streams as f64 * 0.004)
}

/// Build a demographic slice
pub fn slice(
    age_bracket: AgeBracket,
    gender: Gender,
    country: &str,
    listener_count: u64,
) -> DemographicSlice {
    DemographicSlice {
        age_bracket,
        gender,
        country: country.to_string(),
        listener_count,
    }
}

/// Assert that two floating point numbers are approximately equal
pub fn assert_approx_eq(left: f64, right: f64, tolerance: f64) {
    let diff = (left - right).abs();
    assert!(
        diff <= tolerance,
        "assertion failed: `{left}` is not approximately equal to `{right}` (tolerance: {tolerance}, diff: {diff})"
    );
}
