//! Core domain types shared across the streamlens workspace

use crate::error::{Result, StreamlensError};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Streaming platforms the dashboard reports on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Platform {
    Spotify,
    AppleMusic,
    YouTubeMusic,
    AmazonMusic,
}

impl Platform {
    /// All supported platforms, in display order
    pub const ALL: [Platform; 4] = [
        Platform::Spotify,
        Platform::AppleMusic,
        Platform::YouTubeMusic,
        Platform::AmazonMusic,
    ];

    /// Human-readable platform name
    pub fn display_name(&self) -> &'static str {
        match self {
            Platform::Spotify => "Spotify",
            Platform::AppleMusic => "Apple Music",
            Platform::YouTubeMusic => "YouTube Music",
            Platform::AmazonMusic => "Amazon Music",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A single streaming observation at day granularity.
/// Immutable once produced by a data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamRecord {
    pub platform: Platform,
    pub date: NaiveDate,
    /// Opaque song identifier assigned by the platform
    pub song_id: String,
    pub streams: u64,
    /// Revenue attributed to the streams, in the reporting currency
    pub revenue: f64,
}

impl StreamRecord {
    pub fn new(
        platform: Platform,
        date: NaiveDate,
        song_id: impl Into<String>,
        streams: u64,
        revenue: f64,
    ) -> Self {
        Self {
            platform,
            date,
            song_id: song_id.into(),
            streams,
            revenue,
        }
    }
}

/// Listener age brackets reported by the platforms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AgeBracket {
    From13To17,
    From18To24,
    From25To34,
    From35To44,
    From45To54,
    Over55,
}

impl AgeBracket {
    pub const ALL: [AgeBracket; 6] = [
        AgeBracket::From13To17,
        AgeBracket::From18To24,
        AgeBracket::From25To34,
        AgeBracket::From35To44,
        AgeBracket::From45To54,
        AgeBracket::Over55,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            AgeBracket::From13To17 => "13-17",
            AgeBracket::From18To24 => "18-24",
            AgeBracket::From25To34 => "25-34",
            AgeBracket::From35To44 => "35-44",
            AgeBracket::From45To54 => "45-54",
            AgeBracket::Over55 => "55+",
        }
    }
}

impl fmt::Display for AgeBracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Listener gender categories reported by the platforms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Gender {
    Female,
    Male,
    NonBinary,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Female, Gender::Male, Gender::NonBinary];

    pub fn label(&self) -> &'static str {
        match self {
            Gender::Female => "Female",
            Gender::Male => "Male",
            Gender::NonBinary => "Non-binary/Other",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A demographic breakdown entry for one fetch window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemographicSlice {
    pub age_bracket: AgeBracket,
    pub gender: Gender,
    /// ISO 3166-1 alpha-2 country code
    pub country: String,
    pub listener_count: u64,
}

/// A half-open date range `[start, end)` used to scope and bucket metrics.
/// Never zero-length: construction fails unless `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PeriodWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl PeriodWindow {
    /// Create a window covering `[start, end)`
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start >= end {
            return Err(StreamlensError::invalid_input(format!(
                "period window must satisfy start < end, got [{}, {})",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    /// Create a window covering `days` days ending the day after `last_day`
    pub fn ending_on(last_day: NaiveDate, days: i64) -> Result<Self> {
        if days < 1 {
            return Err(StreamlensError::invalid_input(format!(
                "period window must span at least one day, got {}",
                days
            )));
        }
        let end = last_day + Duration::days(1);
        Self::new(end - Duration::days(days), end)
    }

    /// First day inside the window
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// First day after the window (exclusive bound)
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of days covered, always >= 1
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// Whether the given date falls inside the window
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end
    }

    /// The adjacent window of equal length immediately before this one
    pub fn preceding(&self) -> Self {
        let span = self.end - self.start;
        Self {
            start: self.start - span,
            end: self.start,
        }
    }

    /// Iterate over the days in the window in chronological order
    pub fn iter_days(&self) -> impl Iterator<Item = NaiveDate> {
        let start = self.start;
        (0..self.days()).map(move |i| start + Duration::days(i))
    }

    /// Display label, e.g. "2024-01-01 to 2024-01-31"
    pub fn label(&self) -> String {
        format!(
            "{} to {}",
            self.start.format("%Y-%m-%d"),
            (self.end - Duration::days(1)).format("%Y-%m-%d")
        )
    }
}

impl fmt::Display for PeriodWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Reporting periods selectable from the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Day,
    Week,
    Month,
    Year,
    Custom,
}

impl Period {
    /// Resolve the period into a concrete window ending on `last_day`.
    /// `Custom` has no implied span and must be resolved by the caller.
    pub fn to_window(&self, last_day: NaiveDate) -> Result<PeriodWindow> {
        let days = match self {
            Period::Day => 1,
            Period::Week => 7,
            Period::Month => 30,
            Period::Year => 365,
            Period::Custom => {
                return Err(StreamlensError::config(
                    "custom period requires explicit start and end dates",
                ))
            }
        };
        PeriodWindow::ending_on(last_day, days)
    }
}

/// A derived dashboard metric. Recomputed on each query, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedMetric {
    pub name: String,
    pub period: PeriodWindow,
    pub value: f64,
    /// The same metric over the preceding window, when available.
    /// Used by the presentation layer for growth deltas.
    pub previous_value: Option<f64>,
}

impl AggregatedMetric {
    pub fn new(name: impl Into<String>, period: PeriodWindow, value: f64) -> Self {
        Self {
            name: name.into(),
            period,
            value,
            previous_value: None,
        }
    }

    pub fn with_previous(mut self, previous: f64) -> Self {
        self.previous_value = Some(previous);
        self
    }
}
