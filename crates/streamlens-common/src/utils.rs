//! Small date and formatting helpers

use chrono::{Datelike, NaiveDate, Weekday};

/// Short month name for axis labels, 1-based month number
pub fn short_month_name(month: u32) -> &'static str {
    const NAMES: [&str; 12] = [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ];
    NAMES[(month.clamp(1, 12) - 1) as usize]
}

/// Whether the date falls on a Saturday or Sunday
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Compact count formatting for report output, e.g. 12_400 -> "12.4K"
pub fn format_count(value: u64) -> String {
    match value {
        0..=999 => value.to_string(),
        1_000..=999_999 => format!("{:.1}K", value as f64 / 1_000.0),
        _ => format!("{:.2}M", value as f64 / 1_000_000.0),
    }
}
