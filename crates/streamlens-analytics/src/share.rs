//! Share-of-total percentage breakdowns
//!
//! For any non-zero grand total the group percentages sum to 100 within
//! floating point tolerance. An all-zero total yields 0% shares rather than
//! an error, matching how the dashboard renders an empty breakdown.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use streamlens_common::{Platform, StreamRecord};

/// One group's contribution to a window's grand total
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareEntry {
    pub key: String,
    pub value: f64,
    pub percentage: f64,
}

/// Compute each group's percentage of the grand total.
/// Entries come back largest-share first, ties by ascending key.
pub fn share_of_total(groups: impl IntoIterator<Item = (String, f64)>) -> Vec<ShareEntry> {
    let groups: Vec<(String, f64)> = groups.into_iter().collect();
    let total: f64 = groups.iter().map(|(_, v)| v).sum();

    let mut entries: Vec<ShareEntry> = groups
        .into_iter()
        .map(|(key, value)| ShareEntry {
            key,
            value,
            percentage: if total == 0.0 { 0.0 } else { value / total * 100.0 },
        })
        .collect();

    entries.sort_by(|a, b| {
        b.percentage
            .partial_cmp(&a.percentage)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.key.cmp(&b.key))
    });
    entries
}

/// Platform share of streams across a record set
pub fn platform_stream_share(records: &[StreamRecord]) -> Vec<ShareEntry> {
    let mut totals: HashMap<Platform, u64> = HashMap::new();
    for record in records {
        *totals.entry(record.platform).or_default() += record.streams;
    }
    share_of_total(
        totals
            .into_iter()
            .map(|(platform, streams)| (platform.display_name().to_string(), streams as f64)),
    )
}

/// Platform share of revenue across a record set
pub fn platform_revenue_share(records: &[StreamRecord]) -> Vec<ShareEntry> {
    let mut totals: HashMap<Platform, f64> = HashMap::new();
    for record in records {
        *totals.entry(record.platform).or_default() += record.revenue;
    }
    share_of_total(
        totals
            .into_iter()
            .map(|(platform, revenue)| (platform.display_name().to_string(), revenue)),
    )
}
