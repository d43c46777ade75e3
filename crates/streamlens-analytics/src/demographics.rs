//! Demographic rollups for the audience page
//!
//! Listener shares by age bracket, gender, and country, built from the
//! `DemographicSlice` breakdowns a data source returns for a window.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use streamlens_common::{AgeBracket, DemographicSlice, Gender};

use crate::share::{share_of_total, ShareEntry};

/// Complete audience breakdown for one window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudienceBreakdown {
    pub total_listeners: u64,
    pub by_age: Vec<ShareEntry>,
    pub by_gender: Vec<ShareEntry>,
    pub by_country: Vec<ShareEntry>,
}

/// Roll demographic slices up into age, gender, and country shares
pub fn audience_breakdown(slices: &[DemographicSlice]) -> AudienceBreakdown {
    let mut by_age: HashMap<AgeBracket, u64> = HashMap::new();
    let mut by_gender: HashMap<Gender, u64> = HashMap::new();
    let mut by_country: HashMap<&str, u64> = HashMap::new();
    let mut total_listeners = 0u64;

    for slice in slices {
        *by_age.entry(slice.age_bracket).or_default() += slice.listener_count;
        *by_gender.entry(slice.gender).or_default() += slice.listener_count;
        *by_country.entry(slice.country.as_str()).or_default() += slice.listener_count;
        total_listeners += slice.listener_count;
    }

    AudienceBreakdown {
        total_listeners,
        by_age: share_of_total(
            by_age
                .into_iter()
                .map(|(bracket, count)| (bracket.label().to_string(), count as f64)),
        ),
        by_gender: share_of_total(
            by_gender
                .into_iter()
                .map(|(gender, count)| (gender.label().to_string(), count as f64)),
        ),
        by_country: share_of_total(
            by_country
                .into_iter()
                .map(|(country, count)| (country.to_string(), count as f64)),
        ),
    }
}
