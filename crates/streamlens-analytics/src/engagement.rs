//! Weighted engagement scoring for the content page

use serde::{Deserialize, Serialize};

/// Inputs to the engagement score for one song over a window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngagementInput {
    pub streams: u64,
    pub saves: u64,
    pub shares: u64,
    /// Average fraction of the track listeners play through, 0.0..=1.0
    pub completion_rate: f64,
}

// Normalization ceilings: 10k streams, a 30% save rate, and a 5% share rate
// each count as maximal engagement on their axis.
const STREAM_CEILING: f64 = 10_000.0;
const SAVE_RATE_CEILING: f64 = 0.30;
const SHARE_RATE_CEILING: f64 = 0.05;
const WEIGHTS: [f64; 4] = [0.4, 0.2, 0.2, 0.2];

/// Overall engagement score on a 0-100 scale
pub fn engagement_score(input: &EngagementInput) -> f64 {
    let streams = input.streams as f64;
    let normalized_streams = (streams / STREAM_CEILING).min(1.0);
    let (normalized_saves, normalized_shares) = if input.streams == 0 {
        (0.0, 0.0)
    } else {
        (
            (input.saves as f64 / streams / SAVE_RATE_CEILING).min(1.0),
            (input.shares as f64 / streams / SHARE_RATE_CEILING).min(1.0),
        )
    };

    let score = normalized_streams * WEIGHTS[0]
        + normalized_saves * WEIGHTS[1]
        + normalized_shares * WEIGHTS[2]
        + input.completion_rate.clamp(0.0, 1.0) * WEIGHTS[3];

    score * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use streamlens_common::test_utils::assert_approx_eq;

    #[test]
    fn test_maximal_engagement_scores_one_hundred() {
        let input = EngagementInput {
            streams: 50_000,
            saves: 20_000,
            shares: 5_000,
            completion_rate: 1.0,
        };
        assert_approx_eq(engagement_score(&input), 100.0, 1e-9);
    }

    #[test]
    fn test_zero_streams_scores_only_completion() {
        let input = EngagementInput {
            streams: 0,
            saves: 0,
            shares: 0,
            completion_rate: 0.5,
        };
        assert_approx_eq(engagement_score(&input), 10.0, 1e-9);
    }

    #[test]
    fn test_partial_engagement() {
        // 5k streams (0.5 of ceiling), 15% save rate (0.5), 2.5% share rate
        // (0.5), 80% completion
        let input = EngagementInput {
            streams: 5_000,
            saves: 750,
            shares: 125,
            completion_rate: 0.8,
        };
        let score = engagement_score(&input);
        assert_approx_eq(score, 0.5 * 40.0 + 0.5 * 20.0 + 0.5 * 20.0 + 0.8 * 20.0, 1e-9);
    }

    #[test]
    fn test_score_stays_in_range() {
        let input = EngagementInput {
            streams: u64::MAX,
            saves: u64::MAX,
            shares: u64::MAX,
            completion_rate: 5.0,
        };
        let score = engagement_score(&input);
        assert!((0.0..=100.0).contains(&score));
    }
}
