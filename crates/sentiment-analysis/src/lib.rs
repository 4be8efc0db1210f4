use analysis_core::normalize::{clamp_unit, mean, NEUTRAL_SCORE};
use analysis_core::{Domain, DomainScorer, NewsSentimentCounts, SentimentSnapshot};

pub mod insider;
pub use insider::{InsiderActivityScorer, InsiderFlowScorer};

/// Share of the blended score taken by search interest
const TREND_WEIGHT: f64 = 0.8;
/// Share of the blended score taken by headline sentiment
const HEADLINE_WEIGHT: f64 = 0.2;
/// Negative headlines must exceed positives by this ratio to trigger the penalty
const NEGATIVE_SKEW_RATIO: f64 = 1.5;
const NEGATIVE_SKEW_PENALTY: f64 = 0.85;
/// Number of most recent search-interest readings averaged
const TREND_TAIL: usize = 3;

/// `(positive - negative) / total`, rescaled from [-1, 1] to [0, 1].
/// No headlines at all reads as neutral.
pub fn headline_score(counts: &NewsSentimentCounts) -> f64 {
    let total = counts.total();
    if total == 0 {
        return NEUTRAL_SCORE;
    }
    let net = (counts.positive as f64 - counts.negative as f64) / total as f64;
    clamp_unit((net + 1.0) / 2.0)
}

/// Search-interest score from raw 0-100 readings (oldest first): mean of
/// the latest three, scaled to [0, 1]. No readings reads as neutral.
pub fn search_interest_score(readings: &[f64]) -> f64 {
    let tail = &readings[readings.len().saturating_sub(TREND_TAIL)..];
    match mean(tail) {
        Some(avg) => clamp_unit(avg / 100.0),
        None => NEUTRAL_SCORE,
    }
}

/// 80% search interest, 20% headline sentiment, discounted when negative
/// headlines outnumber positive ones by more than 1.5x.
pub fn blended_sentiment_score(snapshot: &SentimentSnapshot) -> f64 {
    let counts = &snapshot.counts;
    let trend = clamp_unit(snapshot.trend_score);
    let mut combined = TREND_WEIGHT * trend + HEADLINE_WEIGHT * headline_score(counts);

    if counts.negative as f64 > counts.positive as f64 * NEGATIVE_SKEW_RATIO {
        combined *= NEGATIVE_SKEW_PENALTY;
    }

    clamp_unit(combined)
}

/// News sub-score from headline sentiment counts
#[derive(Debug, Default, Clone, Copy)]
pub struct NewsCountScorer;

impl DomainScorer for NewsCountScorer {
    type Input = NewsSentimentCounts;

    fn domain(&self) -> Domain {
        Domain::News
    }

    fn score(&self, counts: &NewsSentimentCounts) -> f64 {
        headline_score(counts)
    }
}

/// News sub-score blending search interest with headline sentiment
#[derive(Debug, Default, Clone, Copy)]
pub struct BlendedSentimentScorer;

impl DomainScorer for BlendedSentimentScorer {
    type Input = SentimentSnapshot;

    fn domain(&self) -> Domain {
        Domain::News
    }

    fn score(&self, snapshot: &SentimentSnapshot) -> f64 {
        blended_sentiment_score(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn counts(positive: u32, negative: u32, neutral: u32) -> NewsSentimentCounts {
        NewsSentimentCounts { positive, negative, neutral }
    }

    #[test]
    fn test_headline_score_rescales_net_sentiment() {
        assert_abs_diff_eq!(headline_score(&counts(10, 0, 0)), 1.0);
        assert_abs_diff_eq!(headline_score(&counts(0, 10, 0)), 0.0);
        assert_abs_diff_eq!(headline_score(&counts(3, 1, 4)), 0.625);
        assert_abs_diff_eq!(headline_score(&counts(0, 0, 7)), 0.5);
    }

    #[test]
    fn test_headline_score_no_news_is_neutral() {
        assert_abs_diff_eq!(headline_score(&counts(0, 0, 0)), 0.5);
        assert_abs_diff_eq!(NewsCountScorer.score(&counts(0, 0, 0)), 0.5);
        assert_eq!(NewsCountScorer.domain(), Domain::News);
    }

    #[test]
    fn test_headline_score_with_huge_counts() {
        let score = headline_score(&counts(u32::MAX, u32::MAX, 0));
        assert_abs_diff_eq!(score, 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(headline_score(&counts(u32::MAX, 0, 0)), 1.0);
    }

    #[test]
    fn test_search_interest_uses_latest_three() {
        let readings = vec![0.0, 0.0, 90.0, 60.0, 30.0];
        assert_abs_diff_eq!(search_interest_score(&readings), 0.6, epsilon = 1e-12);
        assert_abs_diff_eq!(search_interest_score(&[40.0]), 0.4, epsilon = 1e-12);
        assert_abs_diff_eq!(search_interest_score(&[]), 0.5);
        assert_abs_diff_eq!(search_interest_score(&[250.0, 300.0]), 1.0);
    }

    #[test]
    fn test_blended_score_weights() {
        let snapshot = SentimentSnapshot { counts: counts(2, 2, 0), trend_score: 0.5 };
        // 0.8 * 0.5 + 0.2 * 0.5
        assert_abs_diff_eq!(blended_sentiment_score(&snapshot), 0.5, epsilon = 1e-12);

        let snapshot = SentimentSnapshot { counts: counts(4, 0, 0), trend_score: 0.25 };
        assert_abs_diff_eq!(BlendedSentimentScorer.score(&snapshot), 0.4, epsilon = 1e-12);
    }

    #[test]
    fn test_blended_score_negative_skew_penalty() {
        // 4 negatives > 1.5 * 2 positives
        let snapshot = SentimentSnapshot { counts: counts(2, 4, 0), trend_score: 1.0 };
        let headline = (2.0 - 4.0) / 6.0;
        let expected = (0.8 + 0.2 * (headline + 1.0) / 2.0) * 0.85;
        assert_abs_diff_eq!(blended_sentiment_score(&snapshot), expected, epsilon = 1e-12);

        // exactly 1.5x is not penalised
        let snapshot = SentimentSnapshot { counts: counts(2, 3, 0), trend_score: 1.0 };
        let headline = (2.0 - 3.0) / 5.0;
        let expected = 0.8 + 0.2 * (headline + 1.0) / 2.0;
        assert_abs_diff_eq!(blended_sentiment_score(&snapshot), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_blended_score_clamps_bad_trend() {
        let snapshot = SentimentSnapshot { counts: counts(1, 0, 0), trend_score: 7.0 };
        assert!(blended_sentiment_score(&snapshot) <= 1.0);
        let snapshot = SentimentSnapshot { counts: counts(0, 1, 0), trend_score: f64::NAN };
        let score = blended_sentiment_score(&snapshot);
        assert!((0.0..=1.0).contains(&score));
    }
}
