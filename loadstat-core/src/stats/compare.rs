//! Percentage comparison of aggregated batch statistics.

use serde::Serialize;

/// Percentage difference of `other` relative to `base`, truncated to two
/// decimal places by flooring after scaling.
///
/// `floor(((other − base) / base) * 100 * 100) / 100` — note this is a
/// floor, not round-half-even, so results are biased slightly downward
/// (e.g. `floored_percent_diff(100.0, 110.456)` is `10.45`, not `10.46`).
///
/// Returns `None` when `base` is zero: the percentage is undefined and the
/// metric is incomparable, never ±infinity or NaN.
pub fn floored_percent_diff(base: f64, other: f64) -> Option<f64> {
    if base == 0.0 {
        return None;
    }
    Some((((other - base) / base) * 100.0 * 100.0).floor() / 100.0)
}

/// Sign-aware classification of a mean comparison between a baseline batch
/// and a candidate batch.
///
/// Metrics are timings where lower is better, so a positive percentage
/// difference (candidate mean above baseline mean) means the baseline
/// batch is the faster one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MeanClassification {
    /// Baseline is faster than candidate (candidate mean is larger).
    Faster,
    /// Baseline is slower than candidate (candidate mean is smaller).
    Slower,
    Unchanged,
}

impl MeanClassification {
    pub fn from_percent_diff(percent_diff: f64) -> Self {
        if percent_diff > 0.0 {
            MeanClassification::Faster
        } else if percent_diff < 0.0 {
            MeanClassification::Slower
        } else {
            MeanClassification::Unchanged
        }
    }
}

/// Classification of a variance comparison, framed in the same direction
/// as the mean comparison: a positive percentage difference means the
/// candidate's variance is larger, i.e. the baseline batch is the less
/// noisy one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VarianceClassification {
    /// Baseline variance is lower than candidate variance.
    Lower,
    /// Baseline variance is higher than candidate variance.
    Higher,
    Equal,
}

impl VarianceClassification {
    pub fn from_percent_diff(percent_diff: f64) -> Self {
        if percent_diff > 0.0 {
            VarianceClassification::Lower
        } else if percent_diff < 0.0 {
            VarianceClassification::Higher
        } else {
            VarianceClassification::Equal
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floor_truncation_policy() {
        // 10.456% truncates down to 10.45, never rounds up to 10.46.
        assert_eq!(floored_percent_diff(100.0, 110.456), Some(10.45));
    }

    #[test]
    fn test_floor_biases_downward_for_negative_diffs() {
        // Raw value is about -9.4661%; flooring moves it to -9.47.
        assert_eq!(floored_percent_diff(110.456, 100.0), Some(-9.47));
    }

    #[test]
    fn test_equal_values_diff_is_exactly_zero() {
        for v in [1.0, 42.5, 100.0, 1830.25] {
            assert_eq!(floored_percent_diff(v, v), Some(0.0));
        }
    }

    #[test]
    fn test_zero_base_is_incomparable() {
        assert_eq!(floored_percent_diff(0.0, 100.0), None);
        assert_eq!(floored_percent_diff(0.0, 0.0), None);
        assert_eq!(floored_percent_diff(0.0, -5.0), None);
    }

    #[test]
    fn test_doubling_is_one_hundred_percent() {
        assert_eq!(floored_percent_diff(100.0, 200.0), Some(100.0));
    }

    #[test]
    fn test_mean_classification_sign_convention() {
        // Candidate mean larger: candidate pages load slower, baseline is
        // faster.
        assert_eq!(
            MeanClassification::from_percent_diff(100.0),
            MeanClassification::Faster
        );
        assert_eq!(
            MeanClassification::from_percent_diff(-10.0),
            MeanClassification::Slower
        );
        assert_eq!(
            MeanClassification::from_percent_diff(0.0),
            MeanClassification::Unchanged
        );
    }

    #[test]
    fn test_variance_classification_framing() {
        assert_eq!(
            VarianceClassification::from_percent_diff(50.0),
            VarianceClassification::Lower
        );
        assert_eq!(
            VarianceClassification::from_percent_diff(-50.0),
            VarianceClassification::Higher
        );
        assert_eq!(
            VarianceClassification::from_percent_diff(0.0),
            VarianceClassification::Equal
        );
    }
}
