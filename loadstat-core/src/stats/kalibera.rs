//! Kalibera–Jain ratio confidence intervals.
//!
//! Percentage-of-means comparisons are unreliable when batch variance is
//! high. This estimator bounds the ratio of two batches' true mean
//! performance with a confidence interval that accounts for measurement
//! variance, so a caller can tell a real difference from noise.

use std::fmt;

use serde::Serialize;
use statrs::distribution::{ContinuousCDF, StudentsT};
use thiserror::Error;

/// Which estimator precondition failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IntervalDefect {
    /// The radicand is not positive: variance is too high relative to the
    /// means to support an interval at this confidence level.
    NonPositiveRadicand,
    /// The denominator is not positive: the interval would be sign-flipped.
    NonPositiveDenominator,
}

impl fmt::Display for IntervalDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntervalDefect::NonPositiveRadicand => {
                write!(f, "variance too high relative to the means")
            }
            IntervalDefect::NonPositiveDenominator => {
                write!(f, "interval denominator is not positive")
            }
        }
    }
}

/// Errors produced by the ratio estimator.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum EstimateError {
    /// The inputs do not support a valid interval at this confidence
    /// level. The metric's estimate is indeterminate; no degenerate or
    /// approximate interval is returned.
    #[error("invalid confidence interval: {0}")]
    InvalidConfidenceInterval(IntervalDefect),
}

/// A ratio estimate of relative performance between two batches for one
/// metric, with bounded confidence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RatioEstimate {
    /// `mean_a / mean_b`.
    pub ratio: f64,
    /// Lower confidence bound on the ratio.
    pub lower_bound: f64,
    /// Upper confidence bound on the ratio.
    pub upper_bound: f64,
    /// The confidence level the bounds were computed at.
    pub confidence_level: f64,
}

impl RatioEstimate {
    /// Whether the interval contains 1.0, i.e. the observed difference is
    /// indistinguishable from noise at this confidence level.
    pub fn straddles_unity(&self) -> bool {
        self.lower_bound < 1.0 && self.upper_bound > 1.0
    }
}

/// The Kalibera–Jain ratio confidence interval estimator.
///
/// Defaults to a 75% confidence level with 2 degrees of freedom, matching
/// a two-observation-class comparison.
#[derive(Debug, Clone, Copy)]
pub struct RatioCi {
    confidence_level: f64,
    degrees_of_freedom: f64,
}

impl Default for RatioCi {
    fn default() -> Self {
        Self {
            confidence_level: 0.75,
            degrees_of_freedom: 2.0,
        }
    }
}

impl RatioCi {
    /// Create an estimator with the specified confidence level and the
    /// default 2 degrees of freedom.
    ///
    /// # Panics
    /// Panics if `confidence_level` is not in the range (0, 1).
    pub fn new(confidence_level: f64) -> Self {
        Self::with_degrees_of_freedom(confidence_level, 2.0)
    }

    /// Create an estimator with explicit degrees of freedom.
    ///
    /// # Panics
    /// Panics if `confidence_level` is not in (0, 1) or
    /// `degrees_of_freedom` is not positive.
    pub fn with_degrees_of_freedom(confidence_level: f64, degrees_of_freedom: f64) -> Self {
        assert!(
            confidence_level > 0.0 && confidence_level < 1.0,
            "confidence_level must be between 0 and 1 (exclusive)"
        );
        assert!(
            degrees_of_freedom > 0.0,
            "degrees_of_freedom must be positive"
        );
        Self {
            confidence_level,
            degrees_of_freedom,
        }
    }

    pub fn confidence_level(&self) -> f64 {
        self.confidence_level
    }

    /// Squared two-tailed Student-t critical value at the configured
    /// significance level.
    fn t_squared(&self) -> f64 {
        let alpha = 1.0 - self.confidence_level;
        let t = match StudentsT::new(0.0, 1.0, self.degrees_of_freedom) {
            Ok(dist) => dist.inverse_cdf(1.0 - alpha / 2.0),
            // Constructor validates the parameters; a zero critical value
            // collapses the radicand to zero and the estimate to an error.
            Err(_) => 0.0,
        };
        t * t
    }

    /// Estimate the ratio of batch A's true mean to batch B's, with
    /// confidence bounds.
    ///
    /// # Errors
    ///
    /// Returns [`EstimateError::InvalidConfidenceInterval`] if the
    /// radicand or the interval denominator is not positive; the inputs do
    /// not support a valid interval at this confidence level.
    pub fn estimate(
        &self,
        mean_a: f64,
        var_a: f64,
        mean_b: f64,
        var_b: f64,
    ) -> Result<RatioEstimate, EstimateError> {
        let t_squared = self.t_squared();
        let h_a = t_squared * var_a / 2.0;
        let h_b = t_squared * var_b / 2.0;

        let product = mean_a * mean_b;
        let denominator = mean_a * mean_a - h_a;
        let radicand = product * product - denominator * (mean_b * mean_b - h_b);

        if radicand <= 0.0 {
            return Err(EstimateError::InvalidConfidenceInterval(
                IntervalDefect::NonPositiveRadicand,
            ));
        }
        if denominator <= 0.0 {
            return Err(EstimateError::InvalidConfidenceInterval(
                IntervalDefect::NonPositiveDenominator,
            ));
        }

        let root = radicand.sqrt();
        Ok(RatioEstimate {
            ratio: mean_a / mean_b,
            lower_bound: (product - root) / denominator,
            upper_bound: (product + root) / denominator,
            confidence_level: self.confidence_level,
        })
    }
}
