//! Pairwise batch comparison.
//!
//! Drives the comparator and the ratio estimator across every metric
//! column shared by two batches, collecting per-metric outcomes. Failures
//! are per metric and never hide results for other metrics; only a batch
//! with no records at all aborts the whole comparison.

use serde::Serialize;
use thiserror::Error;

use crate::stats::{
    floored_percent_diff, BatchStats, ColumnStats, MeanClassification, RatioCi, RatioEstimate,
    VarianceClassification,
};

/// Errors that abort a whole batch comparison.
#[derive(Debug, Error)]
pub enum CompareError {
    /// The requested batch label has no records in the dataset. No
    /// meaningful partial comparison exists without both sides.
    #[error("batch '{0}' has no records")]
    UnknownBatch(String),
}

/// Outcome of comparing two batches' means for one metric column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MeanDiff {
    Compared {
        percent_diff: f64,
        classification: MeanClassification,
    },
    /// The baseline mean was zero; the percentage is undefined for this
    /// metric (division by zero). Other metrics proceed.
    Incomparable,
}

/// Outcome of comparing two batches' variances for one metric column.
///
/// Alongside the percentage, the absolute (floored, non-percent) variances
/// of both sides are reported for human interpretability.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum VarianceDiff {
    Compared {
        percent_diff: f64,
        classification: VarianceClassification,
        baseline_variance: f64,
        candidate_variance: f64,
    },
    /// The baseline variance was zero.
    Incomparable,
}

/// Outcome of the ratio estimator for one metric column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EstimateOutcome {
    Estimated(RatioEstimate),
    /// The estimator's preconditions failed; this metric cannot be
    /// distinguished from noise at the configured confidence level.
    Indeterminate { reason: String },
}

/// All comparison outcomes for one metric column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnComparison {
    pub column: String,
    pub baseline: ColumnStats,
    pub candidate: ColumnStats,
    pub mean: MeanDiff,
    pub variance: VarianceDiff,
    pub estimate: EstimateOutcome,
}

/// Structured result of comparing two batches across all shared metric
/// columns, sorted by column name. Serializable to any downstream report
/// format.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchComparison {
    pub baseline: String,
    pub candidate: String,
    pub columns: Vec<ColumnComparison>,
}

/// Compare two batches column by column.
///
/// Columns present in only one batch have no sample on the other side and
/// are skipped. Per-metric failures (zero baseline mean, invalid
/// confidence interval) are recorded in the outcome for that column and do
/// not abort the rest.
///
/// # Errors
///
/// Returns [`CompareError::UnknownBatch`] if either label has no records.
pub fn compare_batches(
    stats: &BatchStats,
    baseline: &str,
    candidate: &str,
    estimator: &RatioCi,
) -> Result<BatchComparison, CompareError> {
    let base = stats
        .batch(baseline)
        .ok_or_else(|| CompareError::UnknownBatch(baseline.to_string()))?;
    let cand = stats
        .batch(candidate)
        .ok_or_else(|| CompareError::UnknownBatch(candidate.to_string()))?;

    let mut columns = Vec::new();
    for (column, b) in base {
        let Some(c) = cand.get(column) else {
            continue;
        };

        let mean = match floored_percent_diff(b.mean, c.mean) {
            Some(diff) => MeanDiff::Compared {
                percent_diff: diff,
                classification: MeanClassification::from_percent_diff(diff),
            },
            None => MeanDiff::Incomparable,
        };

        let variance = match floored_percent_diff(b.variance, c.variance) {
            Some(diff) => VarianceDiff::Compared {
                percent_diff: diff,
                classification: VarianceClassification::from_percent_diff(diff),
                baseline_variance: b.variance.floor(),
                candidate_variance: c.variance.floor(),
            },
            None => VarianceDiff::Incomparable,
        };

        let estimate = match estimator.estimate(b.mean, b.variance, c.mean, c.variance) {
            Ok(e) => EstimateOutcome::Estimated(e),
            Err(err) => EstimateOutcome::Indeterminate {
                reason: err.to_string(),
            },
        };

        columns.push(ColumnComparison {
            column: column.clone(),
            baseline: *b,
            candidate: *c,
            mean,
            variance,
            estimate,
        });
    }

    Ok(BatchComparison {
        baseline: baseline.to_string(),
        candidate: candidate.to_string(),
        columns,
    })
}
