//! Per-batch descriptive statistics.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::dataset::Dataset;

mod compare;
mod kalibera;

pub use compare::{floored_percent_diff, MeanClassification, VarianceClassification};
pub use kalibera::{EstimateError, IntervalDefect, RatioCi, RatioEstimate};

/// Descriptive statistics for one metric column within one batch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColumnStats {
    /// Arithmetic mean across the batch's samples for this column.
    pub mean: f64,
    /// Sample variance (n−1 denominator). A batch with fewer than two
    /// samples for the column reports `0.0`; variance is never NaN.
    pub variance: f64,
    /// Number of records in the batch carrying a value for this column.
    pub count: usize,
}

/// Derived per-batch statistics: batch label → column → [`ColumnStats`].
///
/// A pure projection of the [`Dataset`], recomputed on demand by
/// [`aggregate`] and never mutated in place.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct BatchStats {
    batches: BTreeMap<String, BTreeMap<String, ColumnStats>>,
}

impl BatchStats {
    /// The column table for one batch, if that batch has any records.
    pub fn batch(&self, label: &str) -> Option<&BTreeMap<String, ColumnStats>> {
        self.batches.get(label)
    }

    /// The stats for one column of one batch.
    pub fn column(&self, label: &str, column: &str) -> Option<&ColumnStats> {
        self.batches.get(label).and_then(|b| b.get(column))
    }

    /// Batch labels present, in sorted order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.batches.keys().map(String::as_str)
    }
}

/// Compute mean and sample variance for every batch and metric column.
///
/// Records missing a column are excluded from that column's aggregation;
/// they are not treated as zero. Deterministic and re-entrant: aggregating
/// the same dataset state twice yields identical results.
pub fn aggregate(dataset: &Dataset) -> BatchStats {
    let mut batches = BTreeMap::new();

    for label in dataset.batch_labels() {
        let mut columns = BTreeMap::new();
        for column in dataset.columns() {
            let samples: Vec<f64> = dataset
                .filter_by_batch(label)
                .filter_map(|r| r.get(column))
                .collect();
            if samples.is_empty() {
                continue;
            }
            columns.insert(
                column.clone(),
                ColumnStats {
                    mean: mean(&samples),
                    variance: sample_variance(&samples),
                    count: samples.len(),
                },
            );
        }
        batches.insert(label.to_string(), columns);
    }

    BatchStats { batches }
}

fn mean(samples: &[f64]) -> f64 {
    samples.iter().sum::<f64>() / samples.len() as f64
}

/// Sample variance with Bessel's correction (n−1 denominator).
fn sample_variance(samples: &[f64]) -> f64 {
    if samples.len() < 2 {
        return 0.0;
    }
    let m = mean(samples);
    let sum_sq_diff: f64 = samples
        .iter()
        .map(|x| {
            let diff = x - m;
            diff * diff
        })
        .sum();
    sum_sq_diff / (samples.len() - 1) as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{parse_trial, MetricAllowList, TrialRecord};

    fn record(batch: &str, metric: &str, duration: f64) -> TrialRecord {
        let json = format!(
            r#"{{
                "fetchTime": "2023-04-02T10:00:00.000Z",
                "requestedUrl": "http://localhost:7777/",
                "timing": {{"entries": [
                    {{"name": "{metric}", "startTime": 2.0, "duration": {duration}}}
                ]}}
            }}"#
        );
        let allow: MetricAllowList = [metric.to_string()].into_iter().collect();
        parse_trial(&json, batch, &allow).unwrap()
    }

    fn dataset_with(durations: &[(&str, f64)]) -> Dataset {
        let mut dataset = Dataset::new();
        for (batch, duration) in durations {
            dataset.append(record(batch, "speed-index", *duration));
        }
        dataset
    }

    #[test]
    fn test_aggregate_mean_and_variance() {
        let dataset = dataset_with(&[("b1", 100.0), ("b1", 110.0), ("b1", 90.0)]);
        let stats = aggregate(&dataset);

        let col = stats.column("b1", "speed-index_duration").unwrap();
        assert_eq!(col.mean, 100.0);
        // (0 + 100 + 100) / (3 - 1)
        assert_eq!(col.variance, 100.0);
        assert_eq!(col.count, 3);
    }

    #[test]
    fn test_aggregate_splits_batches() {
        let dataset = dataset_with(&[("b1", 100.0), ("b2", 200.0), ("b2", 210.0)]);
        let stats = aggregate(&dataset);

        assert_eq!(stats.column("b1", "speed-index_duration").unwrap().count, 1);
        assert_eq!(stats.column("b2", "speed-index_duration").unwrap().mean, 205.0);
        assert_eq!(stats.labels().collect::<Vec<_>>(), vec!["b1", "b2"]);
    }

    #[test]
    fn test_single_sample_variance_is_zero_not_nan() {
        let dataset = dataset_with(&[("b1", 123.4)]);
        let stats = aggregate(&dataset);

        let col = stats.column("b1", "speed-index_duration").unwrap();
        assert_eq!(col.count, 1);
        assert_eq!(col.variance, 0.0);
        assert!(!col.variance.is_nan());
    }

    #[test]
    fn test_aggregate_is_idempotent() {
        let dataset = dataset_with(&[("b1", 100.0), ("b1", 110.0), ("b2", 90.0)]);

        let first = aggregate(&dataset);
        let second = aggregate(&dataset);
        assert_eq!(first, second);
    }

    #[test]
    fn test_records_missing_column_are_excluded() {
        let mut dataset = Dataset::new();
        dataset.append(record("b1", "speed-index", 100.0));
        dataset.append(record("b1", "time-to-first-byte", 40.0));
        dataset.append(record("b1", "speed-index", 200.0));

        let stats = aggregate(&dataset);
        let col = stats.column("b1", "speed-index_duration").unwrap();

        // The time-to-first-byte record has no speed-index sample and must
        // not drag the mean toward zero.
        assert_eq!(col.count, 2);
        assert_eq!(col.mean, 150.0);
    }

    #[test]
    fn test_unknown_batch_absent() {
        let dataset = dataset_with(&[("b1", 100.0)]);
        let stats = aggregate(&dataset);
        assert!(stats.batch("b9").is_none());
    }
}
