//! Core types and statistics for loadstat.
//!
//! This crate holds the batch statistics and performance-change
//! quantification engine: parsing raw trial measurements, the append-only
//! trial dataset, per-batch aggregation, percentage comparison, and the
//! Kalibera–Jain ratio confidence interval, plus the structured report
//! types shared with the loadstat CLI.

pub mod analysis;
pub mod dataset;
pub mod record;
pub mod report;
pub mod stats;

// Re-export main types for convenience
pub use analysis::{
    compare_batches, BatchComparison, ColumnComparison, CompareError, EstimateOutcome, MeanDiff,
    VarianceDiff,
};
pub use dataset::Dataset;
pub use record::{
    batch_label_from_stem, is_bookkeeping_source, parse_trial, MetricAllowList, ParseError,
    TrialRecord,
};
pub use report::{ReportError, Reporter, TerminalReporter};
pub use stats::{
    aggregate, BatchStats, ColumnStats, EstimateError, IntervalDefect, MeanClassification,
    RatioCi, RatioEstimate, VarianceClassification,
};
