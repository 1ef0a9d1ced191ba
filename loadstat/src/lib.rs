//! loadstat: statistically rigorous A/B comparison of page-load trials
//!
//! This library wires the loadstat-core statistics engine to its
//! collaborators: a directory of trial record files, TOML configuration,
//! and the command line.

pub mod cli;
pub mod config;
pub mod ingest;
pub mod source;

// Re-export core types for convenience
pub use loadstat_core::analysis::{compare_batches, BatchComparison, ColumnComparison, CompareError};
pub use loadstat_core::report::{ReportError, Reporter, TerminalReporter};
pub use loadstat_core::stats::{aggregate, BatchStats, RatioCi};
pub use loadstat_core::{Dataset, MetricAllowList, TrialRecord};

// Re-export main types from this crate
pub use cli::Cli;
pub use config::Config;
pub use ingest::{ingest, Ingestion};
pub use source::{DirectorySource, RecordSource, SourceError, SourceRecord};
