//! Parsing of raw trial measurements into normalized records.
//!
//! The parser is the single validation boundary: everything downstream
//! operates on [`TrialRecord`], never on raw untyped JSON. A record carries
//! one flat numeric field per retained timing entry, keyed
//! `<metric>_start` / `<metric>_duration`.

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use serde::Deserialize;
use thiserror::Error;

/// Errors produced while parsing a raw trial measurement.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The raw input is missing a required field or a field has the wrong
    /// shape. The offending record is skipped; ingestion continues.
    #[error("malformed trial record: {0}")]
    MalformedRecord(#[from] serde_json::Error),
}

/// Metric names considered significant when no override is configured.
const DEFAULT_METRICS: &[&str] = &[
    "cumulative-layout-shift",
    "first-contentful-paint",
    "interactive",
    "largest-contentful-paint",
    "speed-index",
    "time-to-first-byte",
    "total-blocking-time",
];

/// The set of timing-entry names retained during parsing.
///
/// Entries outside the set are silently dropped, not stored. The default
/// set covers the standard page-load audit timings; callers may supply any
/// other set (it is configuration, not a hardcoded assumption).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricAllowList(BTreeSet<String>);

impl Default for MetricAllowList {
    fn default() -> Self {
        DEFAULT_METRICS.iter().map(|m| m.to_string()).collect()
    }
}

impl FromIterator<String> for MetricAllowList {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl MetricAllowList {
    /// Whether `name` is a significant metric.
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One named measurement within a raw trial.
#[derive(Debug, Clone, Deserialize)]
struct RawTimingEntry {
    name: String,
    #[serde(rename = "startTime")]
    start_time: f64,
    duration: f64,
}

#[derive(Debug, Clone, Deserialize)]
struct RawTiming {
    entries: Vec<RawTimingEntry>,
}

/// Serde view of one raw measurement as emitted by the trial runner.
/// Unknown extra fields are ignored; missing required fields fail parsing.
#[derive(Debug, Clone, Deserialize)]
struct RawTrial {
    #[serde(rename = "fetchTime")]
    fetch_time: String,
    #[serde(rename = "requestedUrl")]
    requested_url: String,
    timing: RawTiming,
}

/// One normalized page-load trial. Immutable once parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct TrialRecord {
    /// Timestamp string reported by the trial runner.
    pub fetch_time: String,
    /// The URL that was loaded.
    pub url: String,
    /// Batch label; empty for ungrouped ad-hoc trials.
    pub batch: String,
    metrics: BTreeMap<String, f64>,
}

impl TrialRecord {
    /// The value of one metric column, if this trial has a sample for it.
    pub fn get(&self, column: &str) -> Option<f64> {
        self.metrics.get(column).copied()
    }

    /// The metric column names this trial carries, in sorted order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.metrics.keys().map(String::as_str)
    }

    /// All metric columns and values.
    pub fn metrics(&self) -> &BTreeMap<String, f64> {
        &self.metrics
    }
}

/// Parse one raw measurement into a [`TrialRecord`] tagged with `batch`.
///
/// Timing entries whose name is not in `allow` are dropped without error.
/// Each retained entry contributes two columns, `<name>_start` and
/// `<name>_duration`.
///
/// # Errors
///
/// Returns [`ParseError::MalformedRecord`] if `fetchTime`, `requestedUrl`,
/// or the timing entries sequence is absent or of the wrong shape.
pub fn parse_trial(
    json: &str,
    batch: &str,
    allow: &MetricAllowList,
) -> Result<TrialRecord, ParseError> {
    let raw: RawTrial = serde_json::from_str(json)?;

    let mut metrics = BTreeMap::new();
    for entry in raw.timing.entries {
        if !allow.contains(&entry.name) {
            continue;
        }
        metrics.insert(format!("{}_start", entry.name), entry.start_time);
        metrics.insert(format!("{}_duration", entry.name), entry.duration);
    }

    Ok(TrialRecord {
        fetch_time: raw.fetch_time,
        url: raw.requested_url,
        batch: batch.to_string(),
        metrics,
    })
}

/// Derive a batch label from a record source name (without extension).
///
/// The convention is `<batch>_<suffix>` where the name's first character is
/// literally `b`, e.g. `b1_trial3` belongs to batch `b1`. Anything else is
/// ungrouped and yields the empty label.
pub fn batch_label_from_stem(stem: &str) -> &str {
    if !stem.starts_with('b') {
        return "";
    }
    match stem.split_once('_') {
        Some((label, _)) => label,
        None => "",
    }
}

/// Whether a record source name refers to batch bookkeeping metadata
/// rather than a trial. Such sources must be skipped before parsing.
pub fn is_bookkeeping_source(name: &str) -> bool {
    name.contains("batches")
}
