//! The ingestion loop: reads raw records from a source, derives batch
//! labels, and accumulates parsed trials into a dataset.
//!
//! A record that fails to parse is skipped with a warning; one bad file
//! must not abort analysis of the rest.

use loadstat_core::{batch_label_from_stem, parse_trial, Dataset, MetricAllowList, ParseError};

use crate::source::{RecordSource, SourceError};

/// One skipped record and why it was skipped.
#[derive(Debug)]
pub struct IngestWarning {
    /// Name of the record source that produced the malformed record.
    pub source: String,
    pub error: ParseError,
}

/// The result of ingesting a record source.
#[derive(Debug)]
pub struct Ingestion {
    pub dataset: Dataset,
    /// Names of the sources that parsed successfully, in source order.
    pub sources: Vec<String>,
    /// Per-record parse failures, in source order.
    pub warnings: Vec<IngestWarning>,
}

/// Read every record from `source`, parse it, and append it to a fresh
/// dataset. Batch labels are derived from the source names.
///
/// # Errors
///
/// Returns [`SourceError`] only when the source itself cannot be read;
/// malformed individual records become warnings instead.
pub fn ingest(
    source: &dyn RecordSource,
    allow: &MetricAllowList,
) -> Result<Ingestion, SourceError> {
    let mut dataset = Dataset::new();
    let mut sources = Vec::new();
    let mut warnings = Vec::new();

    for record in source.records()? {
        let batch = batch_label_from_stem(&record.name);
        match parse_trial(&record.contents, batch, allow) {
            Ok(trial) => {
                dataset.append(trial);
                sources.push(record.name);
            }
            Err(error) => warnings.push(IngestWarning {
                source: record.name,
                error,
            }),
        }
    }

    Ok(Ingestion {
        dataset,
        sources,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceRecord;

    struct StaticSource(Vec<SourceRecord>);

    impl RecordSource for StaticSource {
        fn records(&self) -> Result<Vec<SourceRecord>, SourceError> {
            Ok(self.0.clone())
        }
    }

    fn trial_json(duration: f64) -> String {
        format!(
            r#"{{
                "fetchTime": "2023-04-02T10:00:00.000Z",
                "requestedUrl": "http://localhost:7777/",
                "timing": {{"entries": [
                    {{"name": "speed-index", "startTime": 0.0, "duration": {duration}}}
                ]}}
            }}"#
        )
    }

    fn record(name: &str, contents: String) -> SourceRecord {
        SourceRecord {
            name: name.to_string(),
            contents,
        }
    }

    #[test]
    fn test_ingest_derives_batch_labels() {
        let source = StaticSource(vec![
            record("b1_trial1", trial_json(100.0)),
            record("b2_trial1", trial_json(200.0)),
            record("warmup", trial_json(300.0)),
        ]);

        let ingestion = ingest(&source, &MetricAllowList::default()).unwrap();

        assert_eq!(ingestion.dataset.len(), 3);
        assert!(ingestion.warnings.is_empty());
        assert_eq!(ingestion.dataset.filter_by_batch("b1").count(), 1);
        assert_eq!(ingestion.dataset.filter_by_batch("b2").count(), 1);
        // The non-batch trial lands in the ungrouped batch.
        assert_eq!(ingestion.dataset.filter_by_batch("").count(), 1);
    }

    #[test]
    fn test_malformed_record_is_warning_not_fatal() {
        let source = StaticSource(vec![
            record("b1_trial1", trial_json(100.0)),
            record("b1_trial2", "{\"broken\": true}".to_string()),
            record("b1_trial3", trial_json(110.0)),
        ]);

        let ingestion = ingest(&source, &MetricAllowList::default()).unwrap();

        assert_eq!(ingestion.dataset.len(), 2);
        assert_eq!(ingestion.sources, vec!["b1_trial1", "b1_trial3"]);
        assert_eq!(ingestion.warnings.len(), 1);
        assert_eq!(ingestion.warnings[0].source, "b1_trial2");
        assert!(matches!(
            ingestion.warnings[0].error,
            ParseError::MalformedRecord(_)
        ));
    }
}
