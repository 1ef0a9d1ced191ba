use std::fs;
use std::path::PathBuf;

use loadstat_core::is_bookkeeping_source;

use super::{RecordSource, SourceError, SourceRecord};

/// A record source that reads trial JSON files from one directory.
///
/// Only `*.json` files are considered. Files whose name contains the
/// substring `batches` are bookkeeping metadata and are skipped before
/// parsing. Records are returned in stable name-sorted order.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }
}

impl RecordSource for DirectorySource {
    fn records(&self) -> Result<Vec<SourceRecord>, SourceError> {
        if !self.root.is_dir() {
            return Err(SourceError::NotADirectory(self.root.clone()));
        }

        let mut records = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let file_name = entry.file_name();
            if is_bookkeeping_source(&file_name.to_string_lossy()) {
                continue;
            }
            records.push(SourceRecord {
                name: stem.to_string(),
                contents: fs::read_to_string(&path)?,
            });
        }

        records.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(records)
    }
}
