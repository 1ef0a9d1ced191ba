use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// One raw record as read from a source, before parsing.
#[derive(Debug, Clone)]
pub struct SourceRecord {
    /// Source name without extension; the batch label is derived from it.
    pub name: String,
    /// The raw JSON contents.
    pub contents: String,
}

/// A provider of raw trial records. Bookkeeping metadata (sources whose
/// name contains `batches`) must already be excluded by the provider.
pub trait RecordSource: Send + Sync {
    fn records(&self) -> Result<Vec<SourceRecord>, SourceError>;
}

mod dir;
pub use dir::DirectorySource;
