use std::io;
use std::path::PathBuf;

use thiserror::Error;
use xmlaudit_fragment::BindingError;

#[derive(Debug, Error)]
pub enum AuditError {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    #[error("cannot read configuration {}: {source}", .path.display())]
    ConfigRead { path: PathBuf, source: io::Error },

    #[error("invalid configuration: {0}")]
    ConfigFormat(#[source] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Binding(#[from] BindingError),

    #[error("no output path configured")]
    MissingOutput,

    #[error("invalid record on line {line}: {source}")]
    Record {
        line: usize,
        source: serde_json::Error,
    },

    #[error("cannot write report: {0}")]
    Csv(#[from] csv::Error),
}

/// Failure to decode a note payload.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected a string, an object or an array of objects, found {0}")]
    Shape(&'static str),
}
