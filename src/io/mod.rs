//! Point sources and sinks
//!
//! Reading and writing points lives outside the compression engine; this
//! module offers the CSV and JSON adapters the command-line tool uses:
//! - CSV import with flexible column mapping and timestamp formats
//! - CSV and JSON export of archived points

mod reader;
mod writer;

pub use reader::{CsvPointReader, ImportResult};
pub use writer::{write_csv, write_json};

use serde::{Deserialize, Serialize};

/// How timestamps were written in the source, so output can match
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeKind {
    /// Plain numbers, passed through unchanged
    #[default]
    Numeric,
    /// Calendar datetimes, converted to Unix seconds
    DateTime,
}

/// Errors that can occur while reading or writing points
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Result type alias for point I/O
pub type IoResult<T> = Result<T, IoError>;
