use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    /// A record about to be written is malformed. Nothing is written.
    #[error("record {index} ({account}): {field} {reason}")]
    FormatViolation {
        index: usize,
        account: String,
        field: &'static str,
        reason: &'static str,
    },

    #[error("period '{period}' is not MM/YY, YYYYMM or YYYY-MM")]
    InvalidPeriod { period: String },

    #[error("failed to write CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to write file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, ExportError>;
