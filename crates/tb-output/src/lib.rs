//! Import batch generation.
//!
//! Converts reportable activity rows into fixed-schema [`ImportRecord`]s,
//! checks them before anything is written and serializes the batch as a
//! 16-column delimited file.
//!
//! [`ImportRecord`]: tb_model::ImportRecord

pub mod builder;
pub mod error;
pub mod period;
pub mod summary;
pub mod writer;

pub use builder::{ImportBatch, ImportBuilder, build, round_amount, validate_records};
pub use error::{ExportError, Result};
pub use period::{NormalizedPeriod, PeriodSource, normalize_period};
pub use summary::ImportSummary;
pub use writer::{export_to_path, write_import_csv};
