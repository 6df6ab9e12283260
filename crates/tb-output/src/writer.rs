//! Delimited import file output.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::WriterBuilder;
use tracing::info;

use tb_model::{IMPORT_COLUMNS, ImportRecord};

use crate::builder::validate_records;
use crate::error::{ExportError, Result};

/// Write the header and one line per record. An empty batch still gets the
/// header line.
pub fn write_import_csv<W: Write>(writer: W, records: &[ImportRecord]) -> csv::Result<()> {
    let mut wrt = WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);
    wrt.write_record(IMPORT_COLUMNS)?;
    for record in records {
        wrt.write_record(record.to_fields())?;
    }
    wrt.flush()?;
    Ok(())
}

/// Validate the records, then write them to `path`.
///
/// Validation runs first so a malformed batch never leaves a partial file.
pub fn export_to_path(path: &Path, records: &[ImportRecord]) -> Result<()> {
    validate_records(records)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| ExportError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let file = File::create(path).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    write_import_csv(file, records).map_err(|source| ExportError::Csv {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), records = records.len(), "import file written");
    Ok(())
}
