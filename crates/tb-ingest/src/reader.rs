//! Trial balance CSV reading.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use rust_decimal::Decimal;
use tracing::{debug, info, trace, warn};

use tb_model::{BalanceRow, BalanceTable, LoadDiagnostics, NonNumericValue};

use crate::amount::{ParsedAmount, parse_amount};
use crate::error::{IngestError, Result};
use crate::header::{BalanceColumns, NetSource};

/// Maximum file size for trial balance loading (100 MB).
pub const MAX_CSV_FILE_SIZE: u64 = 100 * 1024 * 1024;

/// Separator between an account code and an inline label, as in
/// `83105-0-000: Prepaid Insurance`.
const INLINE_LABEL_DELIMITER: char = ':';

/// Check file size before loading.
pub fn check_file_size(path: &Path) -> Result<()> {
    check_file_size_with_limit(path, MAX_CSV_FILE_SIZE)
}

/// Check file size against a custom limit.
pub fn check_file_size_with_limit(path: &Path, max_size: u64) -> Result<()> {
    let metadata = std::fs::metadata(path).map_err(|e| IngestError::read(path, e))?;
    if metadata.len() > max_size {
        return Err(IngestError::FileTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max_size,
        });
    }
    Ok(())
}

/// Reject UTF-16 files. A UTF-8 BOM is fine and stripped from the header.
pub fn validate_encoding(path: &Path) -> Result<()> {
    let mut file = File::open(path).map_err(|e| IngestError::read(path, e))?;
    let mut buffer = [0u8; 2];
    let bytes_read = file
        .read(&mut buffer)
        .map_err(|e| IngestError::read(path, e))?;
    if bytes_read == 2 {
        let encoding = match buffer {
            [0xFF, 0xFE] => Some("UTF-16 LE"),
            [0xFE, 0xFF] => Some("UTF-16 BE"),
            _ => None,
        };
        if let Some(encoding) = encoding {
            return Err(IngestError::UnsupportedEncoding {
                path: path.to_path_buf(),
                encoding,
            });
        }
    }
    Ok(())
}

/// Load a trial balance file into a normalized table.
pub fn read_balance_table(path: &Path) -> Result<BalanceTable> {
    check_file_size(path)?;
    validate_encoding(path)?;
    let file = File::open(path).map_err(|e| IngestError::read(path, e))?;
    read_balance_table_from_reader(file, path)
}

/// Load a trial balance from any reader. `source` names the input in errors
/// and logs.
pub fn read_balance_table_from_reader<R: Read>(reader: R, source: &Path) -> Result<BalanceTable> {
    let csv_error = |e: csv::Error| IngestError::CsvParse {
        path: source.to_path_buf(),
        message: e.to_string(),
    };
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);
    let headers = reader.headers().map_err(csv_error)?.clone();
    if headers.iter().all(str::is_empty) {
        return Err(IngestError::EmptyCsv {
            path: source.to_path_buf(),
        });
    }
    let columns = BalanceColumns::resolve(&headers, source)?;
    debug!(path = %source.display(), ?columns, "resolved trial balance columns");

    let mut rows = Vec::new();
    let mut diagnostics = LoadDiagnostics::default();
    for (idx, record) in reader.records().enumerate() {
        let record = record.map_err(csv_error)?;
        let row_number = idx + 1;
        if record.iter().all(str::is_empty) {
            continue;
        }
        let account = cell(&record, Some(columns.account));
        if account.is_empty() {
            diagnostics.missing_accounts += 1;
            trace!(row = row_number, "row without account key skipped");
            continue;
        }
        if account.to_uppercase().contains("TOTAL") {
            diagnostics.total_rows_removed += 1;
            trace!(row = row_number, "total line removed");
            continue;
        }

        let net = row_net(&record, &headers, columns.net, row_number, &mut diagnostics)
            .ok_or_else(|| IngestError::AmountOverflow {
                path: source.to_path_buf(),
                row: row_number,
            })?;
        let mut description = cell(&record, columns.description).to_string();
        if description.is_empty()
            && let Some((_, label)) = account.split_once(INLINE_LABEL_DELIMITER)
        {
            description = label.trim().to_string();
        }
        rows.push(BalanceRow::new(account, description, net));
    }

    if rows.is_empty() {
        return Err(IngestError::EmptyTable {
            path: source.to_path_buf(),
        });
    }
    if !diagnostics.non_numeric.is_empty() {
        warn!(
            path = %source.display(),
            count = diagnostics.non_numeric.len(),
            "non-numeric amounts coerced to zero"
        );
    }
    if diagnostics.missing_accounts > 0 {
        warn!(
            path = %source.display(),
            count = diagnostics.missing_accounts,
            "rows without an account key excluded"
        );
    }
    let table = BalanceTable::new(rows).with_diagnostics(diagnostics);
    info!(
        path = %source.display(),
        rows = table.len(),
        total_rows_removed = table.diagnostics.total_rows_removed,
        "loaded trial balance"
    );
    Ok(table)
}

fn cell(record: &StringRecord, idx: Option<usize>) -> &str {
    idx.and_then(|idx| record.get(idx)).unwrap_or("")
}

fn row_net(
    record: &StringRecord,
    headers: &StringRecord,
    source: NetSource,
    row: usize,
    diagnostics: &mut LoadDiagnostics,
) -> Option<Decimal> {
    let mut amount = |idx: Option<usize>| {
        let raw = cell(record, idx);
        match parse_amount(raw) {
            ParsedAmount::Invalid => {
                let column = idx
                    .and_then(|idx| headers.get(idx))
                    .unwrap_or("")
                    .trim_matches('\u{feff}')
                    .to_string();
                diagnostics.non_numeric.push(NonNumericValue {
                    row,
                    column,
                    raw: raw.to_string(),
                });
                Decimal::ZERO
            }
            parsed => parsed.value_or_zero(),
        }
    };
    match source {
        NetSource::Net(idx) => Some(amount(Some(idx))),
        NetSource::DebitCredit { debit, credit } => {
            let debit = amount(debit);
            let credit = amount(credit);
            debit.checked_sub(credit)
        }
    }
}
