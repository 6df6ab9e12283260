//! Target chart of accounts CSV (`code,description,type`).

use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use tracing::debug;

use tb_model::ChartOfAccounts;

use crate::error::{Result, StandardsError};
use crate::paths::chart_path;

pub fn load_chart(path: &Path) -> Result<ChartOfAccounts> {
    let file = std::fs::File::open(path).map_err(|e| StandardsError::io(path, e))?;
    let chart = read_chart(file, path)?;
    debug!(path = %path.display(), accounts = chart.len(), "loaded chart of accounts");
    Ok(chart)
}

pub fn load_default_chart() -> Result<ChartOfAccounts> {
    load_chart(&chart_path())
}

/// Parse a chart from any reader. `path` is only used in error messages.
pub fn read_chart<R: Read>(reader: R, path: &Path) -> Result<ChartOfAccounts> {
    let csv_error = |e: csv::Error| StandardsError::Csv {
        path: path.to_path_buf(),
        message: e.to_string(),
    };
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    let headers = reader.headers().map_err(csv_error)?.clone();
    let column = |name: &'static str| {
        headers
            .iter()
            .position(|h| h.trim_matches('\u{feff}').trim().eq_ignore_ascii_case(name))
            .ok_or(StandardsError::MissingColumn {
                path: path.to_path_buf(),
                column: name,
            })
    };
    let code_idx = column("code")?;
    let description_idx = column("description")?;
    let type_idx = column("type")?;

    let mut chart = ChartOfAccounts::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record.map_err(csv_error)?;
        let row = idx + 1;
        let code = record.get(code_idx).unwrap_or("").trim();
        if code.is_empty() {
            if record.iter().all(|value| value.trim().is_empty()) {
                continue;
            }
            return Err(StandardsError::InvalidChartRow {
                path: path.to_path_buf(),
                row,
                message: "empty account code".to_string(),
            });
        }
        if chart.contains(code) {
            return Err(StandardsError::InvalidChartRow {
                path: path.to_path_buf(),
                row,
                message: format!("duplicate account code {code}"),
            });
        }
        chart.insert(
            code,
            record.get(description_idx).unwrap_or("").trim(),
            record.get(type_idx).unwrap_or("").trim(),
        );
    }
    Ok(chart)
}
