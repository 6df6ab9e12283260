use std::collections::{BTreeMap, BTreeSet};

use tb_model::BalanceTable;

use crate::checks::CheckInput;
use crate::error::CheckError;
use crate::report::{CheckData, CheckResult, QualityCheck};
use crate::status::Status;

/// Audit both snapshots for missing keys, duplicate keys and coerced amounts.
///
/// Missing keys are the rows the loader already dropped plus any row still in
/// the table with a blank account.
pub(super) fn check(input: &CheckInput<'_>) -> Result<CheckResult, CheckError> {
    let mut issues = Vec::new();
    for (label, table) in [("prior", input.prior), ("current", input.current)] {
        table_issues(label, table, &mut issues);
    }
    let status = if issues.is_empty() {
        Status::Pass
    } else {
        Status::Fail
    };
    Ok(CheckResult::new(
        status,
        "Data quality check completed",
        CheckData::Quality(QualityCheck {
            issues_found: issues.len(),
            issues,
        }),
    ))
}

fn table_issues(label: &str, table: &BalanceTable, issues: &mut Vec<String>) {
    let diagnostics = &table.diagnostics;
    let blank = table
        .rows
        .iter()
        .filter(|row| row.account.trim().is_empty())
        .count();
    let missing = diagnostics.missing_accounts + blank;
    if missing > 0 {
        issues.push(format!("{label}: {missing} rows with missing account numbers"));
    }

    let unique: BTreeSet<&str> = table.accounts().collect();
    let duplicates = table.len() - unique.len();
    if duplicates > 0 {
        issues.push(format!("{label}: {duplicates} duplicate account numbers"));
    }

    let mut by_column: BTreeMap<&str, usize> = BTreeMap::new();
    for value in &diagnostics.non_numeric {
        *by_column.entry(value.column.as_str()).or_default() += 1;
    }
    for (column, count) in by_column {
        issues.push(format!(
            "{label}: {count} non-numeric values in {column} column"
        ));
    }
}
