//! Normalized trial balance snapshots.
//!
//! A [`BalanceTable`] is produced once per period by the loader and is only
//! read afterwards. Account keys are not guaranteed to be unique; duplicate
//! detection is the validator's job.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One ledger account balance at a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceRow {
    pub account: String,
    pub description: String,
    /// Signed balance, debit positive.
    pub net: Decimal,
}

impl BalanceRow {
    pub fn new(account: impl Into<String>, description: impl Into<String>, net: Decimal) -> Self {
        Self {
            account: account.into(),
            description: description.into(),
            net,
        }
    }
}

/// An amount cell that could not be parsed and was coerced to zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NonNumericValue {
    /// 1-based data row number in the source file (header excluded).
    pub row: usize,
    pub column: String,
    pub raw: String,
}

/// What the loader dropped or coerced while normalizing a snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadDiagnostics {
    /// Rows carrying data but no account key.
    pub missing_accounts: usize,
    /// Rows removed because the account text contains "TOTAL".
    pub total_rows_removed: usize,
    pub non_numeric: Vec<NonNumericValue>,
}

impl LoadDiagnostics {
    pub fn is_clean(&self) -> bool {
        self.missing_accounts == 0 && self.non_numeric.is_empty()
    }
}

/// Ordered rows of one period's trial balance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceTable {
    pub rows: Vec<BalanceRow>,
    #[serde(default)]
    pub diagnostics: LoadDiagnostics,
}

impl BalanceTable {
    pub fn new(rows: Vec<BalanceRow>) -> Self {
        Self {
            rows,
            diagnostics: LoadDiagnostics::default(),
        }
    }

    pub fn with_diagnostics(mut self, diagnostics: LoadDiagnostics) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn accounts(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|row| row.account.as_str())
    }
}

impl FromIterator<BalanceRow> for BalanceTable {
    fn from_iter<I: IntoIterator<Item = BalanceRow>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
