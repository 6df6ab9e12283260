//! Per-account balances rebuilt from a source snapshot.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use tb_model::BalanceTable;

use crate::error::CheckError;

/// Net balance by account, computed again from the raw rows.
///
/// Duplicate rows are summed with the same rule as the activity engine's
/// join, so the recomputation cannot detect a wrong duplicate rule. The
/// data-quality check fails on duplicates instead.
#[derive(Debug, Clone, Default)]
pub struct BalanceLookup {
    nets: BTreeMap<String, Decimal>,
}

impl BalanceLookup {
    pub fn build(table: &BalanceTable) -> Result<Self, CheckError> {
        let mut nets: BTreeMap<String, Decimal> = BTreeMap::new();
        for row in &table.rows {
            let entry = nets.entry(row.account.clone()).or_default();
            *entry = entry
                .checked_add(row.net)
                .ok_or_else(|| CheckError::Overflow {
                    operation: "summing balances",
                    account: row.account.clone(),
                })?;
        }
        Ok(Self { nets })
    }

    /// Net for `account`, zero when absent.
    pub fn net(&self, account: &str) -> Decimal {
        self.nets.get(account).copied().unwrap_or_default()
    }

    pub fn contains(&self, account: &str) -> bool {
        self.nets.contains_key(account)
    }

    pub fn accounts(&self) -> impl Iterator<Item = &str> {
        self.nets.keys().map(String::as_str)
    }
}
