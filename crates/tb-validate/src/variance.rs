//! Variance report against the destination system's balances.
//!
//! After an import, each account's balance in the destination system should
//! equal the operator's prior balance plus the imported change.

use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, warn};

use tb_model::{ActivityTable, BalanceTable, UNKNOWN};

use crate::error::CheckError;
use crate::lookup::BalanceLookup;

pub const VARIANCE_COLUMNS: [&str; 7] = [
    "Account",
    "Description",
    "Operator Balance",
    "Change",
    "Expected Balance",
    "Actual Balance",
    "Variance",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VarianceLine {
    pub account: String,
    pub description: String,
    pub operator_balance: Decimal,
    pub change: Decimal,
    /// `operator_balance + change`.
    pub expected_balance: Decimal,
    pub actual_balance: Decimal,
    /// `actual_balance - expected_balance`.
    pub variance: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VarianceReport {
    pub lines: Vec<VarianceLine>,
    pub total: VarianceLine,
}

impl VarianceReport {
    /// Lines whose variance is not zero.
    pub fn discrepancies(&self) -> impl Iterator<Item = &VarianceLine> {
        self.lines.iter().filter(|line| !line.variance.is_zero())
    }

    /// Write the lines followed by a `TOTAL` line.
    pub fn write_csv<W: Write>(&self, writer: W) -> csv::Result<()> {
        let mut csv = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(writer);
        csv.write_record(VARIANCE_COLUMNS)?;
        for line in self.lines.iter().chain(std::iter::once(&self.total)) {
            csv.write_record([
                line.account.as_str(),
                line.description.as_str(),
                &line.operator_balance.to_string(),
                &line.change.to_string(),
                &line.expected_balance.to_string(),
                &line.actual_balance.to_string(),
                &line.variance.to_string(),
            ])?;
        }
        csv.flush()?;
        Ok(())
    }
}

/// Build the variance report over every account in any of the inputs.
///
/// `change` comes from the reportable activity rows only, since excluded
/// rows were never imported.
pub fn variance_report(
    operator: &BalanceTable,
    activity: &ActivityTable,
    system: &BalanceTable,
) -> Result<VarianceReport, CheckError> {
    let operator_nets = BalanceLookup::build(operator)?;
    let system_nets = BalanceLookup::build(system)?;
    let mut changes: BTreeMap<&str, Decimal> = BTreeMap::new();
    let mut descriptions: BTreeMap<&str, &str> = BTreeMap::new();
    for row in &activity.rows {
        let entry = changes.entry(row.account.as_str()).or_default();
        *entry = entry.checked_add(row.activity).ok_or_else(|| CheckError::Overflow {
            operation: "summing changes",
            account: row.account.clone(),
        })?;
        descriptions.entry(row.account.as_str()).or_insert(row.description.as_str());
    }
    // Operator wording wins over the destination system's.
    for row in system.rows.iter().chain(&operator.rows) {
        if !row.description.trim().is_empty() {
            descriptions.insert(row.account.as_str(), row.description.as_str());
        }
    }

    let accounts: BTreeSet<&str> = operator_nets
        .accounts()
        .chain(system_nets.accounts())
        .chain(changes.keys().copied())
        .collect();

    let mut lines = Vec::with_capacity(accounts.len());
    let mut total = VarianceLine {
        account: "TOTAL".to_string(),
        description: "Summary".to_string(),
        operator_balance: Decimal::ZERO,
        change: Decimal::ZERO,
        expected_balance: Decimal::ZERO,
        actual_balance: Decimal::ZERO,
        variance: Decimal::ZERO,
    };
    for account in accounts {
        let line = line_for(
            account,
            descriptions.get(account).copied().unwrap_or(UNKNOWN),
            operator_nets.net(account),
            changes.get(account).copied().unwrap_or_default(),
            system_nets.net(account),
        )?;
        if !line.variance.is_zero() {
            debug!(account, variance = %line.variance, "balance variance");
        }
        add_into(&mut total, &line)?;
        lines.push(line);
    }

    let discrepancies = lines.iter().filter(|line| !line.variance.is_zero()).count();
    if discrepancies > 0 {
        warn!(
            discrepancies,
            total_variance = %total.variance,
            "destination balances differ from expected"
        );
    }
    Ok(VarianceReport { lines, total })
}

fn line_for(
    account: &str,
    description: &str,
    operator_balance: Decimal,
    change: Decimal,
    actual_balance: Decimal,
) -> Result<VarianceLine, CheckError> {
    let overflow = || CheckError::Overflow {
        operation: "computing variance",
        account: account.to_string(),
    };
    let expected_balance = operator_balance.checked_add(change).ok_or_else(overflow)?;
    let variance = actual_balance
        .checked_sub(expected_balance)
        .ok_or_else(overflow)?;
    Ok(VarianceLine {
        account: account.to_string(),
        description: description.to_string(),
        operator_balance,
        change,
        expected_balance,
        actual_balance,
        variance,
    })
}

fn add_into(total: &mut VarianceLine, line: &VarianceLine) -> Result<(), CheckError> {
    let overflow = || CheckError::Overflow {
        operation: "totalling variance report",
        account: line.account.clone(),
    };
    for (sum, value) in [
        (&mut total.operator_balance, line.operator_balance),
        (&mut total.change, line.change),
        (&mut total.expected_balance, line.expected_balance),
        (&mut total.actual_balance, line.actual_balance),
        (&mut total.variance, line.variance),
    ] {
        *sum = sum.checked_add(value).ok_or_else(overflow)?;
    }
    Ok(())
}
