//! Full outer join of two balance snapshots.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use tracing::warn;

use tb_model::{BalanceTable, UNKNOWN};

use crate::error::{ActivityError, Result};

/// One account after the join, before mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinedAccount {
    pub account: String,
    pub description: String,
    pub prior_net: Decimal,
    pub current_net: Decimal,
}

#[derive(Debug, Default)]
struct Side {
    net: Decimal,
    description: Option<String>,
    rows: usize,
}

impl Side {
    fn add(&mut self, account: &str, net: Decimal, description: &str) -> Result<()> {
        self.net = self
            .net
            .checked_add(net)
            .ok_or_else(|| ActivityError::Overflow {
                operation: "summing duplicate balances",
                account: account.to_string(),
            })?;
        self.rows += 1;
        if self.description.is_none() && !description.trim().is_empty() {
            self.description = Some(description.trim().to_string());
        }
        Ok(())
    }
}

/// Outer join on account, ordered by account.
///
/// An account missing from one side gets a zero balance there. Duplicate
/// accounts within one snapshot are summed so every account appears once.
/// The description prefers the current period, then the prior period, then
/// `"Unknown"`. Fails only when summing duplicates overflows.
pub fn outer_join(prior: &BalanceTable, current: &BalanceTable) -> Result<Vec<JoinedAccount>> {
    let mut sides: BTreeMap<&str, (Side, Side)> = BTreeMap::new();
    for row in &prior.rows {
        sides
            .entry(row.account.as_str())
            .or_default()
            .0
            .add(&row.account, row.net, &row.description)?;
    }
    for row in &current.rows {
        sides
            .entry(row.account.as_str())
            .or_default()
            .1
            .add(&row.account, row.net, &row.description)?;
    }

    let joined = sides
        .into_iter()
        .map(|(account, (prior, current))| {
            for (period, side) in [("prior", &prior), ("current", &current)] {
                if side.rows > 1 {
                    warn!(account, period, rows = side.rows, "duplicate account balances summed");
                }
            }
            let description = current
                .description
                .or(prior.description)
                .unwrap_or_else(|| UNKNOWN.to_string());
            JoinedAccount {
                account: account.to_string(),
                description,
                prior_net: prior.net,
                current_net: current.net,
            }
        })
        .collect();
    Ok(joined)
}
