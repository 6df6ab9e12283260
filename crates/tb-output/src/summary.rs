//! Aggregate view of an import batch.

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::Serialize;

use tb_model::ImportRecord;

/// `total_amount` saturates; batches that passed
/// [`validate_records`](crate::validate_records) never reach the bounds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub total_records: usize,
    pub total_amount: Decimal,
    pub unique_accounts: usize,
    pub entities: Vec<String>,
    pub periods: Vec<String>,
    pub min_amount: Option<Decimal>,
    pub max_amount: Option<Decimal>,
}

impl ImportSummary {
    pub fn from_records(records: &[ImportRecord]) -> Self {
        let accounts: BTreeSet<&str> = records.iter().map(|r| r.account.as_str()).collect();
        let entities: BTreeSet<&str> = records.iter().map(|r| r.entity_id.as_str()).collect();
        let periods: BTreeSet<&str> = records.iter().map(|r| r.period.as_str()).collect();
        Self {
            total_records: records.len(),
            total_amount: records
                .iter()
                .fold(Decimal::ZERO, |total, r| total.saturating_add(r.amount)),
            unique_accounts: accounts.len(),
            entities: entities.into_iter().map(str::to_string).collect(),
            periods: periods.into_iter().map(str::to_string).collect(),
            min_amount: records.iter().map(|r| r.amount).min(),
            max_amount: records.iter().map(|r| r.amount).max(),
        }
    }
}
