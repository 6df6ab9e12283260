//! Validation check modules.
//!
//! Each check is a pure function of the same read-only inputs, so one
//! check's failure cannot affect another's.

mod mapping;
mod materiality;
mod quality;
mod reconciliation;

use std::collections::BTreeMap;

use tracing::debug;

use tb_model::{ActivityTable, BalanceTable, ProcessingOptions};

use crate::error::CheckError;
use crate::report::CheckResult;
use crate::status::CheckKind;

/// Read-only inputs shared by every check.
#[derive(Debug, Clone, Copy)]
pub struct CheckInput<'a> {
    pub prior: &'a BalanceTable,
    pub current: &'a BalanceTable,
    pub activity: &'a ActivityTable,
    pub account_mappings: &'a BTreeMap<String, String>,
    pub options: &'a ProcessingOptions,
}

type CheckFn = fn(&CheckInput<'_>) -> Result<CheckResult, CheckError>;

const CHECKS: [(CheckKind, CheckFn); 5] = [
    (CheckKind::AccountMapping, mapping::check),
    (CheckKind::BalanceReconciliation, reconciliation::check_balance),
    (CheckKind::ActivityCalculation, reconciliation::check_calculation),
    (CheckKind::MaterialityThreshold, materiality::check),
    (CheckKind::DataQuality, quality::check),
];

/// Run all validation checks. A check that errors is recorded with status
/// ERROR and the others still run.
pub fn run_all(input: &CheckInput<'_>) -> BTreeMap<CheckKind, CheckResult> {
    CHECKS
        .iter()
        .map(|(kind, check)| {
            let result = check(input).unwrap_or_else(|error| CheckResult::error(*kind, &error));
            debug!(check = kind.key(), status = result.status.as_str(), "check finished");
            (*kind, result)
        })
        .collect()
}
