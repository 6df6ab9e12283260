use std::collections::BTreeSet;

use crate::checks::CheckInput;
use crate::error::CheckError;
use crate::report::{CheckData, CheckResult, MappingCheck};
use crate::status::Status;

/// Every account seen in either snapshot must have a target code.
///
/// With an empty union the rate is 1.0 and the check passes. When mapping is
/// not required, gaps are reported as WARNING instead of FAIL.
pub(super) fn check(input: &CheckInput<'_>) -> Result<CheckResult, CheckError> {
    let accounts: BTreeSet<&str> = input
        .prior
        .accounts()
        .chain(input.current.accounts())
        .collect();
    let unmapped: Vec<&str> = accounts
        .iter()
        .copied()
        .filter(|account| !input.account_mappings.contains_key(*account))
        .collect();
    let total = accounts.len();
    let mapped = total - unmapped.len();
    let mapping_rate = if total == 0 {
        1.0
    } else {
        mapped as f64 / total as f64
    };

    let (status, warning) = if unmapped.is_empty() {
        (Status::Pass, None)
    } else if input.options.require_account_mapping {
        (Status::Fail, None)
    } else {
        (
            Status::Warning,
            Some(format!(
                "{} account(s) without a target code are excluded from the import",
                unmapped.len()
            )),
        )
    };

    Ok(CheckResult::new(
        status,
        format!("Mapping rate: {:.2}%", mapping_rate * 100.0),
        CheckData::Mapping(MappingCheck {
            mapping_rate,
            total_accounts: total,
            mapped_accounts: mapped,
            unmapped_count: unmapped.len(),
            unmapped_accounts: unmapped
                .iter()
                .take(input.options.sample_limit.unmapped)
                .map(|account| (*account).to_string())
                .collect(),
            warning,
        }),
    ))
}
