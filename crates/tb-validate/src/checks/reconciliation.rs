//! Independent recomputation of each row's activity from the raw snapshots.

use rust_decimal::Decimal;

use crate::checks::CheckInput;
use crate::error::CheckError;
use crate::lookup::BalanceLookup;
use crate::report::{CheckData, CheckResult, VarianceCheck, VarianceDetail};
use crate::status::Status;

pub(super) fn check_balance(input: &CheckInput<'_>) -> Result<CheckResult, CheckError> {
    let options = input.options;
    let check = recompute(
        input,
        "balance_tolerance",
        options.balance_tolerance,
        options.sample_limit.balance_variances,
    )?;
    let details = if check.error_count == 0 {
        "All balances reconcile".to_string()
    } else {
        format!("{} balance variance(s) found", check.error_count)
    };
    Ok(finish(check, details))
}

/// Same recomputation as [`check_balance`] with the tighter arithmetic
/// tolerance.
pub(super) fn check_calculation(input: &CheckInput<'_>) -> Result<CheckResult, CheckError> {
    let options = input.options;
    let check = recompute(
        input,
        "calculation_tolerance",
        options.calculation_tolerance,
        options.sample_limit.calculation_variances,
    )?;
    let details = if check.error_count == 0 {
        "All calculations verified".to_string()
    } else {
        format!("{} calculation error(s) found", check.error_count)
    };
    Ok(finish(check, details))
}

fn finish(check: VarianceCheck, details: String) -> CheckResult {
    let status = if check.error_count == 0 {
        Status::Pass
    } else {
        Status::Fail
    };
    CheckResult::new(status, details, CheckData::Variance(check))
}

/// Compare every joined row's stored activity with `current - prior` rebuilt
/// from the source tables. A variance strictly above `tolerance` is a
/// mismatch; at most `cap` mismatches are kept as detail. Duplicate accounts
/// are summed as in [`BalanceLookup`], so they reconcile here and are left to
/// the data-quality check.
fn recompute(
    input: &CheckInput<'_>,
    name: &'static str,
    tolerance: Decimal,
    cap: usize,
) -> Result<VarianceCheck, CheckError> {
    if tolerance < Decimal::ZERO {
        return Err(CheckError::NegativeTolerance {
            name,
            value: tolerance.to_string(),
        });
    }
    let prior = BalanceLookup::build(input.prior)?;
    let current = BalanceLookup::build(input.current)?;

    let mut checked = 0;
    let mut error_count = 0;
    let mut errors = Vec::new();
    let mut total_variance = Decimal::ZERO;
    for row in input.activity.all_rows() {
        checked += 1;
        let prior_balance = prior.net(&row.account);
        let current_balance = current.net(&row.account);
        let overflow = |operation| CheckError::Overflow {
            operation,
            account: row.account.clone(),
        };
        let expected = current_balance
            .checked_sub(prior_balance)
            .ok_or_else(|| overflow("recomputing activity"))?;
        let variance = expected
            .checked_sub(row.activity)
            .ok_or_else(|| overflow("comparing activity"))?
            .abs();
        if variance <= tolerance {
            continue;
        }
        error_count += 1;
        total_variance = total_variance
            .checked_add(variance)
            .ok_or_else(|| overflow("totalling variances"))?;
        if errors.len() < cap {
            errors.push(VarianceDetail {
                account: row.account.clone(),
                prior_balance,
                current_balance,
                expected_activity: expected,
                reported_activity: row.activity,
                variance,
            });
        }
    }

    Ok(VarianceCheck {
        tolerance,
        total_accounts_checked: checked,
        error_count,
        errors,
        total_variance,
    })
}
