use rust_decimal::Decimal;

use crate::checks::CheckInput;
use crate::error::CheckError;
use crate::report::{CheckData, CheckResult, MaterialityCheck};
use crate::status::Status;

/// Informational counts over every joined row. Always PASS.
pub(super) fn check(input: &CheckInput<'_>) -> Result<CheckResult, CheckError> {
    let options = input.options;
    for (name, value) in [
        ("materiality_threshold", options.materiality_threshold),
        ("near_zero_threshold", options.near_zero_threshold),
    ] {
        if value < Decimal::ZERO {
            return Err(CheckError::NegativeTolerance {
                name,
                value: value.to_string(),
            });
        }
    }

    let mut total = 0;
    let mut below_threshold = 0;
    let mut zero_activity = 0;
    for row in input.activity.all_rows() {
        total += 1;
        let magnitude = row.activity.abs();
        if magnitude < options.materiality_threshold {
            below_threshold += 1;
        }
        if magnitude < options.near_zero_threshold {
            zero_activity += 1;
        }
    }

    Ok(CheckResult::new(
        Status::Pass,
        format!("{below_threshold} account(s) below materiality threshold"),
        CheckData::Materiality(MaterialityCheck {
            materiality_threshold: options.materiality_threshold,
            near_zero_threshold: options.near_zero_threshold,
            total_accounts: total,
            below_threshold,
            zero_activity,
        }),
    ))
}
