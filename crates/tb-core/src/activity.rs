//! Activity computation and policy filtering.

use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use tb_model::{
    AccountResolver, ActivityRow, ActivityTable, BalanceTable, ProcessingOptions, UnmappedPolicy,
};

use crate::error::{ActivityError, Result};
use crate::join::outer_join;

/// Accounts listed in an [`ActivityError::UnmappedAccounts`] message.
const UNMAPPED_ERROR_SAMPLE: usize = 10;

/// Compute the activity table for a prior/current pair.
///
/// The resolver is called once per distinct account. With
/// `require_account_mapping`, rows without a target go to
/// [`ActivityTable::unmapped`] (or fail the run under
/// [`UnmappedPolicy::Fail`] when material). Rows with
/// `|activity| < materiality_threshold` go to [`ActivityTable::immaterial`];
/// a row exactly at the threshold is kept.
pub fn compute<R>(
    prior: &BalanceTable,
    current: &BalanceTable,
    resolver: &R,
    options: &ProcessingOptions,
) -> Result<ActivityTable>
where
    R: AccountResolver + ?Sized,
{
    let threshold = options.materiality_threshold;
    if threshold < Decimal::ZERO {
        return Err(ActivityError::InvalidOption {
            name: "materiality_threshold",
            reason: format!("{threshold} is negative"),
        });
    }

    let mut table = ActivityTable::default();
    let mut material_unmapped = Vec::new();
    for joined in outer_join(prior, current)? {
        let target = resolver.resolve_target(&joined.account, &joined.description);
        let overflow = ActivityError::Overflow {
            operation: "computing activity",
            account: joined.account.clone(),
        };
        let row = ActivityRow::try_new(
            joined.account,
            joined.description,
            joined.prior_net,
            joined.current_net,
        )
        .ok_or(overflow)?
        .with_target(target);
        let material = is_material(row.activity, threshold);

        if row.target_code.is_none() && options.require_account_mapping {
            if material {
                material_unmapped.push(row.account.clone());
            }
            debug!(account = %row.account, material, "unmapped account excluded");
            table.unmapped.push(row);
        } else if !material {
            table.immaterial.push(row);
        } else {
            table.rows.push(row);
        }
    }

    if !material_unmapped.is_empty() {
        warn!(
            count = material_unmapped.len(),
            policy = options.unmapped_policy.as_str(),
            "material accounts without a target mapping"
        );
        if options.unmapped_policy == UnmappedPolicy::Fail {
            let count = material_unmapped.len();
            material_unmapped.truncate(UNMAPPED_ERROR_SAMPLE);
            return Err(ActivityError::UnmappedAccounts {
                count,
                sample: material_unmapped,
            });
        }
    }

    info!(
        joined = table.joined_count(),
        reportable = table.len(),
        unmapped = table.unmapped.len(),
        immaterial = table.immaterial.len(),
        "activity computed"
    );
    Ok(table)
}

fn is_material(activity: Decimal, threshold: Decimal) -> bool {
    activity.abs() >= threshold
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use tb_model::BalanceRow;

    use super::*;

    fn gm_digits(account: &str, _description: &str) -> Option<String> {
        account
            .chars()
            .all(|c| c.is_ascii_digit())
            .then(|| format!("GM{account}"))
    }

    fn table(rows: &[(&str, Decimal)]) -> BalanceTable {
        rows.iter()
            .map(|(account, net)| BalanceRow::new(*account, "", *net))
            .collect()
    }

    #[test]
    fn materiality_boundary_is_inclusive() {
        let prior = table(&[("1", dec!(0)), ("2", dec!(0)), ("3", dec!(5))]);
        let current = table(&[("1", dec!(0.01)), ("2", dec!(0.009)), ("3", dec!(5))]);
        let activity =
            compute(&prior, &current, &gm_digits, &ProcessingOptions::default()).expect("compute");
        let kept: Vec<&str> = activity.rows.iter().map(|r| r.account.as_str()).collect();
        assert_eq!(kept, vec!["1"]);
        assert_eq!(activity.immaterial.len(), 2);
    }

    #[test]
    fn zero_threshold_keeps_unchanged_accounts() {
        let prior = table(&[("3", dec!(5))]);
        let current = table(&[("3", dec!(5))]);
        let options = ProcessingOptions::default().with_materiality_threshold(Decimal::ZERO);
        let activity = compute(&prior, &current, &gm_digits, &options).expect("compute");
        assert_eq!(activity.len(), 1);
        assert_eq!(activity.rows[0].activity, Decimal::ZERO);
    }

    #[test]
    fn negative_threshold_is_rejected() {
        let options = ProcessingOptions::default().with_materiality_threshold(dec!(-1));
        let err = compute(&table(&[]), &table(&[]), &gm_digits, &options).expect_err("negative");
        assert!(matches!(err, ActivityError::InvalidOption { .. }));
    }

    #[test]
    fn opposite_extreme_balances_overflow_instead_of_panicking() {
        let huge = Decimal::from_i128_with_scale(5 * 10_i128.pow(28), 0);
        let prior = table(&[("10100", -huge)]);
        let current = table(&[("10100", huge)]);
        let err = compute(&prior, &current, &gm_digits, &ProcessingOptions::default())
            .expect_err("overflow");
        assert!(matches!(
            err,
            ActivityError::Overflow { operation: "computing activity", ref account } if account == "10100"
        ));
    }

    #[test]
    fn unmapped_rows_dropped_by_default() {
        let prior = table(&[("Suspense", dec!(0)), ("10100", dec!(1))]);
        let current = table(&[("Suspense", dec!(100)), ("10100", dec!(2))]);
        let activity =
            compute(&prior, &current, &gm_digits, &ProcessingOptions::default()).expect("compute");
        assert_eq!(activity.len(), 1);
        assert_eq!(activity.unmapped.len(), 1);
        assert_eq!(activity.unmapped[0].account, "Suspense");
    }

    #[test]
    fn unmapped_rows_fail_under_fail_policy() {
        let prior = table(&[("Suspense", dec!(0)), ("Clearing", dec!(0))]);
        let current = table(&[("Suspense", dec!(100)), ("Clearing", dec!(0.001))]);
        let options = ProcessingOptions::default().with_unmapped_policy(UnmappedPolicy::Fail);
        let err = compute(&prior, &current, &gm_digits, &options).expect_err("unmapped");
        match err {
            ActivityError::UnmappedAccounts { count, sample } => {
                assert_eq!(count, 1);
                assert_eq!(sample, vec!["Suspense".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unmapped_rows_kept_when_mapping_not_required() {
        let prior = table(&[("Suspense", dec!(0))]);
        let current = table(&[("Suspense", dec!(100))]);
        let options = ProcessingOptions::default()
            .with_require_account_mapping(false)
            .with_unmapped_policy(UnmappedPolicy::Fail);
        let activity = compute(&prior, &current, &gm_digits, &options).expect("compute");
        assert_eq!(activity.len(), 1);
        assert_eq!(activity.rows[0].target_code, None);
        assert!(activity.unmapped.is_empty());
    }
}
