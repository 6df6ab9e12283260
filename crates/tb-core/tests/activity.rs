use std::collections::BTreeSet;

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tb_core::{compute, outer_join};
use tb_map::AccountMapper;
use tb_model::{BalanceRow, BalanceTable, ProcessingOptions};
use tb_standards::{load_default_chart, load_default_mapping_rules};

fn default_mapper() -> AccountMapper {
    let rules = load_default_mapping_rules().expect("default rules");
    let chart = load_default_chart().expect("default chart");
    AccountMapper::new(&rules, chart).expect("compile rules")
}

fn single(account: &str, net: Decimal) -> BalanceTable {
    BalanceTable::new(vec![BalanceRow::new(account, "", net)])
}

#[test]
fn padded_cash_account_activity() {
    let prior = single("10100-0-000", dec!(500));
    let current = single("10100-0-000", dec!(650));
    let activity = compute(&prior, &current, &default_mapper(), &ProcessingOptions::default())
        .expect("compute");
    assert_eq!(activity.len(), 1);
    let row = &activity.rows[0];
    assert_eq!(row.account, "10100-0-000");
    assert_eq!(row.activity, dec!(150));
    assert_eq!(row.target_code.as_deref(), Some("GM10100"));
}

#[test]
fn current_only_account_defaults_prior_to_zero() {
    let prior = BalanceTable::default();
    let current = single("99999", dec!(42));
    let options = ProcessingOptions::default().with_require_account_mapping(false);
    let activity = compute(&prior, &current, &default_mapper(), &options).expect("compute");
    let row = &activity.rows[0];
    assert_eq!(row.prior_net, Decimal::ZERO);
    assert_eq!(row.activity, dec!(42));
}

#[test]
fn digitless_unmapped_account_is_dropped_by_default() {
    let prior = single("Suspense Clearing", dec!(0));
    let current = single("Suspense Clearing", dec!(250));
    let activity = compute(&prior, &current, &default_mapper(), &ProcessingOptions::default())
        .expect("compute");
    assert!(activity.is_empty());
    assert_eq!(activity.unmapped.len(), 1);
    assert!(activity.account_mappings().is_empty());
}

#[test]
fn account_mappings_cover_excluded_rows() {
    let prior = BalanceTable::new(vec![
        BalanceRow::new("10100-0-000", "Cash", dec!(100)),
        BalanceRow::new("81000", "Fees", dec!(7)),
    ]);
    let current = BalanceTable::new(vec![
        BalanceRow::new("10100-0-000", "Cash", dec!(200)),
        BalanceRow::new("81000", "Fees", dec!(7)),
    ]);
    let activity = compute(&prior, &current, &default_mapper(), &ProcessingOptions::default())
        .expect("compute");
    assert_eq!(activity.len(), 1);
    assert_eq!(activity.immaterial.len(), 1);
    let mappings = activity.account_mappings();
    assert_eq!(mappings.get("81000").map(String::as_str), Some("GM81000"));
}

fn balance_rows() -> impl Strategy<Value = Vec<(String, i64)>> {
    prop::collection::vec(("[A-E][0-9]", -1_000_000i64..1_000_000i64), 0..12)
}

fn to_table(rows: &[(String, i64)]) -> BalanceTable {
    rows.iter()
        .map(|(account, cents)| BalanceRow::new(account.clone(), "", Decimal::new(*cents, 2)))
        .collect()
}

proptest! {
    #[test]
    fn join_covers_every_account_once(prior in balance_rows(), current in balance_rows()) {
        let prior = to_table(&prior);
        let current = to_table(&current);
        let joined = outer_join(&prior, &current).expect("join");
        let expected: BTreeSet<&str> = prior.accounts().chain(current.accounts()).collect();
        let seen: Vec<&str> = joined.iter().map(|j| j.account.as_str()).collect();
        prop_assert_eq!(seen.len(), expected.len());
        prop_assert_eq!(seen.into_iter().collect::<BTreeSet<_>>(), expected);
    }

    #[test]
    fn activity_is_exact_difference(prior in balance_rows(), current in balance_rows()) {
        let prior = to_table(&prior);
        let current = to_table(&current);
        let options = ProcessingOptions::default()
            .with_require_account_mapping(false)
            .with_materiality_threshold(Decimal::ZERO);
        let resolver = |_: &str, _: &str| -> Option<String> { None };
        let activity = compute(&prior, &current, &resolver, &options).expect("compute");
        prop_assert_eq!(activity.len(), outer_join(&prior, &current).expect("join").len());
        for row in activity.all_rows() {
            let prior_sum: Decimal = prior.rows.iter().filter(|r| r.account == row.account).map(|r| r.net).sum();
            let current_sum: Decimal = current.rows.iter().filter(|r| r.account == row.account).map(|r| r.net).sum();
            prop_assert_eq!(row.prior_net, prior_sum);
            prop_assert_eq!(row.current_net, current_sum);
            prop_assert_eq!(row.activity, current_sum - prior_sum);
        }
    }
}
