use proptest::prelude::*;
use tb_map::AccountMapper;
use tb_model::{ChartOfAccounts, MappingRules, MatchStrategy};
use tb_standards::{load_default_chart, load_default_mapping_rules};

fn default_mapper() -> AccountMapper {
    let rules = load_default_mapping_rules().expect("default rules");
    let chart = load_default_chart().expect("default chart");
    AccountMapper::new(&rules, chart).expect("compile rules")
}

#[test]
fn labelled_account_is_cleaned_and_exact_mapped() {
    let mapper = default_mapper();
    let account = "83105-0-000: Prepaid Insurance";
    assert_eq!(mapper.clean(account), "83105");
    let found = mapper.resolve(account, "").expect("mapped");
    assert_eq!(found.target, "GM83105");
    assert_eq!(found.strategy, MatchStrategy::Exact);
}

#[test]
fn padded_cash_account_maps() {
    assert_eq!(
        default_mapper().transform("10100-0-000", ""),
        Some("GM10100".to_string())
    );
}

#[test]
fn digitless_unknown_account_is_unmapped() {
    let mapper = default_mapper();
    assert_eq!(mapper.transform("Suspense Clearing", "Miscellaneous"), None);
    assert_eq!(mapper.resolve("Suspense Clearing", "Miscellaneous"), None);
}

#[test]
fn retained_earnings_consolidates() {
    let mapper = default_mapper();
    let found = mapper
        .resolve("Calculated Prior Years Retained Earnings", "")
        .expect("consolidated");
    assert_eq!(found.target, "GM79000");
    assert_eq!(found.strategy, MatchStrategy::Consolidation);
    assert_eq!(mapper.describe("GM79000"), "Retained Earnings");
    assert_eq!(mapper.type_of("GM79000"), "Equity");
}

#[test]
fn batch_validation_reports_rate() {
    let mapper = default_mapper();
    let report = mapper.validate_batch(["10100-0-000", "81000", "Suspense", "81000"]);
    assert_eq!(report.total(), 3);
    assert_eq!(report.unmapped, vec!["Suspense".to_string()]);
    assert!((report.mapping_rate - 2.0 / 3.0).abs() < f64::EPSILON);
    let cash = report
        .mapped
        .iter()
        .find(|m| m.source == "10100-0-000")
        .expect("cash mapped");
    assert_eq!(cash.description, "Cash - Operating");

    let empty = mapper.validate_batch(std::iter::empty::<&str>());
    assert_eq!(empty.mapping_rate, 0.0);
    assert!(empty.is_complete());
}

proptest! {
    #[test]
    fn transform_is_idempotent(account in "[0-9A-Za-z :-]{0,24}", description in "[A-Za-z ]{0,16}") {
        let mapper = default_mapper();
        let first = mapper.resolve(&account, &description);
        let second = mapper.resolve(&account, &description);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn exact_mapping_beats_matching_pattern(code in "[1-9][0-9]{4}") {
        let rules = MappingRules::default()
            .with_pattern("everything", ".*", "GMPATTERN")
            .with_exact(code.clone(), "GMEXACT");
        let mapper = AccountMapper::new(&rules, ChartOfAccounts::new()).expect("rules");
        let found = mapper.resolve(&code, "").expect("mapped");
        prop_assert_eq!(found.target, "GMEXACT");
        prop_assert_eq!(found.strategy, MatchStrategy::Exact);
    }
}
