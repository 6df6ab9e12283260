//! Data contracts shared by the trial balance reconciliation crates.

pub mod activity;
pub mod balance;
pub mod chart;
pub mod error;
pub mod import;
pub mod mapping;
pub mod options;

pub use activity::{ActivityRow, ActivityTable, ExclusionReason};
pub use balance::{BalanceRow, BalanceTable, LoadDiagnostics, NonNumericValue};
pub use chart::{ChartOfAccounts, TargetAccount, UNKNOWN};
pub use error::{ModelError, Result};
pub use import::{IMPORT_COLUMNS, ImportRecord};
pub use mapping::{
    AccountResolver, ConsolidationRule, DEFAULT_LABEL_DELIMITER, DEFAULT_PREFIX, MappingRules,
    MatchStrategy, PatternRule, TransformationRules,
};
pub use options::{
    EntityConfig, ImportDefaults, PeriodPolicy, ProcessingOptions, SampleLimits, SystemConfig,
    UnmappedPolicy, ValidationGate,
};

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn activity_table_counts() {
        let table = ActivityTable {
            rows: vec![ActivityRow::new("10100", "Cash", dec!(500), dec!(650))
                .with_target(Some("GM10100".to_string()))],
            unmapped: vec![ActivityRow::new("ZZZ", "Suspense", dec!(0), dec!(3))],
            immaterial: vec![
                ActivityRow::new("81000", "Fees", dec!(10), dec!(10))
                    .with_target(Some("GM81000".to_string())),
            ],
        };
        assert_eq!(table.joined_count(), 3);
        assert_eq!(table.account_mappings().len(), 2);
        assert_eq!(table.all_rows().count(), 3);
    }

    #[test]
    fn config_serializes() {
        let config = SystemConfig::default();
        let json = serde_json::to_string(&config).expect("serialize config");
        let round: SystemConfig = serde_json::from_str(&json).expect("deserialize config");
        assert_eq!(round.materiality_threshold, config.materiality_threshold);
        assert_eq!(round.mri_defaults.source, "GA");
    }
}
