use std::fmt;

use serde::{Deserialize, Serialize};

/// Outcome of one check or of the whole report.
///
/// Variants are ordered by severity so the overall status is the maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Pass,
    /// Permissible, never blocks output.
    Warning,
    Fail,
    /// The check itself could not run.
    Error,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Warning => "WARNING",
            Self::Fail => "FAIL",
            Self::Error => "ERROR",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "PASS" => Some(Self::Pass),
            "WARNING" | "WARN" => Some(Self::Warning),
            "FAIL" => Some(Self::Fail),
            "ERROR" => Some(Self::Error),
            _ => None,
        }
    }

    /// FAIL or ERROR.
    pub fn is_failure(self) -> bool {
        matches!(self, Self::Fail | Self::Error)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    AccountMapping,
    BalanceReconciliation,
    ActivityCalculation,
    MaterialityThreshold,
    DataQuality,
}

impl CheckKind {
    pub const ALL: [CheckKind; 5] = [
        Self::AccountMapping,
        Self::BalanceReconciliation,
        Self::ActivityCalculation,
        Self::MaterialityThreshold,
        Self::DataQuality,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::AccountMapping => "account_mapping",
            Self::BalanceReconciliation => "balance_reconciliation",
            Self::ActivityCalculation => "activity_calculation",
            Self::MaterialityThreshold => "materiality_threshold",
            Self::DataQuality => "data_quality",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::AccountMapping => "Account Mapping",
            Self::BalanceReconciliation => "Balance Reconciliation",
            Self::ActivityCalculation => "Activity Calculation",
            Self::MaterialityThreshold => "Materiality Threshold",
            Self::DataQuality => "Data Quality",
        }
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_order() {
        assert!(Status::Error > Status::Fail);
        assert!(Status::Fail > Status::Warning);
        assert!(Status::Warning > Status::Pass);
        assert_eq!(Status::parse("warn"), Some(Status::Warning));
        assert_eq!(Status::parse("bogus"), None);
    }
}
