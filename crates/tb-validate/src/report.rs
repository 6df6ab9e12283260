//! Validation report types and the human-readable summary.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::CheckError;
use crate::status::{CheckKind, Status};

/// Result of one check: status, a one-line description, and check-specific
/// fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckResult {
    pub status: Status,
    pub details: String,
    #[serde(flatten)]
    pub data: CheckData,
}

impl CheckResult {
    pub fn new(status: Status, details: impl Into<String>, data: CheckData) -> Self {
        Self {
            status,
            details: details.into(),
            data,
        }
    }

    pub fn error(kind: CheckKind, error: &CheckError) -> Self {
        Self::new(
            Status::Error,
            format!("Error validating {}", kind.label().to_lowercase()),
            CheckData::Error {
                error: error.to_string(),
            },
        )
    }

    /// Display line for non-blocking findings, if any.
    pub fn warning(&self) -> Option<&str> {
        match &self.data {
            CheckData::Mapping(mapping) => mapping.warning.as_deref(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CheckData {
    Mapping(MappingCheck),
    Variance(VarianceCheck),
    Materiality(MaterialityCheck),
    Quality(QualityCheck),
    Error { error: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MappingCheck {
    /// Fraction of accounts with a target; `1.0` when there are none.
    pub mapping_rate: f64,
    pub total_accounts: usize,
    pub mapped_accounts: usize,
    pub unmapped_count: usize,
    /// First accounts without a target, for display.
    pub unmapped_accounts: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// One account whose stored activity disagrees with the recomputation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VarianceDetail {
    pub account: String,
    pub prior_balance: Decimal,
    pub current_balance: Decimal,
    pub expected_activity: Decimal,
    pub reported_activity: Decimal,
    pub variance: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VarianceCheck {
    pub tolerance: Decimal,
    pub total_accounts_checked: usize,
    /// Full number of mismatches; `errors` may be truncated.
    pub error_count: usize,
    pub errors: Vec<VarianceDetail>,
    pub total_variance: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MaterialityCheck {
    pub materiality_threshold: Decimal,
    pub near_zero_threshold: Decimal,
    pub total_accounts: usize,
    pub below_threshold: usize,
    pub zero_activity: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QualityCheck {
    pub issues_found: usize,
    pub issues: Vec<String>,
}

/// Aggregated outcome of all checks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    pub overall_status: Status,
    /// RFC 3339 generation time.
    pub timestamp: String,
    pub validations: BTreeMap<CheckKind, CheckResult>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failed_validations: Vec<CheckKind>,
}

impl ValidationReport {
    /// ERROR if any check errored, else FAIL if any failed, else PASS.
    /// Warnings do not change the overall status.
    pub fn from_results(validations: BTreeMap<CheckKind, CheckResult>, timestamp: String) -> Self {
        let failed_validations: Vec<CheckKind> = validations
            .iter()
            .filter(|(_, result)| result.status.is_failure())
            .map(|(kind, _)| *kind)
            .collect();
        let overall_status = validations
            .values()
            .map(|result| result.status)
            .filter(|status| status.is_failure())
            .max()
            .unwrap_or(Status::Pass);
        Self {
            overall_status,
            timestamp,
            validations,
            failed_validations,
        }
    }

    pub fn get(&self, kind: CheckKind) -> Option<&CheckResult> {
        self.validations.get(&kind)
    }

    pub fn is_pass(&self) -> bool {
        self.overall_status == Status::Pass
    }

    pub fn warning_count(&self) -> usize {
        self.validations
            .values()
            .filter(|result| result.status == Status::Warning)
            .count()
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Plain-text summary of a report, one block per check.
pub fn render_summary(report: &ValidationReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Validation Status: {}", report.overall_status);
    let _ = writeln!(out, "Timestamp: {}", report.timestamp);
    for (kind, result) in &report.validations {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}: {}", kind.label(), result.status);
        if !result.details.is_empty() {
            let _ = writeln!(out, "  {}", result.details);
        }
        if let Some(warning) = result.warning() {
            let _ = writeln!(out, "  WARNING: {warning}");
        }
        match &result.data {
            CheckData::Error { error } => {
                let _ = writeln!(out, "  ERROR: {error}");
            }
            CheckData::Variance(variance) if variance.error_count > 0 => {
                let _ = writeln!(
                    out,
                    "  {} mismatch(es), total variance {}",
                    variance.error_count, variance.total_variance
                );
            }
            CheckData::Quality(quality) => {
                for issue in &quality.issues {
                    let _ = writeln!(out, "  - {issue}");
                }
            }
            _ => {}
        }
    }
    out
}
