//! Validation engine.
//!
//! Five independent checks re-derive the activity table from the source
//! snapshots and audit the inputs. Every check runs even when another one
//! fails or errors; the report aggregates them into one overall status.

pub mod checks;
pub mod error;
pub mod gate;
pub mod lookup;
pub mod report;
pub mod status;
pub mod variance;

use std::collections::BTreeMap;

use chrono::Utc;
use tracing::{info, warn};

use tb_model::{ActivityTable, BalanceTable, ProcessingOptions};

pub use checks::CheckInput;
pub use error::CheckError;
pub use gate::{GatingDecision, gate_output};
pub use report::{
    CheckData, CheckResult, MappingCheck, MaterialityCheck, QualityCheck, ValidationReport,
    VarianceCheck, VarianceDetail, render_summary,
};
pub use status::{CheckKind, Status};
pub use variance::{VarianceLine, VarianceReport, variance_report};

/// Run every check and aggregate the results.
///
/// `account_mappings` is the source to target map for every joined account
/// (see [`ActivityTable::account_mappings`]).
pub fn validate(
    prior: &BalanceTable,
    current: &BalanceTable,
    activity: &ActivityTable,
    account_mappings: &BTreeMap<String, String>,
    options: &ProcessingOptions,
) -> ValidationReport {
    let input = CheckInput {
        prior,
        current,
        activity,
        account_mappings,
        options,
    };
    let report = ValidationReport::from_results(checks::run_all(&input), Utc::now().to_rfc3339());
    for kind in &report.failed_validations {
        warn!(check = kind.key(), "validation check did not pass");
    }
    info!(
        status = report.overall_status.as_str(),
        checks = report.validations.len(),
        "validation completed"
    );
    report
}
