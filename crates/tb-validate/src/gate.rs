//! Output gating: whether a report lets the import batch be written.

use serde::Serialize;
use tracing::{info, warn};

use tb_model::ValidationGate;

use crate::report::ValidationReport;
use crate::status::{CheckKind, Status};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GatingDecision {
    pub gate: ValidationGate,
    pub status: Status,
    /// Output must not be written.
    pub block_output: bool,
    /// Output is written but the run did not pass validation.
    pub flagged: bool,
    pub failed_checks: Vec<CheckKind>,
}

impl GatingDecision {
    pub fn allows_output(&self) -> bool {
        !self.block_output
    }
}

/// Apply the configured gate to a report. WARNING never blocks or flags.
pub fn gate_output(gate: ValidationGate, report: &ValidationReport) -> GatingDecision {
    let failing = report.overall_status.is_failure();
    let decision = GatingDecision {
        gate,
        status: report.overall_status,
        block_output: failing && gate == ValidationGate::Block,
        flagged: failing && gate == ValidationGate::Flag,
        failed_checks: report.failed_validations.clone(),
    };
    if decision.block_output {
        warn!(
            status = decision.status.as_str(),
            failed = decision.failed_checks.len(),
            "validation blocked output"
        );
    } else if decision.flagged {
        warn!(
            status = decision.status.as_str(),
            failed = decision.failed_checks.len(),
            "validation did not pass, output flagged"
        );
    } else {
        info!(gate = gate.as_str(), "validation gate passed");
    }
    decision
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::report::{CheckData, CheckResult, QualityCheck};

    fn report(status: Status) -> ValidationReport {
        let mut results = BTreeMap::new();
        results.insert(
            CheckKind::DataQuality,
            CheckResult::new(
                status,
                "Data quality check completed",
                CheckData::Quality(QualityCheck {
                    issues_found: 0,
                    issues: Vec::new(),
                }),
            ),
        );
        ValidationReport::from_results(results, String::new())
    }

    #[test]
    fn block_gate_stops_failed_reports() {
        let decision = gate_output(ValidationGate::Block, &report(Status::Fail));
        assert!(decision.block_output);
        assert!(!decision.flagged);
        assert_eq!(decision.failed_checks, vec![CheckKind::DataQuality]);

        let decision = gate_output(ValidationGate::Block, &report(Status::Error));
        assert!(!decision.allows_output());
    }

    #[test]
    fn flag_gate_writes_and_flags() {
        let decision = gate_output(ValidationGate::Flag, &report(Status::Fail));
        assert!(decision.allows_output());
        assert!(decision.flagged);
    }

    #[test]
    fn warnings_pass_either_gate() {
        for gate in [ValidationGate::Block, ValidationGate::Flag] {
            let decision = gate_output(gate, &report(Status::Warning));
            assert!(decision.allows_output());
            assert!(!decision.flagged);
            assert_eq!(decision.status, Status::Pass);
        }
    }
}
