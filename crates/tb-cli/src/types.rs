use std::path::PathBuf;

use tb_output::{ImportSummary, NormalizedPeriod};
use tb_validate::{GatingDecision, ValidationReport};

pub const EXIT_OK: i32 = 0;
/// Fatal error, or output blocked by validation.
pub const EXIT_FAILURE: i32 = 1;
/// Output written, but validation did not pass.
pub const EXIT_FLAGGED: i32 = 2;

/// Default name of the import file when `--output` is not given.
pub const DEFAULT_OUTPUT: &str = "mri_import.csv";

/// Reference data locations; `None` means the standards directory default.
#[derive(Debug, Clone, Default)]
pub struct StandardsPaths {
    pub config: Option<PathBuf>,
    pub rules: Option<PathBuf>,
    pub chart: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct RunRequest {
    pub prior: PathBuf,
    pub current: PathBuf,
    pub period: String,
    pub entity: Option<String>,
    pub standards: StandardsPaths,
    pub output: Option<PathBuf>,
    pub report: Option<PathBuf>,
    pub dry_run: bool,
    pub allow_failed_validation: bool,
    pub strict_period: bool,
}

#[derive(Debug)]
pub struct RunOutcome {
    pub period: NormalizedPeriod,
    pub entity_id: String,
    pub prior_rows: usize,
    pub current_rows: usize,
    pub joined_accounts: usize,
    pub immaterial_accounts: usize,
    /// Accounts excluded for lack of a target code.
    pub unmapped_accounts: Vec<String>,
    pub summary: ImportSummary,
    pub report: ValidationReport,
    pub decision: GatingDecision,
    pub output: Option<PathBuf>,
    pub report_path: Option<PathBuf>,
    pub dry_run: bool,
}

impl RunOutcome {
    pub fn exit_code(&self) -> i32 {
        if self.decision.block_output {
            EXIT_FAILURE
        } else if self.decision.flagged {
            EXIT_FLAGGED
        } else {
            EXIT_OK
        }
    }
}
