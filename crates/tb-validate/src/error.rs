use thiserror::Error;

/// A check that could not run to completion. Reported as status ERROR,
/// distinct from a business FAIL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckError {
    #[error("{name} must not be negative (got {value})")]
    NegativeTolerance { name: &'static str, value: String },

    #[error("arithmetic overflow while {operation} for account {account}")]
    Overflow {
        operation: &'static str,
        account: String,
    },
}
