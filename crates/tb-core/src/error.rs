use thiserror::Error;

#[derive(Debug, Error)]
pub enum ActivityError {
    /// Raised only under the `fail` unmapped policy.
    #[error("{count} material account(s) have no target mapping: {}", sample.join(", "))]
    UnmappedAccounts { count: usize, sample: Vec<String> },

    #[error("invalid option {name}: {reason}")]
    InvalidOption { name: &'static str, reason: String },

    #[error("arithmetic overflow while {operation} for account {account}")]
    Overflow {
        operation: &'static str,
        account: String,
    },
}

pub type Result<T> = std::result::Result<T, ActivityError>;
