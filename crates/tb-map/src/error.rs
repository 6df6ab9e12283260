//! Error types for mapping rule compilation.

use thiserror::Error;

/// Problems in the mapping rules themselves. A missing mapping for an
/// account is not an error; it is a `None` from the mapper.
#[derive(Debug, Error)]
pub enum MappingError {
    #[error("invalid {kind} pattern '{pattern}' in rule '{rule}': {source}")]
    InvalidPattern {
        kind: &'static str,
        rule: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("rule '{rule}' has an empty {field}")]
    EmptyField { rule: String, field: &'static str },
}

pub type Result<T> = std::result::Result<T, MappingError>;
