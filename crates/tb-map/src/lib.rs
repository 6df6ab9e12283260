//! Account mapping engine.
//!
//! Source accounts are resolved through an ordered chain of matchers:
//! consolidation rules, exact dictionary entries, regex patterns and finally
//! a code synthesized from the account's numeric token, accepted only when
//! the target chart knows it.

pub mod engine;
pub mod error;
pub mod matcher;

pub use engine::{AccountMapper, AccountMatch, BatchValidation, MappedAccount};
pub use error::{MappingError, Result};
pub use matcher::{
    AccountMatcher, ConsolidationMatcher, ExactMatcher, GenerativeMatcher, MatchInput,
    PatternMatcher,
};
