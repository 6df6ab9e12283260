//! Activity engine.
//!
//! Joins the prior and current trial balances on account, derives
//! `activity = current - prior` for every account, attaches the mapped
//! target code and applies the mapping and materiality policies.

pub mod activity;
pub mod error;
pub mod join;

pub use activity::compute;
pub use error::{ActivityError, Result};
pub use join::{JoinedAccount, outer_join};
