//! Static reference data: system configuration, mapping rules and the target
//! chart of accounts.

pub mod chart;
pub mod config;
pub mod error;
pub mod paths;

pub use crate::chart::{load_chart, load_default_chart, read_chart};
pub use crate::config::{
    load_default_mapping_rules, load_default_system_config, load_mapping_rules,
    load_system_config,
};
pub use crate::error::{Result, StandardsError};
pub use crate::paths::{
    STANDARDS_ENV_VAR, chart_path, mapping_rules_path, standards_root, system_config_path,
};
