//! Standards directory path resolution.

use std::path::PathBuf;

/// Environment variable for overriding the standards directory.
pub const STANDARDS_ENV_VAR: &str = "TBRECON_STANDARDS_DIR";

/// Get the standards root directory.
///
/// Resolution order:
/// 1. `TBRECON_STANDARDS_DIR` environment variable
/// 2. `standards/` directory relative to workspace root
pub fn standards_root() -> PathBuf {
    if let Ok(root) = std::env::var(STANDARDS_ENV_VAR) {
        return PathBuf::from(root);
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../standards")
}

pub fn system_config_path() -> PathBuf {
    standards_root().join("config").join("system.toml")
}

pub fn mapping_rules_path() -> PathBuf {
    standards_root().join("mappings").join("gl_mapping.toml")
}

pub fn chart_path() -> PathBuf {
    standards_root()
        .join("mappings")
        .join("chart_of_accounts.csv")
}
