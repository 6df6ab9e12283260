//! System configuration and mapping rule files.
//!
//! Both accept TOML (`.toml`) or JSON (`.json`); the format is chosen by
//! extension.

use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::debug;

use tb_model::{MappingRules, SystemConfig};

use crate::error::{Result, StandardsError};
use crate::paths::{mapping_rules_path, system_config_path};

/// Load and validate a system configuration file.
pub fn load_system_config(path: &Path) -> Result<SystemConfig> {
    let config: SystemConfig = read_document(path)?;
    config
        .validate()
        .map_err(|source| StandardsError::InvalidConfig {
            path: path.to_path_buf(),
            source,
        })?;
    debug!(
        path = %path.display(),
        materiality_threshold = config.materiality_threshold,
        require_account_mapping = config.require_account_mapping,
        "loaded system configuration"
    );
    Ok(config)
}

pub fn load_default_system_config() -> Result<SystemConfig> {
    load_system_config(&system_config_path())
}

/// Load a mapping rules file. Patterns are compiled later by the mapper.
pub fn load_mapping_rules(path: &Path) -> Result<MappingRules> {
    let rules: MappingRules = read_document(path)?;
    debug!(
        path = %path.display(),
        exact = rules.account_mappings.len(),
        patterns = rules.mapping_patterns.len(),
        consolidation = rules.transformation_rules.consolidation_rules.len(),
        "loaded mapping rules"
    );
    Ok(rules)
}

pub fn load_default_mapping_rules() -> Result<MappingRules> {
    load_mapping_rules(&mapping_rules_path())
}

fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    let text = std::fs::read_to_string(path).map_err(|e| StandardsError::io(path, e))?;
    match extension.as_deref() {
        Some("toml") => toml::from_str(&text).map_err(|source| StandardsError::Toml {
            path: path.to_path_buf(),
            source,
        }),
        Some("json") => serde_json::from_str(&text).map_err(|source| StandardsError::Json {
            path: path.to_path_buf(),
            source,
        }),
        _ => Err(StandardsError::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
    }
}
