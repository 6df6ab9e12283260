//! Run configuration.
//!
//! [`SystemConfig`] is the on-disk shape (plain floats, loaded from TOML or
//! JSON). Engines take [`ProcessingOptions`], the validated form with exact
//! decimal thresholds.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// What to do with a material account that has no target code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnmappedPolicy {
    /// Exclude the row and report it as unmapped.
    #[default]
    Drop,
    /// Refuse to produce an activity table.
    Fail,
}

/// Whether a non-passing validation report prevents writing the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationGate {
    /// FAIL or ERROR blocks the output.
    #[default]
    Block,
    /// Output is written and the run is marked as flagged.
    Flag,
}

/// Handling of a period string that matches none of the accepted formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodPolicy {
    /// Use the current month and log the loss of fidelity.
    #[default]
    Fallback,
    Reject,
}

impl UnmappedPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Drop => "drop",
            Self::Fail => "fail",
        }
    }
}

impl ValidationGate {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Block => "block",
            Self::Flag => "flag",
        }
    }
}

impl PeriodPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fallback => "fallback",
            Self::Reject => "reject",
        }
    }
}

/// Caps on how many detail entries a validation check keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct SampleLimits {
    pub unmapped: usize,
    pub balance_variances: usize,
    pub calculation_variances: usize,
}

impl Default for SampleLimits {
    fn default() -> Self {
        Self {
            unmapped: 5,
            balance_variances: 10,
            calculation_variances: 5,
        }
    }
}

/// Fixed attributes stamped on every import record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct ImportDefaults {
    #[serde(rename = "ref")]
    pub reference: String,
    pub source: String,
    pub department: String,
    pub status: String,
    pub basis: String,
    #[serde(rename = "auditflag")]
    pub audit_flag: String,
    #[serde(rename = "addldesc")]
    pub additional_description: String,
    #[serde(rename = "assetclass")]
    pub asset_class: String,
    #[serde(rename = "assetcode")]
    pub asset_code: String,
    #[serde(rename = "interentity")]
    pub inter_entity: String,
}

impl Default for ImportDefaults {
    fn default() -> Self {
        Self {
            reference: String::new(),
            source: "GA".to_string(),
            department: "@".to_string(),
            status: "P".to_string(),
            basis: "B".to_string(),
            audit_flag: String::new(),
            additional_description: String::new(),
            asset_class: String::new(),
            asset_code: String::new(),
            inter_entity: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct EntityConfig {
    pub default_entity_id: Option<String>,
}

/// System configuration as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct SystemConfig {
    pub materiality_threshold: f64,
    /// Business tolerance for the balance reconciliation check.
    pub balance_tolerance: f64,
    /// Tighter tolerance for the arithmetic cross-check.
    pub calculation_tolerance: f64,
    pub near_zero_threshold: f64,
    pub require_account_mapping: bool,
    pub unmapped_policy: UnmappedPolicy,
    pub validation_gate: ValidationGate,
    pub period_policy: PeriodPolicy,
    pub sample_limit: SampleLimits,
    pub mri_defaults: ImportDefaults,
    pub entity_config: EntityConfig,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            materiality_threshold: 0.01,
            balance_tolerance: 0.005,
            calculation_tolerance: 0.001,
            near_zero_threshold: 0.001,
            require_account_mapping: true,
            unmapped_policy: UnmappedPolicy::default(),
            validation_gate: ValidationGate::default(),
            period_policy: PeriodPolicy::default(),
            sample_limit: SampleLimits::default(),
            mri_defaults: ImportDefaults::default(),
            entity_config: EntityConfig::default(),
        }
    }
}

impl SystemConfig {
    pub fn validate(&self) -> Result<()> {
        self.processing_options().map(|_| ())
    }

    /// Convert to engine options, rejecting unusable values.
    pub fn processing_options(&self) -> Result<ProcessingOptions> {
        for (name, value) in [
            ("mri_defaults.source", &self.mri_defaults.source),
            ("mri_defaults.status", &self.mri_defaults.status),
            ("mri_defaults.basis", &self.mri_defaults.basis),
        ] {
            if value.trim().is_empty() {
                return Err(ModelError::InvalidOption {
                    name,
                    reason: "must not be empty".to_string(),
                });
            }
        }
        if let Some(entity) = &self.entity_config.default_entity_id
            && entity.trim().is_empty()
        {
            return Err(ModelError::InvalidOption {
                name: "entity_config.default_entity_id",
                reason: "must not be empty when set".to_string(),
            });
        }
        Ok(ProcessingOptions {
            materiality_threshold: threshold("materiality_threshold", self.materiality_threshold)?,
            balance_tolerance: threshold("balance_tolerance", self.balance_tolerance)?,
            calculation_tolerance: threshold("calculation_tolerance", self.calculation_tolerance)?,
            near_zero_threshold: threshold("near_zero_threshold", self.near_zero_threshold)?,
            require_account_mapping: self.require_account_mapping,
            unmapped_policy: self.unmapped_policy,
            period_policy: self.period_policy,
            sample_limit: self.sample_limit,
        })
    }
}

/// Exact decimal form of a configured float threshold.
///
/// Goes through the shortest round-trip text of the float so that `0.01`
/// becomes exactly `0.01`.
pub fn threshold(name: &'static str, value: f64) -> Result<Decimal> {
    if !value.is_finite() {
        return Err(ModelError::InvalidOption {
            name,
            reason: format!("{value} is not a finite number"),
        });
    }
    if value < 0.0 {
        return Err(ModelError::InvalidOption {
            name,
            reason: format!("{value} is negative"),
        });
    }
    Decimal::from_str(&value.to_string()).map_err(|error| ModelError::InvalidOption {
        name,
        reason: error.to_string(),
    })
}

/// Validated engine options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingOptions {
    pub materiality_threshold: Decimal,
    pub balance_tolerance: Decimal,
    pub calculation_tolerance: Decimal,
    pub near_zero_threshold: Decimal,
    pub require_account_mapping: bool,
    pub unmapped_policy: UnmappedPolicy,
    pub period_policy: PeriodPolicy,
    pub sample_limit: SampleLimits,
}

impl Default for ProcessingOptions {
    fn default() -> Self {
        Self {
            materiality_threshold: Decimal::new(1, 2),
            balance_tolerance: Decimal::new(5, 3),
            calculation_tolerance: Decimal::new(1, 3),
            near_zero_threshold: Decimal::new(1, 3),
            require_account_mapping: true,
            unmapped_policy: UnmappedPolicy::Drop,
            period_policy: PeriodPolicy::Fallback,
            sample_limit: SampleLimits::default(),
        }
    }
}

impl ProcessingOptions {
    /// Options that refuse to guess: unmapped accounts and bad periods fail.
    pub fn strict() -> Self {
        Self {
            unmapped_policy: UnmappedPolicy::Fail,
            period_policy: PeriodPolicy::Reject,
            ..Self::default()
        }
    }

    pub fn with_materiality_threshold(mut self, threshold: Decimal) -> Self {
        self.materiality_threshold = threshold;
        self
    }

    pub fn with_require_account_mapping(mut self, require: bool) -> Self {
        self.require_account_mapping = require;
        self
    }

    pub fn with_unmapped_policy(mut self, policy: UnmappedPolicy) -> Self {
        self.unmapped_policy = policy;
        self
    }

    pub fn with_period_policy(mut self, policy: PeriodPolicy) -> Self {
        self.period_policy = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn default_config_matches_default_options() {
        let options = SystemConfig::default()
            .processing_options()
            .expect("default config is valid");
        assert_eq!(options, ProcessingOptions::default());
        assert_eq!(options.materiality_threshold, dec!(0.01));
        assert_eq!(options.balance_tolerance, dec!(0.005));
    }

    #[test]
    fn toml_overrides_and_defaults() {
        let config: SystemConfig = toml::from_str(
            r#"
materiality_threshold = 0.5
unmapped_policy = "fail"

[mri_defaults]
ref = "TB"

[entity_config]
default_entity_id = "M55020"
"#,
        )
        .expect("parse config");
        assert_eq!(config.unmapped_policy, UnmappedPolicy::Fail);
        assert_eq!(config.mri_defaults.reference, "TB");
        assert_eq!(config.mri_defaults.source, "GA");
        assert_eq!(config.balance_tolerance, 0.005);
        assert_eq!(
            config.entity_config.default_entity_id.as_deref(),
            Some("M55020")
        );
        let options = config.processing_options().expect("valid");
        assert_eq!(options.materiality_threshold, dec!(0.5));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(toml::from_str::<SystemConfig>("materiality = 1.0").is_err());
        assert!(toml::from_str::<SystemConfig>("[mri_defaults]\nsrc = \"GA\"").is_err());
    }

    #[test]
    fn negative_and_nan_thresholds_are_rejected() {
        let config = SystemConfig {
            balance_tolerance: -0.1,
            ..SystemConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ModelError::InvalidOption { name: "balance_tolerance", .. })
        ));
        let config = SystemConfig {
            materiality_threshold: f64::NAN,
            ..SystemConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_fixed_codes_are_rejected() {
        let mut config = SystemConfig::default();
        config.mri_defaults.status = " ".to_string();
        assert!(config.validate().is_err());
    }
}
