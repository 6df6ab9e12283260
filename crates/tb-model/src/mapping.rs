//! Account mapping rule set and the resolver seam used by the activity engine.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

pub const DEFAULT_LABEL_DELIMITER: &str = ":";
pub const DEFAULT_PREFIX: &str = "GM";

/// Layered rules for translating source accounts into target codes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MappingRules {
    /// Exact source account to target code.
    #[serde(default)]
    pub account_mappings: BTreeMap<String, String>,
    /// Tested in order; first match wins.
    #[serde(default)]
    pub mapping_patterns: Vec<PatternRule>,
    #[serde(default)]
    pub transformation_rules: TransformationRules,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PatternRule {
    #[serde(default)]
    pub name: String,
    /// Regular expression, matched case-insensitively against the account
    /// text or the description.
    pub source_pattern: String,
    pub target_account: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConsolidationRule {
    #[serde(default)]
    pub name: String,
    /// Literal substring or regular expression tested against the raw account.
    pub source_pattern: String,
    pub target_account: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransformationRules {
    /// Separates an account code from a trailing free-text label.
    #[serde(default = "default_label_delimiter")]
    pub label_delimiter: String,
    /// Regular expressions stripped from the code before exact matching.
    #[serde(default)]
    pub remove_patterns: Vec<String>,
    /// Prefix used when synthesizing a target code from the numeric token.
    #[serde(default = "default_prefix")]
    pub default_prefix: String,
    #[serde(default)]
    pub consolidation_rules: Vec<ConsolidationRule>,
}

impl Default for TransformationRules {
    fn default() -> Self {
        Self {
            label_delimiter: default_label_delimiter(),
            remove_patterns: Vec::new(),
            default_prefix: default_prefix(),
            consolidation_rules: Vec::new(),
        }
    }
}

fn default_label_delimiter() -> String {
    DEFAULT_LABEL_DELIMITER.to_string()
}

fn default_prefix() -> String {
    DEFAULT_PREFIX.to_string()
}

impl MappingRules {
    pub fn with_exact(mut self, source: impl Into<String>, target: impl Into<String>) -> Self {
        self.account_mappings.insert(source.into(), target.into());
        self
    }

    pub fn with_pattern(
        mut self,
        name: impl Into<String>,
        source_pattern: impl Into<String>,
        target_account: impl Into<String>,
    ) -> Self {
        self.mapping_patterns.push(PatternRule {
            name: name.into(),
            source_pattern: source_pattern.into(),
            target_account: target_account.into(),
        });
        self
    }

    pub fn with_remove_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.transformation_rules
            .remove_patterns
            .push(pattern.into());
        self
    }

    pub fn with_consolidation(
        mut self,
        name: impl Into<String>,
        source_pattern: impl Into<String>,
        target_account: impl Into<String>,
    ) -> Self {
        self.transformation_rules
            .consolidation_rules
            .push(ConsolidationRule {
                name: name.into(),
                source_pattern: source_pattern.into(),
                target_account: target_account.into(),
            });
        self
    }
}

/// Which layer of the mapping cascade produced a target code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    Consolidation,
    Exact,
    Pattern,
    Generated,
}

impl MatchStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Consolidation => "consolidation",
            Self::Exact => "exact",
            Self::Pattern => "pattern",
            Self::Generated => "generated",
        }
    }
}

impl fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Anything that can turn a source account into a target code.
///
/// The activity engine only depends on this trait, so tests can pass a
/// closure instead of a fully configured mapper.
pub trait AccountResolver {
    fn resolve_target(&self, account: &str, description: &str) -> Option<String>;
}

impl<F> AccountResolver for F
where
    F: Fn(&str, &str) -> Option<String>,
{
    fn resolve_target(&self, account: &str, description: &str) -> Option<String> {
        self(account, description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rules_default_from_empty_toml() {
        let rules: MappingRules = toml::from_str("").expect("parse empty rules");
        assert_eq!(rules.transformation_rules.label_delimiter, ":");
        assert_eq!(rules.transformation_rules.default_prefix, "GM");
        assert!(rules.account_mappings.is_empty());
    }

    #[test]
    fn rules_reject_unknown_keys() {
        let err = toml::from_str::<MappingRules>("unexpected = 1");
        assert!(err.is_err());
    }

    #[test]
    fn closures_resolve() {
        let resolver = |account: &str, _: &str| (account == "1").then(|| "GM1".to_string());
        assert_eq!(resolver.resolve_target("1", ""), Some("GM1".to_string()));
        assert_eq!(resolver.resolve_target("2", ""), None);
    }
}
