//! Individual layers of the mapping cascade.

use std::collections::BTreeMap;
use std::sync::Arc;

use regex::{Regex, RegexBuilder};

use tb_model::{ChartOfAccounts, ConsolidationRule, MatchStrategy, PatternRule};

use crate::error::{MappingError, Result};

/// One account as seen by the matchers.
#[derive(Debug, Clone, Copy)]
pub struct MatchInput<'a> {
    /// The account text exactly as loaded.
    pub raw: &'a str,
    /// Account code with label and noise patterns removed.
    pub cleaned: &'a str,
    pub description: &'a str,
}

/// A single mapping strategy. The mapper tries matchers in order and stops
/// at the first hit.
pub trait AccountMatcher: Send + Sync {
    fn strategy(&self) -> MatchStrategy;

    fn try_match(&self, input: &MatchInput<'_>) -> Option<String>;
}

/// Dictionary lookup on the cleaned code, then on the raw text.
#[derive(Debug, Clone, Default)]
pub struct ExactMatcher {
    mappings: BTreeMap<String, String>,
}

impl ExactMatcher {
    pub fn new(mappings: BTreeMap<String, String>) -> Self {
        Self { mappings }
    }
}

impl AccountMatcher for ExactMatcher {
    fn strategy(&self) -> MatchStrategy {
        MatchStrategy::Exact
    }

    fn try_match(&self, input: &MatchInput<'_>) -> Option<String> {
        self.mappings
            .get(input.cleaned)
            .or_else(|| self.mappings.get(input.raw))
            .cloned()
    }
}

#[derive(Debug, Clone)]
struct CompiledPattern {
    regex: Regex,
    literal: String,
    target: String,
}

fn compile(kind: &'static str, rule: &str, pattern: &str, target: &str) -> Result<CompiledPattern> {
    if target.trim().is_empty() {
        return Err(MappingError::EmptyField {
            rule: rule.to_string(),
            field: "target_account",
        });
    }
    let regex = RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|source| MappingError::InvalidPattern {
            kind,
            rule: rule.to_string(),
            pattern: pattern.to_string(),
            source,
        })?;
    Ok(CompiledPattern {
        regex,
        literal: pattern.to_string(),
        target: target.to_string(),
    })
}

/// Case-insensitive regex search over the raw account or the description.
#[derive(Debug, Clone, Default)]
pub struct PatternMatcher {
    patterns: Vec<CompiledPattern>,
}

impl PatternMatcher {
    pub fn new(rules: &[PatternRule]) -> Result<Self> {
        let patterns = rules
            .iter()
            .map(|rule| {
                compile(
                    "mapping",
                    &rule.name,
                    &rule.source_pattern,
                    &rule.target_account,
                )
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }
}

impl AccountMatcher for PatternMatcher {
    fn strategy(&self) -> MatchStrategy {
        MatchStrategy::Pattern
    }

    fn try_match(&self, input: &MatchInput<'_>) -> Option<String> {
        self.patterns
            .iter()
            .find(|p| p.regex.is_match(input.raw) || p.regex.is_match(input.description))
            .map(|p| p.target.clone())
    }
}

/// `prefix + first digit run`, accepted only when the chart contains it.
#[derive(Debug, Clone)]
pub struct GenerativeMatcher {
    prefix: String,
    chart: Arc<ChartOfAccounts>,
}

impl GenerativeMatcher {
    pub fn new(prefix: impl Into<String>, chart: Arc<ChartOfAccounts>) -> Self {
        Self {
            prefix: prefix.into(),
            chart,
        }
    }

    /// The synthesized code before chart validation.
    pub fn candidate(&self, raw: &str) -> Option<String> {
        first_digit_run(raw).map(|digits| format!("{}{digits}", self.prefix))
    }
}

fn first_digit_run(text: &str) -> Option<&str> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let rest = &text[start..];
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    Some(&rest[..end])
}

impl AccountMatcher for GenerativeMatcher {
    fn strategy(&self) -> MatchStrategy {
        MatchStrategy::Generated
    }

    fn try_match(&self, input: &MatchInput<'_>) -> Option<String> {
        let candidate = self.candidate(input.raw)?;
        if self.chart.contains(&candidate) {
            Some(candidate)
        } else {
            tracing::debug!(
                account = input.raw,
                candidate = %candidate,
                "synthesized code not in target chart"
            );
            None
        }
    }
}

/// Collapses families of source accounts onto one target. A rule matches
/// when its pattern occurs literally in the raw account or matches it as a
/// case-insensitive regex.
#[derive(Debug, Clone, Default)]
pub struct ConsolidationMatcher {
    rules: Vec<CompiledPattern>,
}

impl ConsolidationMatcher {
    pub fn new(rules: &[ConsolidationRule]) -> Result<Self> {
        let rules = rules
            .iter()
            .map(|rule| {
                compile(
                    "consolidation",
                    &rule.name,
                    &rule.source_pattern,
                    &rule.target_account,
                )
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl AccountMatcher for ConsolidationMatcher {
    fn strategy(&self) -> MatchStrategy {
        MatchStrategy::Consolidation
    }

    fn try_match(&self, input: &MatchInput<'_>) -> Option<String> {
        self.rules
            .iter()
            .find(|rule| input.raw.contains(rule.literal.as_str()) || rule.regex.is_match(input.raw))
            .map(|rule| rule.target.clone())
    }
}
