//! Mapping engine implementation.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use regex::Regex;
use serde::Serialize;
use tracing::{debug, trace};

use tb_model::{AccountResolver, ChartOfAccounts, MappingRules, MatchStrategy};

use crate::error::{MappingError, Result};
use crate::matcher::{
    AccountMatcher, ConsolidationMatcher, ExactMatcher, GenerativeMatcher, MatchInput,
    PatternMatcher,
};

/// A resolved target code and the layer that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountMatch {
    pub target: String,
    pub strategy: MatchStrategy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MappedAccount {
    pub source: String,
    pub target: String,
    /// Target chart description of `target`.
    pub description: String,
    pub strategy: MatchStrategy,
}

/// Pre-flight mapping coverage for a set of source accounts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchValidation {
    pub mapped: Vec<MappedAccount>,
    pub unmapped: Vec<String>,
    /// Fraction in `0.0..=1.0`; `0.0` for an empty batch.
    pub mapping_rate: f64,
}

impl BatchValidation {
    pub fn total(&self) -> usize {
        self.mapped.len() + self.unmapped.len()
    }

    pub fn is_complete(&self) -> bool {
        self.unmapped.is_empty()
    }
}

/// Translates source ledger accounts into target chart codes.
///
/// Built once from [`MappingRules`] and a [`ChartOfAccounts`]; holds no
/// mutable state, so the same mapper always gives the same answer.
pub struct AccountMapper {
    label_delimiter: String,
    remove_patterns: Vec<Regex>,
    consolidation: ConsolidationMatcher,
    chain: Vec<Box<dyn AccountMatcher>>,
    chart: Arc<ChartOfAccounts>,
}

impl fmt::Debug for AccountMapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let chain: Vec<MatchStrategy> = self.chain.iter().map(|m| m.strategy()).collect();
        f.debug_struct("AccountMapper")
            .field("label_delimiter", &self.label_delimiter)
            .field("remove_patterns", &self.remove_patterns.len())
            .field("chain", &chain)
            .field("chart_accounts", &self.chart.len())
            .finish()
    }
}

impl AccountMapper {
    /// Compile the rules. Invalid regular expressions fail here rather than
    /// turning into unmapped accounts later.
    pub fn new(rules: &MappingRules, chart: ChartOfAccounts) -> Result<Self> {
        let transformation = &rules.transformation_rules;
        let remove_patterns = transformation
            .remove_patterns
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|source| MappingError::InvalidPattern {
                    kind: "remove",
                    rule: "remove_patterns".to_string(),
                    pattern: pattern.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let chart = Arc::new(chart);
        let chain: Vec<Box<dyn AccountMatcher>> = vec![
            Box::new(ExactMatcher::new(rules.account_mappings.clone())),
            Box::new(PatternMatcher::new(&rules.mapping_patterns)?),
            Box::new(GenerativeMatcher::new(
                transformation.default_prefix.clone(),
                Arc::clone(&chart),
            )),
        ];
        let mapper = Self {
            label_delimiter: transformation.label_delimiter.clone(),
            remove_patterns,
            consolidation: ConsolidationMatcher::new(&transformation.consolidation_rules)?,
            chain,
            chart,
        };
        debug!(?mapper, "account mapper ready");
        Ok(mapper)
    }

    /// Append a matcher to the end of the cascade.
    #[must_use]
    pub fn with_matcher(mut self, matcher: Box<dyn AccountMatcher>) -> Self {
        self.chain.push(matcher);
        self
    }

    pub fn chart(&self) -> &ChartOfAccounts {
        &self.chart
    }

    /// Strip an inline label and noise patterns from an account code.
    ///
    /// `"83105-0-000: Prepaid Insurance"` becomes `"83105"` with the default
    /// rules.
    pub fn clean(&self, account: &str) -> String {
        let code_part = if self.label_delimiter.is_empty() {
            account
        } else {
            account
                .split(self.label_delimiter.as_str())
                .next()
                .unwrap_or(account)
        };
        let mut code = code_part.trim().to_string();
        for pattern in &self.remove_patterns {
            code = pattern.replace_all(&code, "").into_owned();
        }
        code.trim().to_string()
    }

    /// Exact, pattern, then generated code. First hit wins.
    pub fn transform(&self, account: &str, description: &str) -> Option<String> {
        self.resolve_chain(account, description)
            .map(|found| found.target)
    }

    /// Consolidation rules first, then the general cascade.
    pub fn resolve(&self, account: &str, description: &str) -> Option<AccountMatch> {
        let cleaned = self.clean(account);
        let input = MatchInput {
            raw: account,
            cleaned: &cleaned,
            description,
        };
        if let Some(target) = self.consolidation.try_match(&input) {
            trace!(account, target_code = %target, "consolidated");
            return Some(AccountMatch {
                target,
                strategy: MatchStrategy::Consolidation,
            });
        }
        self.run_chain(&input)
    }

    /// Consolidated target for `account`, or its general mapping.
    pub fn apply_consolidation(&self, account: &str) -> Option<String> {
        self.resolve(account, "").map(|found| found.target)
    }

    pub fn describe(&self, code: &str) -> &str {
        self.chart.describe(code)
    }

    pub fn type_of(&self, code: &str) -> &str {
        self.chart.type_of(code)
    }

    /// Map every distinct account and report coverage.
    pub fn validate_batch<'a, I>(&self, accounts: I) -> BatchValidation
    where
        I: IntoIterator<Item = &'a str>,
    {
        let accounts: BTreeSet<&str> = accounts.into_iter().collect();
        let mut mapped = Vec::new();
        let mut unmapped = Vec::new();
        for account in &accounts {
            match self.resolve(account, "") {
                Some(found) => mapped.push(MappedAccount {
                    source: (*account).to_string(),
                    description: self.describe(&found.target).to_string(),
                    target: found.target,
                    strategy: found.strategy,
                }),
                None => unmapped.push((*account).to_string()),
            }
        }
        let mapping_rate = if accounts.is_empty() {
            0.0
        } else {
            mapped.len() as f64 / accounts.len() as f64
        };
        debug!(
            total = accounts.len(),
            mapped = mapped.len(),
            unmapped = unmapped.len(),
            "validated account batch"
        );
        BatchValidation {
            mapped,
            unmapped,
            mapping_rate,
        }
    }

    fn resolve_chain(&self, account: &str, description: &str) -> Option<AccountMatch> {
        let cleaned = self.clean(account);
        self.run_chain(&MatchInput {
            raw: account,
            cleaned: &cleaned,
            description,
        })
    }

    fn run_chain(&self, input: &MatchInput<'_>) -> Option<AccountMatch> {
        for matcher in &self.chain {
            if let Some(target) = matcher.try_match(input) {
                trace!(
                    account = input.raw,
                    strategy = %matcher.strategy(),
                    target_code = %target,
                    "mapped"
                );
                return Some(AccountMatch {
                    target,
                    strategy: matcher.strategy(),
                });
            }
        }
        debug!(account = input.raw, "no mapping found");
        None
    }
}

impl AccountResolver for AccountMapper {
    fn resolve_target(&self, account: &str, description: &str) -> Option<String> {
        self.resolve(account, description).map(|found| found.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapper() -> AccountMapper {
        let rules = MappingRules::default()
            .with_exact("83105", "GM83105")
            .with_exact("10100-0-000", "GM10100")
            .with_pattern("cash", "^101", "GM10199")
            .with_remove_pattern("-0-000$")
            .with_consolidation("re", "retained earnings", "GM79000");
        let chart = ChartOfAccounts::new()
            .with_account("GM10100", "Cash - Operating", "Asset")
            .with_account("GM81000", "Management Fees", "Expense")
            .with_account("GM83105", "Prepaid Insurance", "Asset");
        AccountMapper::new(&rules, chart).expect("valid rules")
    }

    #[test]
    fn clean_strips_label_and_suffix() {
        let mapper = mapper();
        assert_eq!(mapper.clean("83105-0-000: Prepaid Insurance"), "83105");
        assert_eq!(mapper.clean("  81000  "), "81000");
        assert_eq!(mapper.clean("81000-0-000-1"), "81000-0-000-1");
    }

    #[test]
    fn exact_beats_pattern() {
        let found = mapper().resolve("10100-0-000", "").expect("mapped");
        assert_eq!(found.target, "GM10100");
        assert_eq!(found.strategy, MatchStrategy::Exact);
    }

    #[test]
    fn pattern_then_generated() {
        let mapper = mapper();
        let found = mapper.resolve("10150", "").expect("pattern");
        assert_eq!((found.target.as_str(), found.strategy), ("GM10199", MatchStrategy::Pattern));
        let found = mapper.resolve("81000-0-000", "Fees").expect("generated");
        assert_eq!((found.target.as_str(), found.strategy), ("GM81000", MatchStrategy::Generated));
        assert_eq!(mapper.transform("99999", ""), None);
        assert_eq!(mapper.transform("Suspense", "Clearing"), None);
    }

    #[test]
    fn consolidation_precedes_transform() {
        let mapper = mapper();
        assert_eq!(
            mapper.apply_consolidation("Calculated Prior Years Retained Earnings"),
            Some("GM79000".to_string())
        );
        assert_eq!(mapper.transform("Calculated Prior Years Retained Earnings", ""), None);
        assert_eq!(mapper.apply_consolidation("83105"), Some("GM83105".to_string()));
    }

    #[test]
    fn describe_and_type_default_to_unknown() {
        let mapper = mapper();
        assert_eq!(mapper.describe("GM83105"), "Prepaid Insurance");
        assert_eq!(mapper.type_of("GM83105"), "Asset");
        assert_eq!(mapper.describe("GM00000"), "Unknown");
        assert_eq!(mapper.type_of("GM00000"), "Unknown");
    }

    #[test]
    fn invalid_remove_pattern_fails_construction() {
        let rules = MappingRules::default().with_remove_pattern("(");
        let err = AccountMapper::new(&rules, ChartOfAccounts::new()).expect_err("bad regex");
        assert!(matches!(err, MappingError::InvalidPattern { kind: "remove", .. }));
    }
}
