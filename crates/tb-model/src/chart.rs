//! Target chart of accounts.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Placeholder for descriptions and types of codes absent from the chart.
pub const UNKNOWN: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetAccount {
    pub description: String,
    #[serde(rename = "type")]
    pub account_type: String,
}

/// Valid destination account codes keyed by code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChartOfAccounts {
    accounts: BTreeMap<String, TargetAccount>,
}

impl ChartOfAccounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        code: impl Into<String>,
        description: impl Into<String>,
        account_type: impl Into<String>,
    ) {
        self.accounts.insert(
            code.into(),
            TargetAccount {
                description: description.into(),
                account_type: account_type.into(),
            },
        );
    }

    pub fn with_account(
        mut self,
        code: impl Into<String>,
        description: impl Into<String>,
        account_type: impl Into<String>,
    ) -> Self {
        self.insert(code, description, account_type);
        self
    }

    pub fn contains(&self, code: &str) -> bool {
        self.accounts.contains_key(code)
    }

    pub fn get(&self, code: &str) -> Option<&TargetAccount> {
        self.accounts.get(code)
    }

    /// Description for `code`, or [`UNKNOWN`].
    pub fn describe(&self, code: &str) -> &str {
        self.get(code)
            .map_or(UNKNOWN, |account| account.description.as_str())
    }

    /// Account type for `code`, or [`UNKNOWN`].
    pub fn type_of(&self, code: &str) -> &str {
        self.get(code)
            .map_or(UNKNOWN, |account| account.account_type.as_str())
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TargetAccount)> {
        self.accounts
            .iter()
            .map(|(code, account)| (code.as_str(), account))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookups_default_to_unknown() {
        let chart = ChartOfAccounts::new().with_account("GM10100", "Cash - Operating", "Asset");
        assert_eq!(chart.describe("GM10100"), "Cash - Operating");
        assert_eq!(chart.type_of("GM10100"), "Asset");
        assert_eq!(chart.describe("GM00000"), UNKNOWN);
        assert_eq!(chart.type_of("GM00000"), UNKNOWN);
    }
}
