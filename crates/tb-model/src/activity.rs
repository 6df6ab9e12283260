//! Period activity derived from two balance snapshots.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One account after the prior/current outer join.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityRow {
    pub account: String,
    pub description: String,
    pub prior_net: Decimal,
    pub current_net: Decimal,
    /// Always `current_net - prior_net`.
    pub activity: Decimal,
    pub target_code: Option<String>,
}

impl ActivityRow {
    /// # Panics
    ///
    /// Panics if `current_net - prior_net` overflows. Engines use
    /// [`ActivityRow::try_new`].
    pub fn new(
        account: impl Into<String>,
        description: impl Into<String>,
        prior_net: Decimal,
        current_net: Decimal,
    ) -> Self {
        Self {
            account: account.into(),
            description: description.into(),
            prior_net,
            current_net,
            activity: current_net - prior_net,
            target_code: None,
        }
    }

    /// `None` when `current_net - prior_net` is not representable.
    pub fn try_new(
        account: impl Into<String>,
        description: impl Into<String>,
        prior_net: Decimal,
        current_net: Decimal,
    ) -> Option<Self> {
        let activity = current_net.checked_sub(prior_net)?;
        Some(Self {
            account: account.into(),
            description: description.into(),
            prior_net,
            current_net,
            activity,
            target_code: None,
        })
    }

    pub fn with_target(mut self, target_code: Option<String>) -> Self {
        self.target_code = target_code;
        self
    }

    pub fn is_mapped(&self) -> bool {
        self.target_code.is_some()
    }
}

/// Why a joined row did not make it into the reportable set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionReason {
    Unmapped,
    Immaterial,
}

impl ExclusionReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unmapped => "unmapped",
            Self::Immaterial => "immaterial",
        }
    }
}

/// Result of the activity computation.
///
/// `rows` are the reportable rows in account order. Every other joined
/// account is kept in `unmapped` or `immaterial` so that validation can see
/// the complete join.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityTable {
    pub rows: Vec<ActivityRow>,
    #[serde(default)]
    pub unmapped: Vec<ActivityRow>,
    #[serde(default)]
    pub immaterial: Vec<ActivityRow>,
}

impl ActivityTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of accounts in the outer join before any filtering.
    pub fn joined_count(&self) -> usize {
        self.rows.len() + self.unmapped.len() + self.immaterial.len()
    }

    /// Every joined row, reportable first.
    pub fn all_rows(&self) -> impl Iterator<Item = &ActivityRow> {
        self.rows
            .iter()
            .chain(self.unmapped.iter())
            .chain(self.immaterial.iter())
    }

    pub fn excluded(&self) -> impl Iterator<Item = (ExclusionReason, &ActivityRow)> {
        self.unmapped
            .iter()
            .map(|row| (ExclusionReason::Unmapped, row))
            .chain(
                self.immaterial
                    .iter()
                    .map(|row| (ExclusionReason::Immaterial, row)),
            )
    }

    /// Source account to target code for every joined account that mapped.
    pub fn account_mappings(&self) -> BTreeMap<String, String> {
        self.all_rows()
            .filter_map(|row| {
                row.target_code
                    .as_ref()
                    .map(|target| (row.account.clone(), target.clone()))
            })
            .collect()
    }

    /// Sum of reportable activity, `None` on overflow.
    pub fn total_activity(&self) -> Option<Decimal> {
        self.rows
            .iter()
            .try_fold(Decimal::ZERO, |total, row| total.checked_add(row.activity))
    }
}
