//! Activity rows to import records.

use std::str::FromStr;

use chrono::{Local, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use tracing::{debug, info, warn};

use tb_model::{ActivityRow, ImportDefaults, ImportRecord, PeriodPolicy};

use crate::error::{ExportError, Result};
use crate::period::{NormalizedPeriod, normalize_period};

/// Round to cents, half away from zero, always with two decimal places.
///
/// `0.005 -> 0.01`, `-0.005 -> -0.01`, `2.675 -> 2.68`, `150 -> 150.00`.
pub fn round_amount(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    if rounded.is_zero() {
        rounded.set_sign_positive(true);
    }
    rounded
}

/// Records built for one period and entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportBatch {
    pub records: Vec<ImportRecord>,
    pub period: NormalizedPeriod,
    /// The requested period was unusable and the current month was used.
    pub period_fallback: bool,
    /// Accounts skipped because they reached the builder without a target.
    pub skipped_unmapped: Vec<String>,
}

impl ImportBatch {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Builds import records with fixed defaults.
#[derive(Debug, Clone)]
pub struct ImportBuilder {
    defaults: ImportDefaults,
    period_policy: PeriodPolicy,
    today: NaiveDate,
}

impl ImportBuilder {
    pub fn new(defaults: ImportDefaults) -> Self {
        Self {
            defaults,
            period_policy: PeriodPolicy::default(),
            today: Local::now().date_naive(),
        }
    }

    #[must_use]
    pub fn with_period_policy(mut self, policy: PeriodPolicy) -> Self {
        self.period_policy = policy;
        self
    }

    /// Date used when the period falls back to the current month.
    #[must_use]
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn build(&self, rows: &[ActivityRow], period: &str, entity_id: &str) -> Result<ImportBatch> {
        let normalized = normalize_period(period, self.today);
        if normalized.is_fallback() {
            if self.period_policy == PeriodPolicy::Reject {
                return Err(ExportError::InvalidPeriod {
                    period: period.to_string(),
                });
            }
            warn!(
                requested = period,
                used = %normalized.label(),
                "unrecognized period, falling back to the current month"
            );
        }
        let label = normalized.label();
        let entry_date = normalized
            .entry_date()
            .ok_or_else(|| ExportError::InvalidPeriod {
                period: period.to_string(),
            })?;

        let mut records = Vec::with_capacity(rows.len());
        let mut skipped_unmapped = Vec::new();
        for row in rows {
            let Some(target) = row.target_code.as_deref() else {
                warn!(account = %row.account, "row without target code skipped");
                skipped_unmapped.push(row.account.clone());
                continue;
            };
            records.push(self.record(row, target, &label, &entry_date, entity_id));
        }
        validate_records(&records)?;

        info!(
            records = records.len(),
            period = %label,
            skipped = skipped_unmapped.len(),
            "import records built"
        );
        Ok(ImportBatch {
            records,
            period: normalized,
            period_fallback: normalized.is_fallback(),
            skipped_unmapped,
        })
    }

    fn record(
        &self,
        row: &ActivityRow,
        target: &str,
        period: &str,
        entry_date: &str,
        entity_id: &str,
    ) -> ImportRecord {
        let defaults = &self.defaults;
        debug!(account = %row.account, target_code = target, "import record");
        ImportRecord {
            period: period.to_string(),
            reference: defaults.reference.clone(),
            source: defaults.source.clone(),
            entity_id: entity_id.trim().to_string(),
            account: target.to_string(),
            department: defaults.department.clone(),
            amount: round_amount(row.activity),
            description: row.description.clone(),
            entry_date: entry_date.to_string(),
            status: defaults.status.clone(),
            basis: defaults.basis.clone(),
            audit_flag: defaults.audit_flag.clone(),
            additional_description: defaults.additional_description.clone(),
            asset_class: defaults.asset_class.clone(),
            asset_code: defaults.asset_code.clone(),
            inter_entity: defaults.inter_entity.clone(),
        }
    }
}

/// Build with the default (fallback) period policy.
pub fn build(
    rows: &[ActivityRow],
    period: &str,
    entity_id: &str,
    defaults: &ImportDefaults,
) -> Result<ImportBatch> {
    ImportBuilder::new(defaults.clone()).build(rows, period, entity_id)
}

/// Reject the batch if any record lacks an entity or account, or carries an
/// amount that does not survive a text round trip with exactly two decimals.
/// The batch total must also be representable.
pub fn validate_records(records: &[ImportRecord]) -> Result<()> {
    let mut total = Decimal::ZERO;
    for (index, record) in records.iter().enumerate() {
        let violation = |field, reason| ExportError::FormatViolation {
            index,
            account: record.account.clone(),
            field,
            reason,
        };
        if record.entity_id.trim().is_empty() {
            return Err(violation("ENTITYID", "is empty"));
        }
        if record.account.trim().is_empty() {
            return Err(violation("ACCTNUM", "is empty"));
        }
        match Decimal::from_str(&record.amount.to_string()) {
            Ok(parsed) if parsed == record.amount => {}
            _ => return Err(violation("AMT", "is not numeric")),
        }
        if record.amount.scale() != 2 {
            return Err(violation("AMT", "does not have two decimal places"));
        }
        total = total
            .checked_add(record.amount)
            .ok_or_else(|| violation("AMT", "overflows the batch total"))?;
    }
    Ok(())
}
