//! End-to-end reconciliation run with explicit stages.
//!
//! 1. **Load**: reference data and both trial balance snapshots
//! 2. **Activity**: join, map and filter
//! 3. **Validate**: independent checks and the output gate
//! 4. **Build**: import records for the period and entity
//! 5. **Export**: write the import file unless blocked or a dry run
//!
//! Each stage runs inside its own span and reports `duration_ms`.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, anyhow};
use tracing::{error, info, info_span, trace};

use tb_core::compute;
use tb_ingest::read_balance_table;
use tb_map::{AccountMapper, BatchValidation};
use tb_model::{BalanceTable, PeriodPolicy, ProcessingOptions, SystemConfig, ValidationGate};
use tb_output::{ImportBuilder, ImportSummary, export_to_path};
use tb_standards::{
    load_chart, load_default_chart, load_default_mapping_rules, load_default_system_config,
    load_mapping_rules, load_system_config,
};
use tb_validate::{VarianceReport, gate_output, validate, variance_report};

use crate::logging::redact_value;
use crate::types::{DEFAULT_OUTPUT, RunOutcome, RunRequest, StandardsPaths};

/// Configuration and mapper shared by every command.
#[derive(Debug)]
pub struct Standards {
    pub config: SystemConfig,
    pub options: ProcessingOptions,
    pub mapper: AccountMapper,
}

pub fn load_standards(paths: &StandardsPaths) -> Result<Standards> {
    let config = match &paths.config {
        Some(path) => load_system_config(path)
            .with_context(|| format!("load system config {}", path.display()))?,
        None => load_default_system_config().context("load default system config")?,
    };
    let options = config
        .processing_options()
        .context("invalid system config")?;
    let rules = match &paths.rules {
        Some(path) => load_mapping_rules(path)
            .with_context(|| format!("load mapping rules {}", path.display()))?,
        None => load_default_mapping_rules().context("load default mapping rules")?,
    };
    let chart = match &paths.chart {
        Some(path) => {
            load_chart(path).with_context(|| format!("load chart {}", path.display()))?
        }
        None => load_default_chart().context("load default chart")?,
    };
    let mapper = AccountMapper::new(&rules, chart).context("compile mapping rules")?;
    Ok(Standards {
        config,
        options,
        mapper,
    })
}

fn load_snapshot(label: &str, path: &Path) -> Result<BalanceTable> {
    read_balance_table(path).with_context(|| format!("load {label} trial balance {}", path.display()))
}

/// Run every stage for one prior/current pair.
pub fn run(request: &RunRequest) -> Result<RunOutcome> {
    // Stage 1: Load
    let load_start = Instant::now();
    let (standards, prior, current) = info_span!("load").in_scope(|| -> Result<_> {
        let standards = load_standards(&request.standards)?;
        let prior = load_snapshot("prior", &request.prior)?;
        let current = load_snapshot("current", &request.current)?;
        Ok((standards, prior, current))
    })?;
    info!(
        prior_rows = prior.len(),
        current_rows = current.len(),
        duration_ms = load_start.elapsed().as_millis(),
        "load complete"
    );
    let Standards {
        config,
        options,
        mapper,
    } = standards;

    let entity_id = request
        .entity
        .clone()
        .or_else(|| config.entity_config.default_entity_id.clone())
        .ok_or_else(|| {
            anyhow!("no entity id: pass --entity or set entity_config.default_entity_id")
        })?;

    // Stage 2: Activity
    let activity_start = Instant::now();
    let activity = info_span!("activity")
        .in_scope(|| compute(&prior, &current, &mapper, &options))
        .context("compute activity")?;
    for row in &activity.rows {
        let amount = row.activity.to_string();
        trace!(
            account = %row.account,
            description = redact_value(&row.description),
            activity = redact_value(&amount),
            "reportable row"
        );
    }
    info!(
        joined = activity.joined_count(),
        reportable = activity.len(),
        unmapped = activity.unmapped.len(),
        immaterial = activity.immaterial.len(),
        duration_ms = activity_start.elapsed().as_millis(),
        "activity complete"
    );

    // Stage 3: Validate
    let validate_start = Instant::now();
    let gate = if request.allow_failed_validation {
        ValidationGate::Flag
    } else {
        config.validation_gate
    };
    let (report, decision) = info_span!("validate").in_scope(|| {
        let report = validate(
            &prior,
            &current,
            &activity,
            &activity.account_mappings(),
            &options,
        );
        let decision = gate_output(gate, &report);
        (report, decision)
    });
    info!(
        status = report.overall_status.as_str(),
        duration_ms = validate_start.elapsed().as_millis(),
        "validate complete"
    );
    let report_path = match &request.report {
        Some(path) => {
            write_report(path, &report.to_json_pretty().context("serialize validation report")?)?;
            Some(path.clone())
        }
        None => None,
    };

    // Stage 4: Build
    let build_start = Instant::now();
    let period_policy = if request.strict_period {
        PeriodPolicy::Reject
    } else {
        options.period_policy
    };
    let batch = info_span!("build")
        .in_scope(|| {
            ImportBuilder::new(config.mri_defaults.clone())
                .with_period_policy(period_policy)
                .build(&activity.rows, &request.period, &entity_id)
        })
        .context("build import records")?;
    let summary = ImportSummary::from_records(&batch.records);
    info!(
        records = summary.total_records,
        total_amount = %summary.total_amount,
        duration_ms = build_start.elapsed().as_millis(),
        "build complete"
    );

    // Stage 5: Export
    let output = if request.dry_run {
        info!("dry run, import file not written");
        None
    } else if decision.block_output {
        error!(
            status = decision.status.as_str(),
            "validation failed, import file not written"
        );
        None
    } else {
        let path = request
            .output
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));
        let export_start = Instant::now();
        info_span!("export", path = %path.display())
            .in_scope(|| export_to_path(&path, &batch.records))
            .with_context(|| format!("export import file {}", path.display()))?;
        info!(
            duration_ms = export_start.elapsed().as_millis(),
            "export complete"
        );
        Some(path)
    };

    Ok(RunOutcome {
        period: batch.period,
        entity_id,
        prior_rows: prior.len(),
        current_rows: current.len(),
        joined_accounts: activity.joined_count(),
        immaterial_accounts: activity.immaterial.len(),
        unmapped_accounts: activity
            .unmapped
            .iter()
            .map(|row| row.account.clone())
            .collect(),
        summary,
        report,
        decision,
        output,
        report_path,
        dry_run: request.dry_run,
    })
}

fn write_report(path: &Path, json: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create report directory {}", parent.display()))?;
    }
    std::fs::write(path, json)
        .with_context(|| format!("write validation report {}", path.display()))?;
    info!(path = %path.display(), "validation report written");
    Ok(())
}

/// Mapping coverage for every account in one trial balance.
pub fn check_mappings(paths: &StandardsPaths, accounts: &Path) -> Result<BatchValidation> {
    let standards = load_standards(paths)?;
    let table = load_snapshot("accounts", accounts)?;
    let batch = info_span!("check_mappings")
        .in_scope(|| standards.mapper.validate_batch(table.accounts()));
    info!(
        total = batch.total(),
        unmapped = batch.unmapped.len(),
        "mapping check complete"
    );
    Ok(batch)
}

/// Destination balances against operator prior balance plus activity.
pub fn variance(
    paths: &StandardsPaths,
    prior: &Path,
    current: &Path,
    system: &Path,
) -> Result<VarianceReport> {
    let standards = load_standards(paths)?;
    let prior = load_snapshot("prior", prior)?;
    let current = load_snapshot("current", current)?;
    let system = load_snapshot("system", system)?;
    let activity = compute(&prior, &current, &standards.mapper, &standards.options)
        .context("compute activity")?;
    variance_report(&prior, &activity, &system).context("build variance report")
}
