use std::fs::File;

use anyhow::{Context, Result};
use comfy_table::Table;

use tb_cli::pipeline::{check_mappings, load_standards, run, variance};
use tb_cli::types::{EXIT_FLAGGED, EXIT_OK, RunRequest, StandardsPaths};

use crate::cli::{CheckMappingsArgs, RunArgs, StandardsArgs, VarianceArgs};
use crate::summary::{apply_table_style, print_mapping_check, print_run_summary, print_variance};

impl From<&StandardsArgs> for StandardsPaths {
    fn from(args: &StandardsArgs) -> Self {
        Self {
            config: args.config.clone(),
            rules: args.rules.clone(),
            chart: args.chart.clone(),
        }
    }
}

pub fn run_pipeline(args: &RunArgs) -> Result<i32> {
    let request = RunRequest {
        prior: args.prior.clone(),
        current: args.current.clone(),
        period: args.period.clone(),
        entity: args.entity.clone(),
        standards: StandardsPaths::from(&args.standards),
        output: args.output.clone(),
        report: args.report.clone(),
        dry_run: args.dry_run,
        allow_failed_validation: args.allow_failed_validation,
        strict_period: args.strict_period,
    };
    let outcome = run(&request)?;
    print_run_summary(&outcome);
    Ok(outcome.exit_code())
}

/// Exits with [`EXIT_FLAGGED`] when any account is unmapped.
pub fn run_check_mappings(args: &CheckMappingsArgs) -> Result<i32> {
    let batch = check_mappings(&StandardsPaths::from(&args.standards), &args.accounts)?;
    print_mapping_check(&batch);
    Ok(if batch.is_complete() {
        EXIT_OK
    } else {
        EXIT_FLAGGED
    })
}

pub fn run_chart(args: &StandardsArgs) -> Result<i32> {
    let standards = load_standards(&StandardsPaths::from(args))?;
    let mut table = Table::new();
    table.set_header(vec!["Code", "Description", "Type"]);
    apply_table_style(&mut table);
    for (code, account) in standards.mapper.chart().iter() {
        table.add_row(vec![
            code,
            account.description.as_str(),
            account.account_type.as_str(),
        ]);
    }
    println!("{table}");
    Ok(EXIT_OK)
}

/// Exits with [`EXIT_FLAGGED`] when any account has a variance.
pub fn run_variance(args: &VarianceArgs) -> Result<i32> {
    let report = variance(
        &StandardsPaths::from(&args.standards),
        &args.prior,
        &args.current,
        &args.system,
    )?;
    print_variance(&report);
    if let Some(path) = &args.output {
        let file = File::create(path)
            .with_context(|| format!("create variance report {}", path.display()))?;
        report
            .write_csv(file)
            .with_context(|| format!("write variance report {}", path.display()))?;
        println!("Variance report: {}", path.display());
    }
    Ok(if report.discrepancies().next().is_none() {
        EXIT_OK
    } else {
        EXIT_FLAGGED
    })
}
