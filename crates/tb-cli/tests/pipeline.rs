//! End-to-end runs against the bundled standards directory.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use tb_cli::pipeline::{check_mappings, run, variance};
use tb_cli::types::{EXIT_FAILURE, EXIT_FLAGGED, EXIT_OK, RunRequest, StandardsPaths};
use tb_validate::{CheckKind, Status};

const PRIOR: &str = "\
Account,Description,Net
10100-0-000,Cash,500.00
\"83105-0-000: Prepaid Insurance\",,\"1,200.00\"
Total,,\"1,700.00\"
";

const CURRENT: &str = "\
Account,Description,Net
10100-0-000,Cash,650.00
\"83105-0-000: Prepaid Insurance\",,\"1,000.12\"
81000-0-000,Management Fees,7.00
Total,,\"1,657.12\"
";

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write fixture");
    path
}

fn request(dir: &TempDir, current: &str) -> RunRequest {
    RunRequest {
        prior: write(dir.path(), "prior.csv", PRIOR),
        current: write(dir.path(), "current.csv", current),
        period: "202504".to_string(),
        entity: Some("M55020".to_string()),
        standards: StandardsPaths::default(),
        output: Some(dir.path().join("out").join("import.csv")),
        report: Some(dir.path().join("report.json")),
        dry_run: false,
        allow_failed_validation: false,
        strict_period: false,
    }
}

fn with_unmapped_account() -> String {
    format!("{CURRENT}Suspense Clearing,,250.00\n")
}

#[test]
fn clean_run_writes_import_file() {
    let dir = TempDir::new().expect("tempdir");
    let request = request(&dir, CURRENT);
    let outcome = run(&request).expect("run");

    assert_eq!(outcome.exit_code(), EXIT_OK);
    assert_eq!(outcome.report.overall_status, Status::Pass);
    assert_eq!(outcome.period.label(), "04/25");
    assert_eq!(outcome.joined_accounts, 3);
    assert_eq!(outcome.summary.total_records, 3);

    let output = outcome.output.expect("output written");
    let text = fs::read_to_string(output).expect("read output");
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("PERIOD,REF,SOURCE,ENTITYID,ACCTNUM"));
    assert_eq!(
        lines[3],
        "04/25,,GA,M55020,GM83105,@,-199.88,Prepaid Insurance,2025-04-30 00:00:00,P,B,,,,,"
    );

    let report = fs::read_to_string(dir.path().join("report.json")).expect("report");
    assert!(report.contains("\"overall_status\": \"PASS\""));
}

#[test]
fn failed_validation_blocks_output() {
    let dir = TempDir::new().expect("tempdir");
    let request = request(&dir, &with_unmapped_account());
    let outcome = run(&request).expect("run");

    assert_eq!(outcome.exit_code(), EXIT_FAILURE);
    assert!(outcome.output.is_none());
    assert!(!dir.path().join("out").join("import.csv").exists());
    assert_eq!(outcome.unmapped_accounts, vec!["Suspense Clearing"]);
    assert_eq!(outcome.report.failed_validations, vec![CheckKind::AccountMapping]);
    // The report is written even when output is blocked.
    assert!(dir.path().join("report.json").exists());
}

#[test]
fn allowed_failure_writes_and_flags() {
    let dir = TempDir::new().expect("tempdir");
    let mut request = request(&dir, &with_unmapped_account());
    request.allow_failed_validation = true;
    let outcome = run(&request).expect("run");

    assert_eq!(outcome.exit_code(), EXIT_FLAGGED);
    assert!(outcome.decision.flagged);
    assert!(outcome.output.is_some_and(|path| path.exists()));
    assert_eq!(outcome.summary.total_records, 3);
}

#[test]
fn dry_run_writes_nothing() {
    let dir = TempDir::new().expect("tempdir");
    let mut request = request(&dir, CURRENT);
    request.dry_run = true;
    let outcome = run(&request).expect("run");

    assert_eq!(outcome.exit_code(), EXIT_OK);
    assert!(outcome.output.is_none());
    assert!(!dir.path().join("out").exists());
}

#[test]
fn strict_period_rejects_unknown_format() {
    let dir = TempDir::new().expect("tempdir");
    let mut request = request(&dir, CURRENT);
    request.period = "April 2025".to_string();
    request.strict_period = true;
    let err = run(&request).expect_err("rejected period");
    assert!(format!("{err:#}").contains("April 2025"));
}

#[test]
fn missing_entity_is_fatal() {
    let dir = TempDir::new().expect("tempdir");
    let mut request = request(&dir, CURRENT);
    request.entity = None;
    let err = run(&request).expect_err("no entity");
    assert!(err.to_string().contains("entity"));
}

#[test]
fn check_mappings_lists_gaps() {
    let dir = TempDir::new().expect("tempdir");
    let accounts = write(dir.path(), "current.csv", &with_unmapped_account());
    let batch = check_mappings(&StandardsPaths::default(), &accounts).expect("check");
    assert_eq!(batch.total(), 4);
    assert_eq!(batch.unmapped, vec!["Suspense Clearing"]);
    assert!((batch.mapping_rate - 0.75).abs() < f64::EPSILON);
}

#[test]
fn variance_against_system_balances() {
    let dir = TempDir::new().expect("tempdir");
    let prior = write(dir.path(), "prior.csv", PRIOR);
    let current = write(dir.path(), "current.csv", CURRENT);
    let system = write(
        dir.path(),
        "system.csv",
        "Account,Net\n10100-0-000,650.00\n81000-0-000,5.00\n",
    );
    let report =
        variance(&StandardsPaths::default(), &prior, &current, &system).expect("variance");

    let cash = report
        .lines
        .iter()
        .find(|line| line.account == "10100-0-000")
        .expect("cash line");
    assert!(cash.variance.is_zero());
    let discrepancies: Vec<&str> = report
        .discrepancies()
        .map(|line| line.account.as_str())
        .collect();
    assert_eq!(
        discrepancies,
        vec!["81000-0-000", "83105-0-000: Prepaid Insurance"]
    );
}
