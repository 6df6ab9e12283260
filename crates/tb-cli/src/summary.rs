use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use rust_decimal::Decimal;

use tb_map::BatchValidation;
use tb_validate::{CheckData, CheckResult, Status, ValidationReport, VarianceReport};
use tb_cli::types::RunOutcome;

/// Accounts listed inline before the rest is summarized as a count.
const UNMAPPED_SAMPLE: usize = 5;

pub fn print_run_summary(outcome: &RunOutcome) {
    println!("Period: {}", outcome.period.label());
    if outcome.period.is_fallback() {
        println!("  (period not recognized, current month used)");
    }
    println!("Entity: {}", outcome.entity_id);
    match &outcome.output {
        Some(path) => println!("Output: {}", path.display()),
        None if outcome.dry_run => println!("Output: - (dry run)"),
        None => println!("Output: - (blocked by validation)"),
    }
    if let Some(path) = &outcome.report_path {
        println!("Validation report: {}", path.display());
    }

    let mut table = Table::new();
    table.set_header(vec![header_cell("Stage"), header_cell("Count")]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    let summary = &outcome.summary;
    for (label, count) in [
        ("Prior rows", outcome.prior_rows),
        ("Current rows", outcome.current_rows),
        ("Joined accounts", outcome.joined_accounts),
        ("Immaterial", outcome.immaterial_accounts),
        ("Unmapped", outcome.unmapped_accounts.len()),
        ("Import records", summary.total_records),
        ("Target accounts", summary.unique_accounts),
    ] {
        table.add_row(vec![Cell::new(label), Cell::new(count)]);
    }
    table.add_row(vec![
        Cell::new("Total amount")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(summary.total_amount).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");

    if !outcome.unmapped_accounts.is_empty() {
        eprintln!("Unmapped accounts: {}", sample(&outcome.unmapped_accounts));
    }
    print_validation_table(&outcome.report);
    if outcome.decision.flagged {
        eprintln!("warning: validation did not pass; output written and flagged");
    }
}

pub fn print_validation_table(report: &ValidationReport) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Check"),
        header_cell("Status"),
        header_cell("Details"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Center);
    for (kind, result) in &report.validations {
        table.add_row(vec![
            Cell::new(kind.label()),
            status_cell(result.status),
            Cell::new(detail_text(result)),
        ]);
    }
    println!();
    println!("Validation: {}", report.overall_status);
    println!("{table}");
}

pub fn print_mapping_check(batch: &BatchValidation) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Source"),
        header_cell("Target"),
        header_cell("Description"),
        header_cell("Strategy"),
    ]);
    apply_table_style(&mut table);
    for mapped in &batch.mapped {
        table.add_row(vec![
            Cell::new(&mapped.source),
            Cell::new(&mapped.target)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(&mapped.description),
            dim_cell(mapped.strategy),
        ]);
    }
    for account in &batch.unmapped {
        table.add_row(vec![
            Cell::new(account),
            Cell::new("UNMAPPED").fg(Color::Red),
            dim_cell("-"),
            dim_cell("-"),
        ]);
    }
    println!("{table}");
    println!(
        "Mapping rate: {:.2}% ({} of {})",
        batch.mapping_rate * 100.0,
        batch.mapped.len(),
        batch.total()
    );
}

pub fn print_variance(report: &VarianceReport) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Account"),
        header_cell("Description"),
        header_cell("Operator"),
        header_cell("Change"),
        header_cell("Expected"),
        header_cell("Actual"),
        header_cell("Variance"),
    ]);
    apply_table_style(&mut table);
    for index in 2..7 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for line in &report.lines {
        table.add_row(vec![
            Cell::new(&line.account),
            Cell::new(&line.description),
            Cell::new(line.operator_balance),
            Cell::new(line.change),
            Cell::new(line.expected_balance),
            Cell::new(line.actual_balance),
            variance_cell(line.variance),
        ]);
    }
    let total = &report.total;
    table.add_row(vec![
        Cell::new(&total.account)
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(&total.description)
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(total.operator_balance).add_attribute(Attribute::Bold),
        Cell::new(total.change).add_attribute(Attribute::Bold),
        Cell::new(total.expected_balance).add_attribute(Attribute::Bold),
        Cell::new(total.actual_balance).add_attribute(Attribute::Bold),
        variance_cell(total.variance).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(60);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn detail_text(result: &CheckResult) -> String {
    let mut text = result.details.clone();
    if let Some(warning) = result.warning() {
        text.push_str(&format!("\n{warning}"));
    }
    match &result.data {
        CheckData::Error { error } => text.push_str(&format!("\n{error}")),
        CheckData::Mapping(mapping) if !mapping.unmapped_accounts.is_empty() => {
            text.push_str(&format!(
                "\nunmapped: {}",
                sample(&mapping.unmapped_accounts)
            ));
        }
        CheckData::Quality(quality) => {
            for issue in &quality.issues {
                text.push_str(&format!("\n{issue}"));
            }
        }
        _ => {}
    }
    text
}

fn sample(accounts: &[String]) -> String {
    let shown: Vec<&str> = accounts
        .iter()
        .take(UNMAPPED_SAMPLE)
        .map(String::as_str)
        .collect();
    let rest = accounts.len().saturating_sub(shown.len());
    if rest == 0 {
        shown.join(", ")
    } else {
        format!("{} (+{rest} more)", shown.join(", "))
    }
}

fn status_cell(status: Status) -> Cell {
    let color = match status {
        Status::Pass => Color::Green,
        Status::Warning => Color::Yellow,
        Status::Fail | Status::Error => Color::Red,
    };
    Cell::new(status).fg(color).add_attribute(Attribute::Bold)
}

fn variance_cell(variance: Decimal) -> Cell {
    if variance.is_zero() {
        dim_cell(variance)
    } else {
        Cell::new(variance).fg(Color::Red)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
