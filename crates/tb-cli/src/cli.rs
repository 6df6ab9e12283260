//! Command-line arguments for `tbrecon`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "tbrecon",
    version,
    about = "Trial balance reconciliation - activity, validation and import batches",
    long_about = "Compute period activity from two trial balance snapshots, map source\n\
                  accounts to the target chart, validate the result independently and\n\
                  write a fixed-schema import batch."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Append logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Include ledger values (descriptions, amounts) in trace logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the full pipeline and write the import batch.
    Run(RunArgs),

    /// Check that every account in a trial balance maps to the target chart.
    CheckMappings(CheckMappingsArgs),

    /// List the target chart of accounts.
    Chart(StandardsArgs),

    /// Compare destination system balances against operator balance plus
    /// activity.
    Variance(VarianceArgs),
}

/// Overrides for the reference data under the standards directory.
#[derive(Args, Clone, Default)]
pub struct StandardsArgs {
    /// System configuration file (TOML or JSON).
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Mapping rules file (TOML or JSON).
    #[arg(long = "rules", value_name = "FILE")]
    pub rules: Option<PathBuf>,

    /// Target chart of accounts (CSV: code,description,type).
    #[arg(long = "chart", value_name = "FILE")]
    pub chart: Option<PathBuf>,
}

#[derive(Args)]
pub struct RunArgs {
    /// Prior period trial balance (CSV).
    #[arg(long = "prior", value_name = "CSV")]
    pub prior: PathBuf,

    /// Current period trial balance (CSV).
    #[arg(long = "current", value_name = "CSV")]
    pub current: PathBuf,

    /// Accounting period: MM/YY, YYYYMM or YYYY-MM.
    #[arg(long = "period", value_name = "PERIOD")]
    pub period: String,

    /// Entity id stamped on every record (default: entity_config.default_entity_id).
    #[arg(long = "entity", value_name = "ID")]
    pub entity: Option<String>,

    #[command(flatten)]
    pub standards: StandardsArgs,

    /// Import file to write (default: mri_import.csv).
    #[arg(long = "output", value_name = "CSV")]
    pub output: Option<PathBuf>,

    /// Write the validation report as JSON.
    #[arg(long = "report", value_name = "JSON")]
    pub report: Option<PathBuf>,

    /// Validate and summarize without writing the import file.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Write the import file even when validation fails.
    ///
    /// The run is flagged and exits with status 2 instead of being blocked.
    #[arg(long = "allow-failed-validation")]
    pub allow_failed_validation: bool,

    /// Reject an unrecognized period instead of using the current month.
    #[arg(long = "strict-period")]
    pub strict_period: bool,
}

#[derive(Args)]
pub struct CheckMappingsArgs {
    /// Trial balance whose accounts are checked (CSV).
    #[arg(long = "accounts", value_name = "CSV")]
    pub accounts: PathBuf,

    #[command(flatten)]
    pub standards: StandardsArgs,
}

#[derive(Args)]
pub struct VarianceArgs {
    /// Operator trial balance at the start of the period (CSV).
    #[arg(long = "prior", value_name = "CSV")]
    pub prior: PathBuf,

    /// Operator trial balance at the end of the period (CSV).
    #[arg(long = "current", value_name = "CSV")]
    pub current: PathBuf,

    /// Destination system balances after import (CSV).
    #[arg(long = "system", value_name = "CSV")]
    pub system: PathBuf,

    #[command(flatten)]
    pub standards: StandardsArgs,

    /// Write the variance report as CSV.
    #[arg(long = "output", value_name = "CSV")]
    pub output: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
