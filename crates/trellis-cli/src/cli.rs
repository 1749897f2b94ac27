//! CLI argument definitions for the cognostics writer.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "trellis",
    version,
    about = "Write cognostics metadata for a faceted panel viewer",
    long_about = "Serialize a table of per-panel cognostics plus column metadata into the\n\
                  JSON and JS artifacts a browser viewer loads.\n\n\
                  Factor columns are written as 1-based level codes."
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

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Build cognostics from a CSV table and write the JSON and JS artifacts.
    Write(WriteArgs),

    /// Check a written JSON artifact against the viewer's factor contract.
    Inspect(InspectArgs),

    /// List supported column kinds.
    Kinds,
}

#[derive(Parser)]
pub struct WriteArgs {
    /// CSV file with one row per panel.
    #[arg(value_name = "DATA_CSV")]
    pub data: PathBuf,

    /// Column metadata JSON. When omitted, metadata is inferred from the table.
    #[arg(long = "meta", value_name = "PATH")]
    pub meta: Option<PathBuf>,

    /// Treat a column as a factor when inferring metadata (repeatable).
    #[arg(long = "factor", value_name = "COLUMN", conflicts_with = "meta")]
    pub factors: Vec<String>,

    /// Read whole numbers in factor columns as 0-based codes instead of labels.
    #[arg(long = "factor-codes")]
    pub factor_codes: bool,

    /// Output directory (default: directory of DATA_CSV).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// File name of the JSON artifact.
    #[arg(long = "json-name", default_value = "cogData.json")]
    pub json_name: String,

    /// File name of the JS artifact.
    #[arg(long = "js-name", default_value = "cogData.js")]
    pub js_name: String,

    /// Global (or callback) name the JS artifact binds.
    #[arg(long = "binding", default_value = "__cogData__")]
    pub binding: String,

    /// Emit the JS artifact as a callback invocation instead of a global assignment.
    #[arg(long = "callback")]
    pub callback: bool,

    /// Write the JSON artifact without indentation.
    #[arg(long = "compact")]
    pub compact: bool,

    /// Fail when a factor value has no matching level instead of preserving it.
    #[arg(long = "strict")]
    pub strict: bool,

    /// Build and report without writing artifacts.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Allow cell values to appear in logs.
    #[arg(long = "log-data")]
    pub log_data: bool,
}

#[derive(Parser)]
pub struct InspectArgs {
    /// Path to a JSON artifact (or a JS artifact when it ends in `.js`).
    #[arg(value_name = "ARTIFACT")]
    pub artifact: PathBuf,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
