//! Command-line arguments for `hospnet`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "hospnet",
    version,
    about = "Drive hospnet administration wizards from the command line",
    long_about = "Drive hospnet administration wizards from the command line.\n\n\
                  Runs the patient registration wizard from an answers file and\n\
                  checks, imports and exports custom workflow documents."
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

    #[arg(long = "log-format", value_enum, default_value = "pretty", global = true)]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow patient-entered values to appear in logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,

    /// Settings file (default: the platform config folder).
    #[arg(long = "config", value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the patient registration wizard from an answers file.
    Register(RegisterArgs),

    /// Check and move custom workflow documents.
    #[command(subcommand)]
    Workflow(WorkflowCommand),

    /// List the hospital departments workflows can route to.
    Departments,
}

#[derive(Args)]
pub struct RegisterArgs {
    /// JSON object mapping field names to answers.
    #[arg(value_name = "ANSWERS.json")]
    pub answers: PathBuf,

    /// Validate and print the registration payload without sending it.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Fill street, neighborhood, city and state from the CEP.
    #[arg(long = "autofill-address")]
    pub autofill_address: bool,

    /// Draft file to resume from and save to (default: the platform data folder).
    #[arg(long = "draft", value_name = "FILE")]
    pub draft: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum WorkflowCommand {
    /// Load an export document into the workflow editor and validate each step.
    Validate {
        #[arg(value_name = "EXPORT.json")]
        export: PathBuf,
    },

    /// Import an export document and export it again under a new id.
    Roundtrip {
        #[arg(value_name = "EXPORT.json")]
        export: PathBuf,
    },
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
