//! CLI argument definitions for the polyp counter.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "polyp-counter",
    version,
    about = "Polyp Counter - Tally serrated and adenomatous findings per patient",
    long_about = "Tally serrated and adenomatous polyp findings in pathology and \
                  endoscopy reports.\n\n\
                  Reports are normalized and matched against built-in term lists; \
                  counts accumulate per patient across a fixed cohort of 200 \
                  patients navigated with function keys."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
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

    /// Allow report text to appear in logs.
    ///
    /// Report text is patient data; it is redacted unless this flag is set.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,

    /// Session configuration file (TOML).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Count findings in a single report.
    Count(CountArgs),

    /// List the built-in detection terms.
    Patterns,

    /// Run a keyboard-driven review session.
    Session(SessionArgs),
}

#[derive(Parser)]
pub struct CountArgs {
    /// Report text file, or `-` for stdin.
    #[arg(value_name = "REPORT")]
    pub report: PathBuf,

    /// Print counts as JSON.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Parser)]
pub struct SessionArgs {
    /// Report file treated as the visible page until a `page` directive
    /// switches it.
    #[arg(long = "page", value_name = "FILE")]
    pub page: Option<PathBuf>,

    /// Read key chords from a file instead of stdin.
    ///
    /// One chord per line (`F12`, `shift+F12`, `ctrl+F4`, ...). Directives:
    /// `page <FILE>`, `goto <N>`, `show`. Lines starting with `#` are ignored.
    #[arg(long = "script", value_name = "FILE")]
    pub script: Option<PathBuf>,

    /// Print the final cohort as JSON instead of a table.
    #[arg(long = "json")]
    pub json: bool,

    /// Do not print the panel after each key.
    #[arg(long = "quiet-panel")]
    pub quiet_panel: bool,
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
