//! CLI argument definitions for the diary merge.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use diary_model::{JoinPolicy, MissingDisclosure};

#[derive(Parser)]
#[command(
    name = "dd-trait-merge",
    version,
    about = "Merge daily-diary, trait, and network survey data into one long table",
    long_about = "Reshape a wide daily-diary export into one row per event, add \
                  disclosure totals, attach baseline traits and network metrics \
                  by subject ID, and write the result as CSV."
)]
pub struct Cli {
    /// Wide daily-diary CSV (ID, Dorm, Day, PosEv1_Cat, ...).
    #[arg(value_name = "DIARY_CSV")]
    pub diary: PathBuf,

    /// Trait questionnaire CSV with a `time` column.
    #[arg(value_name = "TRAIT_CSV")]
    pub traits: PathBuf,

    /// Per-subject network metrics CSV.
    #[arg(value_name = "NETWORK_CSV")]
    pub network: PathBuf,

    /// Destination of the merged CSV.
    #[arg(value_name = "OUTPUT_CSV")]
    pub output: PathBuf,

    /// Join semantics for every join stage.
    #[arg(long = "join", value_enum, default_value = "inner")]
    pub join: JoinArg,

    /// How missing disclosure counts affect NumDrmTld and GotHelp.
    #[arg(long = "missing-disclosure", value_enum, default_value = "zero")]
    pub missing_disclosure: MissingDisclosureArg,

    /// Do not write the leading row-index column.
    #[arg(long = "no-index")]
    pub no_index: bool,

    /// Write the output even when a join matches no rows.
    #[arg(long = "allow-empty")]
    pub allow_empty: bool,

    /// Fail when trait or network data repeat a subject ID.
    ///
    /// By default repeated IDs are reported as warnings and the affected
    /// event rows are repeated once per match.
    #[arg(long = "strict-keys")]
    pub strict_keys: bool,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(long = "log-format", value_enum, default_value = "pretty")]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum JoinArg {
    Inner,
    Left,
}

impl From<JoinArg> for JoinPolicy {
    fn from(arg: JoinArg) -> Self {
        match arg {
            JoinArg::Inner => JoinPolicy::Inner,
            JoinArg::Left => JoinPolicy::Left,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum MissingDisclosureArg {
    /// Missing slots count as zero.
    Zero,
    /// A missing slot makes the totals missing.
    Propagate,
}

impl From<MissingDisclosureArg> for MissingDisclosure {
    fn from(arg: MissingDisclosureArg) -> Self {
        match arg {
            MissingDisclosureArg::Propagate => MissingDisclosure::Propagate,
            MissingDisclosureArg::Zero => MissingDisclosure::Zero,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
