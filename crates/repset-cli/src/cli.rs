//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use repset_model::RpePolicy;

#[derive(Parser)]
#[command(
    name = "repset",
    version,
    about = "Plan strength routines and run workout sessions",
    long_about = "Plan strength routines and run workout sessions.\n\n\
                  Routines are imported from JSON drafts, validated, and stored in a\n\
                  local data directory. Sessions walk through every series with rests\n\
                  and RPE capture, then save a summary."
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

    /// Log output format.
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

    /// Data directory holding routines.json and sessions.json.
    #[arg(long = "store", value_name = "DIR", global = true)]
    pub store: Option<PathBuf>,

    /// Settings file (default: settings.toml in the config directory).
    #[arg(long = "settings", value_name = "PATH", global = true)]
    pub settings: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// List stored routines.
    Routines,

    /// Import a routine draft from a JSON file.
    Import(ImportArgs),

    /// Check a routine draft without storing it.
    Validate(ValidateArgs),

    /// Run a workout session for a stored routine.
    Run(RunArgs),

    /// List saved sessions.
    History,

    /// Show session settings, optionally changing them.
    Settings(SettingsArgs),
}

#[derive(Parser)]
pub struct ImportArgs {
    /// Routine draft JSON.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

#[derive(Parser)]
pub struct ValidateArgs {
    /// Routine draft JSON.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

#[derive(Parser)]
pub struct RunArgs {
    /// Id of the routine to run.
    #[arg(value_name = "ROUTINE_ID")]
    pub routine_id: String,

    /// RPE entered whenever one is asked for (default: the planned RPE).
    #[arg(long = "rpe", value_name = "N")]
    pub rpe: Option<i64>,

    /// Count rests and preparation down in real time.
    #[arg(long = "realtime")]
    pub realtime: bool,

    /// Exercise catalog JSON mapping exercise keys to muscles.
    #[arg(long = "catalog", value_name = "FILE")]
    pub catalog: Option<PathBuf>,

    /// Override the RPE policy from the settings file.
    #[arg(long = "rpe-policy", value_enum)]
    pub rpe_policy: Option<RpePolicyArg>,
}

#[derive(Parser)]
pub struct SettingsArgs {
    /// New RPE policy to store.
    #[arg(long = "rpe-policy", value_enum)]
    pub rpe_policy: Option<RpePolicyArg>,

    /// New rest adjustment step, in seconds.
    #[arg(long = "rest-step", value_name = "SECONDS")]
    pub rest_step: Option<u32>,

    /// Turn haptic feedback on or off.
    #[arg(long = "vibration", value_name = "BOOL")]
    pub vibration: Option<bool>,
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

#[derive(Clone, Copy, ValueEnum)]
pub enum RpePolicyArg {
    Always,
    Never,
    Conditional,
}

impl From<RpePolicyArg> for RpePolicy {
    fn from(value: RpePolicyArg) -> Self {
        match value {
            RpePolicyArg::Always => Self::Always,
            RpePolicyArg::Never => Self::Never,
            RpePolicyArg::Conditional => Self::Conditional,
        }
    }
}
