use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "rule-checkr",
    about = "Validate and format license detection rule datasets",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run integrity checks over a rule dataset
    Check(CheckArgs),
    /// Rewrite records into canonical form
    Fmt(FmtArgs),
}

#[derive(clap::Args, Debug)]
pub struct CheckArgs {
    /// Dataset directory to check
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Severity config file [default: ./.rule-checkr/config.toml, fallback ~/.config/rule-checkr/config.toml]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Report format
    #[arg(long, default_value = "terminal", value_name = "FORMAT")]
    pub report: ReportFormat,

    /// Show the per-check breakdown table
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print the summary line
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(clap::Args, Debug)]
pub struct FmtArgs {
    /// Dataset directory to format
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Rewrite files in place (default is a dry run)
    #[arg(long)]
    pub write: bool,

    /// Suppress per-file output
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum ReportFormat {
    Terminal,
    Json,
}
