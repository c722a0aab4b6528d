//! `rule-checkr` — validate and canonically format license detection rule datasets.
//!
//! # Flow (`check`)
//! 1. Parse CLI arguments ([`cli`]).
//! 2. Load the severity config ([`config::load_config`]).
//! 3. Load the rule dataset ([`loader`]).
//! 4. Run the integrity checks ([`checks`]).
//! 5. Apply severity overrides ([`config::apply_policy`]).
//! 6. Render the requested report ([`report`], or JSON via [`models::CheckReport`]).
//! 7. Exit `0` (clean) or `1` (at least one [`models::Severity::Error`]).
//!
//! # Flow (`fmt`)
//! Load the same dataset and rewrite every record into canonical front matter
//! form ([`writer`]). Unparseable files fail the run; without `--write` it is
//! a dry run that also exits `1` when files would change.

mod automaton;
mod checks;
mod cli;
mod config;
mod expression;
mod frontmatter;
mod loader;
mod models;
mod report;
mod tokenize;
mod writer;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use cli::{CheckArgs, Cli, Command, FmtArgs, ReportFormat};
use config::{apply_policy, load_config};
use models::{CheckReport, Severity};

fn main() -> Result<()> {
    match Cli::parse().command {
        Command::Check(args) => run_check(args),
        Command::Fmt(args) => run_fmt(args),
    }
}

fn run_check(args: CheckArgs) -> Result<()> {
    // Resolve dataset path
    let path = args
        .path
        .canonicalize()
        .unwrap_or_else(|_| args.path.clone());

    let config = load_config(&path, args.config.as_deref())?;

    // JSON goes to stdout; keep the run silent apart from the report itself
    let quiet = args.quiet || matches!(args.report, ReportFormat::Json);

    let dataset = loader::load_dataset(&path, quiet)?;
    let scanned = dataset.records.len() + dataset.findings.len();

    let findings = checks::run_all(&dataset)?;
    let findings = apply_policy(&config, findings);

    // Computed up front, the JSON branch consumes `findings`
    let has_errors = findings.iter().any(|f| f.severity == Severity::Error);

    match args.report {
        ReportFormat::Terminal => {
            report::terminal::render(&findings, scanned, &path, args.verbose, quiet)?;
        }
        ReportFormat::Json => {
            let report = CheckReport::new(&path, scanned, findings);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    // Exit code: 1 if any error-severity finding remains
    if has_errors {
        std::process::exit(1);
    }

    Ok(())
}

fn run_fmt(args: FmtArgs) -> Result<()> {
    let path = args
        .path
        .canonicalize()
        .unwrap_or_else(|_| args.path.clone());

    let dataset = loader::load_dataset(&path, args.quiet)?;
    let skipped = dataset.findings.len();

    let changed = writer::format_dataset(&dataset, args.write, args.quiet)?;

    if !args.quiet {
        if skipped > 0 {
            println!(
                " {} {} file(s) have unparseable front matter",
                "✗".yellow(),
                skipped
            );
        }
        if changed == 0 && skipped == 0 {
            println!(
                " {} all {} records already canonical",
                "✓".green(),
                dataset.records.len()
            );
        } else if changed > 0 && args.write {
            println!(
                " {} rewrote {} of {} records",
                "✓".green(),
                changed,
                dataset.records.len()
            );
        } else if changed > 0 {
            println!(
                " {} {} of {} records need formatting",
                "✗".yellow(),
                changed,
                dataset.records.len()
            );
        }
    }

    // Exit code: unparseable files always fail, a dry run also fails when
    // records need a rewrite
    if writer::fmt_failed(changed, skipped, args.write) {
        std::process::exit(1);
    }

    Ok(())
}
