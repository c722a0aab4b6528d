use std::collections::{HashMap, HashSet};
use std::path::Path;

use anyhow::Result;
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use crate::models::{Finding, Severity};

/// Render a colored terminal report.
///
/// `records` is the number of rule files scanned, including the ones whose
/// front matter failed to parse.
pub fn render(
    findings: &[Finding],
    records: usize,
    path: &Path,
    verbose: bool,
    quiet: bool,
) -> Result<()> {
    let error_count = findings.iter().filter(|f| f.severity == Severity::Error).count();
    let warn_count = findings.len() - error_count;
    let flagged: HashSet<&str> = findings.iter().map(|f| f.file.as_str()).collect();
    let clean_count = records.saturating_sub(flagged.len());

    if quiet {
        println!(
            "Records: {}  Errors: {}  Warnings: {}",
            records,
            error_count.to_string().red(),
            warn_count.to_string().yellow(),
        );
        return Ok(());
    }

    println!("\n {} v{}", "rule-checkr".bold(), env!("CARGO_PKG_VERSION"));
    println!(" Dataset: {}\n", path.display());

    // Summary box
    let warn_checks = summarize_checks(findings, Severity::Warning);
    let error_checks = summarize_checks(findings, Severity::Error);

    println!(" ┌────────────────────────────────────────────────────┐");
    println!(" │  {:<48} │", "SUMMARY".bold());
    println!(" │  {:<48} │", format!("Total records    : {}", records));
    println!(
        " │  {:<48} │",
        format!("{}  Clean         : {:>4}", "✓".green(), clean_count)
    );
    println!(
        " │  {:<48} │",
        format!(
            "{}  Warnings      : {:>4}  {}",
            "⚠".yellow(),
            warn_count,
            warn_checks
        )
    );
    println!(
        " │  {:<48} │",
        format!(
            "{}  Errors        : {:>4}  {}",
            "✗".red(),
            error_count,
            error_checks
        )
    );
    println!(" └────────────────────────────────────────────────────┘\n");

    // Error table
    if error_count > 0 {
        println!(" {} Records failing validation:\n", "[ERROR]".red().bold());
        render_table(findings, Severity::Error);
        println!();
    }

    // Warn table
    if warn_count > 0 {
        println!(" {} Records with warnings:\n", "[WARN]".yellow().bold());
        render_table(findings, Severity::Warning);
        println!();
    }

    // Verbose: per-check breakdown
    if verbose && !findings.is_empty() {
        println!(" {} Findings by check:\n", "[CHECKS]".bold());
        render_breakdown(findings);
        println!();
    }

    if findings.is_empty() {
        println!(" {} dataset is clean", "✓".green().bold());
    }

    Ok(())
}

fn render_table(findings: &[Finding], severity_filter: Severity) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("File").add_attribute(Attribute::Bold),
            Cell::new("Check").add_attribute(Attribute::Bold),
            Cell::new("Message").add_attribute(Attribute::Bold),
        ]);

    let check_color = match severity_filter {
        Severity::Warning => Color::Yellow,
        Severity::Error => Color::Red,
    };

    for finding in findings.iter().filter(|f| f.severity == severity_filter) {
        table.add_row(vec![
            Cell::new(&finding.file),
            Cell::new(finding.check).fg(check_color),
            Cell::new(&finding.message),
        ]);
    }

    println!("{}", table);
}

fn render_breakdown(findings: &[Finding]) {
    // Each check id has a single severity once overrides are applied.
    let mut counts: HashMap<&str, (Severity, usize)> = HashMap::new();
    for finding in findings {
        let entry = counts.entry(finding.check).or_insert((finding.severity, 0));
        entry.1 += 1;
    }

    let mut rows: Vec<(&str, (Severity, usize))> = counts.into_iter().collect();
    rows.sort_by(|a, b| b.1 .1.cmp(&a.1 .1).then(a.0.cmp(b.0)));

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Check").add_attribute(Attribute::Bold),
            Cell::new("Severity").add_attribute(Attribute::Bold),
            Cell::new("Count").add_attribute(Attribute::Bold),
        ]);

    for (check, (severity, count)) in rows {
        let color = match severity {
            Severity::Warning => Color::Yellow,
            Severity::Error => Color::Red,
        };
        table.add_row(vec![
            Cell::new(check),
            Cell::new(severity.to_string()).fg(color),
            Cell::new(count),
        ]);
    }

    println!("{}", table);
}

fn summarize_checks(findings: &[Finding], severity: Severity) -> String {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for finding in findings.iter().filter(|f| f.severity == severity) {
        *counts.entry(finding.check).or_insert(0) += 1;
    }

    let mut pairs: Vec<(&str, usize)> = counts.into_iter().collect();
    pairs.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));

    let summary: Vec<String> = pairs
        .iter()
        .take(3)
        .map(|(check, cnt)| format!("{} ({})", check, cnt))
        .collect();

    if summary.is_empty() {
        String::new()
    } else {
        format!("[{}]", summary.join(", "))
    }
}
