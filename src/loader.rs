//! Dataset loading.
//!
//! A dataset is a flat directory of rule records (`*.RULE` files). Records
//! are loaded in sorted name order so reports are deterministic. A record
//! that fails to parse becomes an `invalid-front-matter` finding instead of
//! aborting the run; only an unreadable dataset directory is fatal.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};

use crate::frontmatter;
use crate::models::{Finding, RuleRecord};

/// Extension marking a file as a rule record.
pub const RULE_EXT: &str = ".RULE";

/// A loaded dataset: parsed records plus the raw directory listing.
pub struct Dataset {
    pub dir: PathBuf,
    pub records: Vec<RuleRecord>,
    /// Every file name in the dataset directory, record or not; the target
    /// set for `referenced_filenames` integrity.
    pub file_names: HashSet<String>,
    /// Records that failed to parse, reported alongside the check results.
    pub findings: Vec<Finding>,
}

/// Load every rule record under `dir`.
pub fn load_dataset(dir: &Path, quiet: bool) -> Result<Dataset> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("failed to read dataset directory {}", dir.display()))?;

    let mut file_names = HashSet::new();
    let mut rule_files: Vec<(String, PathBuf)> = Vec::new();
    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        file_names.insert(name.to_string());
        if name.ends_with(RULE_EXT) {
            rule_files.push((name.to_string(), path));
        }
    }
    rule_files.sort();

    let pb = if !quiet && rule_files.len() > 100 {
        let pb = ProgressBar::new(rule_files.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
                .progress_chars("#>-"),
        );
        pb.set_message("loading records");
        Some(pb)
    } else {
        None
    };

    let mut records = Vec::new();
    let mut findings = Vec::new();
    for (name, path) in &rule_files {
        match load_record(path, name) {
            Ok(record) => records.push(record),
            Err(err) => findings.push(Finding::error(
                name,
                "invalid-front-matter",
                format!("{err:#}"),
            )),
        }

        if let Some(pb) = &pb {
            pb.inc(1);
        }
    }

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    Ok(Dataset {
        dir: dir.to_path_buf(),
        records,
        file_names,
        findings,
    })
}

fn load_record(path: &Path, name: &str) -> Result<RuleRecord> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let (metadata, body) = frontmatter::parse(&content)?;
    Ok(RuleRecord {
        file_name: name.to_string(),
        metadata,
        body,
    })
}
