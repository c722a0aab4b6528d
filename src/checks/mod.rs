//! Dataset integrity checks.
//!
//! Each module covers one concern and may emit several check ids:
//! - [`metadata`] — expression syntax, rule kind flags, ranges, empty bodies.
//! - [`ignorables`] — URL/email syntax and duplicate entries in the
//!   `ignorable_*` lists.
//! - [`references`] — `referenced_filenames` against the dataset listing.
//! - [`duplicates`] — corpus-level duplicate and containment detection over
//!   token sequences.
//!
//! Every finding is born with its built-in severity; the config layer may
//! override or suppress it afterwards.

use anyhow::Result;

use crate::loader::Dataset;
use crate::models::Finding;

pub mod duplicates;
pub mod ignorables;
pub mod metadata;
pub mod references;

/// A corpus-level integrity check.
pub trait Check {
    fn run(&self, dataset: &Dataset) -> Result<Vec<Finding>>;
}

/// Run every built-in check over the dataset, including the loader's parse
/// findings, in a deterministic order.
pub fn run_all(dataset: &Dataset) -> Result<Vec<Finding>> {
    let checks: Vec<Box<dyn Check>> = vec![
        Box::new(metadata::MetadataCheck::new()?),
        Box::new(ignorables::IgnorablesCheck::new()?),
        Box::new(references::ReferencesCheck::new()),
        Box::new(duplicates::DuplicatesCheck::new()?),
    ];

    let mut findings = dataset.findings.clone();
    for check in &checks {
        findings.extend(check.run(dataset)?);
    }

    findings.sort_by(|a, b| (a.file.as_str(), a.check).cmp(&(b.file.as_str(), b.check)));
    Ok(findings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RuleMetadata, RuleRecord, Severity};
    use std::collections::HashSet;
    use std::path::PathBuf;

    fn record(name: &str, expression: &str, body: &str) -> RuleRecord {
        RuleRecord {
            file_name: name.to_string(),
            metadata: RuleMetadata {
                license_expression: expression.to_string(),
                is_license_notice: true,
                ..RuleMetadata::default()
            },
            body: body.to_string(),
        }
    }

    #[test]
    fn test_run_all_clean_dataset() {
        let records = vec![
            record("apache_1.RULE", "apache-2.0", "Licensed under the Apache License 2.0.\n"),
            record("mit_1.RULE", "mit", "Licensed under the MIT license.\n"),
        ];
        let file_names: HashSet<String> =
            records.iter().map(|r| r.file_name.clone()).collect();
        let dataset = Dataset {
            dir: PathBuf::from("."),
            records,
            file_names,
            findings: Vec::new(),
        };

        assert!(run_all(&dataset).unwrap().is_empty());
    }

    #[test]
    fn test_run_all_keeps_loader_findings_and_sorts() {
        let records = vec![record("mit_1.RULE", "", "Licensed under the MIT license.\n")];
        let dataset = Dataset {
            dir: PathBuf::from("."),
            records,
            file_names: HashSet::new(),
            findings: vec![Finding::error(
                "zz_broken.RULE",
                "invalid-front-matter",
                "missing opening front matter delimiter",
            )],
        };

        let findings = run_all(&dataset).unwrap();
        assert_eq!(findings.len(), 2);
        // sorted by file name, the loader finding comes last
        assert_eq!(findings[0].file, "mit_1.RULE");
        assert_eq!(findings[0].check, "empty-expression");
        assert_eq!(findings[0].severity, Severity::Error);
        assert_eq!(findings[1].file, "zz_broken.RULE");
    }
}
