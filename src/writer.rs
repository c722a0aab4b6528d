use std::fs;

use anyhow::{Context, Result};
use colored::*;

use crate::frontmatter;
use crate::loader::Dataset;
use crate::models::RuleRecord;

/// Canonical serialized form of a record.
///
/// Front matter fields come out in a fixed order with flags spelled `yes`,
/// and the `ignorable_*` lists are sorted and deduplicated. The
/// `referenced_filenames` list keeps its order, the first entry is the most
/// preferred match. The body is untouched.
pub fn canonical_form(record: &RuleRecord) -> Result<String> {
    let mut metadata = record.metadata.clone();
    for list in [
        &mut metadata.ignorable_copyrights,
        &mut metadata.ignorable_holders,
        &mut metadata.ignorable_urls,
        &mut metadata.ignorable_emails,
    ] {
        list.sort();
        list.dedup();
    }
    frontmatter::serialize(&metadata, &record.body)
}

/// Rewrite every record that is not already in canonical form.
///
/// With `write` false this is a dry run that only reports which files would
/// change. Returns the number of files needing a rewrite.
pub fn format_dataset(dataset: &Dataset, write: bool, quiet: bool) -> Result<usize> {
    let mut changed = 0;

    for record in &dataset.records {
        let path = dataset.dir.join(&record.file_name);
        let current = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let canonical = canonical_form(record)?;

        if current == canonical {
            continue;
        }
        changed += 1;

        if write {
            fs::write(&path, &canonical)
                .with_context(|| format!("failed to write {}", path.display()))?;
            if !quiet {
                println!(" {} {}", "formatted".green(), record.file_name);
            }
        } else if !quiet {
            println!(" {} {}", "needs format".yellow(), record.file_name);
        }
    }

    Ok(changed)
}

/// Exit policy for `fmt`. Files the loader could not parse always fail the
/// run, and a dry run also fails when any record differs from canonical form.
pub fn fmt_failed(changed: usize, skipped: usize, write: bool) -> bool {
    skipped > 0 || (changed > 0 && !write)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_dataset;
    use crate::models::RuleMetadata;
    use std::path::Path;

    fn write_file(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn test_canonical_form_sorts_and_dedupes_ignorables() {
        let record = RuleRecord {
            file_name: "bsd_1.RULE".to_string(),
            metadata: RuleMetadata {
                license_expression: "bsd-new".to_string(),
                is_license_notice: true,
                ignorable_holders: vec![
                    "The Regents".to_string(),
                    "Berkeley".to_string(),
                    "The Regents".to_string(),
                ],
                ..RuleMetadata::default()
            },
            body: "Redistribution and use in source and binary forms.\n".to_string(),
        };

        let canonical = canonical_form(&record).unwrap();
        let holders_at = canonical.find("Berkeley").unwrap();
        let regents_at = canonical.find("The Regents").unwrap();
        assert!(holders_at < regents_at);
        assert_eq!(canonical.matches("The Regents").count(), 1);
    }

    #[test]
    fn test_canonical_form_is_idempotent() {
        let record = RuleRecord {
            file_name: "mit_1.RULE".to_string(),
            metadata: RuleMetadata {
                license_expression: "mit".to_string(),
                is_license_tag: true,
                ..RuleMetadata::default()
            },
            body: "License: MIT\n".to_string(),
        };

        let once = canonical_form(&record).unwrap();
        let (metadata, body) = frontmatter::parse(&once).unwrap();
        let again = canonical_form(&RuleRecord {
            file_name: record.file_name.clone(),
            metadata,
            body,
        })
        .unwrap();
        assert_eq!(once, again);
    }

    #[test]
    fn test_dry_run_reports_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        // flag spelled `true`, no blank line before the body: not canonical
        let original = "---\nlicense_expression: mit\nis_license_notice: true\n---\nMIT notice.\n";
        write_file(dir.path(), "mit_1.RULE", original);

        let dataset = load_dataset(dir.path(), true).unwrap();
        let changed = format_dataset(&dataset, false, true).unwrap();

        assert_eq!(changed, 1);
        let content = fs::read_to_string(dir.path().join("mit_1.RULE")).unwrap();
        assert_eq!(content, original);
    }

    #[test]
    fn test_write_then_clean() {
        let dir = tempfile::tempdir().unwrap();
        write_file(
            dir.path(),
            "mit_1.RULE",
            "---\nis_license_notice: true\nlicense_expression: mit\n---\nMIT notice.\n",
        );

        let dataset = load_dataset(dir.path(), true).unwrap();
        assert_eq!(format_dataset(&dataset, true, true).unwrap(), 1);

        let content = fs::read_to_string(dir.path().join("mit_1.RULE")).unwrap();
        assert!(content.starts_with("---\nlicense_expression: mit\nis_license_notice: yes\n---\n"));

        // a second pass finds nothing to do
        let dataset = load_dataset(dir.path(), true).unwrap();
        assert_eq!(format_dataset(&dataset, true, true).unwrap(), 0);
    }

    #[test]
    fn test_already_canonical_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let record = RuleRecord {
            file_name: "mit_1.RULE".to_string(),
            metadata: RuleMetadata {
                license_expression: "mit".to_string(),
                is_license_notice: true,
                ..RuleMetadata::default()
            },
            body: "MIT notice.\n".to_string(),
        };
        write_file(dir.path(), "mit_1.RULE", &canonical_form(&record).unwrap());

        let dataset = load_dataset(dir.path(), true).unwrap();
        assert_eq!(format_dataset(&dataset, false, true).unwrap(), 0);
    }

    #[test]
    fn test_unparseable_files_fail_the_run() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "broken_1.RULE", "no front matter here\n");

        let dataset = load_dataset(dir.path(), true).unwrap();
        assert!(dataset.records.is_empty());
        assert_eq!(dataset.findings.len(), 1);
        assert_eq!(format_dataset(&dataset, false, true).unwrap(), 0);

        // nothing to rewrite, yet the run must not report success
        assert!(fmt_failed(0, dataset.findings.len(), false));
        assert!(fmt_failed(0, dataset.findings.len(), true));
    }

    #[test]
    fn test_fmt_exit_policy() {
        assert!(!fmt_failed(0, 0, false));
        assert!(!fmt_failed(0, 0, true));
        // a dry run flags pending rewrites, `--write` resolves them
        assert!(fmt_failed(2, 0, false));
        assert!(!fmt_failed(2, 0, true));
    }
}
