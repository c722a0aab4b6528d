use anyhow::Result;

use crate::checks::Check;
use crate::loader::Dataset;
use crate::models::Finding;

/// Checks `referenced_filenames` against the files actually present in the
/// dataset directory. A notice that points at `LICENSE.txt` is only useful if
/// the dataset ships that file alongside the rules.
pub struct ReferencesCheck;

impl ReferencesCheck {
    pub fn new() -> Self {
        ReferencesCheck
    }
}

impl Check for ReferencesCheck {
    fn run(&self, dataset: &Dataset) -> Result<Vec<Finding>> {
        let mut findings = Vec::new();
        for record in &dataset.records {
            for name in &record.metadata.referenced_filenames {
                if !dataset.file_names.contains(name) {
                    findings.push(Finding::warning(
                        &record.file_name,
                        "unknown-referenced-filename",
                        format!("referenced file `{name}` is not in the dataset"),
                    ));
                }
            }
        }
        Ok(findings)
    }
}
