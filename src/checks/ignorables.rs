use std::collections::HashSet;

use anyhow::Result;
use regex::Regex;

use crate::checks::Check;
use crate::loader::Dataset;
use crate::models::{Finding, RuleRecord};

/// Syntax and duplicate validation for the `ignorable_*` lists.
pub struct IgnorablesCheck {
    url_re: Regex,
    email_re: Regex,
}

impl IgnorablesCheck {
    pub fn new() -> Result<Self> {
        Ok(IgnorablesCheck {
            url_re: Regex::new(r"^(?:https?|ftp)://[^\s/$.?#][^\s]*$")?,
            email_re: Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$")?,
        })
    }

    fn check_syntax(&self, record: &RuleRecord, findings: &mut Vec<Finding>) {
        for url in &record.metadata.ignorable_urls {
            if !self.url_re.is_match(url) {
                findings.push(Finding::error(
                    &record.file_name,
                    "malformed-url",
                    format!("invalid URL `{url}` in ignorable_urls"),
                ));
            }
        }
        for email in &record.metadata.ignorable_emails {
            if !self.email_re.is_match(email) {
                findings.push(Finding::error(
                    &record.file_name,
                    "malformed-email",
                    format!("invalid email `{email}` in ignorable_emails"),
                ));
            }
        }
    }

    fn check_duplicates(&self, record: &RuleRecord, findings: &mut Vec<Finding>) {
        let lists = [
            ("ignorable_copyrights", &record.metadata.ignorable_copyrights),
            ("ignorable_holders", &record.metadata.ignorable_holders),
            ("ignorable_urls", &record.metadata.ignorable_urls),
            ("ignorable_emails", &record.metadata.ignorable_emails),
        ];
        for (field, values) in lists {
            let mut seen = HashSet::new();
            for value in values {
                if !seen.insert(value.as_str()) {
                    findings.push(Finding::warning(
                        &record.file_name,
                        "duplicate-ignorable",
                        format!("duplicate entry `{value}` in {field}"),
                    ));
                }
            }
        }
    }
}

impl Check for IgnorablesCheck {
    fn run(&self, dataset: &Dataset) -> Result<Vec<Finding>> {
        let mut findings = Vec::new();
        for record in &dataset.records {
            self.check_syntax(record, &mut findings);
            self.check_duplicates(record, &mut findings);
        }
        Ok(findings)
    }
}
