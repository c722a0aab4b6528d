use anyhow::Result;

use crate::checks::Check;
use crate::expression;
use crate::loader::Dataset;
use crate::models::{Finding, RuleRecord};
use crate::tokenize::Tokenizer;

/// Per-record validation of the front matter fields and the rule body.
pub struct MetadataCheck {
    tokenizer: Tokenizer,
}

impl MetadataCheck {
    pub fn new() -> Result<Self> {
        Ok(MetadataCheck {
            tokenizer: Tokenizer::new()?,
        })
    }

    fn check_expression(&self, record: &RuleRecord, findings: &mut Vec<Finding>) {
        let raw = record.metadata.license_expression.trim();
        if raw.is_empty() {
            // False positives carry no license by definition.
            if !record.metadata.is_false_positive {
                findings.push(Finding::error(
                    &record.file_name,
                    "empty-expression",
                    "license_expression is empty",
                ));
            }
            return;
        }

        match expression::parse(raw) {
            Ok(expr) => {
                for key in expr.keys() {
                    if !expression::is_valid_key(&key) {
                        findings.push(Finding::error(
                            &record.file_name,
                            "invalid-license-key",
                            format!("invalid license key `{key}`"),
                        ));
                    }
                }
            }
            Err(err) => {
                findings.push(Finding::error(
                    &record.file_name,
                    "malformed-expression",
                    format!("{err:#}"),
                ));
            }
        }
    }

    fn check_kind_flags(&self, record: &RuleRecord, findings: &mut Vec<Finding>) {
        let flags = record.metadata.kind_flags();
        if flags.is_empty() {
            findings.push(Finding::error(
                &record.file_name,
                "missing-rule-type",
                "no rule type flag is set (is_license_text, is_license_notice, \
                 is_license_reference, is_license_tag or is_false_positive)",
            ));
        } else if flags.len() > 1 {
            findings.push(Finding::error(
                &record.file_name,
                "conflicting-rule-type",
                format!("multiple rule type flags are set: {}", flags.join(", ")),
            ));
        }
    }

    fn check_ranges(&self, record: &RuleRecord, findings: &mut Vec<Finding>) {
        if let Some(relevance) = record.metadata.relevance {
            if relevance > 100 {
                findings.push(Finding::error(
                    &record.file_name,
                    "relevance-out-of-range",
                    format!("relevance is {relevance}, expected 0-100"),
                ));
            }
        }
        if let Some(coverage) = record.metadata.minimum_coverage {
            if coverage > 100 {
                findings.push(Finding::error(
                    &record.file_name,
                    "coverage-out-of-range",
                    format!("minimum_coverage is {coverage}, expected 0-100"),
                ));
            }
        }
    }

    fn check_body(&self, record: &RuleRecord, findings: &mut Vec<Finding>) {
        if record.metadata.is_license_text && record.body.trim().is_empty() {
            findings.push(Finding::error(
                &record.file_name,
                "empty-body",
                "is_license_text is set but the body is empty",
            ));
        } else if self.tokenizer.tokens(&record.body).is_empty() {
            // same token definition as the duplicate scan
            findings.push(Finding::error(
                &record.file_name,
                "empty-body",
                "rule body has no matchable tokens",
            ));
        }
    }
}

impl Check for MetadataCheck {
    fn run(&self, dataset: &Dataset) -> Result<Vec<Finding>> {
        let mut findings = Vec::new();
        for record in &dataset.records {
            self.check_expression(record, &mut findings);
            self.check_kind_flags(record, &mut findings);
            self.check_ranges(record, &mut findings);
            self.check_body(record, &mut findings);
        }
        Ok(findings)
    }
}
