use std::path::Path;

use serde::{Deserialize, Serialize};

/// A single license rule record: front matter metadata plus the raw rule text.
#[derive(Debug, Clone)]
pub struct RuleRecord {
    /// File name inside the dataset directory (e.g. `mit_231.RULE`).
    pub file_name: String,
    pub metadata: RuleMetadata,
    /// Raw rule text, preserved byte-for-byte by every operation.
    pub body: String,
}

/// The YAML front matter block of a rule record.
///
/// Field order here is the canonical serialization order. Unset flags and
/// empty lists are omitted on disk; set flags are written as `yes`, the
/// spelling the corpus has always used.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleMetadata {
    /// License expression this rule detects (lowercase keys joined by
    /// `AND` / `OR` / `WITH`).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub license_expression: String,

    /// The body is the full, verbatim license text.
    #[serde(default, skip_serializing_if = "is_false", deserialize_with = "yaml_flag", serialize_with = "yaml_yes")]
    pub is_license_text: bool,

    /// The body is a license notice (a short statement naming the license).
    #[serde(default, skip_serializing_if = "is_false", deserialize_with = "yaml_flag", serialize_with = "yaml_yes")]
    pub is_license_notice: bool,

    /// The body merely refers to a license (e.g. "see LICENSE file").
    #[serde(default, skip_serializing_if = "is_false", deserialize_with = "yaml_flag", serialize_with = "yaml_yes")]
    pub is_license_reference: bool,

    /// The body is a structured tag (e.g. an SPDX-License-Identifier line).
    #[serde(default, skip_serializing_if = "is_false", deserialize_with = "yaml_flag", serialize_with = "yaml_yes")]
    pub is_license_tag: bool,

    /// The body looks like a license mention but must never be reported as one.
    #[serde(default, skip_serializing_if = "is_false", deserialize_with = "yaml_flag", serialize_with = "yaml_yes")]
    pub is_false_positive: bool,

    /// Confidence carried by a match of this rule, 0-100.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relevance: Option<u8>,

    /// Fraction of the rule that must be present for a match to count, 0-100.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_coverage: Option<u8>,

    /// Filenames the rule cross-references, in significance order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub referenced_filenames: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// Copyright statements inside the body that a scanner should not report
    /// as project copyrights.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignorable_copyrights: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignorable_holders: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignorable_urls: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignorable_emails: Vec<String>,
}

impl RuleMetadata {
    /// Names of the rule kind flags that are set.
    pub fn kind_flags(&self) -> Vec<&'static str> {
        let mut kinds = Vec::new();
        if self.is_license_text {
            kinds.push("is_license_text");
        }
        if self.is_license_notice {
            kinds.push("is_license_notice");
        }
        if self.is_license_reference {
            kinds.push("is_license_reference");
        }
        if self.is_license_tag {
            kinds.push("is_license_tag");
        }
        if self.is_false_positive {
            kinds.push("is_false_positive");
        }
        kinds
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// One violated integrity property.
#[derive(Debug, Clone, Serialize)]
pub struct Finding {
    /// File name of the offending record.
    pub file: String,
    /// Stable kebab-case check id, used for severity overrides.
    pub check: &'static str,
    pub severity: Severity,
    pub message: String,
}

impl Finding {
    pub fn error(file: &str, check: &'static str, message: impl Into<String>) -> Self {
        Finding {
            file: file.to_string(),
            check,
            severity: Severity::Error,
            message: message.into(),
        }
    }

    pub fn warning(file: &str, check: &'static str, message: impl Into<String>) -> Self {
        Finding {
            file: file.to_string(),
            check,
            severity: Severity::Warning,
            message: message.into(),
        }
    }
}

/// Serializable result of a `check` run, printed as JSON with `--report json`.
#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub dataset: String,
    pub records: usize,
    pub errors: usize,
    pub warnings: usize,
    pub findings: Vec<Finding>,
}

impl CheckReport {
    pub fn new(dataset: &Path, records: usize, findings: Vec<Finding>) -> Self {
        let errors = findings.iter().filter(|f| f.severity == Severity::Error).count();
        let warnings = findings.len() - errors;
        CheckReport {
            dataset: dataset.display().to_string(),
            records,
            errors,
            warnings,
            findings,
        }
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Deserialize a rule kind flag, accepting both YAML booleans and the
/// `yes`/`no` spelling the corpus historically used.
fn yaml_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    struct FlagVisitor;

    impl serde::de::Visitor<'_> for FlagVisitor {
        type Value = bool;

        fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("a boolean or yes/no")
        }

        fn visit_bool<E>(self, value: bool) -> Result<bool, E>
        where
            E: serde::de::Error,
        {
            Ok(value)
        }

        fn visit_str<E>(self, value: &str) -> Result<bool, E>
        where
            E: serde::de::Error,
        {
            match value {
                "yes" | "true" => Ok(true),
                "no" | "false" => Ok(false),
                other => Err(E::invalid_value(serde::de::Unexpected::Str(other), &self)),
            }
        }
    }

    deserializer.deserialize_any(FlagVisitor)
}

/// Serialize a set flag as `yes`; unset flags are skipped entirely.
fn yaml_yes<S>(value: &bool, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    debug_assert!(*value);
    serializer.serialize_str("yes")
}
