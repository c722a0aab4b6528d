//! On-disk record shape: a `---` delimited YAML front matter block followed
//! by the raw rule text.
//!
//! ```text
//! ---
//! license_expression: mit
//! is_license_text: yes
//! ---
//!
//! Permission is hereby granted, free of charge, ...
//! ```
//!
//! Parsing and [`serialize`] are exact inverses: the body round-trips
//! byte-for-byte, with one conventional blank line separating it from the
//! closing delimiter.

use anyhow::{bail, ensure, Context, Result};

use crate::models::RuleMetadata;

/// Split a record file into metadata and body.
///
/// The body is everything after the closing `---` line, minus one leading
/// blank line when present (the canonical separator).
pub fn parse(content: &str) -> Result<(RuleMetadata, String)> {
    let rest = content
        .strip_prefix("---\n")
        .context("missing opening front matter delimiter")?;

    let (yaml, raw_body) = if let Some(stripped) = rest.strip_prefix("---\n") {
        ("", stripped)
    } else if rest == "---" {
        ("", "")
    } else if let Some(idx) = rest.find("\n---\n") {
        (&rest[..idx + 1], &rest[idx + 5..])
    } else if let Some(yaml) = rest.strip_suffix("\n---") {
        (yaml, "")
    } else {
        bail!("missing closing front matter delimiter");
    };

    ensure!(!yaml.trim().is_empty(), "empty front matter block");

    let metadata: RuleMetadata = serde_yaml::from_str(yaml).context("invalid front matter")?;
    let body = raw_body.strip_prefix('\n').unwrap_or(raw_body).to_string();
    Ok((metadata, body))
}

/// Serialize a record in canonical form: front matter in fixed field order,
/// one blank line, then the body verbatim.
pub fn serialize(metadata: &RuleMetadata, body: &str) -> Result<String> {
    let yaml = serde_yaml::to_string(metadata).context("failed to serialize front matter")?;
    let mut out = String::with_capacity(yaml.len() + body.len() + 16);
    out.push_str("---\n");
    out.push_str(&yaml);
    out.push_str("---\n");
    if !body.is_empty() {
        out.push('\n');
        out.push_str(body);
    }
    Ok(out)
}
