use std::collections::HashMap;
use std::path::Path;

use anyhow::Result;
use serde::Deserialize;

use crate::models::{Finding, Severity};

/// Root configuration structure, deserialized from `.rule-checkr/config.toml`.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Per-check severity overrides keyed by check id (e.g. `"contained-rule"`).
    #[serde(default)]
    pub checks: HashMap<String, SeverityAction>,
}

/// The action to take for findings of a given check.
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "lowercase")]
pub enum SeverityAction {
    /// Findings of this check are dropped from the report.
    Allow,
    /// Findings are reported but do not fail the run.
    Warn,
    /// Findings fail the run; the CLI exits with code 1.
    Error,
}

impl SeverityAction {
    /// Convert to the corresponding [`Severity`], `None` meaning suppressed.
    pub fn to_severity(&self) -> Option<Severity> {
        match self {
            SeverityAction::Allow => None,
            SeverityAction::Warn => Some(Severity::Warning),
            SeverityAction::Error => Some(Severity::Error),
        }
    }
}

/// Load the check configuration, searching in order:
///
/// 1. `config_override` — path passed via `--config`
/// 2. `<dataset_path>/.rule-checkr/config.toml`
/// 3. `~/.config/rule-checkr/config.toml`
/// 4. Built-in [`Config::default`] (every check keeps its built-in severity)
pub fn load_config(dataset_path: &Path, config_override: Option<&Path>) -> Result<Config> {
    if let Some(path) = config_override {
        let content = std::fs::read_to_string(path)?;
        return Ok(toml::from_str(&content)?);
    }

    let dataset_config = dataset_path.join(".rule-checkr").join("config.toml");
    if dataset_config.exists() {
        let content = std::fs::read_to_string(&dataset_config)?;
        return Ok(toml::from_str(&content)?);
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home
            .join(".config")
            .join("rule-checkr")
            .join("config.toml");
        if home_config.exists() {
            let content = std::fs::read_to_string(&home_config)?;
            return Ok(toml::from_str(&content)?);
        }
    }

    Ok(Config::default())
}

/// Apply the configured severity overrides to a list of findings.
///
/// A check mapped to `allow` has its findings dropped, `warn` and `error`
/// replace the built-in severity, and unlisted checks keep theirs.
pub fn apply_policy(config: &Config, findings: Vec<Finding>) -> Vec<Finding> {
    findings
        .into_iter()
        .filter_map(|mut finding| match config.checks.get(finding.check) {
            Some(action) => action.to_severity().map(|severity| {
                finding.severity = severity;
                finding
            }),
            None => Some(finding),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn findings() -> Vec<Finding> {
        vec![
            Finding::warning("mit_1.RULE", "contained-rule", "entire rule appears inside mit_2.RULE"),
            Finding::error("gpl_1.RULE", "empty-expression", "license_expression is empty"),
        ]
    }

    #[test]
    fn test_parse_config() {
        let config: Config = toml::from_str(
            r#"
            [checks]
            contained-rule = "allow"
            duplicate-ignorable = "error"
            "#,
        )
        .unwrap();
        assert!(matches!(
            config.checks.get("contained-rule"),
            Some(SeverityAction::Allow)
        ));
        assert!(matches!(
            config.checks.get("duplicate-ignorable"),
            Some(SeverityAction::Error)
        ));
    }

    #[test]
    fn test_empty_config_has_no_overrides() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.checks.is_empty());
    }

    #[test]
    fn test_allow_suppresses_findings() {
        let mut config = Config::default();
        config
            .checks
            .insert("contained-rule".to_string(), SeverityAction::Allow);

        let kept = apply_policy(&config, findings());
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].check, "empty-expression");
    }

    #[test]
    fn test_override_raises_severity() {
        let mut config = Config::default();
        config
            .checks
            .insert("contained-rule".to_string(), SeverityAction::Error);

        let kept = apply_policy(&config, findings());
        assert_eq!(kept[0].severity, Severity::Error);
        assert_eq!(kept[1].severity, Severity::Error);
    }

    #[test]
    fn test_unlisted_check_keeps_builtin_severity() {
        let kept = apply_policy(&Config::default(), findings());
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].severity, Severity::Warning);
        assert_eq!(kept[1].severity, Severity::Error);
    }

    #[test]
    fn test_load_config_home_fallback() {
        // point `dirs::home_dir` at an empty home so the developer's real
        // ~/.config/rule-checkr/config.toml cannot leak into the assertions
        let home = tempfile::tempdir().unwrap();
        std::env::set_var("HOME", home.path());
        let dataset = tempfile::tempdir().unwrap();

        let config = load_config(dataset.path(), None).unwrap();
        assert!(config.checks.is_empty());

        let config_dir = home.path().join(".config").join("rule-checkr");
        std::fs::create_dir_all(&config_dir).unwrap();
        std::fs::write(
            config_dir.join("config.toml"),
            "[checks]\ncontained-rule = \"error\"\n",
        )
        .unwrap();

        let config = load_config(dataset.path(), None).unwrap();
        assert!(matches!(
            config.checks.get("contained-rule"),
            Some(SeverityAction::Error)
        ));
    }

    #[test]
    fn test_load_config_from_dataset_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config_dir = dir.path().join(".rule-checkr");
        std::fs::create_dir_all(&config_dir).unwrap();
        std::fs::write(
            config_dir.join("config.toml"),
            "[checks]\ncontained-rule = \"allow\"\n",
        )
        .unwrap();

        let config = load_config(dir.path(), None).unwrap();
        assert!(matches!(
            config.checks.get("contained-rule"),
            Some(SeverityAction::Allow)
        ));
    }

    #[test]
    fn test_load_config_override_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[checks]\nunknown-referenced-filename = \"error\"\n").unwrap();

        let config = load_config(dir.path(), Some(&path)).unwrap();
        assert!(matches!(
            config.checks.get("unknown-referenced-filename"),
            Some(SeverityAction::Error)
        ));
    }
}
