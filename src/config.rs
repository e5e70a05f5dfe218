//! Aggregator configuration: load from YAML, then apply environment overrides.
//!
//! Source toggles are read once here and handed to
//! [`crate::sources::wiring`]; nothing in the search path consults global
//! state afterwards.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable naming the configuration file.
pub const CONFIG_PATH_ENV: &str = "JOB_AGGREGATOR_CONFIG";
/// Used when [`CONFIG_PATH_ENV`] is unset. A missing file here means defaults.
pub const DEFAULT_CONFIG_PATH: &str = "config/aggregator.yaml";

pub const EXTERNAL_URL_ENV: &str = "EXTERNAL_JOB_API_URL";
pub const INTERNAL_ENABLED_ENV: &str = "SOURCES_INTERNAL_ENABLED";
pub const EXTERNAL_ENABLED_ENV: &str = "SOURCES_EXTERNAL_ENABLED";

// ---------------------------------------------------------------------------
// AppConfig
// ---------------------------------------------------------------------------

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub sources: SourcesConfig,
    pub aggregator: AggregatorConfig,
}

/// Per-source enablement and settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    pub internal: InternalSourceConfig,
    pub external: ExternalSourceConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InternalSourceConfig {
    pub enabled: bool,
}

impl Default for InternalSourceConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExternalSourceConfig {
    pub enabled: bool,
    pub base_url: String,
    pub connect_timeout_ms: u64,
    pub read_timeout_ms: u64,
}

impl Default for ExternalSourceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "http://localhost:8081".to_string(),
            connect_timeout_ms: 2000,
            read_timeout_ms: 3000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregatorConfig {
    /// Upper bound on one source's probe plus search.
    pub source_timeout_ms: u64,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            source_timeout_ms: 5000,
        }
    }
}

impl AggregatorConfig {
    pub fn source_timeout(&self) -> Duration {
        Duration::from_millis(self.source_timeout_ms)
    }
}

impl AppConfig {
    /// Load from a YAML file. Missing keys take their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).with_context(|| format!("Reading {}", path.display()))?;
        Self::from_yaml(&content).with_context(|| format!("Parsing {}", path.display()))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Resolve the configuration file from the environment, then apply
    /// environment overrides.
    pub fn load() -> Result<Self> {
        let explicit = std::env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from);
        let mut config = Self::load_from(explicit.as_deref())?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Load `path` if given (it must exist), otherwise the default path if
    /// present, otherwise defaults.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_PATH);
                if default_path.exists() {
                    Self::from_file(default_path)
                } else {
                    tracing::debug!(path = DEFAULT_CONFIG_PATH, "No config file, using defaults");
                    Ok(Self::default())
                }
            }
        }
    }

    /// Apply overrides using `lookup` to read variables.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(EXTERNAL_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.sources.external.base_url = url.trim().to_string();
        }
        if let Some(value) = lookup(INTERNAL_ENABLED_ENV) {
            self.sources.internal.enabled = parse_flag(INTERNAL_ENABLED_ENV, &value)?;
        }
        if let Some(value) = lookup(EXTERNAL_ENABLED_ENV) {
            self.sources.external.enabled = parse_flag(EXTERNAL_ENABLED_ENV, &value)?;
        }
        Ok(())
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => bail!("{key} must be a boolean, got '{other}'"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert!(config.sources.internal.enabled);
        assert!(config.sources.external.enabled);
        assert_eq!(config.sources.external.base_url, "http://localhost:8081");
        assert_eq!(config.sources.external.connect_timeout_ms, 2000);
        assert_eq!(config.sources.external.read_timeout_ms, 3000);
        assert_eq!(config.aggregator.source_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let config = AppConfig::from_yaml(
            r#"
sources:
  external:
    enabled: false
    base_url: "https://jobs.example"
"#,
        )
        .unwrap();
        assert!(config.sources.internal.enabled);
        assert!(!config.sources.external.enabled);
        assert_eq!(config.sources.external.base_url, "https://jobs.example");
        assert_eq!(config.sources.external.read_timeout_ms, 3000);
        assert_eq!(config.aggregator.source_timeout_ms, 5000);

        assert_eq!(AppConfig::from_yaml("").unwrap(), AppConfig::default());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "sources:\n  internal:\n    enabled: false\naggregator:\n  source_timeout_ms: 250"
        )
        .unwrap();

        let config = AppConfig::load_from(Some(file.path())).unwrap();
        assert!(!config.sources.internal.enabled);
        assert_eq!(config.aggregator.source_timeout(), Duration::from_millis(250));
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.yaml");
        let err = AppConfig::load_from(Some(&missing)).unwrap_err();
        assert!(err.to_string().contains("absent.yaml"));
    }

    #[test]
    fn test_invalid_yaml_reports_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "sources: [not, a, map").unwrap();
        let err = AppConfig::from_file(file.path()).unwrap_err();
        assert!(err.to_string().starts_with("Parsing"));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AppConfig::default();
        config
            .apply_overrides(env(&[
                (EXTERNAL_URL_ENV, " http://provider:9000 "),
                (INTERNAL_ENABLED_ENV, "false"),
                (EXTERNAL_ENABLED_ENV, "TRUE"),
            ]))
            .unwrap();
        assert_eq!(config.sources.external.base_url, "http://provider:9000");
        assert!(!config.sources.internal.enabled);
        assert!(config.sources.external.enabled);
    }

    #[test]
    fn test_blank_url_override_is_ignored_and_bad_flag_rejected() {
        let mut config = AppConfig::default();
        config.apply_overrides(env(&[(EXTERNAL_URL_ENV, "  ")])).unwrap();
        assert_eq!(config.sources.external.base_url, "http://localhost:8081");

        let err = config
            .apply_overrides(env(&[(EXTERNAL_ENABLED_ENV, "maybe")]))
            .unwrap_err();
        assert!(err.to_string().contains(EXTERNAL_ENABLED_ENV));
    }
}
