//! Configuration file for astlens.
//!
//! Every setting is optional; a missing file means defaults.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file names searched for in the working directory.
pub const DEFAULT_CONFIG_NAMES: &[&str] = &["astlens.yaml", ".astlens.yaml"];

/// Analyzer URL used when nothing is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

/// Request timeout used when nothing is configured.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Template written by `astlens init`.
pub const TEMPLATE: &str = include_str!("templates/astlens.yaml");

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub analyzer: AnalyzerConfig,
    #[serde(default)]
    pub view: ViewConfig,
}

/// Where and how to reach the analyzer.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
pub struct AnalyzerConfig {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

impl AnalyzerConfig {
    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS))
    }
}

/// Presentation defaults.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
pub struct ViewConfig {
    /// "pretty" (default) or "json"
    #[serde(default)]
    pub format: Option<String>,
    /// Nodes shallower than this start expanded (default: 2)
    #[serde(default)]
    pub expand_depth: Option<usize>,
}

impl ViewConfig {
    pub fn format(&self) -> &str {
        self.format.as_deref().unwrap_or("pretty")
    }

    pub fn expand_depth(&self) -> usize {
        self.expand_depth
            .unwrap_or(crate::tree::DEFAULT_EXPAND_DEPTH)
    }
}

impl Config {
    /// Parse a config from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load the config named on the command line, or the first discovered
    /// one, or defaults. The result is validated.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        let config = match discover(explicit)? {
            Some(path) => {
                log::debug!("loading config from {}", path.display());
                Self::parse_file(&path)
                    .map_err(|e| anyhow::anyhow!("error parsing {}: {}", path.display(), e))?
            }
            None => {
                log::debug!("no config file found, using defaults");
                Config::default()
            }
        };
        validate(&config)?;
        Ok(config)
    }
}

/// Find the config file to use.
///
/// An explicit path must exist. Otherwise the working directory is searched
/// for [`DEFAULT_CONFIG_NAMES`], then the user config directory for
/// `config.yaml`.
pub fn discover(explicit: Option<&Path>) -> anyhow::Result<Option<PathBuf>> {
    if let Some(path) = explicit {
        if !path.exists() {
            anyhow::bail!("config file not found: {}", path.display());
        }
        return Ok(Some(path.to_path_buf()));
    }

    for name in DEFAULT_CONFIG_NAMES {
        let path = PathBuf::from(name);
        if path.exists() {
            return Ok(Some(path));
        }
    }

    Ok(user_config_path().filter(|p| p.exists()))
}

/// `config.yaml` in the platform config directory.
pub fn user_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "astlens").map(|dirs| dirs.config_dir().join("config.yaml"))
}

/// Check a config for values that cannot work.
pub fn validate(config: &Config) -> anyhow::Result<()> {
    let base_url = config.analyzer.base_url();
    if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
        anyhow::bail!(
            "invalid analyzer.base_url {:?}, must start with http:// or https://",
            base_url
        );
    }

    if config.analyzer.timeout_ms == Some(0) {
        anyhow::bail!("analyzer.timeout_ms must be greater than zero");
    }

    let format = config.view.format();
    if format != "pretty" && format != "json" {
        anyhow::bail!("invalid view.format {:?}, must be 'pretty' or 'json'", format);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_config() {
        let yaml = r#"
analyzer:
  base_url: "http://analyzer.internal:9000/api/"
  timeout_ms: 2500
view:
  format: json
  expand_depth: 3
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.analyzer.base_url(), "http://analyzer.internal:9000/api");
        assert_eq!(config.analyzer.timeout(), Duration::from_millis(2500));
        assert_eq!(config.view.format(), "json");
        assert_eq!(config.view.expand_depth(), 3);
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_defaults() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.analyzer.base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.analyzer.timeout(), Duration::from_millis(DEFAULT_TIMEOUT_MS));
        assert_eq!(config.view.format(), "pretty");
        assert_eq!(config.view.expand_depth(), 2);
    }

    #[test]
    fn test_template_parses_and_validates() {
        let config: Config = serde_yaml::from_str(TEMPLATE).unwrap();
        assert!(validate(&config).is_ok());
        assert_eq!(config.analyzer.base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.analyzer.base_url = Some("localhost:8080".to_string());
        assert!(validate(&config).is_err());

        let mut config = Config::default();
        config.analyzer.timeout_ms = Some(0);
        assert!(validate(&config).is_err());

        let mut config = Config::default();
        config.view.format = Some("sarif".to_string());
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_load_explicit_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("custom.yaml");
        std::fs::write(&path, "analyzer:\n  timeout_ms: 500\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.analyzer.timeout_ms, Some(500));
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope.yaml");
        assert!(Config::load(Some(&missing)).is_err());
    }

    #[test]
    fn test_load_invalid_file_fails() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bad.yaml");
        std::fs::write(&path, "view:\n  format: xml\n").unwrap();
        assert!(Config::load(Some(&path)).is_err());
    }
}
