//! Configuration loading for loadstat.
//!
//! Supports loading configuration from TOML files, with sensible defaults
//! for all settings.

use anyhow::{Context, Result};
use loadstat_core::MetricAllowList;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration for loadstat.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Settings for the confidence-interval estimator.
    pub stats: StatsConfig,
    /// Settings for metric filtering.
    pub metrics: MetricsConfig,
}

/// Configuration for the confidence-interval estimator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    /// Confidence level for the ratio interval (e.g., 0.75 for 75%
    /// confidence).
    pub confidence_level: f64,
}

/// Configuration for metric filtering.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Metric names to retain during parsing. An empty list selects the
    /// built-in allow-list.
    pub allow_list: Vec<String>,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            confidence_level: 0.75,
        }
    }
}

/// Default configuration file name.
const DEFAULT_CONFIG_FILE: &str = ".loadstat.toml";

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Config> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load configuration from the default file (`.loadstat.toml`) or use
    /// defaults when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be
    /// parsed.
    pub fn load_or_default() -> Result<Config> {
        let path = Path::new(DEFAULT_CONFIG_FILE);

        if path.exists() {
            Self::load(path)
        } else {
            Ok(Config::default())
        }
    }

    /// Load configuration from the specified path, or try the default
    /// location.
    ///
    /// # Errors
    ///
    /// Returns an error if the specified file cannot be read or parsed.
    pub fn load_from(path: Option<&Path>) -> Result<Config> {
        match path {
            Some(p) => Self::load(p),
            None => Self::load_or_default(),
        }
    }

    /// Check that the configuration (including any CLI overrides) is
    /// usable before handing values to the estimator.
    ///
    /// # Errors
    ///
    /// Returns an error if the confidence level is outside (0, 1).
    pub fn validate(&self) -> Result<()> {
        let level = self.stats.confidence_level;
        anyhow::ensure!(
            level > 0.0 && level < 1.0,
            "confidence_level must be between 0 and 1 (exclusive), got {level}"
        );
        Ok(())
    }

    /// The effective metric allow-list: the configured names, or the
    /// built-in default when none are configured.
    pub fn allow_list(&self) -> MetricAllowList {
        if self.metrics.allow_list.is_empty() {
            MetricAllowList::default()
        } else {
            self.metrics.allow_list.iter().cloned().collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.stats.confidence_level, 0.75);
        assert!(config.metrics.allow_list.is_empty());
        assert!(config.allow_list().contains("speed-index"));
    }

    #[test]
    fn test_load_partial_config() {
        let toml_content = r#"
[stats]
confidence_level = 0.9
"#;

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(toml_content.as_bytes()).unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.stats.confidence_level, 0.9);
        // Default allow-list remains in effect.
        assert!(config.allow_list().contains("time-to-first-byte"));
    }

    #[test]
    fn test_load_full_config() {
        let toml_content = r#"
[stats]
confidence_level = 0.95

[metrics]
allow_list = ["speed-index", "custom-audit"]
"#;

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(toml_content.as_bytes()).unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.stats.confidence_level, 0.95);
        let allow = config.allow_list();
        assert!(allow.contains("custom-audit"));
        assert!(!allow.contains("time-to-first-byte"));
    }

    #[test]
    fn test_validate_rejects_out_of_range_confidence_level() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.stats.confidence_level = 1.5;
        assert!(config.validate().is_err());

        config.stats.confidence_level = 0.0;
        assert!(config.validate().is_err());

        config.stats.confidence_level = 1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = Config::load(Path::new("/nonexistent/path/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_invalid_toml() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"this is not valid toml {{{{").unwrap();

        let result = Config::load(file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(
            config.stats.confidence_level,
            parsed.stats.confidence_level
        );
        assert_eq!(config.metrics.allow_list, parsed.metrics.allow_list);
    }
}
