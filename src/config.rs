//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.seoscope.toml` files.

use crate::analysis::{AnalysisOptions, ScoreWeights, DEFAULT_MAX_URLS};
use crate::cli::GroupSeverityArg;
use crate::models::GroupSeverityPolicy;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".seoscope.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Health score settings.
    #[serde(default)]
    pub scoring: ScoringConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default output file path.
    #[serde(default = "default_output")]
    pub output: String,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            verbose: false,
        }
    }
}

impl GeneralConfig {
    /// Log level for a run. `--quiet` beats a configured `verbose`.
    pub fn log_level(&self, quiet: bool) -> tracing::Level {
        if quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

fn default_output() -> String {
    "seoscope_report.md".to_string()
}

/// Health score and grouping settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Points deducted per issue of each severity.
    #[serde(flatten)]
    pub weights: ScoreWeights,

    /// How a group's severity is chosen when its members disagree.
    #[serde(default)]
    pub group_severity: GroupSeverityPolicy,
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Affected URLs listed per recommendation group.
    #[serde(default = "default_max_affected_urls")]
    pub max_affected_urls: usize,

    /// Recommendation groups shown per severity bucket.
    #[serde(default = "default_top_per_severity")]
    pub top_per_severity: usize,

    /// List sample affected URLs under each recommendation.
    #[serde(default = "default_true")]
    pub include_affected_urls: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            max_affected_urls: default_max_affected_urls(),
            top_per_severity: default_top_per_severity(),
            include_affected_urls: true,
        }
    }
}

fn default_max_affected_urls() -> usize {
    DEFAULT_MAX_URLS
}

fn default_top_per_severity() -> usize {
    5
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from a directory.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Pick the configuration for a run: the explicit path if given, else
    /// `.seoscope.toml` in `dir`, else defaults. A config file that exists
    /// but is invalid is always an error.
    pub fn resolve(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => Ok(Self::load_from_dir(dir)?.unwrap_or_default()),
        }
    }

    /// Check values that serde alone cannot.
    pub fn validate(&self) -> crate::error::Result<()> {
        self.scoring.weights.validate()
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(max_urls) = args.max_urls {
            self.report.max_affected_urls = max_urls;
        }
        if let Some(top) = args.top {
            self.report.top_per_severity = top;
        }
        if let Some(policy) = args.group_severity {
            self.scoring.group_severity = match policy {
                GroupSeverityArg::FirstSeen => GroupSeverityPolicy::FirstSeen,
                GroupSeverityArg::Highest => GroupSeverityPolicy::Highest,
            };
        }

        // Flags always override
        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Engine options derived from this configuration.
    pub fn analysis_options(&self) -> AnalysisOptions {
        AnalysisOptions {
            weights: self.scoring.weights,
            group_severity: self.scoring.group_severity,
            max_urls: self.report.max_affected_urls,
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.general.output, "seoscope_report.md");
        assert_eq!(config.scoring.weights, ScoreWeights::default());
        assert_eq!(config.scoring.group_severity, GroupSeverityPolicy::FirstSeen);
        assert_eq!(config.report.max_affected_urls, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[general]
output = "crawl.md"
verbose = true

[scoring]
high_weight = 8.0
group_severity = "highest"

[report]
max_affected_urls = 10
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.general.output, "crawl.md");
        assert!(config.general.verbose);
        assert_eq!(config.scoring.weights.high_weight, 8.0);
        assert_eq!(config.scoring.weights.medium_weight, 2.0);
        assert_eq!(config.scoring.weights.low_weight, 0.5);
        assert_eq!(config.scoring.group_severity, GroupSeverityPolicy::Highest);
        assert_eq!(config.report.max_affected_urls, 10);
        assert_eq!(config.report.top_per_severity, 5);

        let options = config.analysis_options();
        assert_eq!(options.max_urls, 10);
        assert_eq!(options.group_severity, GroupSeverityPolicy::Highest);
    }

    #[test]
    fn test_load_rejects_negative_weight() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[scoring]\nlow_weight = -0.5\n").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("low_weight"));
    }

    #[test]
    fn test_resolve_invalid_default_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[scoring]\nlow_weight = -0.5\nhigh_weight = 20.0\n",
        )
        .unwrap();

        let err = Config::resolve(None, dir.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("low_weight"));
    }

    #[test]
    fn test_resolve_uses_file_in_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[scoring]\nhigh_weight = 20.0\n",
        )
        .unwrap();

        let config = Config::resolve(None, dir.path()).unwrap();
        assert_eq!(config.scoring.weights.high_weight, 20.0);
    }

    #[test]
    fn test_resolve_defaults_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::resolve(None, dir.path()).unwrap();
        assert_eq!(config.scoring.weights, ScoreWeights::default());

        let missing = dir.path().join("missing.toml");
        assert!(Config::resolve(Some(&missing), dir.path()).is_err());
    }

    #[test]
    fn test_log_level_follows_config_verbose() {
        let mut general = GeneralConfig::default();
        assert_eq!(general.log_level(false), tracing::Level::INFO);

        general.verbose = true;
        assert_eq!(general.log_level(false), tracing::Level::DEBUG);
        assert_eq!(general.log_level(true), tracing::Level::ERROR);

        let config: Config = toml::from_str("[general]\nverbose = true\n").unwrap();
        assert_eq!(config.general.log_level(false), tracing::Level::DEBUG);
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(!toml_str.is_empty());
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[scoring]"));
        assert!(toml_str.contains("[report]"));
        assert!(toml_str.contains("high_weight = 5.0"));

        let round: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(round.scoring.weights, ScoreWeights::default());
    }
}
