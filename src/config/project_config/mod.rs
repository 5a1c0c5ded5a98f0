//! Project-level configuration support
//!
//! Loads configuration from `nidguard.toml` or `.nidguardrc.json` in the
//! working directory, falling back to the user config at
//! `<config_dir>/nidguard/config.toml`.
//!
//! # Configuration Format
//!
//! ```toml
//! # nidguard.toml
//!
//! [scoring]
//! format_failure_score = 0.9
//! weights = { format = 0.4, checksum = 0.3, distribution = 0.3 }
//! thresholds = { high = 0.6, medium = 0.3 }
//!
//! [defaults]
//! format = "text"
//! fail_on = "high"
//! no_emoji = false
//! ```

use crate::models::RiskLevel;
use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const PROJECT_CONFIG_TOML: &str = "nidguard.toml";
pub const PROJECT_CONFIG_JSON: &str = ".nidguardrc.json";

/// Configuration loaded from nidguard.toml or similar
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ProjectConfig {
    /// Scoring configuration
    #[serde(default)]
    pub scoring: ScoringConfig,

    /// Default CLI flags
    #[serde(default)]
    pub defaults: CliDefaults,
}

/// Weights, thresholds and fixed scores used by the aggregator
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScoringConfig {
    /// Score reported when the format check fails (default: 0.9)
    #[serde(default = "default_format_failure_score")]
    pub format_failure_score: f64,

    /// Weight per analyzer (should sum to 1.0)
    #[serde(default)]
    pub weights: AnalyzerWeights,

    /// Classification thresholds (strict `>` comparisons)
    #[serde(default)]
    pub thresholds: RiskThresholds,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            format_failure_score: default_format_failure_score(),
            weights: AnalyzerWeights::default(),
            thresholds: RiskThresholds::default(),
        }
    }
}

fn default_format_failure_score() -> f64 {
    0.9
}

/// Weights for the three analyzers
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct AnalyzerWeights {
    /// Weight for the format analyzer (default: 0.4)
    #[serde(default = "default_format_weight")]
    pub format: f64,

    /// Weight for the checksum analyzer (default: 0.3)
    #[serde(default = "default_checksum_weight")]
    pub checksum: f64,

    /// Weight for the distribution analyzer (default: 0.3)
    #[serde(default = "default_distribution_weight")]
    pub distribution: f64,
}

impl Default for AnalyzerWeights {
    fn default() -> Self {
        Self {
            format: default_format_weight(),
            checksum: default_checksum_weight(),
            distribution: default_distribution_weight(),
        }
    }
}

fn default_format_weight() -> f64 {
    0.4
}
fn default_checksum_weight() -> f64 {
    0.3
}
fn default_distribution_weight() -> f64 {
    0.3
}

impl AnalyzerWeights {
    pub fn total(&self) -> f64 {
        self.format + self.checksum + self.distribution
    }

    /// Every weight is finite and non-negative
    pub fn is_well_formed(&self) -> bool {
        [self.format, self.checksum, self.distribution]
            .iter()
            .all(|w| w.is_finite() && *w >= 0.0)
    }

    /// Validate that weights sum to 1.0 (with tolerance)
    pub fn is_valid(&self) -> bool {
        (self.total() - 1.0).abs() < 0.001
    }

    /// Normalize weights to sum to 1.0
    pub fn normalize(&mut self) {
        let sum = self.total();
        if sum > 0.0 {
            self.format /= sum;
            self.checksum /= sum;
            self.distribution /= sum;
        }
    }
}

/// Score boundaries between risk levels
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct RiskThresholds {
    /// Scores strictly above this are HIGH (default: 0.6)
    #[serde(default = "default_high_threshold")]
    pub high: f64,

    /// Scores strictly above this are MEDIUM (default: 0.3)
    #[serde(default = "default_medium_threshold")]
    pub medium: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            high: default_high_threshold(),
            medium: default_medium_threshold(),
        }
    }
}

fn default_high_threshold() -> f64 {
    0.6
}
fn default_medium_threshold() -> f64 {
    0.3
}

impl RiskThresholds {
    pub fn is_valid(&self) -> bool {
        self.medium.is_finite() && self.high.is_finite() && self.medium < self.high
    }

    /// Classify a normalized score
    pub fn classify(&self, score: f64) -> RiskLevel {
        if score > self.high {
            RiskLevel::High
        } else if score > self.medium {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

impl ScoringConfig {
    /// Repair inconsistent values, logging what was changed.
    ///
    /// A zero weight sum is left alone: evaluations then fail closed with
    /// an ERROR verdict.
    pub fn sanitize(&mut self) {
        if !self.weights.is_well_formed() {
            warn!(
                "Analyzer weights must be finite and non-negative (got {:?}), using defaults",
                self.weights
            );
            self.weights = AnalyzerWeights::default();
        }
        if !self.weights.is_valid() && self.weights.total() > 0.0 {
            warn!(
                "Analyzer weights sum to {:.3}, normalizing to 1.0",
                self.weights.total()
            );
            self.weights.normalize();
        }
        if !self.thresholds.is_valid() {
            warn!(
                "Invalid risk thresholds (medium={}, high={}), using defaults",
                self.thresholds.medium, self.thresholds.high
            );
            self.thresholds = RiskThresholds::default();
        }
        if !(0.0..=1.0).contains(&self.format_failure_score) {
            warn!(
                "format_failure_score {} outside [0, 1], using default",
                self.format_failure_score
            );
            self.format_failure_score = default_format_failure_score();
        }
    }
}

/// Default CLI flags
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CliDefaults {
    /// Default output format (text, json)
    #[serde(default)]
    pub format: Option<String>,

    /// Default --fail-on level
    #[serde(default)]
    pub fail_on: Option<String>,

    /// Disable emoji by default
    #[serde(default)]
    pub no_emoji: Option<bool>,
}

/// User-level config path (`~/.config/nidguard/config.toml` on Linux)
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("nidguard").join("config.toml"))
}

/// Load configuration from an explicit file. Errors are returned, not
/// swallowed: the user asked for this file.
pub fn load_config_file(path: &Path) -> anyhow::Result<ProjectConfig> {
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    let mut config = if is_json {
        load_json_config(path)
    } else {
        load_toml_config(path)
    }
    .with_context(|| format!("Failed to load config {}", path.display()))?;
    config.scoring.sanitize();
    Ok(config)
}

/// Discover and load configuration for `dir`, falling back to defaults
pub fn load_project_config(dir: &Path) -> ProjectConfig {
    let mut config = discover(dir);
    config.scoring.sanitize();
    config
}

fn discover(dir: &Path) -> ProjectConfig {
    // Try TOML first (preferred format)
    let toml_path = dir.join(PROJECT_CONFIG_TOML);
    if toml_path.exists() {
        match load_toml_config(&toml_path) {
            Ok(config) => {
                debug!("Loaded project config from {}", toml_path.display());
                return config;
            }
            Err(e) => {
                warn!("Failed to load {}: {}", toml_path.display(), e);
            }
        }
    }

    // Try JSON
    let json_path = dir.join(PROJECT_CONFIG_JSON);
    if json_path.exists() {
        match load_json_config(&json_path) {
            Ok(config) => {
                debug!("Loaded project config from {}", json_path.display());
                return config;
            }
            Err(e) => {
                warn!("Failed to load {}: {}", json_path.display(), e);
            }
        }
    }

    // User-level config
    if let Some(user_path) = user_config_path().filter(|p| p.exists()) {
        match load_toml_config(&user_path) {
            Ok(config) => {
                debug!("Loaded user config from {}", user_path.display());
                return config;
            }
            Err(e) => {
                warn!("Failed to load {}: {}", user_path.display(), e);
            }
        }
    }

    debug!("No config found, using defaults");
    ProjectConfig::default()
}

/// Load configuration from a TOML file
fn load_toml_config(path: &Path) -> anyhow::Result<ProjectConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: ProjectConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Load configuration from a JSON file
fn load_json_config(path: &Path) -> anyhow::Result<ProjectConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: ProjectConfig = serde_json::from_str(&content)?;
    Ok(config)
}

/// Example config written by `nidguard init`
pub const EXAMPLE_CONFIG: &str = r#"# nidguard configuration

[scoring]
# Score reported when the identifier fails the length/charset check
format_failure_score = 0.9

# Analyzer weights (normalized if they do not sum to 1.0)
[scoring.weights]
format = 0.4
checksum = 0.3
distribution = 0.3

# Scores strictly above `high` are HIGH, strictly above `medium` are MEDIUM
[scoring.thresholds]
high = 0.6
medium = 0.3

[defaults]
# format = "text"     # text or json
# fail_on = "high"    # medium, high or error
# no_emoji = false
"#;

#[cfg(test)]
mod tests;
