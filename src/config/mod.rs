//! Configuration module for nidguard
//!
//! This module handles:
//! - Project-level configuration (nidguard.toml, .nidguardrc.json)
//! - User-level fallback configuration
//! - Scoring weights and thresholds
//! - CLI defaults

mod project_config;

pub use project_config::{
    load_config_file, load_project_config, user_config_path, AnalyzerWeights, CliDefaults,
    ProjectConfig, RiskThresholds, ScoringConfig, EXAMPLE_CONFIG, PROJECT_CONFIG_JSON,
    PROJECT_CONFIG_TOML,
};
