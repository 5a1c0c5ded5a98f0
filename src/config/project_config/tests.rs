use super::*;

#[test]
fn test_default_config() {
    let config = ProjectConfig::default();
    assert_eq!(config.scoring.weights.format, 0.4);
    assert_eq!(config.scoring.weights.checksum, 0.3);
    assert_eq!(config.scoring.weights.distribution, 0.3);
    assert_eq!(config.scoring.thresholds.high, 0.6);
    assert_eq!(config.scoring.thresholds.medium, 0.3);
    assert_eq!(config.scoring.format_failure_score, 0.9);
    assert!(config.defaults.format.is_none());
}

#[test]
fn test_analyzer_weights_validation() {
    assert!(AnalyzerWeights::default().is_valid());

    let invalid = AnalyzerWeights {
        format: 0.5,
        checksum: 0.5,
        distribution: 0.5,
    };
    assert!(!invalid.is_valid());
}

#[test]
fn test_analyzer_weights_normalize() {
    let mut weights = AnalyzerWeights {
        format: 2.0,
        checksum: 1.0,
        distribution: 1.0,
    };
    weights.normalize();
    assert!((weights.format - 0.5).abs() < 0.001);
    assert!((weights.checksum - 0.25).abs() < 0.001);
    assert!((weights.distribution - 0.25).abs() < 0.001);
}

#[test]
fn test_thresholds_are_strict() {
    let t = RiskThresholds::default();
    assert_eq!(t.classify(0.3), RiskLevel::Low);
    assert_eq!(t.classify(0.31), RiskLevel::Medium);
    assert_eq!(t.classify(0.6), RiskLevel::Medium);
    assert_eq!(t.classify(0.61), RiskLevel::High);
    assert_eq!(t.classify(0.0), RiskLevel::Low);
}

#[test]
fn test_sanitize_repairs_values() {
    let mut scoring = ScoringConfig {
        format_failure_score: 7.0,
        weights: AnalyzerWeights {
            format: 4.0,
            checksum: 3.0,
            distribution: 3.0,
        },
        thresholds: RiskThresholds {
            high: 0.2,
            medium: 0.5,
        },
    };
    scoring.sanitize();
    assert!(scoring.weights.is_valid());
    assert!((scoring.weights.format - 0.4).abs() < 1e-9);
    assert_eq!(scoring.thresholds, RiskThresholds::default());
    assert_eq!(scoring.format_failure_score, 0.9);
}

#[test]
fn test_sanitize_rejects_negative_weights() {
    // Sums to 1.0 but would let a HIGH finding lower the score
    let toml_str = "[scoring.weights]\nformat = -2.0\nchecksum = 1.5\ndistribution = 1.5\n";
    let mut config: ProjectConfig = toml::from_str(toml_str).unwrap();
    assert!(config.scoring.weights.is_valid());
    assert!(!config.scoring.weights.is_well_formed());

    config.scoring.sanitize();
    assert_eq!(config.scoring.weights, AnalyzerWeights::default());
}

#[test]
fn test_sanitize_rejects_non_finite_weights() {
    for bad in [f64::NAN, f64::INFINITY] {
        let mut scoring = ScoringConfig {
            weights: AnalyzerWeights {
                format: bad,
                checksum: 0.3,
                distribution: 0.3,
            },
            ..Default::default()
        };
        scoring.sanitize();
        assert_eq!(scoring.weights, AnalyzerWeights::default());
    }
}

#[test]
fn test_load_config_file_sanitizes_negative_weights() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("custom.toml");
    std::fs::write(
        &path,
        "[scoring.weights]\nformat = -2.0\nchecksum = 1.5\ndistribution = 1.5\n",
    )
    .unwrap();
    let config = load_config_file(&path).unwrap();
    assert_eq!(config.scoring.weights, AnalyzerWeights::default());
}

#[test]
fn test_sanitize_keeps_zero_weights() {
    let mut scoring = ScoringConfig {
        weights: AnalyzerWeights {
            format: 0.0,
            checksum: 0.0,
            distribution: 0.0,
        },
        ..Default::default()
    };
    scoring.sanitize();
    assert_eq!(scoring.weights.total(), 0.0);
}

#[test]
fn test_toml_parsing() {
    let toml_str = r#"
[scoring]
format_failure_score = 0.95

[scoring.weights]
format = 0.5
checksum = 0.25
distribution = 0.25

[scoring.thresholds]
medium = 0.25

[defaults]
format = "json"
fail_on = "medium"
"#;
    let config: ProjectConfig = toml::from_str(toml_str).unwrap();
    assert_eq!(config.scoring.format_failure_score, 0.95);
    assert_eq!(config.scoring.weights.format, 0.5);
    assert_eq!(config.scoring.thresholds.medium, 0.25);
    // Unspecified fields keep their defaults
    assert_eq!(config.scoring.thresholds.high, 0.6);
    assert_eq!(config.defaults.format.as_deref(), Some("json"));
    assert_eq!(config.defaults.fail_on.as_deref(), Some("medium"));
}

#[test]
fn test_toml_parsing_minimal() {
    let config: ProjectConfig = toml::from_str("").unwrap();
    assert_eq!(config.scoring, ScoringConfig::default());
}

#[test]
fn test_example_config_parses_to_defaults() {
    let config: ProjectConfig = toml::from_str(EXAMPLE_CONFIG).unwrap();
    assert_eq!(config.scoring, ScoringConfig::default());
}

#[test]
fn test_load_project_config_toml() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join(PROJECT_CONFIG_TOML),
        "[scoring.weights]\nformat = 0.6\nchecksum = 0.2\ndistribution = 0.2\n",
    )
    .unwrap();
    let config = load_project_config(dir.path());
    assert!((config.scoring.weights.format - 0.6).abs() < 1e-9);
}

#[test]
fn test_load_project_config_json() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join(PROJECT_CONFIG_JSON),
        r#"{"defaults": {"format": "json", "no_emoji": true}}"#,
    )
    .unwrap();
    let config = load_project_config(dir.path());
    assert_eq!(config.defaults.format.as_deref(), Some("json"));
    assert_eq!(config.defaults.no_emoji, Some(true));
}

#[test]
fn test_invalid_toml_falls_through() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(PROJECT_CONFIG_TOML), "this is [[ not valid").unwrap();
    std::fs::write(
        dir.path().join(PROJECT_CONFIG_JSON),
        r#"{"defaults": {"fail_on": "high"}}"#,
    )
    .unwrap();
    let config = load_project_config(dir.path());
    assert_eq!(config.defaults.fail_on.as_deref(), Some("high"));
}

#[test]
fn test_load_config_file_errors_on_bad_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("custom.toml");
    std::fs::write(&path, "weights = [").unwrap();
    assert!(load_config_file(&path).is_err());
    assert!(load_config_file(&dir.path().join("missing.toml")).is_err());
}

#[test]
fn test_load_config_file_normalizes_weights() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("custom.json");
    std::fs::write(
        &path,
        r#"{"scoring": {"weights": {"format": 2.0, "checksum": 1.0, "distribution": 1.0}}}"#,
    )
    .unwrap();
    let config = load_config_file(&path).unwrap();
    assert!(config.scoring.weights.is_valid());
    assert!((config.scoring.weights.format - 0.5).abs() < 1e-9);
}
