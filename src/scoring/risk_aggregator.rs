//! Risk aggregator
//!
//! Orchestrates the three analyzers and produces one `Verdict` per
//! identifier. Evaluation never panics or errors towards the caller:
//! internal failures become ERROR verdicts.

use super::EvaluationError;
use crate::analyzers::{Analysis, Analyzer, ChecksumAnalyzer, DistributionAnalyzer, FormatAnalyzer};
use crate::config::ScoringConfig;
use crate::models::{round2, FormatCheck, RiskLevel, Verdict, VerdictChecks};
use rayon::prelude::*;
use serde_json::Value;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, error};

/// Stateless evaluator. Holds only immutable configuration, so a single
/// instance can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct RiskAggregator {
    config: ScoringConfig,
    format: FormatAnalyzer,
    checksum: ChecksumAnalyzer,
    distribution: DistributionAnalyzer,
}

impl RiskAggregator {
    pub fn new(config: ScoringConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Evaluate one identifier.
    ///
    /// A panic inside an analyzer becomes an ERROR verdict, but the
    /// process-wide panic hook still runs first, so the default hook
    /// prints its "thread panicked" message to stderr. Install a custom
    /// hook with `std::panic::set_hook` to silence it.
    pub fn evaluate(&self, nid: &str) -> Verdict {
        self.guarded(|| self.try_evaluate(nid))
    }

    /// Evaluate an arbitrary JSON value; anything but a string is
    /// rejected as invalid input.
    pub fn evaluate_value(&self, value: &Value) -> Verdict {
        match value {
            Value::String(s) => self.evaluate(s),
            other => self.short_circuit(FormatCheck::invalid_input(format!(
                "Expected a string of digits, got {}",
                json_kind(other)
            ))),
        }
    }

    /// Evaluate many identifiers in parallel, preserving input order
    pub fn evaluate_batch<S: AsRef<str> + Sync>(&self, nids: &[S]) -> Vec<Verdict> {
        nids.par_iter().map(|nid| self.evaluate(nid.as_ref())).collect()
    }

    /// Evaluate many JSON values in parallel, preserving input order
    pub fn evaluate_value_batch(&self, values: &[Value]) -> Vec<Verdict> {
        values.par_iter().map(|v| self.evaluate_value(v)).collect()
    }

    /// Run an evaluation, converting errors and panics into ERROR verdicts
    fn guarded<F>(&self, run: F) -> Verdict
    where
        F: FnOnce() -> Result<Verdict, EvaluationError>,
    {
        let err = match panic::catch_unwind(AssertUnwindSafe(run)) {
            Ok(Ok(verdict)) => return verdict,
            Ok(Err(e)) => e,
            Err(payload) => EvaluationError::Panicked(panic_message(payload.as_ref())),
        };
        error!("NID validation error: {}", err);
        Verdict::error(err.to_string())
    }

    fn try_evaluate(&self, nid: &str) -> Result<Verdict, EvaluationError> {
        let format = self.format.check(nid);
        if !format.is_valid {
            return Ok(self.short_circuit(format));
        }

        let checksum = self.checksum.analyze(nid)?;
        let distribution = self.distribution.analyze(nid)?;

        let weights = &self.config.weights;
        if !weights.is_well_formed() {
            return Err(EvaluationError::InvalidWeights {
                format: weights.format,
                checksum: weights.checksum,
                distribution: weights.distribution,
            });
        }
        let stages: [(&str, f64, &dyn Analysis); 3] = [
            (self.format.label(), weights.format, &format),
            (self.checksum.label(), weights.checksum, &checksum),
            (self.distribution.label(), weights.distribution, &distribution),
        ];

        let mut risk_factors = 0.0;
        let mut total_weight = 0.0;
        let mut risk_details = Vec::new();
        for (label, weight, check) in stages {
            let level = check.risk_level();
            risk_factors += weight * level.weight_factor();
            total_weight += weight;
            if level.is_flagged() {
                risk_details.push(format!("{}: {}", label, check.reason()));
            }
        }

        let score = normalized_score(risk_factors, total_weight)?;

        let overall_risk = self.config.thresholds.classify(score);
        let (reason, detail) = match overall_risk {
            RiskLevel::Low => (
                "NID appears valid".to_string(),
                "All validation checks passed successfully".to_string(),
            ),
            RiskLevel::Medium => (
                "Some concerns detected".to_string(),
                format!(
                    "Issues found: {}",
                    risk_details.iter().take(2).cloned().collect::<Vec<_>>().join(", ")
                ),
            ),
            _ => (
                "Multiple fraud indicators detected".to_string(),
                format!("High-risk issues: {}", risk_details.join(", ")),
            ),
        };

        debug!(
            "Verdict: score={:.3} risk={} details={}",
            score,
            overall_risk,
            risk_details.len()
        );

        Ok(Verdict {
            overall_risk,
            risk_score: round2(score),
            is_valid: overall_risk == RiskLevel::Low,
            reason,
            detail,
            risk_details,
            checks: VerdictChecks {
                format: Some(format),
                checksum: Some(checksum),
                distribution: Some(distribution),
            },
            error: None,
        })
    }

    /// Verdict for input that failed the character-level format check.
    /// The other analyzers are not run.
    fn short_circuit(&self, format: FormatCheck) -> Verdict {
        debug!("Format check failed: {}", format.reason);
        Verdict {
            overall_risk: RiskLevel::High,
            risk_score: self.config.format_failure_score,
            is_valid: false,
            reason: format.reason.clone(),
            detail: format.detail.clone(),
            risk_details: Vec::new(),
            checks: VerdictChecks {
                format: Some(format),
                checksum: None,
                distribution: None,
            },
            error: None,
        }
    }
}

/// Weighted score divided by the total weight; must land in [0, 1]
fn normalized_score(risk_factors: f64, total_weight: f64) -> Result<f64, EvaluationError> {
    if !(total_weight > 0.0 && total_weight.is_finite()) {
        return Err(EvaluationError::DegenerateWeights {
            total: total_weight,
        });
    }
    let score = risk_factors / total_weight;
    if !(0.0..=1.0).contains(&score) {
        return Err(EvaluationError::ScoreOutOfRange(score));
    }
    Ok(score)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
