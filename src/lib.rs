//! nidguard - heuristic fraud-risk scoring for national ID numbers
//!
//! Three independent analyzers (format, checksum, digit distribution)
//! feed a weighted aggregator that produces one [`Verdict`] per
//! identifier.
//!
//! ```
//! let verdict = nidguard::evaluate("79927398713");
//! assert!(verdict.is_valid);
//!
//! let verdict = nidguard::evaluate("1234567890");
//! assert_eq!(verdict.overall_risk, nidguard::RiskLevel::High);
//! ```

pub mod analyzers;
pub mod config;
pub mod models;
pub mod reporters;
pub mod scoring;

pub use models::{BatchEntry, BatchReport, CheckStatus, CheckSummary, RiskLevel, RiskSummary, Verdict};
pub use scoring::{EvaluationError, RiskAggregator};

use serde_json::Value;
use std::sync::OnceLock;

fn default_aggregator() -> &'static RiskAggregator {
    static AGGREGATOR: OnceLock<RiskAggregator> = OnceLock::new();
    AGGREGATOR.get_or_init(RiskAggregator::default)
}

/// Evaluate one identifier with the default scoring configuration
pub fn evaluate(nid: &str) -> Verdict {
    default_aggregator().evaluate(nid)
}

/// Evaluate a JSON value with the default scoring configuration.
/// Non-string values are reported as invalid input.
pub fn evaluate_value(value: &Value) -> Verdict {
    default_aggregator().evaluate_value(value)
}
