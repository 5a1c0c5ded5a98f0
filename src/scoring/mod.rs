//! Weighted NID risk scoring
//!
//! Combines the per-analyzer risk levels into a single verdict.
//!
//! # Scoring Formula
//!
//! ```text
//! score = Σ weightᵢ × factor(levelᵢ) / Σ weightᵢ
//!
//! factor(HIGH) = 1.0, factor(MEDIUM) = 0.5, factor(LOW) = 0.0
//! weights: format 0.4, checksum 0.3, distribution 0.3
//! ```
//!
//! # Classification (strict comparisons)
//!
//! - score > 0.6 → HIGH
//! - score > 0.3 → MEDIUM
//! - otherwise  → LOW (the only valid outcome)
//!
//! # Example
//!
//! A checksum failure with low digit entropy:
//! 0.3 × 1.0 + 0.3 × 1.0 = 0.6 → MEDIUM (0.6 is not > 0.6)
//!
//! A format failure (wrong length or charset) skips the other analyzers
//! and scores a flat 0.9.

mod risk_aggregator;

pub use risk_aggregator::RiskAggregator;

use crate::analyzers::AnalysisError;
use thiserror::Error;

/// Internal evaluation failures. These never reach callers of
/// `evaluate`; they are turned into ERROR verdicts.
#[derive(Error, Debug)]
pub enum EvaluationError {
    #[error("analysis failed: {0}")]
    Analysis(#[from] AnalysisError),

    #[error("degenerate analyzer weights (total {total})")]
    DegenerateWeights { total: f64 },

    #[error("invalid analyzer weights (format {format}, checksum {checksum}, distribution {distribution})")]
    InvalidWeights {
        format: f64,
        checksum: f64,
        distribution: f64,
    },

    #[error("risk score {0} outside [0, 1]")]
    ScoreOutOfRange(f64),

    #[error("evaluation panicked: {0}")]
    Panicked(String),
}
