//! Base analyzer trait and types
//!
//! This module defines the core abstractions shared by the analyzers:
//! - `Analyzer` trait that every analysis stage implements
//! - `Rule` and `first_match` for ordered, first-match-wins precedence
//! - `AnalysisError` for violated preconditions

use crate::models::{ChecksumCheck, DistributionCheck, FormatCheck, RiskLevel};
use thiserror::Error;

/// Errors an analyzer can report instead of a result
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("non-digit character {found:?} at position {position}")]
    NonDigit { found: char, position: usize },

    #[error("empty identifier")]
    Empty,
}

/// Parse an identifier into its decimal digits.
///
/// Analyzers after the format stage require 10-13 ASCII digits; anything
/// else is a caller bug and is reported, not panicked on.
pub fn parse_digits(nid: &str) -> Result<Vec<u8>, AnalysisError> {
    if nid.is_empty() {
        return Err(AnalysisError::Empty);
    }
    nid.chars()
        .enumerate()
        .map(|(position, c)| {
            c.to_digit(10)
                .map(|d| d as u8)
                .ok_or(AnalysisError::NonDigit { found: c, position })
        })
        .collect()
}

/// Outcome of a triggered rule (or of the fallback when none triggers)
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub risk_level: RiskLevel,
    pub code: &'static str,
    pub reason: String,
    pub detail: String,
}

impl Outcome {
    pub fn new(
        risk_level: RiskLevel,
        code: &'static str,
        reason: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            risk_level,
            code,
            reason: reason.into(),
            detail: detail.into(),
        }
    }
}

/// One entry of an ordered precedence list.
///
/// `S` is the analyzer's intermediate measurements. The rule list is a
/// static slice so the precedence contract can be read and tested in one
/// place.
pub struct Rule<S> {
    /// Same value as the resulting `Outcome::code`
    pub code: &'static str,
    pub applies: fn(&S) -> bool,
    pub outcome: fn(&S) -> Outcome,
}

/// Evaluate rules in order; the first applicable one wins.
pub fn first_match<S>(rules: &[Rule<S>], subject: &S) -> Option<Outcome> {
    rules
        .iter()
        .find(|rule| (rule.applies)(subject))
        .map(|rule| (rule.outcome)(subject))
}

/// Uniform view over the per-analyzer result types
pub trait Analysis {
    fn risk_level(&self) -> RiskLevel;
    fn reason(&self) -> &str;
    fn detail(&self) -> &str;
}

impl Analysis for FormatCheck {
    fn risk_level(&self) -> RiskLevel {
        self.risk_level
    }
    fn reason(&self) -> &str {
        &self.reason
    }
    fn detail(&self) -> &str {
        &self.detail
    }
}

impl Analysis for ChecksumCheck {
    fn risk_level(&self) -> RiskLevel {
        self.risk_level
    }
    fn reason(&self) -> &str {
        &self.reason
    }
    fn detail(&self) -> &str {
        &self.detail
    }
}

impl Analysis for DistributionCheck {
    fn risk_level(&self) -> RiskLevel {
        self.risk_level
    }
    fn reason(&self) -> &str {
        &self.reason
    }
    fn detail(&self) -> &str {
        &self.detail
    }
}

/// Trait for all analysis stages
///
/// Analyzers are pure: the same input always yields the same output and
/// no state is kept between calls, so one instance can be shared freely
/// across threads.
///
/// # Example Implementation
///
/// ```ignore
/// pub struct LengthAnalyzer;
///
/// impl Analyzer for LengthAnalyzer {
///     type Output = LengthCheck;
///
///     fn name(&self) -> &'static str {
///         "LengthAnalyzer"
///     }
///
///     fn label(&self) -> &'static str {
///         "Length"
///     }
///
///     fn analyze(&self, nid: &str) -> Result<LengthCheck, AnalysisError> {
///         Ok(LengthCheck::from(nid.len()))
///     }
/// }
/// ```
pub trait Analyzer: Send + Sync {
    type Output: Analysis;

    /// Unique identifier for this analyzer
    fn name(&self) -> &'static str;

    /// Short prefix used in verdict risk details (e.g. "Format")
    fn label(&self) -> &'static str;

    /// Human-readable description of what this analyzer checks
    fn description(&self) -> &'static str {
        ""
    }

    /// Run the analysis
    fn analyze(&self, nid: &str) -> Result<Self::Output, AnalysisError>;
}
