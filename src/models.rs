//! Core data models for nidguard
//!
//! These models are shared by the analyzers, the aggregator and the
//! reporters. Everything here is plain data: constructed once per
//! evaluation and never mutated afterwards.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Round to two decimals for presentation. Classification never uses the
/// rounded value.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Risk levels produced by each analyzer and by the aggregate verdict
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    #[default]
    Low,
    Medium,
    High,
    /// Evaluation itself failed; never produced by an analyzer
    Error,
}

impl RiskLevel {
    /// Fraction of an analyzer's weight this level contributes to the score
    pub fn weight_factor(&self) -> f64 {
        match self {
            RiskLevel::High => 1.0,
            RiskLevel::Medium => 0.5,
            RiskLevel::Low | RiskLevel::Error => 0.0,
        }
    }

    /// Whether this level should be listed in a verdict's risk details
    pub fn is_flagged(&self) -> bool {
        matches!(self, RiskLevel::Medium | RiskLevel::High)
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "LOW"),
            RiskLevel::Medium => write!(f, "MEDIUM"),
            RiskLevel::High => write!(f, "HIGH"),
            RiskLevel::Error => write!(f, "ERROR"),
        }
    }
}

impl FromStr for RiskLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(RiskLevel::Low),
            "medium" => Ok(RiskLevel::Medium),
            "high" => Ok(RiskLevel::High),
            "error" => Ok(RiskLevel::Error),
            _ => Err(anyhow::anyhow!(
                "Unknown risk level '{}'. Valid levels: low, medium, high, error",
                s
            )),
        }
    }
}

/// Pattern flags raised by the format analyzer.
///
/// Every flag is evaluated independently; which one ends up as the
/// reported reason is decided by rule precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PatternFlags {
    pub is_sequential: bool,
    pub is_repeated: bool,
    pub is_suspicious: bool,
    pub is_fake_pattern: bool,
    pub is_palindrome: bool,
    pub is_mirror: bool,
    pub is_alternating: bool,
    pub is_grouped: bool,
    pub is_incremental: bool,
}

impl PatternFlags {
    /// Number of raised flags
    pub fn count(&self) -> usize {
        [
            self.is_sequential,
            self.is_repeated,
            self.is_suspicious,
            self.is_fake_pattern,
            self.is_palindrome,
            self.is_mirror,
            self.is_alternating,
            self.is_grouped,
            self.is_incremental,
        ]
        .iter()
        .filter(|f| **f)
        .count()
    }
}

/// Result of the syntactic format analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormatCheck {
    /// Input is 10-13 ASCII digits
    pub is_valid: bool,
    #[serde(flatten)]
    pub flags: PatternFlags,
    /// Character count of the input
    pub length: usize,
    pub risk_level: RiskLevel,
    /// Machine-usable reason code (e.g. `sequential`, `too_short`)
    pub code: String,
    pub reason: String,
    pub detail: String,
}

impl FormatCheck {
    /// Result for input that is not a usable string at all
    pub fn invalid_input(detail: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            flags: PatternFlags::default(),
            length: 0,
            risk_level: RiskLevel::High,
            code: "invalid_input".to_string(),
            reason: "Invalid input".to_string(),
            detail: detail.into(),
        }
    }
}

/// Result of the Luhn-style checksum analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecksumCheck {
    pub is_valid_checksum: bool,
    /// Remainder of the weighted sum modulo 10
    pub checksum_score: u32,
    /// Weighted (Luhn) sum
    pub total_sum: u32,
    /// Plain sum of the digits
    pub digit_sum: u32,
    pub average_digit: f64,
    /// Some pair of adjacent digits differs by exactly one
    pub has_consecutive: bool,
    pub risk_level: RiskLevel,
    pub code: String,
    pub reason: String,
    pub detail: String,
}

/// Result of the statistical digit-distribution analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionCheck {
    /// Occurrences of each digit present in the input
    pub digit_distribution: BTreeMap<u8, usize>,
    /// Shannon entropy (base 2) of the digit distribution
    pub entropy: f64,
    pub unique_digits: usize,
    pub max_frequency: usize,
    pub min_frequency: usize,
    pub frequency_ratio: f64,
    pub is_random: bool,
    pub is_balanced: bool,
    pub is_suspicious: bool,
    pub has_even_odd_pattern: bool,
    pub has_ascending_pattern: bool,
    pub has_descending_pattern: bool,
    pub risk_level: RiskLevel,
    pub code: String,
    pub reason: String,
    pub detail: String,
}

/// The analyzer results attached to a verdict
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VerdictChecks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<FormatCheck>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<ChecksumCheck>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distribution: Option<DistributionCheck>,
}

/// Aggregate outcome of evaluating one identifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub overall_risk: RiskLevel,
    /// Normalized weighted score in [0, 1], rounded to two decimals
    pub risk_score: f64,
    /// True iff the overall risk is LOW
    pub is_valid: bool,
    pub reason: String,
    pub detail: String,
    /// `"<Analyzer>: <reason>"` for every non-LOW analyzer, in evaluation order
    #[serde(default)]
    pub risk_details: Vec<String>,
    #[serde(default)]
    pub checks: VerdictChecks,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Verdict {
    /// Verdict for an evaluation that failed internally. Fails closed.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            overall_risk: RiskLevel::Error,
            risk_score: 1.0,
            is_valid: false,
            reason: "Validation failed due to error".to_string(),
            detail: "System error occurred during validation".to_string(),
            risk_details: Vec::new(),
            checks: VerdictChecks::default(),
            error: Some(message.into()),
        }
    }

    /// Risk score as a whole percentage, for display
    pub fn risk_percent(&self) -> u32 {
        (self.risk_score * 100.0).round().clamp(0.0, 100.0) as u32
    }

    /// Per-analyzer pass/fail breakdown for "show details" style displays
    pub fn check_summaries(&self) -> Vec<CheckSummary> {
        let format = match &self.checks.format {
            Some(c) => CheckSummary::ran("Format Validation", c.is_valid, &c.detail, c.risk_level),
            None => CheckSummary::skipped("Format Validation"),
        };
        let checksum = match &self.checks.checksum {
            Some(c) => CheckSummary::ran(
                "Mathematical Validation",
                c.is_valid_checksum,
                &c.detail,
                c.risk_level,
            ),
            None => CheckSummary::skipped("Mathematical Validation"),
        };
        let pattern = match &self.checks.distribution {
            Some(c) => CheckSummary::ran(
                "Pattern Analysis",
                c.is_random && c.is_balanced,
                &c.detail,
                c.risk_level,
            ),
            None => CheckSummary::skipped("Pattern Analysis"),
        };
        vec![format, checksum, pattern]
    }
}

/// Display status of one analyzer in a verdict breakdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Pass,
    Fail,
    /// Analyzer did not run (format short-circuit or evaluation error)
    Skipped,
}

impl std::fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckStatus::Pass => write!(f, "pass"),
            CheckStatus::Fail => write!(f, "fail"),
            CheckStatus::Skipped => write!(f, "skipped"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckSummary {
    pub name: String,
    pub status: CheckStatus,
    pub detail: Option<String>,
    pub risk_level: Option<RiskLevel>,
}

impl CheckSummary {
    fn ran(name: &str, passed: bool, detail: &str, risk_level: RiskLevel) -> Self {
        Self {
            name: name.to_string(),
            status: if passed {
                CheckStatus::Pass
            } else {
                CheckStatus::Fail
            },
            detail: Some(detail.to_string()),
            risk_level: Some(risk_level),
        }
    }

    fn skipped(name: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Skipped,
            detail: None,
            risk_level: None,
        }
    }
}

/// Summary of verdicts by overall risk
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskSummary {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
    pub error: usize,
    pub valid: usize,
    pub total: usize,
}

impl RiskSummary {
    pub fn from_verdicts<'a>(verdicts: impl IntoIterator<Item = &'a Verdict>) -> Self {
        let mut summary = Self::default();
        for v in verdicts {
            match v.overall_risk {
                RiskLevel::Low => summary.low += 1,
                RiskLevel::Medium => summary.medium += 1,
                RiskLevel::High => summary.high += 1,
                RiskLevel::Error => summary.error += 1,
            }
            if v.is_valid {
                summary.valid += 1;
            }
            summary.total += 1;
        }
        summary
    }

    /// Number of verdicts at or above `level`
    pub fn at_or_above(&self, level: RiskLevel) -> usize {
        match level {
            RiskLevel::Low => self.total,
            RiskLevel::Medium => self.medium + self.high + self.error,
            RiskLevel::High => self.high + self.error,
            RiskLevel::Error => self.error,
        }
    }
}

/// One evaluated entry of a batch, keeping the input for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchEntry {
    /// The input as given (non-string JSON values are rendered as JSON)
    pub input: String,
    pub verdict: Verdict,
}

/// Report over a batch of identifiers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub entries: Vec<BatchEntry>,
    pub summary: RiskSummary,
}

impl BatchReport {
    pub fn new(entries: Vec<BatchEntry>) -> Self {
        let summary = RiskSummary::from_verdicts(entries.iter().map(|e| &e.verdict));
        Self { entries, summary }
    }
}
