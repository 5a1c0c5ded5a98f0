//! Distribution analyzer
//!
//! Statistical "naturalness" of the digit multiset: Shannon entropy,
//! number of distinct digits, frequency spread and perfectly regular
//! orderings.

use crate::analyzers::base::{first_match, parse_digits, AnalysisError, Analyzer, Outcome, Rule};
use crate::models::{round2, DistributionCheck, RiskLevel};
use std::collections::BTreeMap;
use tracing::debug;

/// Entropy below this is too predictable
pub const SUSPICIOUS_ENTROPY: f64 = 1.5;
/// Entropy above this counts as random
pub const RANDOM_ENTROPY: f64 = 2.5;
/// Minimum distinct digits for a balanced distribution
pub const MIN_UNIQUE_DIGITS: usize = 6;
/// Maximum tolerated ratio between most and least frequent digit
pub const MAX_FREQUENCY_RATIO: f64 = 3.0;

/// Shannon entropy (base 2) of a frequency table
pub fn shannon_entropy(counts: &BTreeMap<u8, usize>, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let entropy: f64 = counts
        .values()
        .map(|&count| {
            let p = count as f64 / total as f64;
            p * p.log2()
        })
        .sum();
    // A single symbol yields -0.0
    if entropy < 0.0 {
        -entropy
    } else {
        0.0
    }
}

/// Raw (unrounded) measurements used by the precedence rules
pub struct DigitStats {
    pub counts: BTreeMap<u8, usize>,
    pub len: usize,
    pub entropy: f64,
    pub unique_digits: usize,
    pub max_frequency: usize,
    pub min_frequency: usize,
    pub frequency_ratio: f64,
    pub even_odd: bool,
    pub ascending: bool,
    pub descending: bool,
}

impl DigitStats {
    pub fn new(digits: &[u8]) -> Self {
        let mut counts = BTreeMap::new();
        for &d in digits {
            *counts.entry(d).or_insert(0usize) += 1;
        }
        let len = digits.len();
        let max_frequency = counts.values().copied().max().unwrap_or(0);
        let min_frequency = counts.values().copied().min().unwrap_or(0);
        let frequency_ratio = if min_frequency == 0 {
            0.0
        } else {
            max_frequency as f64 / min_frequency as f64
        };

        Self {
            entropy: shannon_entropy(&counts, len),
            unique_digits: counts.len(),
            max_frequency,
            min_frequency,
            frequency_ratio,
            even_odd: digits.windows(2).all(|w| w[0] % 2 != w[1] % 2),
            ascending: digits.windows(2).all(|w| w[1] >= w[0]),
            descending: digits.windows(2).all(|w| w[1] <= w[0]),
            counts,
            len,
        }
    }

    pub fn is_balanced(&self) -> bool {
        self.unique_digits >= MIN_UNIQUE_DIGITS
    }
}

/// Distribution rules in precedence order
pub const DISTRIBUTION_RULES: &[Rule<DigitStats>] = &[
    Rule {
        code: "predictable",
        applies: |s| s.entropy < SUSPICIOUS_ENTROPY,
        outcome: |_| {
            Outcome::new(
                RiskLevel::High,
                "predictable",
                "Too predictable pattern",
                "Low entropy indicates artificial number generation",
            )
        },
    },
    Rule {
        code: "unbalanced",
        applies: |s| !s.is_balanced(),
        outcome: |s| {
            Outcome::new(
                RiskLevel::Medium,
                "unbalanced",
                "Unbalanced digit distribution",
                format!("Only {} unique digits out of {} total", s.unique_digits, s.len),
            )
        },
    },
    Rule {
        code: "uneven_frequency",
        applies: |s| s.frequency_ratio > MAX_FREQUENCY_RATIO,
        outcome: |s| {
            Outcome::new(
                RiskLevel::Medium,
                "uneven_frequency",
                "Uneven digit frequency",
                format!(
                    "Most common digit appears {} times, least common {} times",
                    s.max_frequency, s.min_frequency
                ),
            )
        },
    },
    Rule {
        code: "even_odd_alternation",
        applies: |s| s.even_odd,
        outcome: |_| {
            Outcome::new(
                RiskLevel::Medium,
                "even_odd_alternation",
                "Perfect even-odd alternation",
                "Regular alternation between even and odd digits is suspicious",
            )
        },
    },
    Rule {
        code: "ascending",
        applies: |s| s.ascending,
        outcome: |_| {
            Outcome::new(
                RiskLevel::High,
                "ascending",
                "Perfect ascending sequence",
                "All digits in ascending order is highly suspicious",
            )
        },
    },
    Rule {
        code: "descending",
        applies: |s| s.descending,
        outcome: |_| {
            Outcome::new(
                RiskLevel::High,
                "descending",
                "Perfect descending sequence",
                "All digits in descending order is highly suspicious",
            )
        },
    },
];

#[derive(Debug, Clone, Copy, Default)]
pub struct DistributionAnalyzer;

impl DistributionAnalyzer {
    pub fn new() -> Self {
        Self
    }

    fn check_digits(&self, digits: &[u8]) -> DistributionCheck {
        let stats = DigitStats::new(digits);
        let outcome = first_match(DISTRIBUTION_RULES, &stats).unwrap_or_else(|| {
            Outcome::new(
                RiskLevel::Low,
                "ok",
                "Good randomness",
                "Digit distribution appears natural",
            )
        });

        debug!(
            "Distribution: entropy={:.3} unique={} ratio={:.2} code={}",
            stats.entropy, stats.unique_digits, stats.frequency_ratio, outcome.code
        );

        DistributionCheck {
            is_random: stats.entropy > RANDOM_ENTROPY,
            is_balanced: stats.is_balanced(),
            is_suspicious: stats.entropy < SUSPICIOUS_ENTROPY,
            entropy: round2(stats.entropy),
            unique_digits: stats.unique_digits,
            max_frequency: stats.max_frequency,
            min_frequency: stats.min_frequency,
            frequency_ratio: round2(stats.frequency_ratio),
            has_even_odd_pattern: stats.even_odd,
            has_ascending_pattern: stats.ascending,
            has_descending_pattern: stats.descending,
            digit_distribution: stats.counts,
            risk_level: outcome.risk_level,
            code: outcome.code.to_string(),
            reason: outcome.reason,
            detail: outcome.detail,
        }
    }
}

impl Analyzer for DistributionAnalyzer {
    type Output = DistributionCheck;

    fn name(&self) -> &'static str {
        "DistributionAnalyzer"
    }

    fn label(&self) -> &'static str {
        "Stats"
    }

    fn description(&self) -> &'static str {
        "Digit entropy, balance and ordering"
    }

    fn analyze(&self, nid: &str) -> Result<DistributionCheck, AnalysisError> {
        let digits = parse_digits(nid)?;
        Ok(self.check_digits(&digits))
    }
}
