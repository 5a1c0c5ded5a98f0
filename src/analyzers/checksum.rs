//! Checksum analyzer
//!
//! Luhn-style plausibility check: walking right to left, every second
//! digit is doubled (minus 9 when the result exceeds 9) and the sum must
//! be divisible by 10. A failed checksum only contributes risk weight; it
//! does not invalidate the identifier on its own.

use crate::analyzers::base::{parse_digits, AnalysisError, Analyzer};
use crate::models::{round2, ChecksumCheck, RiskLevel};
use tracing::debug;

/// Weighted Luhn sum of `digits`
pub fn luhn_sum(digits: &[u8]) -> u32 {
    digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| {
            let d = u32::from(d);
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                d
            }
        })
        .sum()
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ChecksumAnalyzer;

impl ChecksumAnalyzer {
    pub fn new() -> Self {
        Self
    }

    fn check_digits(&self, digits: &[u8]) -> ChecksumCheck {
        let total_sum = luhn_sum(digits);
        let remainder = total_sum % 10;
        let is_valid_checksum = remainder == 0;

        let digit_sum: u32 = digits.iter().map(|&d| u32::from(d)).sum();
        let average_digit = f64::from(digit_sum) / digits.len() as f64;
        let has_consecutive = digits.windows(2).any(|w| w[0].abs_diff(w[1]) == 1);

        debug!(
            "Checksum: sum={} remainder={} digit_sum={}",
            total_sum, remainder, digit_sum
        );

        let (risk_level, code, reason, detail) = if is_valid_checksum {
            (
                RiskLevel::Low,
                "ok",
                "Valid checksum".to_string(),
                "NID passes mathematical validation algorithm".to_string(),
            )
        } else {
            (
                RiskLevel::High,
                "checksum_failed",
                format!("Failed mathematical validation (remainder: {remainder})"),
                format!("Checksum calculation failed. Expected remainder 0, got {remainder}"),
            )
        };

        ChecksumCheck {
            is_valid_checksum,
            checksum_score: remainder,
            total_sum,
            digit_sum,
            average_digit: round2(average_digit),
            has_consecutive,
            risk_level,
            code: code.to_string(),
            reason,
            detail,
        }
    }
}

impl Analyzer for ChecksumAnalyzer {
    type Output = ChecksumCheck;

    fn name(&self) -> &'static str {
        "ChecksumAnalyzer"
    }

    fn label(&self) -> &'static str {
        "Math"
    }

    fn description(&self) -> &'static str {
        "Luhn-style weighted digit sum"
    }

    fn analyze(&self, nid: &str) -> Result<ChecksumCheck, AnalysisError> {
        let digits = parse_digits(nid)?;
        Ok(self.check_digits(&digits))
    }
}
