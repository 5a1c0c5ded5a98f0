//! Format analyzer
//!
//! Syntactic validation of the identifier (10-13 ASCII digits) plus
//! detection of well-known fabricated patterns. Pattern flags are all
//! computed; the reported reason comes from the first rule that applies.

use crate::analyzers::base::{first_match, AnalysisError, Analyzer, Outcome, Rule};
use crate::models::{FormatCheck, PatternFlags, RiskLevel};
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

pub const MIN_LENGTH: usize = 10;
pub const MAX_LENGTH: usize = 13;

/// Run length at which a single repeated digit is flagged
const REPEAT_RUN: usize = 10;

static VALID_FORMAT: OnceLock<Regex> = OnceLock::new();
static SEQUENTIAL: OnceLock<Regex> = OnceLock::new();
static SUSPICIOUS: OnceLock<Regex> = OnceLock::new();
static FAKE_PATTERNS: OnceLock<Regex> = OnceLock::new();
static ALTERNATING: OnceLock<Regex> = OnceLock::new();
static INCREMENTAL: OnceLock<Regex> = OnceLock::new();

// `\d` is Unicode-aware in the regex crate, so digits are spelled out.
fn valid_format() -> &'static Regex {
    VALID_FORMAT.get_or_init(|| Regex::new(r"^[0-9]{10,13}$").expect("valid regex"))
}

fn sequential() -> &'static Regex {
    SEQUENTIAL.get_or_init(|| Regex::new(r"1234567890|9876543210|0123456789").expect("valid regex"))
}

fn suspicious() -> &'static Regex {
    SUSPICIOUS.get_or_init(|| Regex::new(r"0000000000|1111111111|9999999999").expect("valid regex"))
}

fn fake_patterns() -> &'static Regex {
    FAKE_PATTERNS.get_or_init(|| {
        Regex::new(r"123123123|456456456|789789789|1111111111|0000000000").expect("valid regex")
    })
}

fn alternating() -> &'static Regex {
    ALTERNATING.get_or_init(|| Regex::new(r"^(?:0[1-9]){5,6}$").expect("valid regex"))
}

/// Five or six two-digit pairs, none of them "00"
fn incremental() -> &'static Regex {
    INCREMENTAL.get_or_init(|| Regex::new(r"^(?:0[1-9]|[1-9][0-9]){5,6}$").expect("valid regex"))
}

/// Longest run of one repeated character: (char, run length)
fn longest_run(nid: &str) -> Option<(char, usize)> {
    let mut best: Option<(char, usize)> = None;
    let mut current: Option<(char, usize)> = None;
    for c in nid.chars() {
        current = match current {
            Some((prev, n)) if prev == c => Some((c, n + 1)),
            _ => Some((c, 1)),
        };
        if let Some((ch, n)) = current {
            if best.map_or(true, |(_, b)| n > b) {
                best = Some((ch, n));
            }
        }
    }
    best
}

fn has_digit_run(nid: &str, min_run: usize) -> bool {
    let bytes = nid.as_bytes();
    bytes
        .chunk_by(|a, b| a == b)
        .any(|run| run.len() >= min_run && run[0].is_ascii_digit())
}

/// Exactly ten digits that read the same in both directions
fn is_ten_digit_palindrome(nid: &str) -> bool {
    let bytes = nid.as_bytes();
    bytes.len() == 10
        && bytes.iter().all(u8::is_ascii_digit)
        && bytes.iter().eq(bytes.iter().rev())
}

/// One two-digit group repeated to fill 10 or 12 digits
fn is_repeated_pair(nid: &str) -> bool {
    let bytes = nid.as_bytes();
    if !(bytes.len() == 10 || bytes.len() == 12) || !bytes.iter().all(u8::is_ascii_digit) {
        return false;
    }
    let group = &bytes[..2];
    bytes.chunks(2).all(|pair| pair == group)
}

/// Measurements the precedence rules are evaluated against
pub struct FormatScan {
    pub flags: PatternFlags,
    pub longest_run: Option<(char, usize)>,
    pub length: usize,
}

impl FormatScan {
    pub fn new(nid: &str) -> Self {
        let palindrome = is_ten_digit_palindrome(nid);
        let flags = PatternFlags {
            is_sequential: sequential().is_match(nid),
            is_repeated: has_digit_run(nid, REPEAT_RUN),
            is_suspicious: suspicious().is_match(nid),
            is_fake_pattern: fake_patterns().is_match(nid),
            is_palindrome: palindrome,
            // Mirror has always shared the palindrome definition; both
            // flags are reported so downstream consumers see both.
            is_mirror: palindrome,
            is_alternating: alternating().is_match(nid),
            is_grouped: is_repeated_pair(nid),
            is_incremental: incremental().is_match(nid),
        };
        Self {
            flags,
            longest_run: longest_run(nid),
            length: nid.chars().count(),
        }
    }
}

/// Pattern rules in precedence order
pub const PATTERN_RULES: &[Rule<FormatScan>] = &[
    Rule {
        code: "sequential",
        applies: |s| s.flags.is_sequential,
        outcome: |_| {
            Outcome::new(
                RiskLevel::High,
                "sequential",
                "Sequential pattern detected",
                "Numbers like 1234567890 are commonly used in fake IDs",
            )
        },
    },
    Rule {
        code: "repeated",
        applies: |s| s.flags.is_repeated,
        outcome: |s| {
            let (digit, run) = s.longest_run.unwrap_or(('?', s.length));
            Outcome::new(
                RiskLevel::High,
                "repeated",
                "Repeated digit pattern detected",
                format!("Digit \"{digit}\" repeated {run} times - highly suspicious"),
            )
        },
    },
    Rule {
        code: "suspicious_uniform",
        applies: |s| s.flags.is_suspicious,
        outcome: |_| {
            Outcome::new(
                RiskLevel::High,
                "suspicious_uniform",
                "Suspicious uniform pattern detected",
                "All digits are the same - this is a common fake ID pattern",
            )
        },
    },
    Rule {
        code: "fake_pattern",
        applies: |s| s.flags.is_fake_pattern,
        outcome: |_| {
            Outcome::new(
                RiskLevel::High,
                "fake_pattern",
                "Common fake ID pattern detected",
                "This pattern matches known fake ID sequences",
            )
        },
    },
    Rule {
        code: "palindrome",
        applies: |s| s.flags.is_palindrome,
        outcome: |_| {
            Outcome::new(
                RiskLevel::Medium,
                "palindrome",
                "Palindrome pattern detected",
                "Numbers that read the same forwards and backwards are suspicious",
            )
        },
    },
    Rule {
        code: "mirror",
        applies: |s| s.flags.is_mirror,
        outcome: |_| {
            Outcome::new(
                RiskLevel::Medium,
                "mirror",
                "Mirror pattern detected",
                "Symmetrical number patterns are rarely genuine",
            )
        },
    },
    Rule {
        code: "alternating",
        applies: |s| s.flags.is_alternating,
        outcome: |_| {
            Outcome::new(
                RiskLevel::Medium,
                "alternating",
                "Alternating pattern detected",
                "Regular alternating between 0 and other digits is suspicious",
            )
        },
    },
    Rule {
        code: "grouped",
        applies: |s| s.flags.is_grouped,
        outcome: |_| {
            Outcome::new(
                RiskLevel::Medium,
                "grouped",
                "Repeated group pattern detected",
                "Same 2-digit group repeated multiple times is suspicious",
            )
        },
    },
    Rule {
        code: "incremental",
        applies: |s| s.flags.is_incremental,
        outcome: |_| {
            Outcome::new(
                RiskLevel::Medium,
                "incremental",
                "Incremental pattern detected",
                "Regular incremental sequences are rarely genuine",
            )
        },
    },
];

/// Why a string failed the character-level check
fn invalid_outcome(length: usize) -> Outcome {
    if length < MIN_LENGTH {
        Outcome::new(
            RiskLevel::High,
            "too_short",
            format!("NID too short: {length} digits (minimum {MIN_LENGTH} required)"),
            format!("Bangladesh NID numbers must be at least {MIN_LENGTH} digits long"),
        )
    } else if length > MAX_LENGTH {
        Outcome::new(
            RiskLevel::High,
            "too_long",
            format!("NID too long: {length} digits (maximum {MAX_LENGTH} allowed)"),
            format!("Bangladesh NID numbers cannot exceed {MAX_LENGTH} digits"),
        )
    } else {
        Outcome::new(
            RiskLevel::High,
            "non_digit",
            "NID contains non-digit characters",
            "Only numbers 0-9 are allowed in NID",
        )
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FormatAnalyzer;

impl FormatAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Infallible format check; every input maps to a result
    pub fn check(&self, nid: &str) -> FormatCheck {
        if nid.is_empty() {
            return FormatCheck::invalid_input("NID must be a non-empty string of digits");
        }

        let scan = FormatScan::new(nid);
        let is_valid = valid_format().is_match(nid);

        let outcome = if !is_valid {
            invalid_outcome(scan.length)
        } else {
            first_match(PATTERN_RULES, &scan).unwrap_or_else(|| {
                Outcome::new(
                    RiskLevel::Low,
                    "ok",
                    "Format appears valid",
                    "NID number format meets basic requirements",
                )
            })
        };

        debug!(
            "Format check: valid={} code={} flags={}",
            is_valid,
            outcome.code,
            scan.flags.count()
        );

        FormatCheck {
            is_valid,
            flags: scan.flags,
            length: scan.length,
            risk_level: outcome.risk_level,
            code: outcome.code.to_string(),
            reason: outcome.reason,
            detail: outcome.detail,
        }
    }
}

impl Analyzer for FormatAnalyzer {
    type Output = FormatCheck;

    fn name(&self) -> &'static str {
        "FormatAnalyzer"
    }

    fn label(&self) -> &'static str {
        "Format"
    }

    fn description(&self) -> &'static str {
        "Checks length, charset and known fabricated digit patterns"
    }

    fn analyze(&self, nid: &str) -> Result<FormatCheck, AnalysisError> {
        Ok(self.check(nid))
    }
}
