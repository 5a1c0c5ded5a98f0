//! NID analyzers
//!
//! Three independent, pure analysis stages. The aggregator in
//! [`crate::scoring`] runs them in order and combines their risk levels.
//!
//! ```text
//!   identifier
//!       │
//!       ▼
//!  FormatAnalyzer ──invalid──▶ short-circuit verdict
//!       │ valid
//!       ├──────────────┐
//!       ▼              ▼
//!  ChecksumAnalyzer  DistributionAnalyzer
//!       │              │
//!       └──────┬───────┘
//!              ▼
//!        RiskAggregator
//! ```
//!
//! - `FormatAnalyzer` - length/charset and fabricated-pattern rules
//! - `ChecksumAnalyzer` - Luhn-style weighted digit sum
//! - `DistributionAnalyzer` - entropy, balance and ordering

mod base;
mod checksum;
mod distribution;
mod format;

pub use base::{first_match, parse_digits, Analysis, AnalysisError, Analyzer, Outcome, Rule};
pub use checksum::{luhn_sum, ChecksumAnalyzer};
pub use distribution::{shannon_entropy, DigitStats, DistributionAnalyzer, DISTRIBUTION_RULES};
pub use format::{FormatAnalyzer, FormatScan, MAX_LENGTH, MIN_LENGTH, PATTERN_RULES};
