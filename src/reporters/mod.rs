//! Output reporters for verdicts
//!
//! Supports two output formats:
//! - `text` - Terminal output with colors and optional emoji
//! - `json` - Machine-readable JSON

mod json;
mod text;

use crate::models::BatchReport;
use anyhow::{anyhow, Result};
use std::str::FromStr;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" | "terminal" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(anyhow!("Unknown format '{}'. Valid formats: text, json", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Presentation switches for the text reporter
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    /// Show the per-analyzer breakdown
    pub details: bool,
    /// Suppress emoji (cleaner CI logs)
    pub no_emoji: bool,
}

/// Render a report using an OutputFormat enum
pub fn report_with_format(
    report: &BatchReport,
    format: OutputFormat,
    options: RenderOptions,
) -> Result<String> {
    match format {
        OutputFormat::Text => text::render(report, options),
        OutputFormat::Json => json::render(report),
    }
}
