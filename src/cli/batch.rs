//! Batch command - score a file (or stdin) of identifiers in parallel

use super::output;
use super::OutputArgs;
use anyhow::{Context, Result};
use nidguard::config::ProjectConfig;
use nidguard::models::{BatchEntry, BatchReport};
use nidguard::RiskAggregator;
use serde_json::Value;
use std::io::Read;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Run the batch command
pub fn run(input: &Path, args: &OutputArgs, config: &ProjectConfig, workers: usize) -> Result<()> {
    let resolved = output::resolve(args, &config.defaults)?;
    let content = read_input(input)?;
    let values = parse_input(&content)?;
    debug!("Read {} identifiers from {}", values.len(), input.display());

    let aggregator = RiskAggregator::new(config.scoring.clone());
    let start = Instant::now();
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()
        .context("Failed to build worker pool")?;
    let verdicts = pool.install(|| aggregator.evaluate_value_batch(&values));

    let entries = values
        .iter()
        .zip(verdicts)
        .map(|(value, verdict)| BatchEntry {
            input: display_input(value),
            verdict,
        })
        .collect();
    let report = BatchReport::new(entries);

    info!(
        "Evaluated {} identifiers in {:?} ({} valid, {} medium, {} high, {} error)",
        report.summary.total,
        start.elapsed(),
        report.summary.valid,
        report.summary.medium,
        report.summary.high,
        report.summary.error
    );

    output::emit(&report, &resolved)
}

fn read_input(input: &Path) -> Result<String> {
    if input == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read identifiers from stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(input)
            .with_context(|| format!("Failed to read {}", input.display()))
    }
}

/// One identifier per line, or a JSON array when the content starts with `[`
fn parse_input(content: &str) -> Result<Vec<Value>> {
    let trimmed = content.trim_start();
    if trimmed.starts_with('[') {
        return serde_json::from_str(trimmed).context("Invalid JSON array of identifiers");
    }
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| Value::String(line.to_string()))
        .collect())
}

fn display_input(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
