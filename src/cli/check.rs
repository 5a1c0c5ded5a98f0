//! Check command - score identifiers given on the command line

use super::output;
use super::OutputArgs;
use anyhow::Result;
use nidguard::config::ProjectConfig;
use nidguard::models::{BatchEntry, BatchReport};
use nidguard::RiskAggregator;

/// Run the check command
pub fn run(nids: &[String], args: &OutputArgs, config: &ProjectConfig) -> Result<()> {
    let resolved = output::resolve(args, &config.defaults)?;
    let aggregator = RiskAggregator::new(config.scoring.clone());

    let entries = nids
        .iter()
        .map(|nid| BatchEntry {
            input: nid.clone(),
            verdict: aggregator.evaluate(nid),
        })
        .collect();

    output::emit(&BatchReport::new(entries), &resolved)
}
