//! Output and threshold handling shared by `check` and `batch`

use super::OutputArgs;
use anyhow::{Context, Result};
use nidguard::config::CliDefaults;
use nidguard::models::{BatchReport, RiskLevel};
use nidguard::reporters::{self, OutputFormat, RenderOptions};

/// Output settings after merging CLI flags over config defaults
#[derive(Debug, Clone)]
pub(super) struct ResolvedOutput {
    pub format: OutputFormat,
    pub options: RenderOptions,
    pub fail_on: Option<RiskLevel>,
}

/// CLI flags win; config `[defaults]` fill the gaps
pub(super) fn resolve(args: &OutputArgs, defaults: &CliDefaults) -> Result<ResolvedOutput> {
    let format = args
        .format
        .as_deref()
        .or(defaults.format.as_deref())
        .unwrap_or("text")
        .parse::<OutputFormat>()
        .context("Invalid output format")?;

    let fail_on = args
        .fail_on
        .as_deref()
        .or(defaults.fail_on.as_deref())
        .map(str::parse::<RiskLevel>)
        .transpose()
        .context("Invalid fail_on level")?;
    if fail_on == Some(RiskLevel::Low) {
        anyhow::bail!("Invalid fail_on level 'low'. Valid levels: medium, high, error");
    }

    Ok(ResolvedOutput {
        format,
        options: RenderOptions {
            details: args.details,
            no_emoji: args.no_emoji || defaults.no_emoji.unwrap_or(false),
        },
        fail_on,
    })
}

/// Print the report, then apply the --fail-on threshold
pub(super) fn emit(report: &BatchReport, output: &ResolvedOutput) -> Result<()> {
    let rendered = reporters::report_with_format(report, output.format, output.options)?;
    print!("{}", rendered);
    if output.format == OutputFormat::Json {
        println!();
    }
    check_fail_threshold(output.fail_on, report)
}

/// Exit with code 1 when any verdict reaches the threshold (CI mode)
pub(super) fn check_fail_threshold(fail_on: Option<RiskLevel>, report: &BatchReport) -> Result<()> {
    if let Some(threshold) = fail_on {
        if should_fail(threshold, report) {
            eprintln!(
                "Failing due to --fail-on={} threshold",
                threshold.to_string().to_lowercase()
            );
            std::process::exit(1);
        }
    }
    Ok(())
}

fn should_fail(threshold: RiskLevel, report: &BatchReport) -> bool {
    report.summary.at_or_above(threshold) > 0
}
