//! Text (terminal) reporter with colors and formatting

use super::RenderOptions;
use crate::models::{BatchEntry, BatchReport, CheckStatus, RiskLevel, RiskSummary};
use anyhow::Result;
use console::{style, StyledObject};

fn risk_icon(level: RiskLevel, no_emoji: bool) -> &'static str {
    match (level, no_emoji) {
        (RiskLevel::Low, false) => "✅",
        (RiskLevel::Medium, false) => "⚠️ ",
        (RiskLevel::High, false) => "❌",
        (RiskLevel::Error, false) => "💥",
        (RiskLevel::Low, true) => "[OK]  ",
        (RiskLevel::Medium, true) => "[WARN]",
        (RiskLevel::High, true) => "[FAIL]",
        (RiskLevel::Error, true) => "[ERR] ",
    }
}

fn styled_risk(level: RiskLevel) -> StyledObject<String> {
    let label = match level {
        RiskLevel::Error => "ERROR".to_string(),
        other => format!("{} RISK", other),
    };
    match level {
        RiskLevel::Low => style(label).green().bold(),
        RiskLevel::Medium => style(label).yellow().bold(),
        RiskLevel::High => style(label).red().bold(),
        RiskLevel::Error => style(label).magenta().bold(),
    }
}

fn status_tag(status: CheckStatus) -> StyledObject<&'static str> {
    match status {
        CheckStatus::Pass => style("pass").green(),
        CheckStatus::Fail => style("fail").red(),
        CheckStatus::Skipped => style("skipped").dim(),
    }
}

/// Render report as formatted terminal output
pub fn render(report: &BatchReport, options: RenderOptions) -> Result<String> {
    let mut out = String::new();

    for entry in &report.entries {
        render_entry(&mut out, entry, options);
    }

    if report.entries.len() > 1 {
        render_summary(&mut out, &report.summary);
    }

    Ok(out)
}

fn render_entry(out: &mut String, entry: &BatchEntry, options: RenderOptions) {
    let v = &entry.verdict;
    out.push_str(&format!(
        "{} {}  {}  {}\n",
        risk_icon(v.overall_risk, options.no_emoji),
        style(&entry.input).bold(),
        styled_risk(v.overall_risk),
        style(format!("({}% risk)", v.risk_percent())).dim()
    ));
    out.push_str(&format!("    {}\n", v.reason));
    out.push_str(&format!("    {}\n", style(&v.detail).dim()));

    if let Some(ref err) = v.error {
        out.push_str(&format!("    {} {}\n", style("error:").red(), err));
    }

    for detail in &v.risk_details {
        out.push_str(&format!("    - {}\n", detail));
    }

    if options.details {
        for check in v.check_summaries() {
            let level = check
                .risk_level
                .map(|l| l.to_string())
                .unwrap_or_else(|| "-".to_string());
            out.push_str(&format!(
                "      {:<24} {:<7} {:<6} {}\n",
                check.name,
                status_tag(check.status),
                level,
                check.detail.as_deref().unwrap_or("")
            ));
        }
    }

    out.push('\n');
}

fn render_summary(out: &mut String, summary: &RiskSummary) {
    let mut parts = vec![format!("{} low", summary.low)];
    if summary.medium > 0 {
        parts.push(style(format!("{} medium", summary.medium)).yellow().to_string());
    }
    if summary.high > 0 {
        parts.push(style(format!("{} high", summary.high)).red().to_string());
    }
    if summary.error > 0 {
        parts.push(style(format!("{} error", summary.error)).magenta().to_string());
    }
    out.push_str(&format!(
        "{} {} checked, {} valid  ({})\n",
        style("SUMMARY").bold(),
        summary.total,
        summary.valid,
        parts.join(" | ")
    ));
}
