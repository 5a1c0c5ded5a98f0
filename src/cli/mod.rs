//! CLI command definitions and handlers

mod batch;
mod check;
mod init;
mod output;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use nidguard::config::{load_config_file, load_project_config, ProjectConfig};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Parse and validate workers count (1-64)
fn parse_workers(s: &str) -> Result<usize, String> {
    let n: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if n == 0 {
        Err("workers must be at least 1".to_string())
    } else if n > 64 {
        Err("workers cannot exceed 64".to_string())
    } else {
        Ok(n)
    }
}

/// nidguard - Heuristic fraud-risk scoring for national ID numbers
#[derive(Parser, Debug)]
#[command(name = "nidguard")]
#[command(
    version,
    about = "Heuristic fraud-risk scoring for national ID numbers",
    long_about = "nidguard checks national ID numbers for signs of fabrication: \
length and charset, known fake patterns, a Luhn-style checksum and the \
statistical distribution of digits. The results are combined into one \
weighted verdict (LOW, MEDIUM or HIGH risk).\n\n\
Scores are heuristics, not proof of validity.",
    after_help = "\
Examples:
  nidguard check 79927398713              Score one identifier
  nidguard check 1234567890 --details     Show the per-analyzer breakdown
  nidguard check 1234567890 --format json JSON output for scripting
  nidguard batch ids.txt --fail-on high   Exit code 1 if any HIGH verdict (CI mode)
  cat ids.txt | nidguard batch -          Read identifiers from stdin
  nidguard init                           Write an example nidguard.toml"
)]
pub struct Cli {
    /// Config file (default: nidguard.toml, .nidguardrc.json, then user config)
    #[arg(long, global = true, env = "NIDGUARD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    /// Number of parallel workers for batch evaluation (1-64)
    #[arg(long, global = true, default_value = "8", value_parser = parse_workers)]
    pub workers: usize,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output flags shared by `check` and `batch`
#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Output format: text, json
    #[arg(long, short = 'f', value_parser = ["text", "json"])]
    pub format: Option<String>,

    /// Show the per-analyzer breakdown
    #[arg(long)]
    pub details: bool,

    /// Exit with code 1 if any verdict is at or above this risk level
    #[arg(long, value_parser = ["medium", "high", "error"])]
    pub fail_on: Option<String>,

    /// Disable emoji in output (cleaner for CI logs)
    #[arg(long)]
    pub no_emoji: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Score one or more identifiers
    #[command(after_help = "\
Examples:
  nidguard check 79927398713
  nidguard check 79927398713 1234567890 --format json
  nidguard check 1234567890 --fail-on medium")]
    Check {
        /// Identifiers to score
        #[arg(required = true, num_args = 1..)]
        nids: Vec<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Score a file of identifiers (one per line, or a JSON array)
    #[command(after_help = "\
Examples:
  nidguard batch ids.txt
  nidguard batch ids.json --format json
  cat ids.txt | nidguard batch - --fail-on high")]
    Batch {
        /// Input file, or `-` for stdin
        input: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Write an example nidguard.toml in the current directory
    Init {
        /// Overwrite an existing nidguard.toml
        #[arg(long)]
        force: bool,
    },

    /// Show version information
    Version,
}

/// Resolve configuration: an explicit path must load, discovery never fails
fn resolve_config(explicit: Option<&Path>) -> Result<ProjectConfig> {
    match explicit {
        Some(path) => {
            debug!("Using config file {}", path.display());
            load_config_file(path)
        }
        None => {
            let cwd = std::env::current_dir()?;
            Ok(load_project_config(&cwd))
        }
    }
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Check { nids, output } => {
            let config = resolve_config(cli.config.as_deref())?;
            check::run(&nids, &output, &config)
        }

        Commands::Batch { input, output } => {
            let config = resolve_config(cli.config.as_deref())?;
            batch::run(&input, &output, &config, cli.workers)
        }

        Commands::Init { force } => {
            let cwd = std::env::current_dir()?;
            init::run(&cwd, force)
        }

        Commands::Version => {
            println!("nidguard {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
