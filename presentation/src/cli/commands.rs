//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for consultation results
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Full formatted output: plan, conference, market movements
    Full,
    /// Only the synthesized report
    Summary,
    /// JSON output
    Json,
}

/// CLI arguments for consilium
#[derive(Parser, Debug)]
#[command(name = "consilium")]
#[command(author, version, about = "Specialist panel - concurrent case consultation with a prediction market")]
#[command(long_about = r#"
Consilium runs a panel of specialist agents over a case, reconciles their
disagreements in a dialogue round, and settles a token market in which each
agent stakes on its own predicted outcomes.

The process has three phases plus settlement:
1. Collection: All specialists assess the case in parallel
2. Conference: Specialists answer each other's targeted questions
3. Synthesis: A structured report is built from the successful responses
   (predictions then settle against the panel's own agreement, and again
   whenever richer feedback arrives)

Configuration files are loaded from (in priority order):
1. --config <path>      Explicit config file
2. ./consilium.toml     Project-level config
3. ~/.config/consilium/config.toml   Global config

Example:
  consilium case.json
  consilium case.json --fast --min-responses 2
  consilium case.json -s pain -s movement -s triage
  consilium case.json --outcomes followup.json --source follow_up
"#)]
pub struct Cli {
    /// Path to the case file (JSON)
    pub case: Option<PathBuf>,

    /// Specialties to include in the panel (can be specified multiple times)
    #[arg(short, long, value_name = "TAG")]
    pub specialty: Vec<String>,

    /// Partial-quorum fast mode: return at min-responses successes
    #[arg(long)]
    pub fast: bool,

    /// Successful responses required before a fast-mode run returns
    #[arg(long, value_name = "N")]
    pub min_responses: Option<usize>,

    /// Outcome feedback file (JSON map of dimension -> value) applied as
    /// an extra resolution after the consultation
    #[arg(long, value_name = "PATH")]
    pub outcomes: Option<PathBuf>,

    /// Ground-truth source of the outcome feedback
    #[arg(long, value_name = "SOURCE", default_value = "user_modal")]
    pub source: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "full")]
    pub output: OutputFormat,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Write operation logs to daily-rotated files in this directory
    /// instead of stderr
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show market statistics after the run
    #[arg(long)]
    pub stats: bool,
}
