//! CLI argument parsing for Cotejar

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for analysis reports
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable console report (default)
    Text,
    /// JSON format for machine parsing
    Json,
    /// CSV summary table for spreadsheet analysis
    Csv,
    /// Standalone HTML report with charts
    Html,
}

/// Significance profile presets
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Profile {
    /// alpha = 0.05 (or the config file's value)
    Standard,
    /// alpha = 0.01, fewer false positives
    Strict,
    /// alpha = 0.10, catches weaker signals
    Permissive,
}

#[derive(Parser, Debug)]
#[command(name = "cotejar")]
#[command(version)]
#[command(about = "A/B conversion test analyzer with two-proportion z-tests", long_about = None)]
pub struct Cli {
    /// Path to the experiment CSV file
    pub input: PathBuf,

    /// Significance level for the two-sided test (overrides profile and config file)
    #[arg(short = 'a', long = "alpha", value_name = "ALPHA")]
    pub alpha: Option<f64>,

    /// Significance profile preset
    #[arg(long = "profile", value_enum, default_value = "standard")]
    pub profile: Profile,

    /// Output format
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Write the report into this directory instead of stdout (created if absent)
    #[arg(short = 'o', long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Include dataset exploration (shape, distributions, missing values)
    #[arg(long = "explore")]
    pub explore: bool,

    /// Include covariate and segment breakdowns (device, location, page views, time spent)
    #[arg(long = "breakdowns")]
    pub breakdowns: bool,

    /// TOML config file with column names, labels, and test settings
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable debug logging to stderr
    #[arg(long = "debug")]
    pub debug: bool,
}
