use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use cotejar::analysis::{self, AnalysisConfig};
use cotejar::cli::{Cli, OutputFormat, Profile};
use cotejar::covariates;
use cotejar::csv_output;
use cotejar::dataset::{Dataset, DatasetSchema};
use cotejar::html_output::HtmlReport;
use cotejar::json_output;
use cotejar::report;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

/// On-disk configuration: dataset schema plus analysis settings
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    schema: DatasetSchema,
    analysis: AnalysisConfig,
}

impl FileConfig {
    fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("invalid config file {}", path.display()))
    }
}

/// Resolve the effective analysis configuration from file, profile, and flags
fn resolve_config(args: &Cli, file: &FileConfig) -> AnalysisConfig {
    let mut config = match args.profile {
        Profile::Standard => file.analysis.clone(),
        Profile::Strict => AnalysisConfig::strict(),
        Profile::Permissive => AnalysisConfig::permissive(),
    };

    if let Some(alpha) = args.alpha {
        config.alpha = alpha;
    }

    config
}

/// File name the rendered report is written under `--output-dir`
fn output_file_name(format: OutputFormat) -> &'static str {
    match format {
        OutputFormat::Text => "ab_test_report.txt",
        OutputFormat::Json => "ab_test_summary.json",
        OutputFormat::Csv => "ab_test_summary.csv",
        OutputFormat::Html => "ab_test_report.html",
    }
}

fn main() -> Result<()> {
    let args = Cli::parse();

    init_tracing(args.debug);

    let file_config = match &args.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    let config = resolve_config(&args, &file_config);

    let dataset = Dataset::from_file(&args.input, &file_config.schema)
        .with_context(|| format!("failed to load dataset {}", args.input.display()))?;
    tracing::debug!(rows = dataset.observations.len(), "dataset loaded");

    let assessment = analysis::assess(&dataset.observations, &config)
        .context("analysis failed")?;

    let exploration = args.explore.then(|| dataset.explore());
    let breakdowns = args
        .breakdowns
        .then(|| covariates::compute_breakdowns(&dataset.observations));

    let rendered = match args.format {
        OutputFormat::Text => {
            report::render(&assessment, exploration.as_ref(), breakdowns.as_ref())
        }
        OutputFormat::Json => {
            json_output::render(&assessment, exploration.as_ref(), breakdowns.as_ref())
                .context("failed to serialize report")?
        }
        OutputFormat::Csv => csv_output::render(&assessment),
        OutputFormat::Html => {
            HtmlReport::new(&assessment, exploration.as_ref(), breakdowns.as_ref()).to_html()
        }
    };

    match &args.output_dir {
        Some(dir) => {
            fs::create_dir_all(dir)
                .with_context(|| format!("failed to create output directory {}", dir.display()))?;
            let path = dir.join(output_file_name(args.format));
            fs::write(&path, &rendered)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Results saved to {}", path.display());
        }
        None => print!("{rendered}"),
    }

    Ok(())
}
