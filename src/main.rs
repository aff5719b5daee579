//! M5 sales preparation CLI.
//!
//! # Usage
//!
//! ```bash
//! # Process, split and audit the configured inputs
//! m5-prep run --config config/default.toml
//!
//! # Same, writing train/test tables
//! m5-prep run --config config/default.toml --output data/processed --format parquet
//!
//! # Audit previously written tables
//! m5-prep validate --train data/processed/train.csv --test data/processed/test.csv
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{info, warn};

use m5_prep::data::{load_table, write_split};
use m5_prep::validation::DataIntegrityReport;
use m5_prep::{DataIntegrityValidator, DataProcessor, PipelineConfig, TableFormat};

const SEPARATOR: &str = "============================================================";

#[derive(Parser)]
#[command(name = "m5-prep")]
#[command(about = "Reshape, enrich and split M5 sales data into per-series train/test sets")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process the configured inputs, split them and run the integrity checks
    Run {
        /// Path to configuration file
        #[arg(short, long, default_value = "config/default.toml")]
        config: PathBuf,

        /// Directory to write train/test tables into
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output table format
        #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
        format: OutputFormat,
    },

    /// Run the integrity checks on previously written train/test tables
    Validate {
        /// Path to the training table
        #[arg(long)]
        train: PathBuf,

        /// Path to the test table
        #[arg(long)]
        test: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Csv,
    Parquet,
}

impl From<OutputFormat> for TableFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Csv => TableFormat::Csv,
            OutputFormat::Parquet => TableFormat::Parquet,
        }
    }
}

fn cmd_run(config_path: &Path, output: Option<PathBuf>, format: OutputFormat) -> Result<()> {
    let config = PipelineConfig::load(config_path)
        .with_context(|| format!("Failed to load config {}", config_path.display()))?;

    info!("Initializing DataProcessor...");
    let mut processor = DataProcessor::from_config(&config).context("Failed to load input tables")?;

    let (original_row_count, filtered_row_count) = {
        let processed = processor.process().context("Data processing failed")?;
        (processed.original_row_count, processed.filtered_row_count)
    };
    info!("Data processing completed.");

    info!("Splitting data into train and test sets (horizon {})...", processor.horizon());
    let mut split = processor.split().context("Train/test split failed")?;

    info!("Initializing DataIntegrityValidator...");
    let validator = DataIntegrityValidator::new(split.train.clone(), split.test.clone())
        .with_row_counts(original_row_count, filtered_row_count);

    if let Some(summary) = validator.row_drop_summary() {
        info!("\n{}", summary.context("Row-drop check failed")?);
    }
    let report = validator.validate().context("Validation failed")?;
    log_report(&report);

    if let Some(dir) = output {
        let (train_path, test_path) =
            write_split(&mut split.train, &mut split.test, &dir, format.into())
                .context("Failed to write train/test tables")?;
        info!("Train written to {}", train_path.display());
        info!("Test written to {}", test_path.display());
    }

    Ok(())
}

fn cmd_validate(train: &Path, test: &Path) -> Result<()> {
    let train = load_table(train).context("Failed to load training table")?;
    let test = load_table(test).context("Failed to load test table")?;

    let report = DataIntegrityValidator::new(train, test)
        .validate()
        .context("Validation failed")?;
    log_report(&report);

    Ok(())
}

fn log_report(report: &DataIntegrityReport) {
    info!("{}", SEPARATOR);
    for check in &report.checks {
        if check.passed {
            info!("[PASS] {}: {}", check.name, check.message);
        } else {
            warn!("[FAIL] {}: {}", check.name, check.message);
            if let Some(details) = &check.details {
                warn!("\n{}", details);
            }
        }
    }
    info!("{}", SEPARATOR);
    info!("{}", report.summary());
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("m5_prep=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            output,
            format,
        } => cmd_run(&config, output, format)?,
        Commands::Validate { train, test } => cmd_validate(&train, &test)?,
    }

    Ok(())
}
