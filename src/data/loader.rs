//! Tabular loader for the sales, calendar and price files.
//!
//! Files are read whole into a `DataFrame`. The format is picked from the
//! extension: `.parquet` goes through the parquet reader, anything else is
//! read as CSV with a header row.
//!
//! A missing file and an empty file are reported as distinct errors so the
//! caller can tell a bad path from a truncated export.

use std::fs::File;
use std::path::{Path, PathBuf};

use polars::prelude::*;
use thiserror::Error;
use tracing::info;

use crate::config::PipelineConfig;

/// Rows used for CSV schema inference. The event columns of the calendar
/// are null for long stretches, so this needs to be generous.
const INFER_SCHEMA_ROWS: usize = 10_000;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("File is empty: {0}")]
    EmptyFile(String),

    #[error("Polars error while reading {path}: {source}")]
    Polars {
        path: String,
        #[source]
        source: PolarsError,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// On-disk format of a table, picked from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Csv,
    Parquet,
}

impl TableFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("parquet") => Self::Parquet,
            _ => Self::Csv,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Parquet => "parquet",
        }
    }
}

/// The three raw input tables, as loaded.
#[derive(Debug, Clone)]
pub struct SourceTables {
    pub sales: DataFrame,
    pub calendar: DataFrame,
    pub sell_prices: DataFrame,
}

impl SourceTables {
    /// Load all three tables named by the configuration.
    pub fn load(config: &PipelineConfig) -> Result<Self, LoaderError> {
        Ok(Self {
            sales: load_table(&config.sales_filepath)?,
            calendar: load_table(&config.calendar_filepath)?,
            sell_prices: load_table(&config.sell_prices_filepath)?,
        })
    }
}

/// Load a single table from disk.
pub fn load_table(path: &Path) -> Result<DataFrame, LoaderError> {
    info!("Loading data from {}", path.display());

    let shown = path.display().to_string();
    if !path.exists() {
        return Err(LoaderError::FileNotFound(shown));
    }
    if std::fs::metadata(path)?.len() == 0 {
        return Err(LoaderError::EmptyFile(shown));
    }

    let df = match TableFormat::from_path(path) {
        TableFormat::Parquet => read_parquet(path),
        TableFormat::Csv => read_csv(path.to_path_buf()),
    }
    .map_err(|source| LoaderError::Polars {
        path: shown.clone(),
        source,
    })?;

    if df.width() == 0 || df.height() == 0 {
        return Err(LoaderError::EmptyFile(shown));
    }

    info!("Loaded {} rows x {} columns from {}", df.height(), df.width(), shown);
    Ok(df)
}

fn read_csv(path: PathBuf) -> PolarsResult<DataFrame> {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .try_into_reader_with_file_path(Some(path))?
        .finish()
}

fn read_parquet(path: &Path) -> PolarsResult<DataFrame> {
    let file = File::open(path)?;
    ParquetReader::new(file).finish()
}
