//! Writes result tables to CSV or Parquet.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use polars::prelude::*;
use tracing::info;

use super::loader::{LoaderError, TableFormat};

/// Write `df` to `path`, creating parent directories as needed.
pub fn write_table(df: &mut DataFrame, path: &Path) -> Result<(), LoaderError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut file = File::create(path)?;
    let result = match TableFormat::from_path(path) {
        TableFormat::Csv => CsvWriter::new(&mut file).include_header(true).finish(df),
        TableFormat::Parquet => ParquetWriter::new(&mut file).finish(df).map(|_| ()),
    };
    result.map_err(|source| LoaderError::Polars {
        path: path.display().to_string(),
        source,
    })?;

    info!("Wrote {} rows x {} columns to {}", df.height(), df.width(), path.display());
    Ok(())
}

/// Write the train/test pair into `dir` as `train.<ext>` and `test.<ext>`.
pub fn write_split(
    train: &mut DataFrame,
    test: &mut DataFrame,
    dir: &Path,
    format: TableFormat,
) -> Result<(PathBuf, PathBuf), LoaderError> {
    let train_path = dir.join(format!("train.{}", format.extension()));
    let test_path = dir.join(format!("test.{}", format.extension()));
    write_table(train, &train_path)?;
    write_table(test, &test_path)?;
    Ok((train_path, test_path))
}
