//! Stage sequencing.
//!
//! [`process`] is a pure function from the three source tables to the final
//! table and its row counters. [`DataProcessor`] wraps it for callers that
//! hold a configuration and want to process then split in two calls.

use polars::prelude::*;
use tracing::info;

use crate::config::PipelineConfig;
use crate::data::SourceTables;
use crate::split::{split_by_horizon, SeriesSplit};

use super::calendar::prepare_calendar;
use super::enrich::{add_time_features, attach_calendar, attach_prices};
use super::error::{PipelineError, PipelineResult};
use super::finalize::finalize;
use super::release::filter_before_release;
use super::reshape::melt_sales;

/// Output of one pipeline run.
#[derive(Debug, Clone)]
pub struct ProcessedData {
    /// Final table, one row per (series, day) on or after the series' release.
    pub table: DataFrame,
    /// Rows after the reshape, before any filtering.
    pub original_row_count: usize,
    /// Rows left after the release filter.
    pub filtered_row_count: usize,
}

/// Run every stage over the source tables.
pub fn process(tables: &SourceTables) -> PipelineResult<ProcessedData> {
    info!("Starting data processing...");

    let calendar = prepare_calendar(&tables.calendar)?;
    info!(
        "Step 1/6 complete: Prepared calendar. Data shape: {:?}",
        calendar.shape()
    );

    let long = melt_sales(&tables.sales)?;
    let original_row_count = long.original_row_count;
    info!(
        "Step 2/6 complete: Melted data. Data shape: {:?}",
        long.table.shape()
    );

    let df = attach_calendar(long.table, &calendar)?;
    info!(
        "Step 3/6 complete: Merged calendar data. Data shape: {:?}",
        df.shape()
    );

    let df = add_time_features(attach_prices(df, &tables.sell_prices)?)?;
    info!(
        "Step 4/6 complete: Added sell prices and time features. Data shape: {:?}",
        df.shape()
    );

    let df = filter_before_release(df, &tables.sell_prices)?;
    let filtered_row_count = df.height();
    info!(
        "Step 5/6 complete: Filtered out data before release week. Data shape: {:?}",
        df.shape()
    );

    if filtered_row_count > original_row_count {
        return Err(PipelineError::RowCountInvariant {
            original: original_row_count,
            filtered: filtered_row_count,
        });
    }

    let table = finalize(df)?;
    info!(
        "Step 6/6 complete: Finalized dataset. Data shape: {:?}",
        table.shape()
    );

    Ok(ProcessedData {
        table,
        original_row_count,
        filtered_row_count,
    })
}

/// Holds the source tables and horizon; processes once, then splits.
pub struct DataProcessor {
    tables: SourceTables,
    horizon: usize,
    processed: Option<ProcessedData>,
}

impl DataProcessor {
    pub fn new(tables: SourceTables, horizon: usize) -> Self {
        Self {
            tables,
            horizon,
            processed: None,
        }
    }

    /// Load the configured input tables.
    pub fn from_config(config: &PipelineConfig) -> PipelineResult<Self> {
        let tables = SourceTables::load(config)?;
        Ok(Self::new(tables, config.horizon))
    }

    pub fn horizon(&self) -> usize {
        self.horizon
    }

    /// Result of the last [`DataProcessor::process`] call, if any.
    pub fn processed(&self) -> Option<&ProcessedData> {
        self.processed.as_ref()
    }

    /// Run the pipeline and keep its output for [`DataProcessor::split`].
    pub fn process(&mut self) -> PipelineResult<&ProcessedData> {
        let processed = process(&self.tables)?;
        Ok(self.processed.insert(processed))
    }

    /// Split the processed table into per-series train/test sets.
    pub fn split(&self) -> PipelineResult<SeriesSplit> {
        let processed = self.processed.as_ref().ok_or(PipelineError::NotProcessed)?;
        split_by_horizon(&processed.table, self.horizon)
    }
}
