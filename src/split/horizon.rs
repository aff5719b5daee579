//! Trailing-horizon train/test split.
//!
//! Each series is ordered by date; its last `horizon` rows form the test
//! window and everything before goes to training. A series with `horizon`
//! rows or fewer is kept whole in training.

use polars::prelude::*;
use tracing::info;

use crate::data::schema::{require_columns, SERIES_KEY_COLUMNS};
use crate::pipeline::PipelineResult;

/// Train and test tables built from one finalized table.
#[derive(Debug, Clone)]
pub struct SeriesSplit {
    /// Training prefixes, ordered by (unique_id, ds).
    pub train: DataFrame,
    /// Test windows, ordered by (unique_id, ds).
    pub test: DataFrame,
    /// Number of distinct series seen.
    pub series_count: usize,
    /// Series too short to contribute a test window.
    pub short_series_count: usize,
}

/// Split every series of `df` at `horizon` rows from its end.
pub fn split_by_horizon(df: &DataFrame, horizon: usize) -> PipelineResult<SeriesSplit> {
    require_columns(df, SERIES_KEY_COLUMNS, "split")?;

    let sorted = df.sort(
        ["unique_id", "ds"],
        SortMultipleOptions::default().with_maintain_order(true),
    )?;

    let ids = sorted.column("unique_id")?.cast(&DataType::String)?;
    let keys: Vec<Option<&str>> = ids.str()?.into_iter().collect();

    let mut in_test = vec![false; keys.len()];
    let mut series_count = 0;
    let mut short_series_count = 0;

    let mut start = 0;
    while start < keys.len() {
        let mut end = start + 1;
        while end < keys.len() && keys[end] == keys[start] {
            end += 1;
        }

        series_count += 1;
        if end - start > horizon {
            in_test[end - horizon..end].fill(true);
        } else {
            short_series_count += 1;
        }
        start = end;
    }

    let in_train: Vec<bool> = in_test.iter().map(|flag| !flag).collect();
    let train = sorted.filter(&BooleanChunked::from_slice("train".into(), &in_train))?;
    let test = sorted.filter(&BooleanChunked::from_slice("test".into(), &in_test))?;

    info!("Train DataFrame shape: {:?}", train.shape());
    info!("Test DataFrame shape: {:?}", test.shape());
    if short_series_count > 0 {
        info!(
            "{} of {} series have {} rows or fewer and are kept whole in train",
            short_series_count, series_count, horizon
        );
    }

    Ok(SeriesSplit {
        train,
        test,
        series_count,
        short_series_count,
    })
}
