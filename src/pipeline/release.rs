//! Release-week filter.
//!
//! A series' release week is the first `wm_yr_wk` with a recorded price.
//! Rows before it are pre-listing zeros and are dropped. This is the only
//! stage that removes rows.

use polars::prelude::*;

use crate::data::schema::require_columns;

use super::enrich::price_table;
use super::error::PipelineResult;

/// One row per `unique_id` with its `release` week.
pub fn release_weeks(sell_prices: &DataFrame) -> PipelineResult<DataFrame> {
    let releases = price_table(sell_prices)?
        .group_by([col("unique_id")])
        .agg([col("wm_yr_wk").min().alias("release")])
        .collect()?;

    Ok(releases)
}

/// Keep rows with `wm_yr_wk >= release`.
///
/// Rows whose week or release is null cannot be placed relative to the
/// release week and are dropped as well. The `release` column is left on the
/// output for the finalizer to drop.
pub fn filter_before_release(
    enriched: DataFrame,
    sell_prices: &DataFrame,
) -> PipelineResult<DataFrame> {
    require_columns(&enriched, &["unique_id", "wm_yr_wk"], "release filter")?;

    let releases = release_weeks(sell_prices)?;
    let filtered = enriched
        .lazy()
        .join(
            releases.lazy(),
            [col("unique_id")],
            [col("unique_id")],
            JoinArgs::new(JoinType::Left),
        )
        .filter(col("wm_yr_wk").gt_eq(col("release")))
        .collect()?;

    Ok(filtered)
}
