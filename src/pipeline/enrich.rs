//! Calendar and price joins, then date-derived features.

use polars::prelude::*;
use tracing::warn;

use crate::data::schema::{require_columns, PRICE_COLUMNS};

use super::error::PipelineResult;
use super::reshape::unique_id_expr;

/// Columns the prepared calendar contributes to each sales row.
const CALENDAR_JOIN_COLUMNS: &[&str] = &["ds_id", "ds", "wm_yr_wk", "num_events"];

/// Left-join the prepared calendar on `ds_id`, attaching `ds`, `wm_yr_wk`
/// and `num_events`.
///
/// Day indices past the end of the calendar keep null calendar fields.
pub fn attach_calendar(long: DataFrame, calendar: &DataFrame) -> PipelineResult<DataFrame> {
    require_columns(&long, &["unique_id", "ds_id"], "calendar join (sales)")?;
    require_columns(calendar, CALENDAR_JOIN_COLUMNS, "calendar join (calendar)")?;

    let calendar = calendar.clone().lazy().select([
        col("ds_id").cast(DataType::Int32),
        col("ds"),
        col("wm_yr_wk").cast(DataType::Int64),
        col("num_events"),
    ]);

    let joined = long
        .lazy()
        .join(
            calendar,
            [col("ds_id")],
            [col("ds_id")],
            JoinArgs::new(JoinType::Left),
        )
        .collect()?;

    let unmatched = joined.column("ds")?.null_count();
    if unmatched > 0 {
        warn!(
            "{} sales rows have a day index with no calendar date; their calendar fields are null",
            unmatched
        );
    }

    Ok(joined)
}

/// The price table keyed by series: `unique_id, wm_yr_wk, sell_price`.
pub fn price_table(sell_prices: &DataFrame) -> PipelineResult<LazyFrame> {
    require_columns(sell_prices, PRICE_COLUMNS, "sell prices")?;

    Ok(sell_prices.clone().lazy().select([
        unique_id_expr(),
        col("wm_yr_wk").cast(DataType::Int64),
        col("sell_price").cast(DataType::Float64),
    ]))
}

/// Left-join `sell_price` on `(unique_id, wm_yr_wk)`.
///
/// Weeks without a recorded price get a null `sell_price`.
pub fn attach_prices(df: DataFrame, sell_prices: &DataFrame) -> PipelineResult<DataFrame> {
    require_columns(&df, &["unique_id", "wm_yr_wk"], "price join")?;

    let prices = price_table(sell_prices)?;
    let joined = df
        .lazy()
        .join(
            prices,
            [col("unique_id"), col("wm_yr_wk")],
            [col("unique_id"), col("wm_yr_wk")],
            JoinArgs::new(JoinType::Left),
        )
        .collect()?;

    Ok(joined)
}

/// Derive the calendar features from `ds`.
///
/// - `day_of_week`: Monday = 0 .. Sunday = 6
/// - `is_weekend`: 1 on Saturday and Sunday
/// - `week_of_month`: 1-based 7-day bucket, `(day_of_month - 1) / 7 + 1`
/// - `week_num_year`: ISO 8601 week number
pub fn add_time_features(df: DataFrame) -> PipelineResult<DataFrame> {
    require_columns(&df, &["ds"], "time features")?;

    let ds = col("ds");
    let featured = df
        .lazy()
        .with_columns([
            (ds.clone().dt().weekday().cast(DataType::Int32) - lit(1i32)).alias("day_of_week"),
            ds.clone().dt().day().cast(DataType::Int32).alias("day_of_month"),
            ds.clone().dt().month().cast(DataType::Int32).alias("month"),
            ds.clone().dt().week().cast(DataType::Int32).alias("week_num_year"),
            ds.dt().year().cast(DataType::Int32).alias("year"),
        ])
        .with_columns([
            col("day_of_week")
                .gt_eq(lit(5i32))
                .cast(DataType::Int32)
                .alias("is_weekend"),
            ((col("day_of_month") - lit(1i32)).floor_div(lit(7i32)) + lit(1i32))
                .cast(DataType::Int32)
                .alias("week_of_month"),
        ])
        .collect()?;

    Ok(featured)
}

/// Run all three enrichment steps.
pub fn enrich(
    long: DataFrame,
    calendar: &DataFrame,
    sell_prices: &DataFrame,
) -> PipelineResult<DataFrame> {
    let with_calendar = attach_calendar(long, calendar)?;
    let with_prices = attach_prices(with_calendar, sell_prices)?;
    add_time_features(with_prices)
}
