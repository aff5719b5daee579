//! Column contracts for the three input tables and the final output table.

use std::collections::HashSet;

use polars::prelude::*;
use thiserror::Error;

/// Identifying columns carried by every row of the wide sales table.
pub const SALES_ID_COLUMNS: &[&str] = &["item_id", "store_id", "dept_id", "cat_id", "state_id"];

/// Required columns of the raw calendar table.
pub const CALENDAR_COLUMNS: &[&str] = &[
    "date",
    "wm_yr_wk",
    "event_type_1",
    "event_name_1",
    "event_type_2",
    "event_name_2",
];

/// Required columns of the weekly price table.
pub const PRICE_COLUMNS: &[&str] = &["item_id", "store_id", "wm_yr_wk", "sell_price"];

/// Output schema, in order.
pub const FINAL_COLUMNS: &[&str] = &[
    "unique_id",
    "ds",
    "y",
    "sell_price",
    "num_events",
    "cat_id",
    "dept_id",
    "state_id",
    "store_id",
    "day_of_week",
    "is_weekend",
    "day_of_month",
    "week_of_month",
    "month",
    "week_num_year",
    "year",
];

/// Columns every audited table must carry.
pub const SERIES_KEY_COLUMNS: &[&str] = &["unique_id", "ds"];

/// Prefix of the per-day value columns in the wide sales table (`d_1`, `d_2`, ...).
pub const DAY_COLUMN_PREFIX: &str = "d_";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{context}: missing required columns {missing:?}")]
pub struct SchemaError {
    pub context: String,
    pub missing: Vec<String>,
}

/// Fail with a [`SchemaError`] naming `context` unless `df` has every column in `required`.
pub fn require_columns(
    df: &DataFrame,
    required: &[&str],
    context: &str,
) -> Result<(), SchemaError> {
    let present: HashSet<&str> = df
        .get_column_names()
        .into_iter()
        .map(|name| name.as_str())
        .collect();

    let missing: Vec<String> = required
        .iter()
        .filter(|name| !present.contains(*name))
        .map(|name| name.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(SchemaError {
            context: context.to_string(),
            missing,
        })
    }
}

/// Parse the day index out of a `d_<n>` column name. Returns `None` for
/// anything else, including `d_0`.
pub fn parse_day_index(name: &str) -> Option<i32> {
    let suffix = name.strip_prefix(DAY_COLUMN_PREFIX)?;
    if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    suffix.parse::<i32>().ok().filter(|idx| *idx >= 1)
}
