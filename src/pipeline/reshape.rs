//! Wide-to-long reshape of the sales table.
//!
//! One input row per (item, store) with a `d_<n>` column per day becomes one
//! output row per (item, store, day):
//!
//! | unique_id | item_id | store_id | dept_id | cat_id | state_id | ds_id | y |
//!
//! No rows are dropped, so the output height is the input height times the
//! number of day columns. That height is the `original_row_count` the
//! row-drop audit compares against.

use polars::prelude::*;
use tracing::warn;

use crate::data::schema::{
    parse_day_index, require_columns, SchemaError, DAY_COLUMN_PREFIX, SALES_ID_COLUMNS,
};

use super::error::PipelineResult;

/// The long sales table together with its height before any filtering.
#[derive(Debug, Clone)]
pub struct LongSales {
    pub table: DataFrame,
    pub original_row_count: usize,
}

/// `item_id + "_" + store_id`, the series key shared by sales and prices.
pub fn unique_id_expr() -> Expr {
    concat_str([col("item_id"), col("store_id")], "_", false).alias("unique_id")
}

/// Day-value columns of the wide table with their day index, sorted by index.
///
/// Columns that start with the day prefix but do not carry a positive
/// integer index are skipped with a warning.
pub fn day_columns(sales: &DataFrame) -> Vec<(String, i32)> {
    let mut days = Vec::new();

    for name in sales.get_column_names() {
        let name = name.as_str();
        if !name.starts_with(DAY_COLUMN_PREFIX) {
            continue;
        }
        match parse_day_index(name) {
            Some(idx) => days.push((name.to_string(), idx)),
            None => warn!("Ignoring column '{}': not a day index column", name),
        }
    }

    days.sort_by_key(|(_, idx)| *idx);
    days
}

/// Unpivot the day columns into `(ds_id, y)` rows.
///
/// `ds_id` is the numeric suffix of the day column each value came from.
pub fn melt_sales(sales: &DataFrame) -> PipelineResult<LongSales> {
    require_columns(sales, SALES_ID_COLUMNS, "sales")?;

    let days = day_columns(sales);
    if days.is_empty() {
        return Err(SchemaError {
            context: "sales".to_string(),
            missing: vec![format!("{}<n>", DAY_COLUMN_PREFIX)],
        }
        .into());
    }

    let wide = sales.clone().lazy().with_column(unique_id_expr()).collect()?;

    let mut index: Vec<&str> = Vec::with_capacity(SALES_ID_COLUMNS.len() + 1);
    index.push("unique_id");
    index.extend_from_slice(SALES_ID_COLUMNS);
    let on: Vec<&str> = days.iter().map(|(name, _)| name.as_str()).collect();

    let mut exprs: Vec<Expr> = index.iter().map(|c| col(*c)).collect();
    exprs.push(
        col("variable")
            .str()
            .strip_prefix(lit(DAY_COLUMN_PREFIX))
            .cast(DataType::Int32)
            .alias("ds_id"),
    );
    exprs.push(col("value").alias("y"));

    let table = wide.unpivot(on, index)?.lazy().select(exprs).collect()?;

    let original_row_count = table.height();
    Ok(LongSales {
        table,
        original_row_count,
    })
}
