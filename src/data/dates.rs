//! Conversions between polars date columns and `chrono::NaiveDate`.

use chrono::{Datelike, NaiveDate};
use polars::prelude::*;

/// Date format used by the calendar file and by written outputs.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Days between 0001-01-01 (CE day 1) and the Unix epoch.
const UNIX_EPOCH_CE_DAYS: i32 = 719_163;

/// Convert days since Unix epoch to NaiveDate.
pub fn date_from_days(days: i32) -> NaiveDate {
    NaiveDate::from_num_days_from_ce_opt(days + UNIX_EPOCH_CE_DAYS).unwrap_or_default()
}

/// Convert a NaiveDate to days since Unix epoch (the physical value of a polars `Date`).
pub fn days_from_date(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - UNIX_EPOCH_CE_DAYS
}

/// Read a column as dates.
///
/// Accepts a native `Date` or `Datetime` column or `%Y-%m-%d` text. Datetimes
/// are truncated to their day. Nulls and unparseable text come back as `None`;
/// any other dtype is an error.
pub fn date_values(column: &Column) -> PolarsResult<Vec<Option<NaiveDate>>> {
    match column.dtype() {
        DataType::Date => {
            let physical = column.cast(&DataType::Int32)?;
            Ok(physical
                .i32()?
                .into_iter()
                .map(|days| days.map(date_from_days))
                .collect())
        }
        DataType::Datetime(_, _) => date_values(&column.cast(&DataType::Date)?),
        DataType::String => Ok(column
            .str()?
            .into_iter()
            .map(|s| s.and_then(|s| NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok()))
            .collect()),
        other => Err(PolarsError::SchemaMismatch(
            format!(
                "column '{}' has type {}, expected a date or {} text",
                column.name(),
                other,
                DATE_FORMAT
            )
            .into(),
        )),
    }
}

/// Build a polars `Date` column from optional dates.
pub fn date_column(name: &str, dates: &[Option<NaiveDate>]) -> PolarsResult<Column> {
    let days: Vec<Option<i32>> = dates.iter().map(|d| d.map(days_from_date)).collect();
    Column::new(name.into(), days).cast(&DataType::Date)
}
