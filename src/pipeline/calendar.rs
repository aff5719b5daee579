//! Calendar preparation.
//!
//! Adds three columns to the raw calendar without touching its rows:
//! - `ds_id`: 1-based day index, matching the `d_<n>` sales columns
//! - `ds`: the parsed `date` as a polars `Date`
//! - `num_events`: 2 if the second event slot is filled, 1 if only the
//!   first is, 0 otherwise
//!
//! The day index is positional, so the calendar must be one row per
//! consecutive day. That is checked here rather than trusted.

use chrono::NaiveDate;
use polars::prelude::*;

use crate::data::dates::{date_column, date_values};
use crate::data::schema::{require_columns, CALENDAR_COLUMNS};

use super::error::{PipelineError, PipelineResult};

/// Build the calendar used by the join stage.
pub fn prepare_calendar(calendar: &DataFrame) -> PipelineResult<DataFrame> {
    require_columns(calendar, CALENDAR_COLUMNS, "calendar")?;

    let dates = date_values(calendar.column("date")?)?;
    check_consecutive(&dates)?;

    let ds_id: Vec<i32> = (1..=dates.len()).map(|idx| idx as i32).collect();

    let mut prepared = calendar.clone();
    prepared.with_column(Column::new("ds_id".into(), ds_id))?;
    prepared.with_column(date_column("ds", &dates)?)?;

    let prepared = prepared
        .lazy()
        .with_column(num_events_expr().alias("num_events"))
        .collect()?;

    Ok(prepared)
}

/// An event slot counts as filled when either its type or its name is present.
fn slot_filled(type_col: &str, name_col: &str) -> Expr {
    col(type_col).is_not_null().or(col(name_col).is_not_null())
}

fn num_events_expr() -> Expr {
    when(slot_filled("event_type_2", "event_name_2"))
        .then(lit(2i32))
        .when(slot_filled("event_type_1", "event_name_1"))
        .then(lit(1i32))
        .otherwise(lit(0i32))
        .cast(DataType::Int32)
}

/// Every row must carry a valid date exactly one day after the previous row.
fn check_consecutive(dates: &[Option<NaiveDate>]) -> PipelineResult<()> {
    let mut previous: Option<NaiveDate> = None;

    for (row, date) in dates.iter().enumerate() {
        let date = date.ok_or_else(|| {
            PipelineError::Calendar(format!("row {} has no valid date", row + 1))
        })?;

        if let Some(prev) = previous {
            if prev.succ_opt() != Some(date) {
                return Err(PipelineError::Calendar(format!(
                    "row {} date {} does not follow {} (day index d_{} would be misaligned)",
                    row + 1,
                    date,
                    prev,
                    row + 1
                )));
            }
        }
        previous = Some(date);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::fixtures;

    #[test]
    fn test_prepare_calendar_adds_columns_without_changing_rows() {
        let raw = fixtures::calendar();
        let prepared = prepare_calendar(&raw).unwrap();

        assert_eq!(prepared.height(), raw.height());
        assert_eq!(prepared.width(), raw.width() + 3);

        let ds_id: Vec<i32> = prepared
            .column("ds_id")
            .unwrap()
            .i32()
            .unwrap()
            .into_no_null_iter()
            .collect();
        assert_eq!(ds_id, (1..=10).collect::<Vec<_>>());

        let ds = date_values(prepared.column("ds").unwrap()).unwrap();
        assert_eq!(ds[0], NaiveDate::from_ymd_opt(2011, 1, 29));
        assert_eq!(ds[9], NaiveDate::from_ymd_opt(2011, 2, 7));
    }

    #[test]
    fn test_num_events() {
        let prepared = prepare_calendar(&fixtures::calendar()).unwrap();
        let num_events: Vec<i32> = prepared
            .column("num_events")
            .unwrap()
            .i32()
            .unwrap()
            .into_no_null_iter()
            .collect();

        assert_eq!(num_events, vec![0, 0, 2, 0, 0, 0, 0, 0, 1, 0]);
    }

    #[test]
    fn test_event_name_alone_fills_a_slot() {
        let raw = df!(
            "date" => &["2016-06-17", "2016-06-18", "2016-06-19"],
            "wm_yr_wk" => &[11620i64, 11621, 11621],
            "event_name_1" => &[None, Some("Ramadan starts"), Some("NBAFinalsEnd")],
            "event_type_1" => &[None, None, Some("Sporting")],
            "event_name_2" => &[None::<&str>, None, Some("Father's day")],
            "event_type_2" => &[None::<&str>, None, None],
        )
        .unwrap();

        let prepared = prepare_calendar(&raw).unwrap();
        let num_events: Vec<i32> = prepared
            .column("num_events")
            .unwrap()
            .i32()
            .unwrap()
            .into_no_null_iter()
            .collect();

        assert_eq!(num_events, vec![0, 1, 2]);
    }

    #[test]
    fn test_calendar_with_gap_is_rejected() {
        let raw = df!(
            "date" => &["2011-01-29", "2011-01-30", "2011-02-01"],
            "wm_yr_wk" => &[11101i64, 11101, 11101],
            "event_name_1" => &[None::<&str>, None, None],
            "event_type_1" => &[None::<&str>, None, None],
            "event_name_2" => &[None::<&str>, None, None],
            "event_type_2" => &[None::<&str>, None, None],
        )
        .unwrap();

        let err = prepare_calendar(&raw).unwrap_err();
        assert!(matches!(err, PipelineError::Calendar(ref msg) if msg.contains("row 3")));
    }

    #[test]
    fn test_calendar_missing_event_columns() {
        let raw = df!(
            "date" => &["2011-01-29"],
            "wm_yr_wk" => &[11101i64],
        )
        .unwrap();

        match prepare_calendar(&raw) {
            Err(PipelineError::Schema(err)) => {
                assert_eq!(err.context, "calendar");
                assert_eq!(err.missing.len(), 4);
            }
            other => panic!("expected schema error, got {:?}", other),
        }
    }
}
