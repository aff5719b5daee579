//! Structural audit of the train/test tables.
//!
//! Checks:
//! - Row-drop accounting (reshape count vs. release-filter count)
//! - Shape and null counts per table
//! - Date continuity per series (no missing days between first and last)
//! - Key uniqueness (one row per unique_id and ds)
//!
//! Findings come back as values. Only a malformed table (missing key
//! columns) or a broken row-count invariant is an error.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use chrono::{Duration, NaiveDate};
use polars::prelude::*;
use rayon::prelude::*;
use thiserror::Error;

use crate::data::dates::date_values;
use crate::data::schema::{require_columns, SchemaError, SERIES_KEY_COLUMNS};

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),

    #[error(
        "Filtered row count ({filtered}) cannot be greater than original row count ({original})"
    )]
    RowCountInvariant { original: usize, filtered: usize },
}

pub type ValidationResult<T> = Result<T, ValidationError>;

/// Rows removed by the release filter.
#[derive(Debug, Clone, PartialEq)]
pub struct RowDropSummary {
    pub original_row_count: usize,
    pub filtered_row_count: usize,
    pub dropped_row_count: usize,
    pub drop_percentage: f64,
}

impl fmt::Display for RowDropSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Original row count:                   {}", self.original_row_count)?;
        writeln!(f, "Filter rows before release row count: {}", self.filtered_row_count)?;
        writeln!(f, "Number of rows dropped:               {}", self.dropped_row_count)?;
        write!(f, "Percentage of rows dropped:           {:.2}%", self.drop_percentage)
    }
}

/// Compare the reshape and release-filter row counts.
pub fn row_drop_summary(
    original_row_count: usize,
    filtered_row_count: usize,
) -> ValidationResult<RowDropSummary> {
    if filtered_row_count > original_row_count {
        return Err(ValidationError::RowCountInvariant {
            original: original_row_count,
            filtered: filtered_row_count,
        });
    }

    let dropped_row_count = original_row_count - filtered_row_count;
    let drop_percentage = if original_row_count == 0 {
        0.0
    } else {
        dropped_row_count as f64 / original_row_count as f64 * 100.0
    };

    Ok(RowDropSummary {
        original_row_count,
        filtered_row_count,
        dropped_row_count,
        drop_percentage,
    })
}

/// Shape and null counts of one table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableNullReport {
    pub name: String,
    pub rows: usize,
    pub columns: usize,
    /// Columns with at least one null, in table order.
    pub null_counts: Vec<(String, usize)>,
}

impl TableNullReport {
    pub fn from_table(name: &str, df: &DataFrame) -> Self {
        let null_counts = df
            .get_columns()
            .iter()
            .filter(|column| column.null_count() > 0)
            .map(|column| (column.name().to_string(), column.null_count()))
            .collect();

        Self {
            name: name.to_string(),
            rows: df.height(),
            columns: df.width(),
            null_counts,
        }
    }

    pub fn has_nulls(&self) -> bool {
        !self.null_counts.is_empty()
    }
}

/// Shape and null counts of several named tables.
#[derive(Debug, Clone, PartialEq)]
pub struct NullShapeSummary {
    pub tables: Vec<TableNullReport>,
}

impl NullShapeSummary {
    pub fn has_nulls(&self) -> bool {
        self.tables.iter().any(TableNullReport::has_nulls)
    }
}

impl fmt::Display for NullShapeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for table in &self.tables {
            writeln!(f, "{} shape: ({}, {})", table.name, table.rows, table.columns)?;
            if table.null_counts.is_empty() {
                writeln!(f, "{} null values: none", table.name)?;
            } else {
                writeln!(f, "{} null values:", table.name)?;
                for (column, count) in &table.null_counts {
                    writeln!(f, "  {:<16} {}", column, count)?;
                }
            }
        }
        Ok(())
    }
}

pub fn nulls_and_shape(tables: &[(&str, &DataFrame)]) -> NullShapeSummary {
    NullShapeSummary {
        tables: tables
            .iter()
            .map(|(name, df)| TableNullReport::from_table(name, df))
            .collect(),
    }
}

/// Missing days per series.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DateGapReport {
    pub series_checked: usize,
    /// Only series with at least one missing day appear here.
    pub missing: BTreeMap<String, Vec<NaiveDate>>,
}

impl DateGapReport {
    pub fn has_gaps(&self) -> bool {
        !self.missing.is_empty()
    }

    pub fn missing_date_count(&self) -> usize {
        self.missing.values().map(Vec::len).sum()
    }
}

impl fmt::Display for DateGapReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.has_gaps() {
            return write!(f, "No missing timestamp gaps found in any time series.");
        }
        let lines: Vec<String> = self
            .missing
            .iter()
            .map(|(id, dates)| {
                let dates: Vec<String> = dates.iter().map(|d| d.to_string()).collect();
                format!("{}: {}", id, dates.join(", "))
            })
            .collect();
        write!(f, "{}", lines.join("\n"))
    }
}

/// Every day absent between each series' own first and last date.
///
/// Rows with a null `unique_id` or `ds` are ignored.
pub fn check_date_gaps(df: &DataFrame) -> ValidationResult<DateGapReport> {
    require_columns(df, SERIES_KEY_COLUMNS, "date gap check")?;

    let ids = df.column("unique_id")?.cast(&DataType::String)?;
    let dates = date_values(df.column("ds")?)?;

    let mut by_series: HashMap<&str, Vec<NaiveDate>> = HashMap::new();
    for (id, date) in ids.str()?.into_iter().zip(dates) {
        if let (Some(id), Some(date)) = (id, date) {
            by_series.entry(id).or_default().push(date);
        }
    }

    let series_checked = by_series.len();
    let missing: BTreeMap<String, Vec<NaiveDate>> = by_series
        .into_par_iter()
        .filter_map(|(id, dates)| {
            let gaps = missing_days(dates);
            (!gaps.is_empty()).then(|| (id.to_string(), gaps))
        })
        .collect();

    Ok(DateGapReport {
        series_checked,
        missing,
    })
}

fn missing_days(mut dates: Vec<NaiveDate>) -> Vec<NaiveDate> {
    dates.sort_unstable();
    dates.dedup();

    let mut missing = Vec::new();
    for window in dates.windows(2) {
        let mut day = window[0] + Duration::days(1);
        while day < window[1] {
            missing.push(day);
            day += Duration::days(1);
        }
    }
    missing
}

/// A (unique_id, ds) pair that occurs more than once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateKey {
    pub unique_id: Option<String>,
    pub ds: Option<NaiveDate>,
    pub count: usize,
}

#[derive(Debug, Clone)]
pub struct DuplicateKeyReport {
    /// Offending pairs, sorted by key.
    pub duplicates: Vec<DuplicateKey>,
    /// Every row belonging to an offending pair, in table order.
    pub rows: DataFrame,
}

impl DuplicateKeyReport {
    pub fn has_duplicates(&self) -> bool {
        !self.duplicates.is_empty()
    }
}

impl fmt::Display for DuplicateKeyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.has_duplicates() {
            return write!(f, "No duplicate unique_id for any date found.");
        }
        writeln!(
            f,
            "Duplicate entries found for the following unique_id and ds combinations:"
        )?;
        for dup in &self.duplicates {
            let ds = dup.ds.map(|d| d.to_string()).unwrap_or_else(|| "null".to_string());
            writeln!(
                f,
                "  {} {} ({} rows)",
                dup.unique_id.as_deref().unwrap_or("null"),
                ds,
                dup.count
            )?;
        }
        write!(f, "{}", self.rows)
    }
}

/// Find (unique_id, ds) pairs that appear more than once.
pub fn check_duplicate_keys(df: &DataFrame) -> ValidationResult<DuplicateKeyReport> {
    require_columns(df, SERIES_KEY_COLUMNS, "duplicate key check")?;

    let ids = df.column("unique_id")?.cast(&DataType::String)?;
    let dates = date_values(df.column("ds")?)?;
    let keys: Vec<(Option<&str>, Option<NaiveDate>)> = ids.str()?.into_iter().zip(dates).collect();

    let mut counts: HashMap<(Option<&str>, Option<NaiveDate>), usize> = HashMap::new();
    for key in &keys {
        *counts.entry(*key).or_insert(0) += 1;
    }

    let mask: Vec<bool> = keys.iter().map(|key| counts[key] > 1).collect();
    let rows = df.filter(&BooleanChunked::from_slice("duplicated".into(), &mask))?;

    let mut duplicates: Vec<DuplicateKey> = counts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|((id, ds), count)| DuplicateKey {
            unique_id: id.map(str::to_string),
            ds,
            count,
        })
        .collect();
    duplicates.sort_by(|a, b| (&a.unique_id, a.ds).cmp(&(&b.unique_id, b.ds)));

    Ok(DuplicateKeyReport { duplicates, rows })
}

/// Result of a single validation check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: String,
    pub passed: bool,
    pub message: String,
    pub details: Option<String>,
}

impl CheckResult {
    pub fn pass(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            passed: true,
            message: message.to_string(),
            details: None,
        }
    }

    pub fn fail(name: &str, message: &str, details: Option<String>) -> Self {
        Self {
            name: name.to_string(),
            passed: false,
            message: message.to_string(),
            details,
        }
    }
}

/// All checks run over one train/test pair.
#[derive(Debug)]
pub struct DataIntegrityReport {
    pub train_rows: usize,
    pub test_rows: usize,
    pub checks: Vec<CheckResult>,
}

impl DataIntegrityReport {
    pub fn all_passed(&self) -> bool {
        self.checks.iter().all(|c| c.passed)
    }

    pub fn failed_checks(&self) -> Vec<&CheckResult> {
        self.checks.iter().filter(|c| !c.passed).collect()
    }

    pub fn summary(&self) -> String {
        let passed = self.checks.iter().filter(|c| c.passed).count();
        let total = self.checks.len();
        format!(
            "train {} rows, test {} rows: {}/{} checks passed",
            self.train_rows, self.test_rows, passed, total
        )
    }
}

/// Validator for a train/test pair produced by the splitter.
pub struct DataIntegrityValidator {
    train: DataFrame,
    test: DataFrame,
    row_counts: Option<(usize, usize)>,
}

impl DataIntegrityValidator {
    pub fn new(train: DataFrame, test: DataFrame) -> Self {
        Self {
            train,
            test,
            row_counts: None,
        }
    }

    /// Attach the pipeline's reshape and release-filter row counts,
    /// enabling the row-drop check.
    pub fn with_row_counts(mut self, original_row_count: usize, filtered_row_count: usize) -> Self {
        self.row_counts = Some((original_row_count, filtered_row_count));
        self
    }

    pub fn train(&self) -> &DataFrame {
        &self.train
    }

    pub fn test(&self) -> &DataFrame {
        &self.test
    }

    /// Row-drop summary, if row counts were attached.
    pub fn row_drop_summary(&self) -> Option<ValidationResult<RowDropSummary>> {
        self.row_counts
            .map(|(original, filtered)| row_drop_summary(original, filtered))
    }

    pub fn nulls_and_shape(&self) -> NullShapeSummary {
        nulls_and_shape(&[("Train", &self.train), ("Test", &self.test)])
    }

    /// Run every check.
    pub fn validate(&self) -> ValidationResult<DataIntegrityReport> {
        let mut checks = Vec::new();

        // 1. Row-drop accounting
        if let Some(summary) = self.row_drop_summary() {
            checks.push(self.check_row_drop(summary?));
        }

        // 2. Date continuity
        checks.push(self.check_gaps("train_date_gaps", &self.train)?);
        checks.push(self.check_gaps("test_date_gaps", &self.test)?);

        // 3. Key uniqueness
        checks.push(self.check_duplicates("train_duplicate_keys", &self.train)?);
        checks.push(self.check_duplicates("test_duplicate_keys", &self.test)?);

        // 4. Nulls and shape
        checks.push(self.check_nulls());

        Ok(DataIntegrityReport {
            train_rows: self.train.height(),
            test_rows: self.test.height(),
            checks,
        })
    }

    fn check_row_drop(&self, summary: RowDropSummary) -> CheckResult {
        CheckResult::pass(
            "row_drop_summary",
            &format!(
                "{} of {} rows dropped before release ({:.2}%)",
                summary.dropped_row_count, summary.original_row_count, summary.drop_percentage
            ),
        )
    }

    fn check_gaps(&self, name: &str, df: &DataFrame) -> ValidationResult<CheckResult> {
        let report = check_date_gaps(df)?;

        if report.has_gaps() {
            Ok(CheckResult::fail(
                name,
                &format!(
                    "{} missing dates across {} of {} series",
                    report.missing_date_count(),
                    report.missing.len(),
                    report.series_checked
                ),
                Some(report.to_string()),
            ))
        } else {
            Ok(CheckResult::pass(
                name,
                &format!("{} series, no missing dates", report.series_checked),
            ))
        }
    }

    fn check_duplicates(&self, name: &str, df: &DataFrame) -> ValidationResult<CheckResult> {
        let report = check_duplicate_keys(df)?;

        if report.has_duplicates() {
            Ok(CheckResult::fail(
                name,
                &format!(
                    "{} duplicated (unique_id, ds) pairs over {} rows",
                    report.duplicates.len(),
                    report.rows.height()
                ),
                Some(report.to_string()),
            ))
        } else {
            Ok(CheckResult::pass(name, "No duplicate unique_id for any date"))
        }
    }

    fn check_nulls(&self) -> CheckResult {
        let summary = self.nulls_and_shape();

        if summary.has_nulls() {
            let columns: usize = summary.tables.iter().map(|t| t.null_counts.len()).sum();
            CheckResult::fail(
                "nulls_and_shape",
                &format!("{} columns contain nulls", columns),
                Some(summary.to_string()),
            )
        } else {
            CheckResult::pass("nulls_and_shape", &summary.to_string())
        }
    }
}
