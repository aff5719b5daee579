//! Validation of the pipeline's train/test output.
//!
//! Audits row-drop accounting, null coverage, per-series date continuity and
//! key uniqueness.

pub mod data_integrity;

pub use data_integrity::{
    check_date_gaps, check_duplicate_keys, nulls_and_shape, row_drop_summary, CheckResult,
    DataIntegrityReport, DataIntegrityValidator, DateGapReport, DuplicateKey, DuplicateKeyReport,
    NullShapeSummary, RowDropSummary, TableNullReport, ValidationError, ValidationResult,
};
