use polars::prelude::*;

use crate::data::schema::{require_columns, FINAL_COLUMNS};

use super::error::PipelineResult;

/// Project onto the output schema, in order.
///
/// Join helpers (`ds_id`, `wm_yr_wk`, `release`) and `item_id` are not part
/// of the schema and fall away. A missing output column means an earlier
/// stage did not produce it and is reported as a schema error.
pub fn finalize(df: DataFrame) -> PipelineResult<DataFrame> {
    require_columns(&df, FINAL_COLUMNS, "finalize")?;
    Ok(df.select(FINAL_COLUMNS.iter().copied())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::error::PipelineError;

    #[test]
    fn test_missing_output_column() {
        let df = df!("unique_id" => &["a"], "ds_id" => &[1i32]).unwrap();
        match finalize(df) {
            Err(PipelineError::Schema(err)) => {
                assert_eq!(err.context, "finalize");
                assert_eq!(err.missing.len(), FINAL_COLUMNS.len() - 1);
            }
            other => panic!("expected schema error, got {:?}", other),
        }
    }
}
