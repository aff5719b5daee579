use polars::prelude::PolarsError;
use thiserror::Error;

use crate::data::{LoaderError, SchemaError};

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Loader error: {0}")]
    Loader(#[from] LoaderError),

    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),

    #[error("Calendar alignment error: {0}")]
    Calendar(String),

    #[error(
        "Filtered row count ({filtered}) cannot be greater than original row count ({original})"
    )]
    RowCountInvariant { original: usize, filtered: usize },

    #[error("Data has not been processed. Call 'process' before 'split'")]
    NotProcessed,
}

pub type PipelineResult<T> = Result<T, PipelineError>;
