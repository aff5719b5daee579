//! Sales reshaping and enrichment pipeline.
//!
//! Stages, in order:
//! 1. Calendar preparation (`ds_id`, `ds`, `num_events`)
//! 2. Wide-to-long reshape of the sales table
//! 3. Calendar join
//! 4. Price join and date features
//! 5. Release-week filter
//! 6. Projection onto the output schema
//!
//! Each stage takes a table and returns a new one.

pub mod calendar;
pub mod enrich;
pub mod error;
pub mod finalize;
pub mod processor;
pub mod release;
pub mod reshape;

#[cfg(test)]
pub(crate) mod fixtures;

pub use error::{PipelineError, PipelineResult};
pub use processor::{process, DataProcessor, ProcessedData};
pub use reshape::LongSales;
