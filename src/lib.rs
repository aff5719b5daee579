pub mod config;
pub mod data;
pub mod pipeline;
pub mod split;
pub mod validation;

// Re-export commonly used types
pub use config::{ConfigError, PipelineConfig};
pub use data::{LoaderError, SchemaError, SourceTables, TableFormat};
pub use pipeline::{DataProcessor, PipelineError, ProcessedData};
pub use split::{split_by_horizon, SeriesSplit};
pub use validation::{DataIntegrityReport, DataIntegrityValidator, ValidationError};
