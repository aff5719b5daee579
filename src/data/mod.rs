pub mod dates;
pub mod loader;
pub mod schema;
pub mod writer;

pub use loader::{load_table, LoaderError, SourceTables, TableFormat};
pub use schema::{require_columns, SchemaError};
pub use writer::{write_split, write_table};
