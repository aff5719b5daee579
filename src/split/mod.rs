//! Per-series train/test partitioning.

pub mod horizon;

pub use horizon::{split_by_horizon, SeriesSplit};
