//! Builders for seed runs.

pub mod dataset;

pub use dataset::{DatasetBuilder, DatasetMetrics, DatasetResult};
