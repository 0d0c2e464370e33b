//! Builds a per-photo tabular dataset from database rows, vision detections and an
//! image-quality report.
//!
//! Each photo becomes one flat row. Person and bicycle boxes are reconciled into a fixed
//! number of slots, faces are flattened into a fixed number of face slots, and the batch is
//! only accepted when every row has the same columns.

pub mod annotations;
pub mod config;
pub mod dataset;
pub mod detection;
pub mod error;
pub mod image_utils;

pub use config::{DatasetConfig, RecordErrorPolicy, ReportParameters};
pub use dataset::builder::DatasetBuilder;
pub use dataset::table::Dataset;
pub use error::{DatasetError, GeometryError, RecordError, SchemaMismatchError};
