use std::collections::BTreeSet;
use std::path::PathBuf;
use thiserror::Error;

/// A bounding box that cannot take part in any geometry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("Invalid bounding box, value for left > value for right ({left} > {right}).")]
    InvertedHorizontal { left: f64, right: f64 },
    #[error("Invalid bounding box, value for top > value for bottom ({top} > {bottom}).")]
    InvertedVertical { top: f64, bottom: f64 },
    #[error("Invalid bounding box, {coordinate} is not finite ({value}).")]
    NonFiniteCoordinate {
        coordinate: &'static str,
        value: f64,
    },
}

/// Raised when an aggregate region is requested over zero boxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Cannot compute an enclosing box over an empty set of boxes.")]
pub struct EmptyBoxSetError;

/// The key set difference between one row and the batch reference schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowMismatch {
    pub row_index: usize,
    pub missing_from_row: BTreeSet<String>,
    pub extra_in_row: BTreeSet<String>,
}

/// Every row that disagrees with the schema of the first row in the batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "{} row(s) do not match the batch schema (first offending row: {})",
    .mismatches.len(),
    first_row_index(.mismatches)
)]
pub struct SchemaMismatchError {
    pub mismatches: Vec<RowMismatch>,
}

fn first_row_index(mismatches: &[RowMismatch]) -> String {
    match mismatches.first() {
        Some(m) => m.row_index.to_string(),
        None => "none".to_string(),
    }
}

/// A failure reported by one of the external services a record depends on.
#[derive(Debug, Error)]
pub enum CollaboratorError {
    #[error("no {kind} data recorded for photo {photo_id}")]
    NotFound { kind: &'static str, photo_id: String },
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode json from {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to load image {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("{0}")]
    Service(String),
}

/// A failure local to a single source record.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("record has no usable value in column `{column}`")]
    MissingPhotoId { column: String },
    #[error("photo {photo_id}: {source}")]
    Geometry {
        photo_id: String,
        #[source]
        source: GeometryError,
    },
    #[error("photo {photo_id}: {source}")]
    Collaborator {
        photo_id: String,
        #[source]
        source: CollaboratorError,
    },
}

/// A failure that discards the whole batch.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error(transparent)]
    SchemaMismatch(#[from] SchemaMismatchError),
    #[error("batch aborted at record {record_index}: {source}")]
    RecordAborted {
        record_index: usize,
        #[source]
        source: RecordError,
    },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Collaborator(#[from] CollaboratorError),
}
