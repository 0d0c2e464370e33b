use crate::error::{CollaboratorError, DatasetError};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// What to do with a record whose detections, photo or report cannot be processed.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordErrorPolicy {
    /// Log a warning and leave the record out of the dataset.
    #[default]
    Skip,
    /// Discard the whole batch.
    Abort,
}

/// Parameters forwarded to the image-quality reporter untouched.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct ReportParameters {
    pub coverage_thresh: f64,
    pub downsample_rate: u32,
    pub fft_streak_thresh: f64,
}

impl Default for ReportParameters {
    fn default() -> Self {
        ReportParameters {
            coverage_thresh: 0.97,
            downsample_rate: 3,
            fft_streak_thresh: 1.15,
        }
    }
}

/// Settings for building one dataset. Passed explicitly to every component.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Minimum instance confidence as a fraction; instances are scored 0-100.
    pub confidence_threshold: f64,
    /// Share of a box's area an intersection must exceed for a person and bike to merge.
    pub overlap_threshold: f64,
    /// Number of people/bike box slots in every row.
    pub max_slots: usize,
    /// Number of face slots in every row.
    pub max_faces: usize,
    /// Forwarded to the vision service's label detection.
    pub max_labels: usize,
    /// Database column holding the photo id.
    pub photo_id_column: String,
    pub record_error_policy: RecordErrorPolicy,
    pub report: ReportParameters,
    /// When set, an overlay of the reconciled boxes is written here for every photo.
    pub debug_overlay_dir: Option<PathBuf>,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        DatasetConfig {
            confidence_threshold: 0.95,
            overlap_threshold: 0.5,
            max_slots: 10,
            max_faces: 10,
            max_labels: 10,
            photo_id_column: "photoid".to_string(),
            record_error_policy: RecordErrorPolicy::Skip,
            report: ReportParameters::default(),
            debug_overlay_dir: None,
        }
    }
}

impl DatasetConfig {
    /// Reads a config from a json file. Missing fields take their defaults.
    pub fn from_json_file(filepath: &Path) -> Result<Self, DatasetError> {
        let file = File::open(filepath).map_err(|source| CollaboratorError::Io {
            path: filepath.to_path_buf(),
            source,
        })?;
        let config: DatasetConfig =
            serde_json::from_reader(BufReader::new(file)).map_err(|source| CollaboratorError::Json {
                path: filepath.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), DatasetError> {
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(DatasetError::InvalidConfig(format!(
                "confidence_threshold must be a fraction in [0, 1], got {}",
                self.confidence_threshold
            )));
        }
        if !(0.0..=1.0).contains(&self.overlap_threshold) {
            return Err(DatasetError::InvalidConfig(format!(
                "overlap_threshold must be a fraction in [0, 1], got {}",
                self.overlap_threshold
            )));
        }
        if self.max_slots == 0 {
            return Err(DatasetError::InvalidConfig("max_slots must be at least 1".to_string()));
        }
        if self.photo_id_column.is_empty() {
            return Err(DatasetError::InvalidConfig(
                "photo_id_column must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = DatasetConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.report.downsample_rate, 3);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"max_faces": 3, "record_error_policy": "abort", "report": {{"coverage_thresh": 0.9}}}}"#).unwrap();
        let config = DatasetConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.max_faces, 3);
        assert_eq!(config.max_slots, 10);
        assert_eq!(config.record_error_policy, RecordErrorPolicy::Abort);
        assert_eq!(config.report.coverage_thresh, 0.9);
        assert_eq!(config.report.fft_streak_thresh, 1.15);
    }

    #[test]
    fn rejects_percentage_threshold() {
        let config = DatasetConfig { confidence_threshold: 95.0, ..Default::default() };
        assert!(matches!(config.validate(), Err(DatasetError::InvalidConfig(_))));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = DatasetConfig::from_json_file(Path::new("./does/not/exist.json")).unwrap_err();
        assert!(matches!(err, DatasetError::Collaborator(CollaboratorError::Io { .. })));
    }
}
