use crate::detection::face_detail::{FaceDetail, select_top_faces};
use crate::detection::labels::{DetectionLabel, people_and_bikes};
use crate::error::CollaboratorError;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// The cloud vision service that detects labels and analyses faces.
pub trait VisionService {
    /// Labels for a photo, at most `max_labels` of them.
    fn detect_labels(
        &self,
        photo_id: &str,
        max_labels: usize,
    ) -> Result<Vec<DetectionLabel>, CollaboratorError>;

    /// Facial analysis for every face in a photo, in no particular order.
    fn detect_faces(&self, photo_id: &str) -> Result<Vec<FaceDetail>, CollaboratorError>;
}

/// The detections the dataset is built from for one photo.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PhotoDetections {
    /// Only `Person` and `Bicycle` labels.
    pub people_and_bikes: Vec<DetectionLabel>,
    /// Most confident faces first, at most `max_faces`.
    pub faces: Vec<FaceDetail>,
}

/// Queries the vision service and keeps what the dataset needs.
pub fn fetch_detections<V: VisionService + ?Sized>(
    service: &V,
    photo_id: &str,
    max_labels: usize,
    max_faces: usize,
) -> Result<PhotoDetections, CollaboratorError> {
    let labels = service.detect_labels(photo_id, max_labels)?;
    let faces = service.detect_faces(photo_id)?;
    Ok(PhotoDetections {
        people_and_bikes: people_and_bikes(labels),
        faces: select_top_faces(faces, max_faces),
    })
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RecordedResponse {
    #[serde(default)]
    labels: Vec<DetectionLabel>,
    #[serde(default)]
    face_details: Vec<FaceDetail>,
}

/// Replays vision responses saved as json, keyed by photo id:
/// `{"7": {"Labels": [...], "FaceDetails": [...]}}`.
#[derive(Clone, Debug, Default)]
pub struct RecordedVisionService {
    responses: HashMap<String, RecordedResponse>,
}

impl RecordedVisionService {
    pub fn from_json_file(filepath: &Path) -> Result<Self, CollaboratorError> {
        let file = File::open(filepath).map_err(|source| CollaboratorError::Io {
            path: filepath.to_path_buf(),
            source,
        })?;
        let responses = serde_json::from_reader(BufReader::new(file)).map_err(|source| {
            CollaboratorError::Json { path: filepath.to_path_buf(), source }
        })?;
        Ok(RecordedVisionService { responses })
    }

    pub fn insert(&mut self, photo_id: &str, labels: Vec<DetectionLabel>, faces: Vec<FaceDetail>) {
        self.responses.insert(
            photo_id.to_string(),
            RecordedResponse { labels, face_details: faces },
        );
    }

    fn response(&self, photo_id: &str) -> Result<&RecordedResponse, CollaboratorError> {
        self.responses.get(photo_id).ok_or_else(|| CollaboratorError::NotFound {
            kind: "vision",
            photo_id: photo_id.to_string(),
        })
    }
}

impl VisionService for RecordedVisionService {
    fn detect_labels(
        &self,
        photo_id: &str,
        max_labels: usize,
    ) -> Result<Vec<DetectionLabel>, CollaboratorError> {
        Ok(self.response(photo_id)?.labels.iter().take(max_labels).cloned().collect())
    }

    fn detect_faces(&self, photo_id: &str) -> Result<Vec<FaceDetail>, CollaboratorError> {
        Ok(self.response(photo_id)?.face_details.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const RECORDED_JSON: &str = r#"{
        "7": {
            "Labels": [
                {"Name": "Tree", "Confidence": 90.0},
                {"Name": "Person", "Confidence": 99.0, "Instances": [
                    {"BoundingBox": {"Width": 0.4, "Height": 0.4, "Left": 0.1, "Top": 0.1}, "Confidence": 99.0}
                ]},
                {"Name": "Bicycle", "Confidence": 98.0, "Instances": []}
            ],
            "FaceDetails": [{"Confidence": 80.0}, {"Confidence": 99.0}, {"Confidence": 90.0}]
        }
    }"#;

    fn recorded() -> RecordedVisionService {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(RECORDED_JSON.as_bytes()).unwrap();
        RecordedVisionService::from_json_file(file.path()).unwrap()
    }

    #[test]
    fn fetch_keeps_people_bikes_and_top_faces() {
        let detections = fetch_detections(&recorded(), "7", 10, 2).unwrap();
        let names: Vec<&str> =
            detections.people_and_bikes.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Person", "Bicycle"]);
        let confidences: Vec<Option<f64>> = detections.faces.iter().map(|f| f.confidence).collect();
        assert_eq!(confidences, vec![Some(99.0), Some(90.0)]);
    }

    #[test]
    fn max_labels_limits_what_the_service_returns() {
        let detections = fetch_detections(&recorded(), "7", 1, 10).unwrap();
        assert!(detections.people_and_bikes.is_empty());
    }

    #[test]
    fn unknown_photo_is_not_found() {
        let err = fetch_detections(&recorded(), "8", 10, 10).unwrap_err();
        assert!(matches!(err, CollaboratorError::NotFound { kind: "vision", .. }));
    }
}
