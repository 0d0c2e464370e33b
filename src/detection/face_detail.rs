use crate::annotations::named_point::NamedPoint;
use crate::detection::labels::RawBoundingBox;
use serde::Deserialize;
use serde_json::{Map, Value};

/// Emotion categories the vision service scores for every face.
pub const EMOTION_TYPES: [&str; 9] = [
    "HAPPY",
    "SAD",
    "ANGRY",
    "CONFUSED",
    "DISGUSTED",
    "SURPRISED",
    "CALM",
    "FEAR",
    "UNKNOWN",
];

/// Landmark names the vision service locates on every face.
pub const LANDMARK_TYPES: [&str; 30] = [
    "eyeLeft",
    "eyeRight",
    "mouthLeft",
    "mouthRight",
    "nose",
    "leftEyeBrowLeft",
    "leftEyeBrowRight",
    "leftEyeBrowUp",
    "rightEyeBrowLeft",
    "rightEyeBrowRight",
    "rightEyeBrowUp",
    "leftEyeLeft",
    "leftEyeRight",
    "leftEyeUp",
    "leftEyeDown",
    "rightEyeLeft",
    "rightEyeRight",
    "rightEyeUp",
    "rightEyeDown",
    "noseLeft",
    "noseRight",
    "mouthUp",
    "mouthDown",
    "leftPupil",
    "rightPupil",
    "upperJawlineLeft",
    "midJawlineLeft",
    "chinBottom",
    "midJawlineRight",
    "upperJawlineRight",
];

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct AgeRange {
    pub low: Option<f64>,
    pub high: Option<f64>,
}

/// A yes/no attribute such as `Smile` or `Eyeglasses`.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct BooleanAttribute {
    pub value: Option<bool>,
    pub confidence: Option<f64>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct Gender {
    pub value: Option<String>,
    pub confidence: Option<f64>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct Emotion {
    #[serde(rename = "Type")]
    pub emotion_type: String,
    #[serde(default)]
    pub confidence: f64,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct Pose {
    pub roll: Option<f64>,
    pub yaw: Option<f64>,
    pub pitch: Option<f64>,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct Quality {
    pub brightness: Option<f64>,
    pub sharpness: Option<f64>,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct EyeDirection {
    pub yaw: Option<f64>,
    pub pitch: Option<f64>,
    pub confidence: Option<f64>,
}

/// Facial analysis for one detected face.
///
/// Every attribute is optional; the flattener fills in defaults for whatever is absent.
/// Keys this struct does not know about land in `unrecognized` and are dropped with a
/// warning when the face is flattened.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct FaceDetail {
    pub confidence: Option<f64>,
    pub bounding_box: Option<RawBoundingBox>,
    pub age_range: Option<AgeRange>,
    pub smile: Option<BooleanAttribute>,
    pub eyeglasses: Option<BooleanAttribute>,
    pub sunglasses: Option<BooleanAttribute>,
    pub gender: Option<Gender>,
    pub beard: Option<BooleanAttribute>,
    pub mustache: Option<BooleanAttribute>,
    pub eyes_open: Option<BooleanAttribute>,
    pub mouth_open: Option<BooleanAttribute>,
    pub face_occluded: Option<BooleanAttribute>,
    #[serde(default)]
    pub emotions: Vec<Emotion>,
    #[serde(default)]
    pub landmarks: Vec<NamedPoint>,
    pub pose: Option<Pose>,
    pub quality: Option<Quality>,
    pub eye_direction: Option<EyeDirection>,
    #[serde(flatten)]
    pub unrecognized: Map<String, Value>,
}

/// Sorts faces by confidence, highest first, and keeps at most `max_faces`.
pub fn select_top_faces(mut faces: Vec<FaceDetail>, max_faces: usize) -> Vec<FaceDetail> {
    faces.sort_by(|a, b| {
        let a = a.confidence.unwrap_or(0.0);
        let b = b.confidence.unwrap_or(0.0);
        b.total_cmp(&a)
    });
    faces.truncate(max_faces);
    faces
}

#[cfg(test)]
mod tests {
    use super::*;

    const FACE_JSON: &str = r#"{
        "BoundingBox": {"Width": 0.2, "Height": 0.3, "Left": 0.4, "Top": 0.1},
        "AgeRange": {"Low": 25, "High": 35},
        "Smile": {"Value": true, "Confidence": 97.5},
        "Gender": {"Value": "Female", "Confidence": 99.2},
        "Emotions": [{"Type": "HAPPY", "Confidence": 91.0}, {"Type": "CALM", "Confidence": 4.0}],
        "Landmarks": [{"Type": "eyeLeft", "X": 0.45, "Y": 0.2}],
        "Pose": {"Roll": -3.5, "Yaw": 10.0, "Pitch": 2.0},
        "Quality": {"Brightness": 80.1, "Sharpness": 92.3},
        "Confidence": 99.9,
        "FaceId": "abc"
    }"#;

    #[test]
    fn parses_face_detail() {
        let face: FaceDetail = serde_json::from_str(FACE_JSON).unwrap();
        assert_eq!(face.confidence, Some(99.9));
        assert_eq!(face.age_range, Some(AgeRange { low: Some(25.0), high: Some(35.0) }));
        assert_eq!(face.smile.unwrap().value, Some(true));
        assert_eq!(face.emotions.len(), 2);
        assert_eq!(face.landmarks[0].name, "eyeLeft");
        assert_eq!(face.eyeglasses, None);
        assert_eq!(face.unrecognized.keys().collect::<Vec<_>>(), vec!["FaceId"]);
    }

    #[test]
    fn selects_most_confident_faces() {
        let face = |confidence: f64| FaceDetail {
            confidence: Some(confidence),
            ..Default::default()
        };
        let faces = vec![face(80.0), face(99.0), FaceDetail::default(), face(90.0)];
        let selected = select_top_faces(faces, 2);
        let confidences: Vec<Option<f64>> = selected.iter().map(|f| f.confidence).collect();
        assert_eq!(confidences, vec![Some(99.0), Some(90.0)]);
    }
}
