use crate::config::DatasetConfig;
use crate::dataset::flat_row::FlatRow;
use crate::detection::face_detail::{BooleanAttribute, EMOTION_TYPES, FaceDetail, LANDMARK_TYPES};
use serde_json::Value;

/// Number of keys every face slot contributes to a row.
pub const FACE_FIELD_COUNT: usize =
    ATTRIBUTE_FIELD_COUNT + EMOTION_TYPES.len() + 2 * LANDMARK_TYPES.len();

const ATTRIBUTE_FIELD_COUNT: usize = 33;

/// Turns the faces of one photo into a fixed-width set of `Face_{n}_...` columns.
///
/// Exactly `max_faces` slots are written whether or not that many faces were found, so every
/// row in a batch carries the same face columns.
#[derive(Clone, Copy, Debug)]
pub struct FaceFlattener {
    max_faces: usize,
}

impl FaceFlattener {
    pub fn new(max_faces: usize) -> Self {
        FaceFlattener { max_faces }
    }

    pub fn from_config(config: &DatasetConfig) -> Self {
        FaceFlattener::new(config.max_faces)
    }

    /// Expects faces already sorted by confidence; anything past `max_faces` is ignored.
    pub fn flatten(&self, faces: &[FaceDetail]) -> FlatRow {
        if faces.len() > self.max_faces {
            log::warn!(
                "{} faces given for {} slots, ignoring the least confident",
                faces.len(),
                self.max_faces
            );
        }
        let empty = FaceDetail::default();
        let mut row = FlatRow::new();
        for slot in 0..self.max_faces {
            let face = faces.get(slot).unwrap_or(&empty);
            flatten_face(&format!("Face_{}", slot + 1), face, &mut row);
        }
        row
    }
}

/// The column names of one face slot.
pub fn face_field_names(prefix: &str) -> Vec<String> {
    let mut row = FlatRow::new();
    flatten_face(prefix, &FaceDetail::default(), &mut row);
    row.keys().cloned().collect()
}

fn flatten_face(prefix: &str, face: &FaceDetail, row: &mut FlatRow) {
    for key in face.unrecognized.keys() {
        log::warn!("{}: dropping unrecognized face attribute `{}`", prefix, key);
    }
    for (name, value) in attribute_values(face) {
        row.insert(format!("{}_{}", prefix, name), value);
    }

    let mut emotion_scores = [0.0; EMOTION_TYPES.len()];
    for emotion in &face.emotions {
        match EMOTION_TYPES.iter().position(|t| *t == emotion.emotion_type) {
            Some(index) => emotion_scores[index] = emotion.confidence,
            None => log::warn!("{}: dropping unknown emotion `{}`", prefix, emotion.emotion_type),
        }
    }
    for (emotion_type, score) in EMOTION_TYPES.iter().zip(emotion_scores) {
        row.insert(format!("{}_Emotions_{}", prefix, emotion_type), Value::from(score));
    }

    let mut landmark_points = [(0.0, 0.0); LANDMARK_TYPES.len()];
    for landmark in &face.landmarks {
        match LANDMARK_TYPES.iter().position(|t| *t == landmark.name) {
            Some(index) => landmark_points[index] = (landmark.x(), landmark.y()),
            None => log::warn!("{}: dropping unknown landmark `{}`", prefix, landmark.name),
        }
    }
    for (landmark_type, (x, y)) in LANDMARK_TYPES.iter().zip(landmark_points) {
        row.insert(format!("{}_Landmarks_{}_X", prefix, landmark_type), Value::from(x));
        row.insert(format!("{}_Landmarks_{}_Y", prefix, landmark_type), Value::from(y));
    }
}

/// Every scalar attribute of a face. Missing numbers default to 0, missing flags and
/// categories to null.
fn attribute_values(face: &FaceDetail) -> [(&'static str, Value); ATTRIBUTE_FIELD_COUNT] {
    let bounding_box = face.bounding_box.unwrap_or_default();
    let age_range = face.age_range.unwrap_or_default();
    let gender = face.gender.clone().unwrap_or_default();
    let pose = face.pose.unwrap_or_default();
    let quality = face.quality.unwrap_or_default();
    let eye_direction = face.eye_direction.unwrap_or_default();
    let [smile_value, smile_confidence] = flag(face.smile);
    let [eyeglasses_value, eyeglasses_confidence] = flag(face.eyeglasses);
    let [sunglasses_value, sunglasses_confidence] = flag(face.sunglasses);
    let [beard_value, beard_confidence] = flag(face.beard);
    let [mustache_value, mustache_confidence] = flag(face.mustache);
    let [eyes_open_value, eyes_open_confidence] = flag(face.eyes_open);
    let [mouth_open_value, mouth_open_confidence] = flag(face.mouth_open);
    let [occluded_value, occluded_confidence] = flag(face.face_occluded);
    [
        ("Confidence", number(face.confidence)),
        ("BoundingBox_Width", Value::from(bounding_box.width)),
        ("BoundingBox_Height", Value::from(bounding_box.height)),
        ("BoundingBox_Left", Value::from(bounding_box.left)),
        ("BoundingBox_Top", Value::from(bounding_box.top)),
        ("AgeRange_Low", number(age_range.low)),
        ("AgeRange_High", number(age_range.high)),
        ("Smile_Value", smile_value),
        ("Smile_Confidence", smile_confidence),
        ("Eyeglasses_Value", eyeglasses_value),
        ("Eyeglasses_Confidence", eyeglasses_confidence),
        ("Sunglasses_Value", sunglasses_value),
        ("Sunglasses_Confidence", sunglasses_confidence),
        ("Gender_Value", gender.value.map(Value::from).unwrap_or(Value::Null)),
        ("Gender_Confidence", number(gender.confidence)),
        ("Beard_Value", beard_value),
        ("Beard_Confidence", beard_confidence),
        ("Mustache_Value", mustache_value),
        ("Mustache_Confidence", mustache_confidence),
        ("EyesOpen_Value", eyes_open_value),
        ("EyesOpen_Confidence", eyes_open_confidence),
        ("MouthOpen_Value", mouth_open_value),
        ("MouthOpen_Confidence", mouth_open_confidence),
        ("FaceOccluded_Value", occluded_value),
        ("FaceOccluded_Confidence", occluded_confidence),
        ("Pose_Roll", number(pose.roll)),
        ("Pose_Yaw", number(pose.yaw)),
        ("Pose_Pitch", number(pose.pitch)),
        ("Quality_Brightness", number(quality.brightness)),
        ("Quality_Sharpness", number(quality.sharpness)),
        ("EyeDirection_Yaw", number(eye_direction.yaw)),
        ("EyeDirection_Pitch", number(eye_direction.pitch)),
        ("EyeDirection_Confidence", number(eye_direction.confidence)),
    ]
}

fn number(value: Option<f64>) -> Value {
    Value::from(value.unwrap_or(0.0))
}

fn flag(attribute: Option<BooleanAttribute>) -> [Value; 2] {
    let attribute = attribute.unwrap_or_default();
    [
        attribute.value.map(Value::Bool).unwrap_or(Value::Null),
        number(attribute.confidence),
    ]
}
