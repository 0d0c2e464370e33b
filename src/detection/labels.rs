use crate::annotations::bounding_box::BoundingBox;
use crate::annotations::detection::Detection;
use crate::error::GeometryError;
use serde::{Deserialize, Serialize};

pub const PERSON_LABEL: &str = "Person";
pub const BICYCLE_LABEL: &str = "Bicycle";

/// A box in the vision service's `{Left, Top, Width, Height}` form, fractional coordinates.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawBoundingBox {
    #[serde(default)]
    pub left: f64,
    #[serde(default)]
    pub top: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
}

impl RawBoundingBox {
    pub fn to_bounding_box(&self) -> Result<BoundingBox, GeometryError> {
        BoundingBox::from_ltwh(self.left, self.top, self.width, self.height)
    }
}

/// One located occurrence of a label.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Instance {
    pub bounding_box: RawBoundingBox,
    #[serde(default)]
    pub confidence: f64,
}

impl Instance {
    pub fn to_detection(&self) -> Result<Detection<BoundingBox>, GeometryError> {
        Ok(Detection {
            annotation: self.bounding_box.to_bounding_box()?,
            confidence: self.confidence,
        })
    }
}

/// A label from the vision service. Labels such as "Tree" carry no instances.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DetectionLabel {
    pub name: String,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub instances: Vec<Instance>,
}

impl DetectionLabel {
    pub fn is_person_or_bicycle(&self) -> bool {
        self.name == PERSON_LABEL || self.name == BICYCLE_LABEL
    }
}

/// Keeps only the labels the people/bike summary is built from.
pub fn people_and_bikes(labels: Vec<DetectionLabel>) -> Vec<DetectionLabel> {
    labels
        .into_iter()
        .filter(DetectionLabel::is_person_or_bicycle)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotations::bounding_box::BoundingBoxGeometry;

    const LABELS_JSON: &str = r#"[
        {"Name": "Person", "Confidence": 99.1, "Instances": [
            {"BoundingBox": {"Width": 0.25, "Height": 0.5, "Left": 0.25, "Top": 0.25}, "Confidence": 98.5}
        ], "Parents": [], "Aliases": []},
        {"Name": "Tree", "Confidence": 80.0},
        {"Name": "Bicycle", "Confidence": 97.0, "Instances": []}
    ]"#;

    #[test]
    fn parses_vision_labels() {
        let labels: Vec<DetectionLabel> = serde_json::from_str(LABELS_JSON).unwrap();
        assert_eq!(labels.len(), 3);
        assert!(labels[1].instances.is_empty());
        let det = labels[0].instances[0].to_detection().unwrap();
        assert_eq!(det.annotation.as_xyxy(), (0.25, 0.25, 0.5, 0.75));
        assert_eq!(det.confidence, 98.5);
    }

    #[test]
    fn filters_to_people_and_bikes() {
        let labels: Vec<DetectionLabel> = serde_json::from_str(LABELS_JSON).unwrap();
        let names: Vec<String> = people_and_bikes(labels).into_iter().map(|l| l.name).collect();
        assert_eq!(names, vec!["Person".to_string(), "Bicycle".to_string()]);
    }
}
