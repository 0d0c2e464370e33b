use crate::annotations::point::Point;
use serde::Deserialize;
use std::fmt;

/// A facial landmark as reported by the vision service,
/// e.g. `{"Type": "eyeLeft", "X": 0.4, "Y": 0.3}`.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct NamedPoint {
    #[serde(rename = "Type")]
    pub name: String,
    #[serde(flatten)]
    point: LandmarkCoordinates,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
struct LandmarkCoordinates {
    #[serde(default)]
    x: f64,
    #[serde(default)]
    y: f64,
}

impl NamedPoint {
    pub fn new(name: String, x: f64, y: f64) -> Self {
        NamedPoint { name, point: LandmarkCoordinates { x, y } }
    }

    pub fn x(&self) -> f64 {
        self.point.x
    }

    pub fn y(&self) -> f64 {
        self.point.y
    }

    pub fn point(&self) -> Point {
        Point { x: self.point.x, y: self.point.y }
    }
}

impl fmt::Display for NamedPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NamedPoint {{ name: {}, x: {}, y: {} }}", self.name, self.x(), self.y())
    }
}
