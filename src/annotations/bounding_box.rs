use crate::error::GeometryError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A struct representing a bounding box.
///
/// A bounding box is the smallest rectangle that totally contains an object within an image.
/// Detections arrive from the vision service with fractional coordinates in [0, 1] relative to
/// the image dimensions; `to_pixels` converts them into absolute pixel coordinates once the
/// image size is known.
///
/// This project uses the standard convention of the left side of the image being x=0 and the top
/// of the image being y=0.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct BoundingBox {
    left: f64,
    top: f64,
    right: f64,
    bottom: f64,
}

impl BoundingBox {
    /// Checks if a box has valid parameters before constructing.
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Result<Self, GeometryError> {
        for (coordinate, value) in [
            ("left", left),
            ("top", top),
            ("right", right),
            ("bottom", bottom),
        ] {
            if !value.is_finite() {
                return Err(GeometryError::NonFiniteCoordinate { coordinate, value });
            }
        }
        if left > right {
            Err(GeometryError::InvertedHorizontal { left, right })
        } else if top > bottom {
            Err(GeometryError::InvertedVertical { top, bottom })
        } else {
            Ok(BoundingBox { left, top, right, bottom })
        }
    }

    /// Builds a box from the vision service's `{Left, Top, Width, Height}` form.
    pub fn from_ltwh(left: f64, top: f64, width: f64, height: f64) -> Result<Self, GeometryError> {
        BoundingBox::new(left, top, left + width, top + height)
    }

    /// Skips validation for coordinates already known to be ordered and finite.
    pub(crate) fn from_ordered(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        BoundingBox { left, top, right, bottom }
    }

    /// A box with every coordinate at zero. Used to pad unused summary slots.
    pub fn zeroed() -> Self {
        BoundingBox { left: 0.0, top: 0.0, right: 0.0, bottom: 0.0 }
    }

    /// Converts fractional coordinates to pixel coordinates, clamped to the image.
    pub fn to_pixels(&self, image_width: u32, image_height: u32) -> PixelBox {
        let scale = |value: f64, extent: u32| -> u32 {
            (value * extent as f64).round().clamp(0.0, extent as f64) as u32
        };
        PixelBox {
            left: scale(self.left, image_width),
            top: scale(self.top, image_height),
            right: scale(self.right, image_width),
            bottom: scale(self.bottom, image_height),
        }
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BoundingBox {{ left: {}, top: {}, right: {}, bottom: {} }}",
            self.left, self.top, self.right, self.bottom
        )
    }
}

/// A bounding box in absolute pixel coordinates.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq, Serialize)]
pub struct PixelBox {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl PixelBox {
    pub fn width(&self) -> u32 {
        self.right - self.left
    }

    pub fn height(&self) -> u32 {
        self.bottom - self.top
    }
}

pub trait BoundingBoxGeometry {
    fn left(&self) -> f64;
    fn top(&self) -> f64;
    fn right(&self) -> f64;
    fn bottom(&self) -> f64;

    fn width(&self) -> f64 {
        self.right() - self.left()
    }

    fn height(&self) -> f64 {
        self.bottom() - self.top()
    }

    fn area(&self) -> f64 {
        self.width() * self.height()
    }

    fn center(&self) -> (f64, f64) {
        (
            (self.left() + self.right()) / 2.0,
            (self.top() + self.bottom()) / 2.0,
        )
    }

    fn as_xyxy(&self) -> (f64, f64, f64, f64) {
        (self.left(), self.top(), self.right(), self.bottom())
    }
}

impl BoundingBoxGeometry for BoundingBox {
    fn left(&self) -> f64 {
        self.left
    }

    fn top(&self) -> f64 {
        self.top
    }

    fn right(&self) -> f64 {
        self.right
    }

    fn bottom(&self) -> f64 {
        self.bottom
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_inverted_boxes() {
        assert_eq!(
            BoundingBox::new(0.6, 0.0, 0.2, 1.0),
            Err(GeometryError::InvertedHorizontal { left: 0.6, right: 0.2 })
        );
        assert_eq!(
            BoundingBox::new(0.0, 0.9, 1.0, 0.1),
            Err(GeometryError::InvertedVertical { top: 0.9, bottom: 0.1 })
        );
    }

    #[test]
    fn new_rejects_non_finite_coordinates() {
        let err = BoundingBox::new(0.0, f64::NAN, 1.0, 1.0).unwrap_err();
        assert!(matches!(
            err,
            GeometryError::NonFiniteCoordinate { coordinate: "top", .. }
        ));
        assert!(BoundingBox::new(0.0, 0.0, f64::INFINITY, 1.0).is_err());
    }

    #[test]
    fn degenerate_zero_area_box_is_allowed() {
        let bbox = BoundingBox::new(0.5, 0.5, 0.5, 0.5).unwrap();
        assert_eq!(bbox.area(), 0.0);
    }

    #[test]
    fn from_ltwh_adds_extent() {
        let bbox = BoundingBox::from_ltwh(0.25, 0.5, 0.5, 0.25).unwrap();
        assert_eq!(bbox.as_xyxy(), (0.25, 0.5, 0.75, 0.75));
        assert!(BoundingBox::from_ltwh(0.5, 0.5, -0.1, 0.1).is_err());
    }

    #[test]
    fn to_pixels_scales_and_clamps() {
        let bbox = BoundingBox::new(0.25, 0.5, 1.0, 1.0).unwrap();
        assert_eq!(
            bbox.to_pixels(200, 100),
            PixelBox { left: 50, top: 50, right: 200, bottom: 100 }
        );
        let spill = BoundingBox::from_ltwh(0.9, 0.9, 0.5, 0.5).unwrap();
        let pixels = spill.to_pixels(10, 10);
        assert_eq!((pixels.right, pixels.bottom), (10, 10));
        assert_eq!((pixels.width(), pixels.height()), (1, 1));
    }

    #[test]
    fn center_and_area() {
        let bbox = BoundingBox::new(0.0, 0.0, 0.5, 0.25).unwrap();
        assert_eq!(bbox.center(), (0.25, 0.125));
        assert_eq!(bbox.area(), 0.125);
    }
}
