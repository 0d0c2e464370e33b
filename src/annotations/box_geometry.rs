use crate::annotations::bounding_box::{BoundingBox, BoundingBoxGeometry};
use crate::error::EmptyBoxSetError;

/// The default share of either box's area an intersection must exceed to count as significant.
pub const DEFAULT_OVERLAP_THRESHOLD: f64 = 0.5;

/// Returns the smallest box containing both boxes.
pub fn merge_boxes(a: &BoundingBox, b: &BoundingBox) -> BoundingBox {
    // Both inputs are valid, so the envelope is valid too.
    BoundingBox::from_ordered(
        a.left().min(b.left()),
        a.top().min(b.top()),
        a.right().max(b.right()),
        a.bottom().max(b.bottom()),
    )
}

/// The overlapping rectangle of two boxes, or None when they do not share positive area.
pub fn intersection(a: &BoundingBox, b: &BoundingBox) -> Option<BoundingBox> {
    let left = a.left().max(b.left());
    let top = a.top().max(b.top());
    let right = a.right().min(b.right());
    let bottom = a.bottom().min(b.bottom());
    if right <= left || bottom <= top {
        return None;
    }
    Some(BoundingBox::from_ordered(left, top, right, bottom))
}

/// Checks if two boxes overlap by more than `threshold` of either box's area.
///
/// The test is asymmetric: a small box mostly covered by a large one is a significant
/// overlap even if it covers only a sliver of the large box.
pub fn overlaps_significantly(a: &BoundingBox, b: &BoundingBox, threshold: f64) -> bool {
    let Some(overlap) = intersection(a, b) else {
        return false;
    };
    let intersection_area = overlap.area();
    intersection_area > threshold * a.area() || intersection_area > threshold * b.area()
}

/// The envelope of every box in the slice.
pub fn enclosing_box(boxes: &[BoundingBox]) -> Result<BoundingBox, EmptyBoxSetError> {
    let (first, rest) = boxes.split_first().ok_or(EmptyBoxSetError)?;
    Ok(rest.iter().fold(*first, |acc, bbox| merge_boxes(&acc, bbox)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bbox(left: f64, top: f64, right: f64, bottom: f64) -> BoundingBox {
        BoundingBox::new(left, top, right, bottom).unwrap()
    }

    #[test]
    fn merge_is_commutative() {
        let a = bbox(0.1, 0.2, 0.4, 0.5);
        let b = bbox(0.3, 0.0, 0.9, 0.45);
        assert_eq!(merge_boxes(&a, &b), merge_boxes(&b, &a));
        assert_eq!(merge_boxes(&a, &b), bbox(0.1, 0.0, 0.9, 0.5));
    }

    #[test]
    fn merge_is_associative() {
        let a = bbox(0.1, 0.2, 0.4, 0.5);
        let b = bbox(0.3, 0.0, 0.9, 0.45);
        let c = bbox(0.05, 0.6, 0.2, 0.95);
        assert_eq!(
            merge_boxes(&merge_boxes(&a, &b), &c),
            merge_boxes(&a, &merge_boxes(&b, &c))
        );
    }

    #[test]
    fn disjoint_boxes_do_not_overlap() {
        let a = bbox(0.0, 0.0, 0.2, 0.2);
        let b = bbox(0.5, 0.5, 0.7, 0.7);
        assert_eq!(intersection(&a, &b), None);
        assert!(!overlaps_significantly(&a, &b, DEFAULT_OVERLAP_THRESHOLD));
    }

    #[test]
    fn touching_edges_do_not_overlap() {
        let a = bbox(0.0, 0.0, 0.5, 0.5);
        let b = bbox(0.5, 0.0, 1.0, 0.5);
        assert!(!overlaps_significantly(&a, &b, DEFAULT_OVERLAP_THRESHOLD));
    }

    #[test]
    fn contained_half_box_overlaps() {
        let a = bbox(0.0, 0.0, 1.0, 1.0);
        let b = bbox(0.0, 0.0, 0.5, 1.0);
        assert_eq!(intersection(&a, &b), Some(b));
        assert!(overlaps_significantly(&a, &b, DEFAULT_OVERLAP_THRESHOLD));
        assert!(overlaps_significantly(&b, &a, DEFAULT_OVERLAP_THRESHOLD));
    }

    #[test]
    fn weak_overlap_is_not_significant() {
        // Intersection area 0.04 against areas 0.16 and 0.09.
        let person = bbox(0.1, 0.1, 0.5, 0.5);
        let bike = bbox(0.3, 0.3, 0.6, 0.6);
        assert!(!overlaps_significantly(&person, &bike, DEFAULT_OVERLAP_THRESHOLD));
        assert!(overlaps_significantly(&person, &bike, 0.4));
    }

    #[test]
    fn exact_half_overlap_is_not_significant() {
        // Intersection area 0.5 against areas 1.0 and 1.0; the comparison is strict.
        let a = bbox(0.0, 0.0, 1.0, 1.0);
        let b = bbox(0.5, 0.0, 1.5, 1.0);
        assert!(!overlaps_significantly(&a, &b, 0.5));
        assert!(!overlaps_significantly(&b, &a, 0.5));
        assert!(overlaps_significantly(&a, &b, 0.25));
    }

    #[test]
    fn enclosing_box_of_empty_slice_fails() {
        assert_eq!(enclosing_box(&[]), Err(EmptyBoxSetError));
    }

    #[test]
    fn enclosing_box_spans_all_boxes() {
        let boxes = vec![
            bbox(0.2, 0.3, 0.4, 0.5),
            bbox(0.1, 0.6, 0.3, 0.7),
            bbox(0.5, 0.2, 0.8, 0.4),
        ];
        assert_eq!(enclosing_box(&boxes), Ok(bbox(0.1, 0.2, 0.8, 0.7)));
        assert_eq!(enclosing_box(&boxes[..1]), Ok(boxes[0]));
    }
}
