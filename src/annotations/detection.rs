use crate::annotations::bounding_box::BoundingBoxGeometry;

/// A detection is what the vision service reports for one object instance.
///
/// A detection is any annotation combined with a confidence score. The vision service scores
/// on a 0-100 scale, so `confidence` is a percentage rather than a probability.
#[derive(Clone, Debug, PartialEq)]
pub struct Detection<T: BoundingBoxGeometry> {
    pub annotation: T,
    pub confidence: f64,
}

/// Inclusive test of a 0-100 confidence against a fractional threshold, e.g. 0.95 keeps
/// confidences of 95 and above.
///
/// Compared on the fractional scale: `55.0 / 100.0` rounds to the same double as `0.55`,
/// while `0.55 * 100.0` lands just above 55.
pub fn meets_threshold(confidence: f64, threshold: f64) -> bool {
    confidence / 100.0 >= threshold
}
