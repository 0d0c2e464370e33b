use crate::annotations::bounding_box::{BoundingBox, BoundingBoxGeometry};
use crate::annotations::box_geometry::{merge_boxes, overlaps_significantly};
use crate::annotations::detection::meets_threshold;
use crate::config::DatasetConfig;
use crate::dataset::flat_row::FlatRow;
use crate::detection::labels::{BICYCLE_LABEL, DetectionLabel, PERSON_LABEL};
use crate::error::GeometryError;
use serde_json::Value;

/// Fixed-width record of the reconciled people/bike boxes.
///
/// `slots` always holds exactly `max_slots` boxes; unused slots are zeroed.
#[derive(Clone, Debug, PartialEq)]
pub struct PeopleAndBikesSummary {
    pub slots: Vec<BoundingBox>,
    /// Every person instance the vision service reported, regardless of confidence.
    pub num_people: usize,
    /// Every bicycle instance the vision service reported, regardless of confidence.
    pub num_bikes: usize,
}

impl PeopleAndBikesSummary {
    fn from_boxes(
        boxes: &[BoundingBox],
        max_slots: usize,
        num_people: usize,
        num_bikes: usize,
    ) -> Self {
        if boxes.len() > max_slots {
            log::warn!(
                "{} reconciled boxes exceed {} summary slots, dropping the rest",
                boxes.len(),
                max_slots
            );
        }
        let slots = (0..max_slots)
            .map(|i| boxes.get(i).copied().unwrap_or_else(BoundingBox::zeroed))
            .collect();
        PeopleAndBikesSummary { slots, num_people, num_bikes }
    }

    /// Number of slots holding a real box.
    pub fn occupied_slots(&self) -> usize {
        self.slots.iter().filter(|b| **b != BoundingBox::zeroed()).count()
    }

    /// Flattens to `{slot}_BoundingBox_{Top,Bottom,Left,Right}` plus the two counts.
    /// Slots are numbered from 1.
    pub fn to_fragment(&self) -> FlatRow {
        let mut fragment = FlatRow::new();
        for (index, slot) in self.slots.iter().enumerate() {
            let n = index + 1;
            fragment.insert(format!("{}_BoundingBox_Top", n), Value::from(slot.top()));
            fragment.insert(format!("{}_BoundingBox_Bottom", n), Value::from(slot.bottom()));
            fragment.insert(format!("{}_BoundingBox_Left", n), Value::from(slot.left()));
            fragment.insert(format!("{}_BoundingBox_Right", n), Value::from(slot.right()));
        }
        fragment.insert("num_people".to_string(), Value::from(self.num_people));
        fragment.insert("num_bikes".to_string(), Value::from(self.num_bikes));
        fragment
    }
}

/// The result of reconciling one photo's person and bicycle detections.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelAggregation {
    pub summary: PeopleAndBikesSummary,
    /// Reconciled boxes in order: remaining and merged person boxes, then unmatched bikes.
    pub boxes: Vec<BoundingBox>,
    /// How many instances cleared the confidence threshold, before merging.
    pub included_box_count: usize,
}

impl LabelAggregation {
    /// Instances reported by the vision service, regardless of confidence.
    pub fn total_instance_count(&self) -> usize {
        self.summary.num_people + self.summary.num_bikes
    }
}

/// Builds the people/bike summary for a photo.
#[derive(Clone, Copy, Debug)]
pub struct LabelAggregator {
    confidence_threshold: f64,
    overlap_threshold: f64,
    max_slots: usize,
}

impl LabelAggregator {
    pub fn new(confidence_threshold: f64, overlap_threshold: f64, max_slots: usize) -> Self {
        LabelAggregator { confidence_threshold, overlap_threshold, max_slots }
    }

    pub fn from_config(config: &DatasetConfig) -> Self {
        LabelAggregator::new(
            config.confidence_threshold,
            config.overlap_threshold,
            config.max_slots,
        )
    }

    pub fn aggregate(&self, labels: &[DetectionLabel]) -> Result<LabelAggregation, GeometryError> {
        let mut num_people = 0;
        let mut num_bikes = 0;
        let mut person_boxes = Vec::new();
        let mut bike_boxes = Vec::new();
        for label in labels {
            let (count, boxes) = match label.name.as_str() {
                PERSON_LABEL => (&mut num_people, &mut person_boxes),
                BICYCLE_LABEL => (&mut num_bikes, &mut bike_boxes),
                _ => continue,
            };
            *count += label.instances.len();
            // Only boxes that clear the threshold are validated.
            for instance in &label.instances {
                if meets_threshold(instance.confidence, self.confidence_threshold) {
                    boxes.push(instance.to_detection()?.annotation);
                }
            }
        }
        let included_box_count = person_boxes.len() + bike_boxes.len();
        let boxes = reconcile_people_and_bikes(&person_boxes, &bike_boxes, self.overlap_threshold);
        log::debug!(
            "{} people and {} bikes reported, {} boxes above threshold, {} after merging",
            num_people,
            num_bikes,
            included_box_count,
            boxes.len()
        );
        Ok(LabelAggregation {
            summary: PeopleAndBikesSummary::from_boxes(
                &boxes,
                self.max_slots,
                num_people,
                num_bikes,
            ),
            boxes,
            included_box_count,
        })
    }
}

/// Merges each bicycle into the first person box it significantly overlaps.
///
/// Every bicycle merges at most once. The merged box is appended to the person boxes and can
/// absorb later bicycles; the originals are marked and dropped after the scan.
pub fn reconcile_people_and_bikes(
    people: &[BoundingBox],
    bikes: &[BoundingBox],
    overlap_threshold: f64,
) -> Vec<BoundingBox> {
    let mut person_boxes: Vec<BoundingBox> = people.to_vec();
    let mut people_to_remove: Vec<bool> = vec![false; person_boxes.len()];
    let mut bikes_to_remove: Vec<bool> = vec![false; bikes.len()];
    for (bike_index, bike_box) in bikes.iter().enumerate() {
        let first_match = (0..person_boxes.len())
            .filter(|&person_index| !people_to_remove[person_index])
            .find(|&person_index| {
                overlaps_significantly(bike_box, &person_boxes[person_index], overlap_threshold)
            });
        if let Some(person_index) = first_match {
            let merged = merge_boxes(bike_box, &person_boxes[person_index]);
            person_boxes.push(merged);
            people_to_remove.push(false);
            people_to_remove[person_index] = true;
            bikes_to_remove[bike_index] = true;
        }
    }
    let mut drop_people = people_to_remove.iter();
    person_boxes.retain(|_| !drop_people.next().copied().unwrap_or(false));
    let remaining_bikes = bikes
        .iter()
        .zip(bikes_to_remove.iter())
        .filter(|(_, removed)| !**removed)
        .map(|(bike, _)| *bike);
    person_boxes.into_iter().chain(remaining_bikes).collect()
}
