pub mod bounding_box;
pub mod box_geometry;
pub mod detection;
pub mod named_point;
pub mod point;
