pub mod face_detail;
pub mod face_flattening;
pub mod label_aggregation;
pub mod labels;
pub mod vision_service;
