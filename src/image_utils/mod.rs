pub mod image_io;
pub mod overlay;
pub mod photo_source;
