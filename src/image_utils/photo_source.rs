use crate::error::CollaboratorError;
use crate::image_utils::image_io::read_image_as_rgb8;
use image::RgbImage;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Where the original photos live.
pub trait PhotoSource {
    fn fetch(&self, photo_id: &str) -> Result<RgbImage, CollaboratorError>;
}

/// The storage key of a photo: `unwatermarked{photo_id}.jpg`.
pub fn photo_key(photo_id: &str) -> String {
    format!("unwatermarked{}.jpg", photo_id)
}

/// Serves photos from a local copy of the photo bucket.
///
/// The directory is walked once; photos are found by file name anywhere below the root.
#[derive(Clone, Debug)]
pub struct DirectoryPhotoSource {
    root: PathBuf,
    index: HashMap<String, PathBuf>,
}

impl DirectoryPhotoSource {
    pub fn new(root: &Path) -> Result<Self, CollaboratorError> {
        let mut index = HashMap::new();
        for entry in WalkDir::new(root).follow_links(true) {
            let entry = entry.map_err(|err| CollaboratorError::Io {
                path: err.path().unwrap_or(root).to_path_buf(),
                source: err.into(),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                index.insert(name.to_string(), entry.path().to_path_buf());
            }
        }
        log::info!("indexed {} files under {}", index.len(), root.display());
        Ok(DirectoryPhotoSource { root: root.to_path_buf(), index })
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

impl PhotoSource for DirectoryPhotoSource {
    fn fetch(&self, photo_id: &str) -> Result<RgbImage, CollaboratorError> {
        let key = photo_key(photo_id);
        let path = self.index.get(&key).ok_or_else(|| CollaboratorError::NotFound {
            kind: "photo",
            photo_id: photo_id.to_string(),
        })?;
        log::debug!("loading {} from {}", key, self.root.display());
        read_image_as_rgb8(path)
    }
}
