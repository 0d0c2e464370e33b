use crate::error::CollaboratorError;
use image::{self, RgbImage};
use std::path::Path;

pub fn read_image_as_rgb8(filepath: &Path) -> Result<RgbImage, CollaboratorError> {
    let img = image::open(filepath).map_err(|source| CollaboratorError::Image {
        path: filepath.to_path_buf(),
        source,
    })?;
    Ok(img.into_rgb8())
}

pub fn write_rgb8_image(image: &RgbImage, filepath: &Path) -> Result<(), CollaboratorError> {
    image.save(filepath).map_err(|source| CollaboratorError::Image {
        path: filepath.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn written_image_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test_image.png");
        let mut img = RgbImage::new(3, 3);
        img.put_pixel(0, 1, Rgb([255, 0, 0]));
        img.put_pixel(1, 1, Rgb([0, 255, 0]));
        img.put_pixel(2, 1, Rgb([0, 0, 255]));
        write_rgb8_image(&img, &path).unwrap();

        let read = read_image_as_rgb8(&path).unwrap();
        assert_eq!(read.get_pixel(0, 0), &Rgb([0, 0, 0]));
        assert_eq!(read.get_pixel(0, 1), &Rgb([255, 0, 0]));
        assert_eq!(read.get_pixel(1, 1), &Rgb([0, 255, 0]));
        assert_eq!(read.get_pixel(2, 1), &Rgb([0, 0, 255]));
    }

    #[test]
    fn missing_file_is_an_image_error() {
        let err = read_image_as_rgb8(Path::new("./no/such/image.png")).unwrap_err();
        assert!(matches!(err, CollaboratorError::Image { .. }));
    }
}
