use crate::annotations::bounding_box::{BoundingBox, PixelBox};
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;

const BOX_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
const REGION_COLOR: Rgb<u8> = Rgb([0, 255, 0]);

/// Draws the reconciled boxes in red and the region of interest in green.
///
/// Only meant for eyeballing the merge; the dataset never reads these images.
pub fn draw_detection_overlay(
    image: &RgbImage,
    boxes: &[BoundingBox],
    region_of_interest: Option<PixelBox>,
) -> RgbImage {
    let mut overlay = image.clone();
    let (width, height) = image.dimensions();
    for bbox in boxes {
        draw_pixel_box(&mut overlay, bbox.to_pixels(width, height), BOX_COLOR);
    }
    if let Some(region) = region_of_interest {
        draw_pixel_box(&mut overlay, region, REGION_COLOR);
    }
    overlay
}

fn draw_pixel_box(image: &mut RgbImage, pixel_box: PixelBox, color: Rgb<u8>) {
    // imageproc rejects empty rectangles.
    if pixel_box.width() == 0 || pixel_box.height() == 0 {
        return;
    }
    let rect = Rect::at(pixel_box.left as i32, pixel_box.top as i32)
        .of_size(pixel_box.width(), pixel_box.height());
    draw_hollow_rect_mut(image, rect, color);
}
