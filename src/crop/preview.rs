//! Preview frames: the image with the crop window drawn over it.

use crate::imaging::CropRegion;
use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};

/// Width of the crop outline in preview pixels.
const BORDER: u32 = 3;
const BORDER_COLOR: Rgb<u8> = Rgb([0, 255, 0]);

/// A display-sized copy of the image, scaled once and reused for every frame.
pub struct PreviewCanvas {
    base: RgbImage,
    scale: f64,
}

impl PreviewCanvas {
    pub fn new(image: &RgbImage, scale: f64) -> Self {
        let base = if scale < 1.0 {
            let width = ((image.width() as f64 * scale).round() as u32).max(1);
            let height = ((image.height() as f64 * scale).round() as u32).max(1);
            // Preview only; speed matters more than resampling quality here
            imageops::resize(image, width, height, FilterType::Triangle)
        } else {
            image.clone()
        };
        Self { base, scale }
    }

    /// Render a frame with everything outside `region` dimmed and a green outline.
    ///
    /// `region` is in source pixels and is mapped through the display scale.
    pub fn render(&self, region: CropRegion) -> RgbImage {
        let (width, height) = self.base.dimensions();
        let scale = self.scale.min(1.0);
        let left = ((region.left() as f64 * scale).floor() as u32).min(width - 1);
        let top = ((region.top() as f64 * scale).floor() as u32).min(height - 1);
        let right = ((region.right() as f64 * scale).ceil() as u32).clamp(left + 1, width);
        let bottom = ((region.bottom() as f64 * scale).ceil() as u32).clamp(top + 1, height);

        let mut frame = self.base.clone();
        for (x, y, pixel) in frame.enumerate_pixels_mut() {
            let inside = x >= left && x < right && y >= top && y < bottom;
            if !inside {
                let [r, g, b] = pixel.0;
                *pixel = Rgb([r / 2, g / 2, b / 2]);
            } else if x < left + BORDER
                || x + BORDER >= right
                || y < top + BORDER
                || y + BORDER >= bottom
            {
                *pixel = BORDER_COLOR;
            }
        }
        frame
    }
}
