//! High-level pixel operations.
//!
//! These functions combine the pure [`calculations`](super::calculations) with
//! `image::imageops`. They take owned or borrowed RGB buffers and never touch
//! the filesystem.

use super::backend::Dimensions;
use super::calculations::{CropRegion, fit_within, square_region};
use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgb, RgbImage};

/// Resampling filter for every downscale that ends up in an output file.
const RESAMPLE: FilterType = FilterType::Lanczos3;

/// Coerce any color mode to 8-bit RGB.
///
/// Images with an alpha channel are composited onto opaque white so fully
/// transparent areas come out white rather than black. Everything else is
/// converted directly.
pub fn flatten_to_rgb(image: DynamicImage) -> RgbImage {
    if !image.color().has_alpha() {
        return image.into_rgb8();
    }

    let rgba = image.into_rgba8();
    let mut flat = RgbImage::new(rgba.width(), rgba.height());
    for (src, dst) in rgba.pixels().zip(flat.pixels_mut()) {
        let [r, g, b, a] = src.0;
        let alpha = a as u16;
        let over_white = |c: u8| ((c as u16 * alpha + 255 * (255 - alpha) + 127) / 255) as u8;
        *dst = Rgb([over_white(r), over_white(g), over_white(b)]);
    }
    flat
}

/// Copy out the pixels inside `region`.
pub fn crop(image: &RgbImage, region: CropRegion) -> RgbImage {
    imageops::crop_imm(image, region.left(), region.top(), region.width(), region.height()).to_image()
}

/// Resize to exactly `target`, ignoring aspect ratio.
///
/// Callers crop to the target aspect first, so in practice this only scales.
pub fn resize_exact(image: &RgbImage, target: Dimensions) -> RgbImage {
    if image.dimensions() == (target.width, target.height) {
        return image.clone();
    }
    imageops::resize(image, target.width, target.height, RESAMPLE)
}

/// Center-square a cropped image and shrink it to fit `bounds`.
///
/// Never enlarges: a square already inside the bounds keeps its size. An
/// empty image is returned as is.
pub fn make_thumbnail(image: &RgbImage, bounds: Dimensions) -> RgbImage {
    let source = Dimensions::new(image.width(), image.height());
    let Some(region) = square_region(source) else {
        return image.clone();
    };
    let square = crop(image, region);
    let side = Dimensions::new(square.width(), square.height());

    let fitted = fit_within(side, bounds);
    if fitted == side {
        square
    } else {
        imageops::resize(&square, fitted.width, fitted.height, RESAMPLE)
    }
}
