//! Pure calculation functions for crop and resize geometry.
//!
//! All functions here are pure and testable without any I/O or images.
//! Everything is expressed in source-pixel coordinates.

use super::backend::Dimensions;
use serde::Serialize;

/// Aspect ratios closer than this are treated as equal by [`auto_crop_region`].
pub const ASPECT_TOLERANCE: f64 = 0.01;

/// A crop rectangle in source-pixel coordinates.
///
/// Always satisfies `left < right <= width` and `top < bottom <= height` for
/// the image it was built against. The only way to get one is through
/// [`CropRegion::new`] (or helpers built on it), so an empty or out-of-bounds
/// region cannot exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CropRegion {
    left: u32,
    top: u32,
    right: u32,
    bottom: u32,
}

impl CropRegion {
    /// Build a region, returning `None` if it is empty or exceeds `within`.
    pub fn new(left: u32, top: u32, right: u32, bottom: u32, within: Dimensions) -> Option<Self> {
        (left < right && top < bottom && right <= within.width && bottom <= within.height).then_some(
            Self {
                left,
                top,
                right,
                bottom,
            },
        )
    }

    /// The whole image. `None` for an image without pixels.
    pub fn full(dims: Dimensions) -> Option<Self> {
        Self::new(0, 0, dims.width, dims.height, dims)
    }

    pub fn left(&self) -> u32 {
        self.left
    }

    pub fn top(&self) -> u32 {
        self.top
    }

    pub fn right(&self) -> u32 {
        self.right
    }

    pub fn bottom(&self) -> u32 {
        self.bottom
    }

    pub fn width(&self) -> u32 {
        self.right - self.left
    }

    pub fn height(&self) -> u32 {
        self.bottom - self.top
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions {
            width: self.width(),
            height: self.height(),
        }
    }
}

/// Width divided by height.
pub fn aspect_ratio(dims: Dimensions) -> f64 {
    dims.width as f64 / dims.height as f64
}

/// Largest window with the target's aspect ratio that fits inside `source`.
///
/// A relatively wider source keeps its full height; a relatively taller (or
/// equal) source keeps its full width. The other edge is floored, never below 1.
///
/// ```
/// # use folio_convert::imaging::{Dimensions, max_crop_window};
/// let window = max_crop_window(Dimensions::new(3000, 2000), Dimensions::new(1000, 1000));
/// assert_eq!(window, Dimensions::new(2000, 2000));
/// ```
pub fn max_crop_window(source: Dimensions, target: Dimensions) -> Dimensions {
    if aspect_ratio(source) > aspect_ratio(target) {
        // Source is wider: limit by height
        let width = source.height as u64 * target.width as u64 / target.height as u64;
        Dimensions {
            width: (width as u32).max(1).min(source.width),
            height: source.height,
        }
    } else {
        // Source is taller: limit by width
        let height = source.width as u64 * target.height as u64 / target.width as u64;
        Dimensions {
            width: source.width,
            height: (height as u32).max(1).min(source.height),
        }
    }
}

/// Place a window of the given size at the center of `source`.
///
/// The slack on each axis is split with floor division, so an odd remainder
/// leaves the extra pixel on the right/bottom. The window is shrunk to the
/// source if larger. `None` when either the source or the window is empty.
pub fn centered_region(source: Dimensions, window: Dimensions) -> Option<CropRegion> {
    let width = window.width.min(source.width);
    let height = window.height.min(source.height);
    let left = (source.width - width) / 2;
    let top = (source.height - height) / 2;
    CropRegion::new(left, top, left + width, top + height, source)
}

/// Deterministic centered crop to the target aspect ratio.
///
/// Returns the full extent when the source aspect is already within
/// [`ASPECT_TOLERANCE`] of the target's. `None` for an empty source.
pub fn auto_crop_region(source: Dimensions, target: Dimensions) -> Option<CropRegion> {
    if (aspect_ratio(source) - aspect_ratio(target)).abs() < ASPECT_TOLERANCE {
        return CropRegion::full(source);
    }
    centered_region(source, max_crop_window(source, target))
}

/// Centered square of side `min(width, height)`.
pub fn square_region(source: Dimensions) -> Option<CropRegion> {
    let side = source.width.min(source.height);
    centered_region(source, Dimensions::new(side, side))
}

/// Downscale-only fit inside `bounds`, preserving aspect ratio.
///
/// Sources already inside the bounds are returned unchanged.
pub fn fit_within(source: Dimensions, bounds: Dimensions) -> Dimensions {
    if source.width <= bounds.width && source.height <= bounds.height {
        return source;
    }
    let scale = (bounds.width as f64 / source.width as f64)
        .min(bounds.height as f64 / source.height as f64);
    Dimensions {
        width: ((source.width as f64 * scale).round() as u32).clamp(1, bounds.width),
        height: ((source.height as f64 * scale).round() as u32).clamp(1, bounds.height),
    }
}

/// Scale factor that brings the longer axis down to `max_display`.
///
/// Returns `1.0` when the image already fits.
pub fn display_scale(source: Dimensions, max_display: u32) -> f64 {
    if source.width > max_display || source.height > max_display {
        (max_display as f64 / source.width as f64).min(max_display as f64 / source.height as f64)
    } else {
        1.0
    }
}
