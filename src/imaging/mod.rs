//! Image processing.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode + orient** | `image` decoders, EXIF orientation applied on load |
//! | **Color coercion** | alpha composited onto white, everything else → RGB8 |
//! | **Crop geometry** | pure functions in `calculations` |
//! | **Resize / thumbnail** | Lanczos3 via `image::imageops` |
//! | **Encode** | `webp` (lossy WebP) or rav1e (AVIF) |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for crop and resize geometry (unit testable)
//! - **Parameters**: Data structures describing encode operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: Pixel work combining calculations with `imageops`

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, DecodedImage, Dimensions, ImageBackend};
pub use calculations::{
    ASPECT_TOLERANCE, CropRegion, aspect_ratio, auto_crop_region, centered_region, display_scale,
    fit_within, max_crop_window, square_region,
};
pub use operations::{crop, flatten_to_rgb, make_thumbnail, resize_exact};
pub use params::{EncodeParams, OutputFormat, Quality};
pub use rust_backend::RustBackend;
