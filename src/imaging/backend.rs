//! Image codec backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the two operations that touch codecs:
//! decode (with orientation already applied) and encode-to-file. Everything in
//! between (color coercion, crop, resize) is plain pixel work done in
//! [`operations`](super::operations) and never needs swapping.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend).

use super::params::EncodeParams;
use image::metadata::Orientation;
use image::{DynamicImage, ImageFormat, RgbImage};
use std::fmt;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Decode failed: {0}")]
    Decode(String),
    #[error("Encode failed: {0}")]
    Encode(String),
}

/// Pixel dimensions of an image or a target size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn of(image: &DynamicImage) -> Self {
        Self::new(image.width(), image.height())
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A decoded source image, upright.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub image: DynamicImage,
    /// Container format detected while decoding, if known.
    pub format: Option<ImageFormat>,
    /// Orientation that was read from metadata and already applied to `image`.
    pub orientation: Orientation,
}

/// Trait for image codec backends.
pub trait ImageBackend {
    /// Decode a file and apply its embedded orientation so the pixels are upright.
    fn decode(&self, path: &Path) -> Result<DecodedImage, BackendError>;

    /// Encode an RGB image and write it to `params.output`.
    fn encode(&self, image: &RgbImage, params: &EncodeParams) -> Result<(), BackendError>;
}
