//! Production codec backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, BMP, GIF, TIFF) | `image` crate decoders, format sniffed from content |
//! | Orientation | `ImageDecoder::orientation` + `DynamicImage::apply_orientation` |
//! | Encode → WebP | `webp` crate (libwebp, lossy at the requested quality) |
//! | Encode → AVIF | `image::codecs::avif::AvifEncoder` (rav1e, speed 6) |
//!
//! HEIC/HEIF has no decoder here; [`Capabilities`](crate::capabilities::Capabilities)
//! reports that so the pipeline can fail those files up front.

use super::backend::{BackendError, DecodedImage, ImageBackend};
use super::params::{EncodeParams, OutputFormat};
use image::metadata::Orientation;
use image::{DynamicImage, ExtendedColorType, ImageDecoder, ImageEncoder, ImageReader, RgbImage};
use std::path::Path;
use tracing::debug;

/// AVIF encoder speed (1 = slowest/best, 10 = fastest).
const AVIF_SPEED: u8 = 6;

/// Backend built on the `image` and `webp` crates.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Load and decode an image from disk, applying its orientation.
fn load_image(path: &Path) -> Result<DecodedImage, BackendError> {
    let reader = ImageReader::open(path)?.with_guessed_format()?;
    let format = reader.format();
    let mut decoder = reader
        .into_decoder()
        .map_err(|e| BackendError::Decode(format!("{}: {}", path.display(), e)))?;

    let orientation = decoder.orientation().unwrap_or_else(|e| {
        debug!(path = %path.display(), error = %e, "unreadable orientation metadata");
        Orientation::NoTransforms
    });

    let mut image = DynamicImage::from_decoder(decoder)
        .map_err(|e| BackendError::Decode(format!("{}: {}", path.display(), e)))?;
    image.apply_orientation(orientation);

    Ok(DecodedImage {
        image,
        format,
        orientation,
    })
}

/// Encode as lossy WebP through libwebp.
fn save_webp(image: &RgbImage, path: &Path, quality: u32) -> Result<(), BackendError> {
    let encoded = webp::Encoder::from_rgb(image.as_raw(), image.width(), image.height())
        .encode_simple(false, quality as f32)
        .map_err(|e| BackendError::Encode(format!("WebP {}: {:?}", path.display(), e)))?;
    std::fs::write(path, &*encoded)?;
    Ok(())
}

/// Encode as AVIF through rav1e.
fn save_avif(image: &RgbImage, path: &Path, quality: u32) -> Result<(), BackendError> {
    let mut buffer = Vec::new();
    image::codecs::avif::AvifEncoder::new_with_speed_quality(&mut buffer, AVIF_SPEED, quality as u8)
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            ExtendedColorType::Rgb8,
        )
        .map_err(|e| BackendError::Encode(format!("AVIF {}: {}", path.display(), e)))?;
    std::fs::write(path, buffer)?;
    Ok(())
}

impl ImageBackend for RustBackend {
    fn decode(&self, path: &Path) -> Result<DecodedImage, BackendError> {
        load_image(path)
    }

    fn encode(&self, image: &RgbImage, params: &EncodeParams) -> Result<(), BackendError> {
        let quality = params.quality.value();
        match params.format {
            OutputFormat::Webp => save_webp(image, &params.output, quality),
            OutputFormat::Avif => save_avif(image, &params.output, quality),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::Dimensions;
    use crate::imaging::params::Quality;
    use crate::test_helpers::{create_test_jpeg, jpeg_with_orientation};
    use image::{ImageFormat, Rgba, RgbaImage};

    #[test]
    fn decode_synthetic_jpeg() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("test.jpg");
        create_test_jpeg(&path, 200, 150);

        let decoded = RustBackend::new().decode(&path).unwrap();
        assert_eq!(Dimensions::of(&decoded.image), Dimensions::new(200, 150));
        assert_eq!(decoded.format, Some(ImageFormat::Jpeg));
        assert_eq!(decoded.orientation, Orientation::NoTransforms);
    }

    #[test]
    fn decode_applies_exif_rotation() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("rotated.jpg");
        // Orientation 6: stored landscape, displayed rotated 90° clockwise
        std::fs::write(&path, jpeg_with_orientation(40, 20, 6)).unwrap();

        let decoded = RustBackend::new().decode(&path).unwrap();
        assert_eq!(decoded.orientation, Orientation::Rotate90);
        assert_eq!(Dimensions::of(&decoded.image), Dimensions::new(20, 40));
    }

    #[test]
    fn decode_sniffs_mislabeled_extension() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("actually-a-jpeg.png");
        create_test_jpeg(&path, 32, 16);

        let decoded = RustBackend::new().decode(&path).unwrap();
        assert_eq!(decoded.format, Some(ImageFormat::Jpeg));
    }

    #[test]
    fn decode_keeps_alpha_channel() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("alpha.png");
        RgbaImage::from_pixel(8, 8, Rgba([10, 20, 30, 0]))
            .save(&path)
            .unwrap();

        let decoded = RustBackend::new().decode(&path).unwrap();
        assert!(decoded.image.color().has_alpha());
    }

    #[test]
    fn decode_zero_byte_file_errors() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("empty.jpg");
        std::fs::write(&path, b"").unwrap();

        let result = RustBackend::new().decode(&path);
        assert!(matches!(result, Err(BackendError::Decode(_))));
    }

    #[test]
    fn decode_nonexistent_file_errors() {
        let result = RustBackend::new().decode(Path::new("/nonexistent/image.jpg"));
        assert!(matches!(result, Err(BackendError::Io(_))));
    }

    #[test]
    fn encode_webp_roundtrips_dimensions() {
        let tmp = tempfile::TempDir::new().unwrap();
        let output = tmp.path().join("out.webp");
        let image = RgbImage::from_fn(120, 80, |x, y| image::Rgb([x as u8, y as u8, 90]));

        RustBackend::new()
            .encode(
                &image,
                &EncodeParams {
                    output: output.clone(),
                    format: OutputFormat::Webp,
                    quality: Quality::new(85),
                },
            )
            .unwrap();

        assert_eq!(image::image_dimensions(&output).unwrap(), (120, 80));
    }

    #[test]
    fn encode_avif_writes_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let output = tmp.path().join("out.avif");

        RustBackend::new()
            .encode(
                &RgbImage::new(64, 48),
                &EncodeParams {
                    output: output.clone(),
                    format: OutputFormat::Avif,
                    quality: Quality::new(60),
                },
            )
            .unwrap();

        assert!(std::fs::metadata(&output).unwrap().len() > 0);
    }

    #[test]
    fn encode_into_missing_directory_errors() {
        let tmp = tempfile::TempDir::new().unwrap();
        let output = tmp.path().join("no-such-dir").join("out.webp");

        let result = RustBackend::new().encode(
            &RgbImage::new(4, 4),
            &EncodeParams {
                output,
                format: OutputFormat::Webp,
                quality: Quality::default(),
            },
        );
        assert!(matches!(result, Err(BackendError::Io(_))));
    }
}
