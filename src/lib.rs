//! # Folio Convert
//!
//! Normalizes a folder of portfolio photographs into web-ready images. Every
//! supported file in the input directory becomes a full-size image at one
//! exact target resolution plus a small square thumbnail, both encoded as
//! lossy WebP (or AVIF).
//!
//! # Pipeline
//!
//! ```text
//! input/                          output/
//! ├── dawn.jpg    ──┐             ├── dawn.webp           (exactly --size)
//! ├── logo.png    ──┼── convert ──├── logo.webp
//! └── phone.heic  ──┘             └── thumbnails/
//!                                     ├── dawn.webp       (within --thumb)
//!                                     └── logo.webp
//! ```
//!
//! Per file: decode with orientation applied, flatten to RGB (transparency
//! becomes white), crop to the target aspect ratio, resize, cut a centered
//! square thumbnail from the cropped image, encode both. A file that fails is
//! reported and the batch moves on.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | Defaults, optional TOML file, CLI overrides, validation |
//! | [`capabilities`] | Startup probe for HEIF decoding and a display |
//! | [`discover`] | Non-recursive scan of the input directory |
//! | [`imaging`] | Codec backend, crop geometry, pixel operations |
//! | [`crop`] | Interactive crop session and preview frontends |
//! | [`process`] | Per-file pipeline and batch loop |
//! | [`report`] | Per-file outcomes folded into a run report |
//! | [`output`] | Console formatting |
//!
//! # Design Decisions
//!
//! ## Exact Output Size
//!
//! Full images always come out at exactly the configured size. The crop step
//! removes whatever does not fit the target aspect ratio first, so the resize
//! never distorts. Sources whose aspect ratio is within 1% of the target are
//! resized without cropping.
//!
//! ## Operator-Positioned Crops
//!
//! With `--interactive` (and a build with the `preview` feature, on a machine
//! with a display) each image opens in a window with the crop rectangle drawn
//! on it. The rectangle keeps its size and only moves. The session is a plain
//! state machine behind the [`crop::CropFrontend`] trait, so the whole flow
//! runs headless in tests.
//!
//! ## Capabilities Instead of Globals
//!
//! Whether HEIF can be decoded and whether a window can be opened is probed
//! once into [`capabilities::Capabilities`] and passed down. Missing
//! capabilities degrade single files or the crop mode, never the run.

pub mod capabilities;
pub mod config;
pub mod crop;
pub mod discover;
pub mod imaging;
pub mod output;
pub mod process;
pub mod report;

#[cfg(test)]
pub(crate) mod test_helpers;
