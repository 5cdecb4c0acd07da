//! Optional runtime capabilities.
//!
//! Some inputs and modes depend on things that may be missing at runtime: a
//! HEIF decoder, and a display to show the interactive crop window on. Both are
//! probed once at startup into a [`Capabilities`] value that is passed to the
//! pipeline explicitly. Missing capabilities degrade behavior (HEIC files fail
//! individually, interactive mode falls back to automatic cropping) instead of
//! stopping the run.

use image::ImageFormat;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// A decoder for HEIC/HEIF is compiled in.
    pub heif_decode: bool,
    /// The interactive crop window can be opened.
    pub display: bool,
}

impl Capabilities {
    /// Probe the current build and environment.
    pub fn probe() -> Self {
        Self {
            heif_decode: heif_decoder_available(),
            display: display_available(),
        }
    }

    /// No optional capabilities at all.
    pub fn none() -> Self {
        Self {
            heif_decode: false,
            display: false,
        }
    }
}

/// Whether any compiled-in `image` decoder claims the HEIF extensions.
fn heif_decoder_available() -> bool {
    ["heic", "heif"].iter().any(|ext| {
        ImageFormat::from_extension(ext).is_some_and(|format| format.reading_enabled())
    })
}

fn display_available() -> bool {
    cfg!(feature = "preview") && display_server_present()
}

#[cfg(all(unix, not(target_os = "macos")))]
fn display_server_present() -> bool {
    ["DISPLAY", "WAYLAND_DISPLAY"]
        .iter()
        .any(|var| std::env::var_os(var).is_some_and(|value| !value.is_empty()))
}

#[cfg(not(all(unix, not(target_os = "macos"))))]
fn display_server_present() -> bool {
    true
}
