//! Run configuration.
//!
//! Settings are layered: built-in defaults, then an optional TOML file passed
//! with `--config`, then command-line flags. The result is frozen into a
//! [`ConversionConfig`] that is validated once before any file is touched.
//!
//! ## Config File
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! size = [1000, 1000]   # Full image width, height in pixels
//! thumb = [200, 200]    # Thumbnail bounding box
//! quality = 85          # Lossy quality (1-100) for both outputs
//! format = "webp"       # "webp" or "avif"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{Dimensions, OutputFormat, Quality};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Subdirectory of the output directory that receives thumbnails.
pub const THUMBNAILS_DIR: &str = "thumbnails";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
    #[error("Input directory '{0}' does not exist")]
    InputNotFound(PathBuf),
}

/// Encoding settings that may come from a config file.
///
/// All fields have defaults, so a config file only needs the values it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConvertSettings {
    /// Full image size as `[width, height]`.
    pub size: [u32; 2],
    /// Thumbnail bounds as `[width, height]`.
    pub thumb: [u32; 2],
    /// Lossy quality, 1-100.
    pub quality: u32,
    pub format: OutputFormat,
}

impl Default for ConvertSettings {
    fn default() -> Self {
        Self {
            size: [1000, 1000],
            thumb: [200, 200],
            quality: 85,
            format: OutputFormat::default(),
        }
    }
}

/// Values given on the command line, each overriding the file/defaults when set.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub size: Option<[u32; 2]>,
    pub thumb: Option<[u32; 2]>,
    pub quality: Option<u32>,
    pub format: Option<OutputFormat>,
}

impl ConvertSettings {
    /// Load settings from a TOML file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let settings: Self = toml::from_str(&content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Apply command-line overrides on top of these settings.
    pub fn with_overrides(mut self, overrides: &SettingsOverrides) -> Self {
        if let Some(size) = overrides.size {
            self.size = size;
        }
        if let Some(thumb) = overrides.thumb {
            self.thumb = thumb;
        }
        if let Some(quality) = overrides.quality {
            self.quality = quality;
        }
        if let Some(format) = overrides.format {
            self.format = format;
        }
        self
    }

    /// Validate values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=100).contains(&self.quality) {
            return Err(ConfigError::Validation("quality must be 1-100".into()));
        }
        if self.size.contains(&0) {
            return Err(ConfigError::Validation("size values must be non-zero".into()));
        }
        if self.thumb.contains(&0) {
            return Err(ConfigError::Validation(
                "thumb values must be non-zero".into(),
            ));
        }
        Ok(())
    }
}

/// Immutable parameters for one conversion run.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionConfig {
    pub input_dir: PathBuf,
    /// Always absolute, resolved against the working directory.
    pub output_dir: PathBuf,
    pub target_size: Dimensions,
    pub thumb_size: Dimensions,
    pub quality: Quality,
    pub format: OutputFormat,
    /// Requested interactive cropping; only honored when a display is available.
    pub interactive: bool,
}

impl ConversionConfig {
    /// Validate settings and the input directory, and freeze them into a config.
    pub fn new(
        input_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        settings: &ConvertSettings,
        interactive: bool,
    ) -> Result<Self, ConfigError> {
        let input_dir = input_dir.into();
        settings.validate()?;
        if !input_dir.is_dir() {
            return Err(ConfigError::InputNotFound(input_dir));
        }

        Ok(Self {
            input_dir,
            output_dir: std::path::absolute(output_dir.into())?,
            target_size: Dimensions::new(settings.size[0], settings.size[1]),
            thumb_size: Dimensions::new(settings.thumb[0], settings.thumb[1]),
            quality: Quality::new(settings.quality),
            format: settings.format,
            interactive,
        })
    }

    pub fn thumbnails_dir(&self) -> PathBuf {
        self.output_dir.join(THUMBNAILS_DIR)
    }

    /// Create the output and thumbnail directories. Safe to call repeatedly.
    pub fn prepare_output_dirs(&self) -> Result<(), ConfigError> {
        fs::create_dir_all(self.thumbnails_dir())?;
        Ok(())
    }
}
