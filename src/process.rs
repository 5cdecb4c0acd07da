//! Per-file conversion pipeline and the batch loop around it.
//!
//! Each discovered file goes through a fixed sequence and ends in exactly one
//! [`FileOutcome`]:
//!
//! ```text
//! capability gate → decode (+ orientation) → flatten to RGB → crop
//!     → resize to target ─┬─► <output>/<stem>.<ext>
//!     → square thumbnail ─┴─► <output>/thumbnails/<stem>.<ext>
//! ```
//!
//! The crop step is automatic (centered, target aspect) unless interactive
//! mode is requested, a display is available and a [`CropFrontend`] was
//! supplied. The thumbnail is cut from the cropped image, before the target
//! resize.
//!
//! ## Failure handling
//!
//! Per-file errors are [`ConvertError`]s returned to the batch loop, which
//! records them as `Failed` and moves on. Two variants are operator decisions
//! rather than failures: `Skipped` becomes a `Skipped` outcome, and `Quit`
//! stops the run immediately. Outputs are not rolled back: if the thumbnail
//! encode fails after the full image was written, the full image stays.
//!
//! ## Progress
//!
//! Progress is reported as [`ProcessEvent`]s over an optional channel; the
//! binary drains them on a printer thread and formats them with
//! [`output`](crate::output).

use crate::capabilities::Capabilities;
use crate::config::ConversionConfig;
use crate::crop::{self, CropDecision, CropError, CropFrontend};
use crate::discover::is_heif;
use crate::imaging::{
    BackendError, Dimensions, EncodeParams, ImageBackend, auto_crop_region, flatten_to_rgb,
    make_thumbnail, max_crop_window, resize_exact,
};
use crate::report::{ConversionReport, ConvertedFile, FileOutcome};
use image::metadata::Orientation;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("HEIF/HEIC support not available, cannot decode {0}")]
    HeifUnavailable(PathBuf),
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error(transparent)]
    Crop(#[from] CropError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image has no pixels")]
    EmptyImage,
    #[error("Skipped by operator")]
    Skipped,
    #[error("Conversion cancelled by operator")]
    Quit,
}

/// Progress events emitted while converting.
#[derive(Debug, Clone)]
pub enum ProcessEvent {
    /// A file is about to be processed. `index` is 1-based.
    Started {
        index: usize,
        total: usize,
        source: PathBuf,
    },
    /// The file decoded successfully.
    Opened {
        format: String,
        dimensions: Dimensions,
        color: String,
    },
    /// An interactive crop session is waiting for the operator.
    CropStarted {
        source: Dimensions,
        window: Dimensions,
    },
    Finished {
        source: PathBuf,
        outcome: FileOutcome,
    },
}

/// Result of a batch run.
#[derive(Debug, Clone)]
pub struct RunResult {
    pub report: ConversionReport,
    /// The operator quit before all files were processed.
    pub quit: bool,
}

/// Converts files according to one [`ConversionConfig`].
pub struct Converter<'a, B: ImageBackend> {
    backend: &'a B,
    config: &'a ConversionConfig,
    capabilities: Capabilities,
    frontend: Option<&'a mut dyn CropFrontend>,
}

impl<'a, B: ImageBackend> Converter<'a, B> {
    pub fn new(backend: &'a B, config: &'a ConversionConfig, capabilities: Capabilities) -> Self {
        Self {
            backend,
            config,
            capabilities,
            frontend: None,
        }
    }

    /// Use `frontend` for interactive cropping.
    pub fn with_frontend(mut self, frontend: &'a mut dyn CropFrontend) -> Self {
        self.frontend = Some(frontend);
        self
    }

    /// Whether crops will be chosen by the operator.
    pub fn interactive(&self) -> bool {
        self.config.interactive && self.capabilities.display && self.frontend.is_some()
    }

    /// Convert every file in order, stopping early only if the operator quits.
    pub fn convert_all(
        &mut self,
        files: &[PathBuf],
        progress: Option<Sender<ProcessEvent>>,
    ) -> RunResult {
        if self.config.interactive && !self.interactive() {
            debug!(
                display = self.capabilities.display,
                "interactive mode unavailable, using automatic crop"
            );
        }

        let total = files.len();
        let mut report = ConversionReport::new(total);

        for (i, source) in files.iter().enumerate() {
            emit(
                progress.as_ref(),
                ProcessEvent::Started {
                    index: i + 1,
                    total,
                    source: source.clone(),
                },
            );

            let outcome = match self.convert_file(source, progress.as_ref()) {
                Ok(converted) => FileOutcome::Converted(converted),
                Err(ConvertError::Skipped) => FileOutcome::Skipped {
                    reason: ConvertError::Skipped.to_string(),
                },
                Err(ConvertError::Quit) => {
                    info!(file = %source.display(), "operator quit");
                    return RunResult { report, quit: true };
                }
                Err(e) => {
                    warn!(file = %source.display(), error = %e, "conversion failed");
                    FileOutcome::Failed {
                        cause: e.to_string(),
                    }
                }
            };

            emit(
                progress.as_ref(),
                ProcessEvent::Finished {
                    source: source.clone(),
                    outcome: outcome.clone(),
                },
            );
            report.record(source.clone(), outcome);
        }

        RunResult {
            report,
            quit: false,
        }
    }

    /// Run the full pipeline for one file.
    pub fn convert_file(
        &mut self,
        source: &Path,
        progress: Option<&Sender<ProcessEvent>>,
    ) -> Result<ConvertedFile, ConvertError> {
        if is_heif(source) && !self.capabilities.heif_decode {
            return Err(ConvertError::HeifUnavailable(source.to_path_buf()));
        }

        let decoded = self.backend.decode(source)?;
        let original = Dimensions::of(&decoded.image);
        if decoded.orientation != Orientation::NoTransforms {
            debug!(file = %source.display(), orientation = ?decoded.orientation, "applied orientation");
        }
        emit(
            progress,
            ProcessEvent::Opened {
                format: decoded
                    .format
                    .map(|f| format!("{f:?}").to_uppercase())
                    .unwrap_or_else(|| "UNKNOWN".to_string()),
                dimensions: original,
                color: format!("{:?}", decoded.image.color()),
            },
        );

        let rgb = flatten_to_rgb(decoded.image);
        let target = self.config.target_size;

        let region = if self.interactive() {
            let window = max_crop_window(original, target);
            emit(
                progress,
                ProcessEvent::CropStarted {
                    source: original,
                    window,
                },
            );
            let frontend = self
                .frontend
                .as_deref_mut()
                .ok_or_else(|| CropError::Display("no crop frontend".into()))?;
            match crop::choose_region(frontend, &rgb, target)? {
                CropDecision::Accept(region) => region,
                CropDecision::Skip => return Err(ConvertError::Skipped),
                CropDecision::Quit => return Err(ConvertError::Quit),
            }
        } else {
            auto_crop_region(original, target).ok_or(ConvertError::EmptyImage)?
        };
        debug!(file = %source.display(), ?region, "crop region");

        let cropped = crate::imaging::crop(&rgb, region);
        let full = resize_exact(&cropped, target);
        let thumb = make_thumbnail(&cropped, self.config.thumb_size);

        let file_name = format!(
            "{}.{}",
            source
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default(),
            self.config.format.extension()
        );
        let full_path = self.config.output_dir.join(&file_name);
        let thumb_path = self.config.thumbnails_dir().join(&file_name);

        self.backend.encode(&full, &self.encode_params(&full_path))?;
        self.backend.encode(&thumb, &self.encode_params(&thumb_path))?;

        Ok(ConvertedFile {
            original_bytes: fs::metadata(source)?.len(),
            full_bytes: fs::metadata(&full_path)?.len(),
            thumb_bytes: fs::metadata(&thumb_path)?.len(),
            dimensions: Dimensions::new(full.width(), full.height()),
            thumb_dimensions: Dimensions::new(thumb.width(), thumb.height()),
            full_path,
            thumb_path,
        })
    }

    fn encode_params(&self, output: &Path) -> EncodeParams {
        EncodeParams {
            output: output.to_path_buf(),
            format: self.config.format,
            quality: self.config.quality,
        }
    }
}

fn emit(progress: Option<&Sender<ProcessEvent>>, event: ProcessEvent) {
    if let Some(tx) = progress {
        // Receiver gone means nobody is printing; conversion continues regardless
        tx.send(event).ok();
    }
}
