//! CLI output formatting.
//!
//! Everything the operator reads on stdout comes from here. Diagnostics go
//! through `tracing` to stderr instead.
//!
//! # Output Format
//!
//! ```text
//! Found 2 image(s) to convert:
//!     photo.jpg (jpg)
//!     logo.png (png)
//!
//! Converting 2 image(s) → /home/me/out
//!     Size: 1000x1000
//!     Thumbnail: 200x200
//!     Format: WebP (quality 85)
//!     Interactive: OFF
//!
//! [1/2] photo.jpg
//!     Opened: JPEG 3000x2000 Rgb8
//!     ✓ Saved: photo.webp
//!     Original: 812.4 KB → Full: 96.1 KB | Thumb: 7.9 KB
//! [2/2] logo.png
//!     ✗ Error: Decode failed: ...
//!
//! Conversion complete!
//! Converted: 1/2 images
//! Skipped: 0 | Failed: 1
//! Output: /home/me/out
//! Thumbnails: /home/me/out/thumbnails
//! ```
//!
//! # Architecture
//!
//! Each section has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::config::ConversionConfig;
use crate::discover::SUPPORTED_EXTENSIONS;
use crate::process::ProcessEvent;
use crate::report::{ConversionReport, FileOutcome, kilobytes};
use std::path::Path;

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{}", line);
    }
}

// ============================================================================
// Before the run
// ============================================================================

/// List discovered files with their extensions.
pub fn format_found_files(files: &[impl AsRef<Path>]) -> Vec<String> {
    let mut lines = vec![format!("Found {} image(s) to convert:", files.len())];
    for file in files {
        let path = file.as_ref();
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default();
        lines.push(format!("{}{} ({})", indent(1), file_name(path), ext));
    }
    lines
}

pub fn print_found_files(files: &[impl AsRef<Path>]) {
    print_lines(format_found_files(files));
}

/// Shown when the input directory has nothing to convert.
pub fn format_no_images(input_dir: &Path) -> Vec<String> {
    let checked: Vec<String> = SUPPORTED_EXTENSIONS
        .iter()
        .map(|ext| format!(".{ext}"))
        .collect();
    vec![
        format!("No supported images found in {}", input_dir.display()),
        format!("{}Checked extensions: {}", indent(1), checked.join(", ")),
    ]
}

pub fn print_no_images(input_dir: &Path) {
    print_lines(format_no_images(input_dir));
}

/// Run parameters, printed once before the first file.
pub fn format_run_header(config: &ConversionConfig, count: usize, interactive: bool) -> Vec<String> {
    vec![
        String::new(),
        format!(
            "Converting {} image(s) \u{2192} {}",
            count,
            config.output_dir.display()
        ),
        format!("{}Size: {}", indent(1), config.target_size),
        format!("{}Thumbnail: {}", indent(1), config.thumb_size),
        format!(
            "{}Format: {} (quality {})",
            indent(1),
            config.format,
            config.quality.value()
        ),
        format!(
            "{}Interactive: {}",
            indent(1),
            if interactive { "ON" } else { "OFF" }
        ),
        String::new(),
    ]
}

pub fn print_run_header(config: &ConversionConfig, count: usize, interactive: bool) {
    print_lines(format_run_header(config, count, interactive));
}

/// Key bindings for the interactive crop window.
pub fn format_crop_controls() -> Vec<String> {
    vec![
        "Interactive crop controls:".to_string(),
        format!("{}Arrow keys  move the crop window", indent(1)),
        format!("{}c           re-center", indent(1)),
        format!("{}Enter       accept and convert", indent(1)),
        format!("{}s           skip this image", indent(1)),
        format!("{}q / Esc     quit", indent(1)),
    ]
}

pub fn print_crop_controls() {
    print_lines(format_crop_controls());
}

// ============================================================================
// During the run
// ============================================================================

/// Format a single progress event as display lines.
pub fn format_process_event(event: &ProcessEvent) -> Vec<String> {
    match event {
        ProcessEvent::Started {
            index,
            total,
            source,
        } => vec![format!("[{}/{}] {}", index, total, file_name(source))],
        ProcessEvent::Opened {
            format,
            dimensions,
            color,
        } => vec![format!(
            "{}Opened: {} {} {}",
            indent(1),
            format,
            dimensions,
            color
        )],
        ProcessEvent::CropStarted { source, window } => vec![format!(
            "{}Cropping {} out of {} (Enter to accept)",
            indent(1),
            window,
            source
        )],
        ProcessEvent::Finished { outcome, .. } => match outcome {
            FileOutcome::Converted(file) => vec![
                format!("{}\u{2713} Saved: {}", indent(1), file_name(&file.full_path)),
                format!(
                    "{}Original: {} KB \u{2192} Full: {} KB | Thumb: {} KB",
                    indent(1),
                    kilobytes(file.original_bytes),
                    kilobytes(file.full_bytes),
                    kilobytes(file.thumb_bytes)
                ),
            ],
            FileOutcome::Skipped { reason } => {
                vec![format!("{}- Skipped: {}", indent(1), reason)]
            }
            FileOutcome::Failed { cause } => {
                vec![format!("{}\u{2717} Error: {}", indent(1), cause)]
            }
        },
    }
}

// ============================================================================
// After the run
// ============================================================================

/// Final summary. `quit` marks a run the operator stopped early.
pub fn format_summary(report: &ConversionReport, config: &ConversionConfig, quit: bool) -> Vec<String> {
    let mut lines = vec![String::new()];
    if quit {
        lines.push(format!(
            "Conversion cancelled after {} of {} image(s).",
            report.processed(),
            report.found
        ));
    } else {
        lines.push("Conversion complete!".to_string());
    }
    lines.push(format!(
        "Converted: {}/{} images",
        report.converted, report.found
    ));
    lines.push(format!(
        "Skipped: {} | Failed: {}",
        report.skipped, report.failed
    ));

    let (original, output) = report.total_bytes();
    if report.converted > 0 {
        lines.push(format!(
            "Total: {} KB \u{2192} {} KB",
            kilobytes(original),
            kilobytes(output)
        ));
    }
    lines.push(format!("Output: {}", config.output_dir.display()));
    lines.push(format!("Thumbnails: {}", config.thumbnails_dir().display()));
    lines
}

pub fn print_summary(report: &ConversionReport, config: &ConversionConfig, quit: bool) {
    print_lines(format_summary(report, config, quit));
}
