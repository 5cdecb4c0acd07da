//! Aggregate results of a conversion run.
//!
//! Every file ends in exactly one [`FileOutcome`]; the report is a fold over
//! those outcomes. It is printed as a summary at the end of the run and can be
//! written as pretty JSON with `--report`:
//!
//! ```json
//! {
//!   "found": 3,
//!   "converted": 2,
//!   "skipped": 0,
//!   "failed": 1,
//!   "files": [
//!     { "source": "in/a.jpg", "status": "converted", "full_path": "out/a.webp", ... },
//!     { "source": "in/b.heic", "status": "failed", "cause": "..." }
//!   ]
//! }
//! ```

use crate::imaging::Dimensions;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A successfully converted file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConvertedFile {
    pub full_path: PathBuf,
    pub thumb_path: PathBuf,
    pub dimensions: Dimensions,
    pub thumb_dimensions: Dimensions,
    pub original_bytes: u64,
    pub full_bytes: u64,
    pub thumb_bytes: u64,
}

/// Terminal state of one file.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    Converted(ConvertedFile),
    Skipped { reason: String },
    Failed { cause: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileEntry {
    pub source: PathBuf,
    #[serde(flatten)]
    pub outcome: FileOutcome,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConversionReport {
    /// Files discovered, including any never reached because the run was quit.
    pub found: usize,
    pub converted: usize,
    pub skipped: usize,
    pub failed: usize,
    pub files: Vec<FileEntry>,
}

impl ConversionReport {
    pub fn new(found: usize) -> Self {
        Self {
            found,
            ..Self::default()
        }
    }

    pub fn record(&mut self, source: impl Into<PathBuf>, outcome: FileOutcome) {
        match &outcome {
            FileOutcome::Converted(_) => self.converted += 1,
            FileOutcome::Skipped { .. } => self.skipped += 1,
            FileOutcome::Failed { .. } => self.failed += 1,
        }
        self.files.push(FileEntry {
            source: source.into(),
            outcome,
        });
    }

    /// Files that reached a terminal state.
    pub fn processed(&self) -> usize {
        self.converted + self.skipped + self.failed
    }

    /// Total (original, full + thumbnail) bytes over converted files.
    pub fn total_bytes(&self) -> (u64, u64) {
        self.files
            .iter()
            .filter_map(|entry| match &entry.outcome {
                FileOutcome::Converted(file) => Some(file),
                _ => None,
            })
            .fold((0, 0), |(original, output), file| {
                (
                    original + file.original_bytes,
                    output + file.full_bytes + file.thumb_bytes,
                )
            })
    }

    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_json(&self, path: &Path) -> Result<(), ReportError> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

/// Byte count as kilobytes with one decimal, e.g. `"12.3"`.
pub fn kilobytes(bytes: u64) -> String {
    format!("{:.1}", bytes as f64 / 1024.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn converted(original: u64, full: u64, thumb: u64) -> FileOutcome {
        FileOutcome::Converted(ConvertedFile {
            full_path: PathBuf::from("out/a.webp"),
            thumb_path: PathBuf::from("out/thumbnails/a.webp"),
            dimensions: Dimensions::new(1000, 1000),
            thumb_dimensions: Dimensions::new(200, 200),
            original_bytes: original,
            full_bytes: full,
            thumb_bytes: thumb,
        })
    }

    fn failed(cause: &str) -> FileOutcome {
        FileOutcome::Failed {
            cause: cause.to_string(),
        }
    }

    #[test]
    fn record_counts_each_outcome() {
        let mut report = ConversionReport::new(4);
        report.record("a.jpg", converted(10, 5, 1));
        report.record("b.heic", failed("no HEIF"));
        report.record(
            "c.png",
            FileOutcome::Skipped {
                reason: "operator".into(),
            },
        );
        report.record("d.jpg", converted(20, 8, 2));

        assert_eq!(report.found, 4);
        assert_eq!(report.converted, 2);
        assert_eq!(report.failed, 1);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.processed(), 4);
        assert_eq!(report.files[1].source, PathBuf::from("b.heic"));
    }

    #[test]
    fn total_bytes_ignores_unconverted() {
        let mut report = ConversionReport::new(2);
        report.record("a.jpg", converted(1000, 300, 50));
        report.record("b.jpg", failed("corrupt"));
        assert_eq!(report.total_bytes(), (1000, 350));
    }

    #[test]
    fn kilobytes_one_decimal() {
        assert_eq!(kilobytes(0), "0.0");
        assert_eq!(kilobytes(1024), "1.0");
        assert_eq!(kilobytes(1536), "1.5");
        assert_eq!(kilobytes(2_500_000), "2441.4");
    }

    #[test]
    fn json_tags_outcomes() {
        let mut report = ConversionReport::new(2);
        report.record("a.jpg", converted(10, 5, 1));
        report.record("b.jpg", failed("truncated"));

        let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(value["found"], 2);
        assert_eq!(value["files"][0]["status"], "converted");
        assert_eq!(value["files"][0]["dimensions"]["width"], 1000);
        assert_eq!(value["files"][1]["status"], "failed");
        assert_eq!(value["files"][1]["cause"], "truncated");
        assert_eq!(value["files"][1]["source"], "b.jpg");
    }

    #[test]
    fn write_json_creates_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("report.json");
        ConversionReport::new(0).write_json(&path).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"converted\": 0"));
    }
}
