//! Input file discovery.
//!
//! Lists the images directly inside the input directory (no recursion). An
//! extension matches when it is one of [`SUPPORTED_EXTENSIONS`] written in
//! lowercase, UPPERCASE or Capitalized form, which covers what cameras and
//! phones actually produce (`IMG_0001.JPG`, `IMG_0002.Heic`). The result is
//! sorted and free of duplicates.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;
use walkdir::WalkDir;

/// Recognized input extensions, lowercase.
pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "bmp", "tiff", "tif", "gif", "heic", "heif",
];

const HEIF_EXTENSIONS: &[&str] = &["heic", "heif"];

#[derive(Error, Debug)]
pub enum DiscoverError {
    #[error("Cannot read input directory {0}: {1}")]
    Unreadable(PathBuf, #[source] walkdir::Error),
}

/// The casings of `ext` that are accepted: `jpg`, `JPG`, `Jpg`.
fn casing_variants(ext: &str) -> [String; 3] {
    let mut chars = ext.chars();
    let capitalized = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };
    [ext.to_lowercase(), ext.to_uppercase(), capitalized]
}

/// Whether the file's extension is one we try to convert.
pub fn is_supported(path: &Path) -> bool {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    SUPPORTED_EXTENSIONS
        .iter()
        .any(|supported| casing_variants(supported).iter().any(|v| v == ext))
}

/// Whether the file is HEIC/HEIF, which needs an optional decoder.
pub fn is_heif(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| HEIF_EXTENSIONS.iter().any(|h| ext.eq_ignore_ascii_case(h)))
}

/// Find all supported images directly inside `dir`, sorted by path.
///
/// Entries that cannot be inspected (e.g. dangling symlinks) are logged and
/// skipped; only failing to read `dir` itself is an error.
pub fn discover_images(dir: &Path) -> Result<Vec<PathBuf>, DiscoverError> {
    let mut found = BTreeSet::new();

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => {
                return Err(DiscoverError::Unreadable(dir.to_path_buf(), e));
            }
            Err(e) => {
                warn!(error = %e, "skipping unreadable entry");
                continue;
            }
        };
        if entry.file_type().is_file() && is_supported(entry.path()) {
            found.insert(entry.into_path());
        }
    }

    Ok(found.into_iter().collect())
}
