//! Image file enumeration.

use crate::error::{Result, ScanError};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Raster extensions accepted by [`list_images`] (compared case-insensitively)
pub const IMAGE_EXTENSIONS: &[&str] = &[
    "tif", "tiff", "gif", "bmp", "jpg", "jpeg", "jp2", "png", "pcx", "pgm", "ppm", "pbm", "xwd",
    "ima", "hobj",
];

/// True when `path` has one of [`IMAGE_EXTENSIONS`]
pub fn is_image_path(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

/// Recursively collect image files under `root`, sorted by path.
///
/// Symlinks are followed, but every directory is read at most once, so links
/// back to an ancestor do not repeat images. Only a failure to read `root`
/// itself is an error; unreadable subdirectories are skipped.
pub fn list_images(root: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let root = root.as_ref();
    let listing_error = |source| ScanError::Listing {
        path: root.to_path_buf(),
        source,
    };
    let entries = fs::read_dir(root).map_err(listing_error)?;

    let mut visited = HashSet::new();
    visited.insert(fs::canonicalize(root).map_err(listing_error)?);

    let mut images = Vec::new();
    let mut stack = Vec::new();
    collect_entries(entries, &mut stack, &mut images);

    while let Some(dir) = stack.pop() {
        let canonical = match fs::canonicalize(&dir) {
            Ok(canonical) => canonical,
            Err(err) => {
                debug!("Skipping unresolvable directory {}: {}", dir.display(), err);
                continue;
            }
        };
        if !visited.insert(canonical) {
            debug!("Skipping already visited directory {}", dir.display());
            continue;
        }
        match fs::read_dir(&dir) {
            Ok(entries) => collect_entries(entries, &mut stack, &mut images),
            Err(err) => debug!("Skipping unreadable directory {}: {}", dir.display(), err),
        }
    }

    images.sort();
    Ok(images)
}

fn collect_entries(entries: fs::ReadDir, stack: &mut Vec<PathBuf>, images: &mut Vec<PathBuf>) {
    for entry in entries.flatten() {
        let path = entry.path();
        // `Path::is_dir` follows symlinks.
        if path.is_dir() {
            stack.push(path);
        } else if is_image_path(&path) {
            images.push(path);
        }
    }
}
