//! Unpacking uploaded project archives into an extraction root.

use crate::error::ProjviewError;
use crate::paths::normalize_lexically;
use crate::types::ExtractSummary;
use std::fs::{self, File};
use std::io::{self, BufReader, Read, Seek};
use std::path::{Component, Path, PathBuf};
use zip::ZipArchive;

/// Extracts the ZIP archive at `archive_path` into `dest`.
///
/// `dest` is created if needed. Entries with absolute names or names that
/// climb out of `dest` are skipped and counted in [`ExtractSummary::skipped`].
///
/// # Errors
///
/// [`ProjviewError::InvalidArchive`] if the file is not a readable ZIP, and
/// [`ProjviewError::Io`] if writing fails.
pub fn extract_archive(
    archive_path: impl AsRef<Path>,
    dest: impl AsRef<Path>,
) -> Result<ExtractSummary, ProjviewError> {
    let archive_path = archive_path.as_ref();
    let file = File::open(archive_path).map_err(|e| ProjviewError::io(archive_path, e))?;
    extract_archive_from_reader(BufReader::new(file), dest)
}

/// Same as [`extract_archive`] for an archive that is already open.
pub fn extract_archive_from_reader<R: Read + Seek>(
    reader: R,
    dest: impl AsRef<Path>,
) -> Result<ExtractSummary, ProjviewError> {
    let dest = dest.as_ref();
    let mut archive =
        ZipArchive::new(reader).map_err(|e| ProjviewError::InvalidArchive(e.to_string()))?;
    fs::create_dir_all(dest).map_err(|e| ProjviewError::io(dest, e))?;

    let mut summary = ExtractSummary::default();
    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|e| ProjviewError::InvalidArchive(e.to_string()))?;
        let Some(relative) = safe_entry_path(entry.enclosed_name()) else {
            #[cfg(feature = "logging")]
            tracing::warn!("Skipping archive entry outside the destination: {}", entry.name());
            summary.skipped += 1;
            continue;
        };
        let out_path = dest.join(&relative);

        if entry.is_dir() {
            fs::create_dir_all(&out_path).map_err(|e| ProjviewError::io(&out_path, e))?;
            summary.directories += 1;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent).map_err(|e| ProjviewError::io(parent, e))?;
        }
        let mut out = File::create(&out_path).map_err(|e| ProjviewError::io(&out_path, e))?;
        io::copy(&mut entry, &mut out).map_err(|e| ProjviewError::io(&out_path, e))?;
        summary.files += 1;
    }

    #[cfg(feature = "logging")]
    tracing::debug!(
        "Extracted {} files and {} directories into {} ({} skipped)",
        summary.files,
        summary.directories,
        dest.display(),
        summary.skipped
    );
    Ok(summary)
}

fn safe_entry_path(enclosed: Option<&Path>) -> Option<PathBuf> {
    let normalized = normalize_lexically(enclosed?);
    match normalized.components().next() {
        Some(Component::Normal(_)) => Some(normalized),
        _ => None,
    }
}
