//! Directory tree construction for browsing, plus the ASCII tree used in bundles.

use crate::paths::{is_within, to_slash};
use crate::types::DirectoryEntry;
use ignore::WalkBuilder;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

struct FlatEntry {
    relative: PathBuf,
    name: String,
    is_dir: bool,
}

/// Builds the full, ordered tree of everything under `root`.
///
/// Within each directory, subdirectories come before files and names are
/// compared case-insensitively (raw name breaks ties). A missing root yields an
/// empty tree. A directory that cannot be listed shows up with no children
/// instead of failing the whole traversal.
///
/// Symlinks are never descended. A link that resolves to a file or directory
/// inside the root is listed (a linked directory has no children); a link that
/// dangles or points outside the root is left out.
pub fn build_tree(root: impl AsRef<Path>) -> Vec<DirectoryEntry> {
    let root = root.as_ref();
    if !root.is_dir() {
        #[cfg(feature = "logging")]
        tracing::debug!("Tree root {} is not a directory", root.display());
        return Vec::new();
    }
    let canonical_root = match fs::canonicalize(root) {
        Ok(path) => path,
        Err(_) => return Vec::new(),
    };

    let mut builder = WalkBuilder::new(root);
    builder.standard_filters(false).follow_links(false);

    let mut by_parent: HashMap<PathBuf, Vec<FlatEntry>> = HashMap::new();
    for result in builder.build() {
        let entry = match result {
            Ok(entry) => entry,
            Err(_e) => {
                #[cfg(feature = "logging")]
                tracing::debug!("Skipping unreadable entry: {}", _e);
                continue;
            }
        };
        if entry.depth() == 0 {
            continue;
        }
        let Some(file_type) = entry.file_type() else {
            continue;
        };
        let is_dir = if file_type.is_dir() {
            true
        } else if file_type.is_file() {
            false
        } else if file_type.is_symlink() {
            match classify_link(&canonical_root, entry.path()) {
                Some(is_dir) => is_dir,
                None => continue,
            }
        } else {
            continue;
        };
        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };
        let parent = relative.parent().map(Path::to_path_buf).unwrap_or_default();
        by_parent.entry(parent).or_default().push(FlatEntry {
            relative: relative.to_path_buf(),
            name: entry.file_name().to_string_lossy().into_owned(),
            is_dir,
        });
    }

    assemble(Path::new(""), &mut by_parent)
}

/// `Some(is_dir)` when the link resolves inside the root.
fn classify_link(canonical_root: &Path, link: &Path) -> Option<bool> {
    let target = fs::canonicalize(link).ok()?;
    if !is_within(canonical_root, &target) {
        #[cfg(feature = "logging")]
        tracing::debug!("Omitting link {} pointing outside the root", link.display());
        return None;
    }
    let metadata = fs::metadata(&target).ok()?;
    if metadata.is_dir() {
        Some(true)
    } else if metadata.is_file() {
        Some(false)
    } else {
        None
    }
}

fn assemble(dir: &Path, by_parent: &mut HashMap<PathBuf, Vec<FlatEntry>>) -> Vec<DirectoryEntry> {
    let mut entries = by_parent.remove(dir).unwrap_or_default();
    entries.sort_by(compare_entries);
    entries
        .into_iter()
        .map(|entry| {
            let path = to_slash(&entry.relative);
            if entry.is_dir {
                DirectoryEntry::Directory {
                    children: assemble(&entry.relative, by_parent),
                    name: entry.name,
                    path,
                }
            } else {
                DirectoryEntry::File {
                    name: entry.name,
                    path,
                }
            }
        })
        .collect()
}

fn compare_entries(a: &FlatEntry, b: &FlatEntry) -> Ordering {
    b.is_dir
        .cmp(&a.is_dir)
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        .then_with(|| a.name.cmp(&b.name))
}

/// Builds a visual tree string from a root directory and a list of entries.
///
/// The entries are expected to be paths under the root. The output is similar to
/// the `tree` command, using box-drawing characters.
pub(crate) fn render_ascii_tree(root: &Path, entries: &[PathBuf]) -> String {
    let mut sorted: Vec<_> = entries.iter().filter(|p| *p != root).collect();
    sorted.sort_by(|a, b| a.components().cmp(b.components()));

    let mut lines = Vec::new();
    lines.push(format!(".  # {}", root.display()));

    for entry in sorted {
        let relative = entry.strip_prefix(root).unwrap_or(entry);
        let depth = relative.components().count();
        let Some(name) = relative.file_name() else {
            continue;
        };
        let prefix = if depth == 0 {
            String::new()
        } else {
            "│   ".repeat(depth - 1) + "├── "
        };
        lines.push(format!("{}{}", prefix, name.to_string_lossy()));
    }

    lines.join("\n")
}
