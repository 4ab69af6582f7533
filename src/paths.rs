//! Path helpers shared by the tree builder, reader, and archive extractor.

use std::path::{Component, Path, PathBuf};

/// Resolves `.` and `..` components without touching the filesystem.
///
/// A `..` that would climb above the start of a relative path is kept, so the
/// result never silently loses an escape.
pub(crate) fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }
    out.iter().collect()
}

/// Joins the components of `relative` with forward slashes.
pub(crate) fn to_slash(relative: &Path) -> String {
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Component-wise containment, so `/a/root2` is not inside `/a/root`.
pub(crate) fn is_within(root: &Path, target: &Path) -> bool {
    target.starts_with(root)
}
