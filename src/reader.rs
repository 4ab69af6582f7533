//! Containment-checked file reads for a single extraction root.

use crate::error::ProjviewError;
use crate::markdown::{CommonMarkRenderer, MarkdownRenderer, preformatted};
use crate::options::{ReaderOptions, extension_of};
use crate::paths::{is_within, normalize_lexically};
use crate::types::{FileReadResult, RenderKind};
use content_inspector::ContentType;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

const UTF8_BOM_LEN: usize = 3;

/// Reads files beneath an extraction root on behalf of untrusted callers.
///
/// Every request is resolved against the canonical root. Anything that lands
/// outside it, whether through `..`, an absolute path, or a symlink, is
/// rejected with [`ProjviewError::InvalidPath`].
pub struct FileReader {
    options: ReaderOptions,
    renderer: Box<dyn MarkdownRenderer>,
}

impl Default for FileReader {
    fn default() -> Self {
        Self::new(ReaderOptions::default())
    }
}

impl std::fmt::Debug for FileReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileReader")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl FileReader {
    pub fn new(options: ReaderOptions) -> Self {
        Self::with_renderer(options, CommonMarkRenderer)
    }

    pub fn with_renderer(options: ReaderOptions, renderer: impl MarkdownRenderer + 'static) -> Self {
        Self {
            options,
            renderer: Box::new(renderer),
        }
    }

    pub fn options(&self) -> &ReaderOptions {
        &self.options
    }

    /// Reads `relative` beneath `root`, decodes it, and classifies it for display.
    ///
    /// # Errors
    ///
    /// - [`ProjviewError::InvalidPath`] if the path resolves outside `root`.
    /// - [`ProjviewError::NotFound`] if the root or target is missing, or the
    ///   target is not a regular file.
    /// - [`ProjviewError::TooLarge`] if the file exceeds the configured ceiling.
    pub fn read_file(
        &self,
        root: impl AsRef<Path>,
        relative: impl AsRef<Path>,
    ) -> Result<FileReadResult, ProjviewError> {
        let relative = relative.as_ref();
        let target = resolve_contained(root.as_ref(), relative)?;

        let metadata = fs::metadata(&target)
            .map_err(|_| ProjviewError::NotFound(relative.display().to_string()))?;
        if !metadata.is_file() {
            return Err(ProjviewError::NotFound(relative.display().to_string()));
        }
        let size = metadata.len();
        if size > self.options.max_file_size {
            #[cfg(feature = "logging")]
            tracing::debug!(
                "Refusing {} ({} > {} bytes)",
                target.display(),
                size,
                self.options.max_file_size
            );
            return Err(ProjviewError::TooLarge {
                size,
                limit: self.options.max_file_size,
            });
        }

        let bytes = read_capped(&target, self.options.max_file_size)?;
        let (text, decode_fallback_used) = decode_text(bytes);
        #[cfg(feature = "logging")]
        {
            if decode_fallback_used {
                tracing::debug!("{} is not UTF-8, decoded as Latin-1", target.display());
            }
        }

        let name = target
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let extension = extension_of(&name);

        let (content, render_kind, language_hint) =
            if self.options.markdown_extensions.contains(&extension) {
                let html = match self.renderer.render(&text) {
                    Ok(html) => html,
                    Err(_e) => {
                        #[cfg(feature = "logging")]
                        tracing::warn!("Markdown conversion failed for {}: {}", target.display(), _e);
                        preformatted(&text)
                    }
                };
                (html, RenderKind::Markdown, None)
            } else if self.options.code_extensions.contains(&extension) {
                let language = self.options.language_for(&extension).to_string();
                (text, RenderKind::Code, Some(language))
            } else {
                (text, RenderKind::Text, None)
            };

        Ok(FileReadResult {
            content,
            render_kind,
            language_hint,
            size,
            decode_fallback_used,
        })
    }
}

/// Reads a file with the default options and CommonMark rendering.
pub fn read_file(
    root: impl AsRef<Path>,
    relative: impl AsRef<Path>,
) -> Result<FileReadResult, ProjviewError> {
    FileReader::default().read_file(root, relative)
}

/// Resolves `relative` against `root`, following symlinks, and checks containment.
///
/// A target that does not exist is still [`ProjviewError::InvalidPath`] when
/// either its lexically normalized form or its deepest existing ancestor lies
/// outside the root, so missing and present outside files look the same.
fn resolve_contained(root: &Path, relative: &Path) -> Result<PathBuf, ProjviewError> {
    let canonical_root = fs::canonicalize(root)
        .map_err(|_| ProjviewError::NotFound(root.display().to_string()))?;
    let joined = canonical_root.join(relative);
    match fs::canonicalize(&joined) {
        Ok(target) if is_within(&canonical_root, &target) => Ok(target),
        Ok(_) => Err(escape(relative)),
        Err(_) => {
            let lexically_inside = is_within(&canonical_root, &normalize_lexically(&joined));
            let ancestor_inside = joined
                .ancestors()
                .skip(1)
                .find_map(|ancestor| fs::canonicalize(ancestor).ok())
                .is_some_and(|ancestor| is_within(&canonical_root, &ancestor));
            if lexically_inside && ancestor_inside {
                Err(ProjviewError::NotFound(relative.display().to_string()))
            } else {
                Err(escape(relative))
            }
        }
    }
}

fn escape(relative: &Path) -> ProjviewError {
    #[cfg(feature = "logging")]
    tracing::warn!("Rejected path escaping the root: {}", relative.display());
    ProjviewError::InvalidPath(relative.display().to_string())
}

/// Reads at most `limit` bytes, failing if the file turns out to hold more.
fn read_capped(path: &Path, limit: u64) -> Result<Vec<u8>, ProjviewError> {
    let file = File::open(path).map_err(|e| ProjviewError::io(path, e))?;
    let mut bytes = Vec::new();
    file.take(limit.saturating_add(1))
        .read_to_end(&mut bytes)
        .map_err(|e| ProjviewError::io(path, e))?;
    let read = bytes.len() as u64;
    if read > limit {
        return Err(ProjviewError::TooLarge { size: read, limit });
    }
    Ok(bytes)
}

/// Decodes bytes as UTF-8 (dropping a BOM), or as Latin-1 when that fails.
///
/// Returns the text and whether the Latin-1 fallback was used.
pub(crate) fn decode_text(mut bytes: Vec<u8>) -> (String, bool) {
    if content_inspector::inspect(&bytes) == ContentType::UTF_8_BOM {
        bytes.drain(..UTF8_BOM_LEN);
    }
    match String::from_utf8(bytes) {
        Ok(text) => (text, false),
        Err(err) => (err.into_bytes().iter().map(|&b| char::from(b)).collect(), true),
    }
}
