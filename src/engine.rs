use crate::documents::{DocumentKind, extract_text};
use crate::error::ProjviewError;
use crate::options::{BinaryDetection, CollectOptions, default_language, extension_of};
use crate::paths::{is_within, to_slash};
use crate::reader::decode_text;
use crate::tree::render_ascii_tree;
use crate::types::{SourceBundle, SourceFile};
use ignore::WalkBuilder;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

const SNIFF_LEN: usize = 4096;
const TOO_LARGE_PLACEHOLDER: &str = "[File too large, content omitted]";
const BINARY_PLACEHOLDER: &str = "[Binary file, content omitted]";

struct Walker {
    inner: ignore::Walk,
}
impl Walker {
    fn new(options: &CollectOptions) -> Result<Self, ProjviewError> {
        let mut builder = WalkBuilder::new(&options.root);
        builder
            .git_ignore(options.respect_gitignore)
            .hidden(!options.include_hidden)
            .max_depth(options.max_depth)
            .follow_links(options.follow_links)
            .ignore(false);
        if !options.ignore_patterns.is_empty() {
            let mut glob_builder = globset::GlobSetBuilder::new();
            for pattern in &options.ignore_patterns {
                let glob = globset::Glob::new(pattern).map_err(|e| {
                    ProjviewError::Walk(format!("Invalid glob pattern '{}': {}", pattern, e))
                })?;
                glob_builder.add(glob);
            }
            let matcher = glob_builder
                .build()
                .map_err(|e| ProjviewError::Walk(format!("Failed to build glob set: {}", e)))?;
            let root = options.root.clone();
            builder.filter_entry(move |entry| {
                let relative = entry.path().strip_prefix(&root).unwrap_or(entry.path());
                !(matcher.is_match(relative) || matcher.is_match(entry.file_name()))
            });
        }
        Ok(Self {
            inner: builder.build(),
        })
    }
    /// Returns every walked path and whether it is a regular file to collect.
    ///
    /// Unless links are followed, symlinks are dropped. When they are followed,
    /// anything whose real location lies outside the root is dropped.
    fn collect_entries(
        self,
        options: &CollectOptions,
    ) -> Result<Vec<(PathBuf, bool)>, ProjviewError> {
        let canonical_root = fs::canonicalize(&options.root)
            .map_err(|e| ProjviewError::io(&options.root, e))?;
        let mut entries = Vec::new();
        for result in self.inner {
            let entry = result.map_err(|e| ProjviewError::Walk(e.to_string()))?;
            if entry.depth() > 0 {
                if entry.path_is_symlink() && !options.follow_links {
                    #[cfg(feature = "logging")]
                    tracing::debug!("Skipping symlink {}", entry.path().display());
                    continue;
                }
                if options.follow_links && !resolves_within(&canonical_root, entry.path()) {
                    #[cfg(feature = "logging")]
                    tracing::debug!("Skipping {} outside the root", entry.path().display());
                    continue;
                }
            }
            let is_file = entry.file_type().is_some_and(|t| t.is_file());
            entries.push((entry.into_path(), is_file));
        }
        Ok(entries)
    }
}

fn resolves_within(canonical_root: &Path, path: &Path) -> bool {
    fs::canonicalize(path).is_ok_and(|target| is_within(canonical_root, &target))
}

fn read_file_content(
    path: &Path,
    binary_detection: BinaryDetection,
    size_limit: Option<u64>,
) -> Result<(String, bool), ProjviewError> {
    if let Some(limit) = size_limit {
        let metadata = fs::metadata(path).map_err(|e| ProjviewError::io(path, e))?;
        if metadata.len() > limit {
            #[cfg(feature = "logging")]
            tracing::debug!(
                "File too large ({} > {}), skipping content",
                metadata.len(),
                limit
            );
            return Ok((TOO_LARGE_PLACEHOLDER.to_string(), false));
        }
    }
    let extension = path
        .file_name()
        .map(|n| extension_of(&n.to_string_lossy()))
        .unwrap_or_default();
    if let Some(kind) = DocumentKind::from_extension(&extension) {
        match extract_text(path, kind) {
            Ok(text) => return Ok((text, false)),
            Err(_e) => {
                #[cfg(feature = "logging")]
                tracing::debug!("Text extraction failed, treating as binary: {}", _e);
                return Ok((BINARY_PLACEHOLDER.to_string(), true));
            }
        }
    }
    let file = File::open(path).map_err(|e| ProjviewError::io(path, e))?;
    let mut reader = BufReader::new(file);
    let mut bytes = Vec::with_capacity(SNIFF_LEN);
    reader
        .read_to_end(&mut bytes)
        .map_err(|e| ProjviewError::io(path, e))?;
    let head = &bytes[..bytes.len().min(SNIFF_LEN)];
    let is_binary = match binary_detection {
        BinaryDetection::Simple => head.contains(&0),
        BinaryDetection::Accurate => content_inspector::inspect(head).is_binary(),
        BinaryDetection::None => false,
    };
    if is_binary {
        #[cfg(feature = "logging")]
        tracing::debug!("Binary file detected: {}", path.display());
        return Ok((BINARY_PLACEHOLDER.to_string(), true));
    }
    let (content, _) = decode_text(bytes);
    Ok((content, false))
}

/// Walks `options.root` and collects the text of every matching file.
///
/// The returned files are sorted by relative path. Oversized and binary files
/// keep a placeholder instead of their content unless they are dropped through
/// [`CollectOptions::skip_binary`].
///
/// # Errors
///
/// Fails on an invalid ignore pattern, a walk error, or an unreadable file.
pub fn collect_sources(options: CollectOptions) -> Result<SourceBundle, ProjviewError> {
    #[cfg(feature = "logging")]
    tracing::debug!("Collecting sources under {}", options.root.display());
    if !options.root.is_dir() {
        return Err(ProjviewError::NotFound(options.root.display().to_string()));
    }
    let walker = Walker::new(&options)?;
    let all_entries = walker.collect_entries(&options)?;
    let paths: Vec<PathBuf> = all_entries.iter().map(|(p, _)| p.clone()).collect();
    let tree = render_ascii_tree(&options.root, &paths);
    let file_paths: Vec<PathBuf> = all_entries
        .into_iter()
        .filter_map(|(p, is_file)| is_file.then_some(p))
        .collect();
    #[cfg(not(feature = "parallel"))]
    let files = process_files(file_paths, &options)?;
    #[cfg(feature = "parallel")]
    let files = process_files_parallel(file_paths, &options)?;
    let mut files: Vec<SourceFile> = files
        .into_iter()
        .filter(|f| !(options.skip_binary && f.is_binary))
        .filter(|f| !(options.skip_empty && f.content.trim().is_empty()))
        .collect();
    files.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(SourceBundle { tree, files })
}

fn source_file(path: &Path, options: &CollectOptions) -> Result<SourceFile, ProjviewError> {
    let (content, is_binary) =
        read_file_content(path, options.binary_detection, options.file_size_limit)?;
    let size = if options.include_file_size {
        Some(fs::metadata(path).map_err(|e| ProjviewError::io(path, e))?.len())
    } else {
        None
    };
    let relative = path.strip_prefix(&options.root).unwrap_or(path);
    let name = relative
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(SourceFile {
        path: to_slash(relative),
        content,
        is_binary,
        size,
        language_hint: default_language(&extension_of(&name))
            .unwrap_or_default()
            .to_string(),
    })
}

#[cfg(not(feature = "parallel"))]
fn process_files(
    paths: Vec<PathBuf>,
    options: &CollectOptions,
) -> Result<Vec<SourceFile>, ProjviewError> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        files.push(source_file(&path, options)?);
    }
    Ok(files)
}

#[cfg(feature = "parallel")]
fn process_files_parallel(
    paths: Vec<PathBuf>,
    options: &CollectOptions,
) -> Result<Vec<SourceFile>, ProjviewError> {
    paths
        .par_iter()
        .map(|path| source_file(path, options))
        .collect()
}
