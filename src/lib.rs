//! # Projview
//!
//! `projview` is a library for working with the extracted contents of an uploaded project
//! archive: unpacking the archive, building a browsable tree of the extraction root, reading
//! single files safely on behalf of untrusted callers, and bundling sources for
//! documentation generation.
//!
//! All reads are confined to the extraction root. [`FileReader::read_file`] resolves the
//! requested path (including `..` segments and symlinks) and refuses anything outside the
//! root with [`ProjviewError::InvalidPath`].
//!
//! # Features
//!
//! - `parallel`: Enables parallel source collection using Rayon.
//! - `logging`: Enables debug logging via the `tracing` crate.
//!
//! # Example
//!
//! ```no_run
//! use projview::{FileReader, ReaderBuilder, RenderKind, build_tree, extract_archive};
//!
//! extract_archive("upload.zip", "media/extracted/42").expect("Failed to extract");
//!
//! for entry in build_tree("media/extracted/42") {
//!     println!("{} ({})", entry.path(), if entry.is_dir() { "dir" } else { "file" });
//! }
//!
//! let reader = FileReader::new(ReaderBuilder::new().max_file_size(512 * 1024).build());
//! let file = reader
//!     .read_file("media/extracted/42", "README.md")
//!     .expect("Failed to read file");
//! assert_eq!(file.render_kind, RenderKind::Markdown);
//! ```

mod archive;
mod documents;
mod engine;
mod error;
mod markdown;
mod options;
pub mod output;
mod paths;
mod reader;
mod tree;
mod types;

pub use archive::{extract_archive, extract_archive_from_reader};
pub use engine::collect_sources;
pub use error::ProjviewError;
pub use markdown::{CommonMarkRenderer, MarkdownRenderer};
pub use options::{
    BinaryDetection, CollectBuilder, CollectOptions, DEFAULT_MAX_FILE_SIZE, PLAIN_LANGUAGE,
    ReaderBuilder, ReaderOptions,
};
pub use reader::{FileReader, read_file};
pub use tree::build_tree;
pub use types::{
    DirectoryEntry, ExtractSummary, FileReadResult, RenderKind, SourceBundle, SourceFile,
};
