use serde::{Deserialize, Serialize};

/// One node of the browsable directory tree produced by [`build_tree`](crate::build_tree).
///
/// `path` is relative to the browsing root and always uses forward slashes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DirectoryEntry {
    Directory {
        name: String,
        path: String,
        children: Vec<DirectoryEntry>,
    },
    File {
        name: String,
        path: String,
    },
}

impl DirectoryEntry {
    pub fn name(&self) -> &str {
        match self {
            DirectoryEntry::Directory { name, .. } | DirectoryEntry::File { name, .. } => name,
        }
    }

    pub fn path(&self) -> &str {
        match self {
            DirectoryEntry::Directory { path, .. } | DirectoryEntry::File { path, .. } => path,
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, DirectoryEntry::Directory { .. })
    }

    /// Children of a directory; files have none.
    pub fn children(&self) -> &[DirectoryEntry] {
        match self {
            DirectoryEntry::Directory { children, .. } => children,
            DirectoryEntry::File { .. } => &[],
        }
    }
}

/// How a file's content should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenderKind {
    /// Content has already been converted to HTML.
    Markdown,
    /// Source code; see [`FileReadResult::language_hint`].
    Code,
    Text,
}

/// The outcome of a single successful [`FileReader::read_file`](crate::FileReader::read_file).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileReadResult {
    pub content: String,
    pub render_kind: RenderKind,
    /// Syntax highlighting tag, only set for [`RenderKind::Code`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_hint: Option<String>,
    /// Size of the file on disk in bytes.
    pub size: u64,
    /// Set when the bytes were not valid UTF-8 and were decoded as Latin-1.
    pub decode_fallback_used: bool,
}

/// A single collected source file with its content and metadata.
#[derive(Debug, Serialize, Deserialize)]
pub struct SourceFile {
    /// Path relative to the collection root, slash separated.
    pub path: String,
    /// The content of the file as a string.
    ///
    /// If the file was detected as binary or exceeded the size limit, this will contain
    /// a placeholder message like `[Binary file, content omitted]`.
    pub content: String,
    /// Whether the file was detected as binary.
    pub is_binary: bool,
    /// The size of the file in bytes, if requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Fence tag used when the file is rendered into a Markdown bundle.
    pub language_hint: String,
}

/// Everything collected from an extraction root for documentation generation.
#[derive(Debug, Serialize, Deserialize)]
pub struct SourceBundle {
    /// A visual tree representation of the directory structure.
    ///
    /// This is a string similar to the output of the `tree` command.
    pub tree: String,
    /// Collected files, sorted by path.
    pub files: Vec<SourceFile>,
}

/// Counts reported by [`extract_archive`](crate::extract_archive).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractSummary {
    pub files: usize,
    pub directories: usize,
    /// Entries whose names would have escaped the destination.
    pub skipped: usize,
}
