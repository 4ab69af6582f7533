use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

/// Files larger than this many bytes are refused by the reader.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 1_000_000;

/// Language tag used when a code extension has no entry in the table.
pub const PLAIN_LANGUAGE: &str = "plaintext";

const MARKDOWN_EXTENSIONS: &[&str] = &["md", "markdown"];

const CODE_EXTENSIONS: &[&str] = &[
    "py", "js", "ts", "java", "c", "cpp", "rb", "go", "rs", "jsx", "tsx", "html", "css", "json",
    "yaml", "yml",
];

const LANGUAGE_TABLE: &[(&str, &str)] = &[
    ("py", "python"),
    ("js", "javascript"),
    ("jsx", "javascript"),
    ("ts", "typescript"),
    ("tsx", "typescript"),
    ("java", "java"),
    ("c", "c"),
    ("h", "c"),
    ("cpp", "cpp"),
    ("cc", "cpp"),
    ("cxx", "cpp"),
    ("hpp", "cpp"),
    ("rb", "ruby"),
    ("go", "go"),
    ("rs", "rust"),
    ("html", "html"),
    ("htm", "html"),
    ("css", "css"),
    ("json", "json"),
    ("yaml", "yaml"),
    ("yml", "yaml"),
    ("toml", "toml"),
    ("xml", "xml"),
    ("sh", "bash"),
    ("bash", "bash"),
    ("md", "markdown"),
    ("markdown", "markdown"),
    ("txt", "text"),
    ("php", "php"),
    ("swift", "swift"),
    ("kt", "kotlin"),
    ("kts", "kotlin"),
    ("scala", "scala"),
    ("dart", "dart"),
];

fn to_set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Built-in highlighting tag for a lowercase extension.
pub(crate) fn default_language(extension: &str) -> Option<&'static str> {
    LANGUAGE_TABLE
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map(|(_, lang)| *lang)
}

/// Returns the lowercased extension of `name`, or an empty string.
pub(crate) fn extension_of(name: &str) -> String {
    std::path::Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default()
}

/// Immutable settings for [`FileReader`](crate::FileReader).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReaderOptions {
    pub max_file_size: u64,
    /// Extensions (lowercase, without dot) rendered as Markdown.
    pub markdown_extensions: BTreeSet<String>,
    /// Extensions (lowercase, without dot) rendered as code.
    pub code_extensions: BTreeSet<String>,
    /// Extension to syntax highlighting tag.
    pub language_hints: BTreeMap<String, String>,
}
impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            markdown_extensions: to_set(MARKDOWN_EXTENSIONS),
            code_extensions: to_set(CODE_EXTENSIONS),
            language_hints: LANGUAGE_TABLE
                .iter()
                .map(|(ext, lang)| (ext.to_string(), lang.to_string()))
                .collect(),
        }
    }
}
impl ReaderOptions {
    /// Looks up the highlighting tag for an extension, falling back to [`PLAIN_LANGUAGE`].
    pub fn language_for(&self, extension: &str) -> &str {
        self.language_hints
            .get(extension)
            .map(String::as_str)
            .unwrap_or(PLAIN_LANGUAGE)
    }
}
#[derive(Debug, Default)]
pub struct ReaderBuilder {
    options: ReaderOptions,
}
impl ReaderBuilder {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn max_file_size(mut self, limit: u64) -> Self {
        self.options.max_file_size = limit;
        self
    }
    pub fn markdown_extensions(mut self, extensions: Vec<String>) -> Self {
        self.options.markdown_extensions = normalize_extensions(extensions);
        self
    }
    pub fn code_extensions(mut self, extensions: Vec<String>) -> Self {
        self.options.code_extensions = normalize_extensions(extensions);
        self
    }
    pub fn language_hint(mut self, extension: &str, language: impl Into<String>) -> Self {
        self.options
            .language_hints
            .insert(normalize_extension(extension), language.into());
        self
    }
    pub fn build(self) -> ReaderOptions {
        self.options
    }
}
fn normalize_extension(ext: &str) -> String {
    ext.trim_start_matches('.').to_ascii_lowercase()
}
fn normalize_extensions(extensions: Vec<String>) -> BTreeSet<String> {
    extensions.iter().map(|e| normalize_extension(e)).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryDetection {
    Simple,
    Accurate,
    None,
}
/// Settings for [`collect_sources`](crate::collect_sources).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectOptions {
    pub root: PathBuf,
    pub respect_gitignore: bool,
    pub max_depth: Option<usize>,
    pub include_hidden: bool,
    pub follow_links: bool,
    pub ignore_patterns: Vec<String>,
    pub file_size_limit: Option<u64>,
    pub binary_detection: BinaryDetection,
    pub include_file_size: bool,
    pub skip_binary: bool,
    pub skip_empty: bool,
}
impl Default for CollectOptions {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            respect_gitignore: true,
            max_depth: None,
            include_hidden: false,
            follow_links: false,
            ignore_patterns: Vec::new(),
            file_size_limit: Some(DEFAULT_MAX_FILE_SIZE),
            binary_detection: BinaryDetection::Simple,
            include_file_size: false,
            skip_binary: false,
            skip_empty: false,
        }
    }
}
#[derive(Debug, Default)]
pub struct CollectBuilder {
    options: CollectOptions,
}
impl CollectBuilder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            options: CollectOptions {
                root: root.into(),
                ..Default::default()
            },
        }
    }
    pub fn respect_gitignore(mut self, yes: bool) -> Self {
        self.options.respect_gitignore = yes;
        self
    }
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.options.max_depth = Some(depth);
        self
    }
    pub fn no_limit_depth(mut self) -> Self {
        self.options.max_depth = None;
        self
    }
    pub fn include_hidden(mut self, yes: bool) -> Self {
        self.options.include_hidden = yes;
        self
    }
    pub fn follow_links(mut self, yes: bool) -> Self {
        self.options.follow_links = yes;
        self
    }
    pub fn ignore_patterns(mut self, patterns: Vec<String>) -> Self {
        self.options.ignore_patterns = patterns;
        self
    }
    pub fn file_size_limit(mut self, limit: Option<u64>) -> Self {
        self.options.file_size_limit = limit;
        self
    }
    pub fn binary_detection(mut self, method: BinaryDetection) -> Self {
        self.options.binary_detection = method;
        self
    }
    pub fn include_file_size(mut self, yes: bool) -> Self {
        self.options.include_file_size = yes;
        self
    }
    pub fn skip_binary(mut self, yes: bool) -> Self {
        self.options.skip_binary = yes;
        self
    }
    pub fn skip_empty(mut self, yes: bool) -> Self {
        self.options.skip_empty = yes;
        self
    }
    pub fn build(self) -> CollectOptions {
        self.options
    }
}
