//! Output formatting for collected source bundles.
//!
//! Provides functions to format a [`SourceBundle`] into Markdown, plain text, or JSON,
//! the document handed to a documentation generator. All formatting preserves the
//! exact content of files and the directory tree.

use crate::{ProjviewError, SourceBundle};
use std::fs;
use std::path::Path;

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Markdown,
    Text,
    Json,
}

impl OutputFormat {
    /// Returns the conventional file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Markdown => "md",
            OutputFormat::Text => "txt",
            OutputFormat::Json => "json",
        }
    }
}

/// Formats the bundle into a string.
pub fn format_bundle(
    bundle: &SourceBundle,
    format: OutputFormat,
    pretty: bool,
) -> Result<String, ProjviewError> {
    match format {
        OutputFormat::Markdown => Ok(format_markdown(bundle)),
        OutputFormat::Text => Ok(format_text(bundle)),
        OutputFormat::Json => format_json(bundle, pretty),
    }
}

/// Writes the formatted bundle to a file.
pub fn write_bundle_to_file(
    bundle: &SourceBundle,
    format: OutputFormat,
    path: impl AsRef<Path>,
    pretty: bool,
) -> Result<(), ProjviewError> {
    let content = format_bundle(bundle, format, pretty)?;
    fs::write(&path, content).map_err(|e| ProjviewError::io(path.as_ref(), e))?;
    Ok(())
}

// ----------------------- Internal formatting -----------------------

fn format_markdown(bundle: &SourceBundle) -> String {
    let mut out = String::with_capacity(1024);
    out.push_str(&bundle.tree);
    if !bundle.tree.ends_with('\n') { out.push('\n'); }
    out.push('\n');

    for file in &bundle.files {
        out.push_str(&format!("## {}\n\n```{}\n", file.path, file.language_hint));
        out.push_str(&file.content);
        if !file.content.ends_with('\n') { out.push('\n'); }
        out.push_str("```\n\n");
    }
    out
}

fn format_text(bundle: &SourceBundle) -> String {
    let mut out = String::with_capacity(1024);
    out.push_str("Directory Tree:\n");
    out.push_str(&bundle.tree);
    if !bundle.tree.ends_with('\n') { out.push('\n'); }
    out.push_str("\n\nFiles:\n");

    for file in &bundle.files {
        out.push_str(&format!("\n--- {} ---\n", file.path));
        out.push_str(&file.content);
        if !file.content.ends_with('\n') { out.push('\n'); }
    }
    out
}

fn format_json(bundle: &SourceBundle, pretty: bool) -> Result<String, ProjviewError> {
    let json = if pretty {
        serde_json::to_string_pretty(bundle)?
    } else {
        serde_json::to_string(bundle)?
    };
    Ok(json)
}
