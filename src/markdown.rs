//! Markdown to HTML conversion used by the file reader.

use pulldown_cmark::{Options, Parser, html};

/// Converts Markdown text to HTML.
///
/// Implementations may fail; the reader then falls back to showing the raw
/// text in a `<pre>` block.
pub trait MarkdownRenderer: Send + Sync {
    fn render(&self, markdown: &str) -> Result<String, String>;
}

/// CommonMark renderer with tables, strikethrough, footnotes and task lists.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommonMarkRenderer;

impl MarkdownRenderer for CommonMarkRenderer {
    fn render(&self, markdown: &str) -> Result<String, String> {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_TASKLISTS);
        let parser = Parser::new_ext(markdown, options);
        let mut out = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut out, parser);
        Ok(out)
    }
}

/// Wraps raw text in a preformatted block, escaping HTML metacharacters.
pub(crate) fn preformatted(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 16);
    out.push_str("<pre>");
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out.push_str("</pre>");
    out
}
