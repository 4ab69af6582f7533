//! Text extraction for office documents found in uploaded projects.

use crate::error::ProjviewError;
use quick_xml::Reader;
use quick_xml::events::Event;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use zip::ZipArchive;

const DOCX_BODY: &str = "word/document.xml";

/// Document formats whose text is extracted instead of read raw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DocumentKind {
    Docx,
    Pdf,
}

impl DocumentKind {
    pub(crate) fn from_extension(extension: &str) -> Option<Self> {
        match extension {
            "docx" => Some(DocumentKind::Docx),
            "pdf" => Some(DocumentKind::Pdf),
            _ => None,
        }
    }
}

/// Extracts the plain text of a document, one line per paragraph or page.
pub(crate) fn extract_text(path: &Path, kind: DocumentKind) -> Result<String, ProjviewError> {
    match kind {
        DocumentKind::Docx => docx_text(path),
        DocumentKind::Pdf => pdf_text(path),
    }
}

fn docx_text(path: &Path) -> Result<String, ProjviewError> {
    let file = File::open(path).map_err(|e| ProjviewError::io(path, e))?;
    let mut archive = ZipArchive::new(BufReader::new(file))
        .map_err(|e| ProjviewError::Document(format!("{}: {}", path.display(), e)))?;
    let mut xml = String::new();
    archive
        .by_name(DOCX_BODY)
        .map_err(|e| ProjviewError::Document(format!("{}: {}", path.display(), e)))?
        .read_to_string(&mut xml)
        .map_err(|e| ProjviewError::io(path, e))?;
    paragraphs_from_xml(&xml)
        .map(|paragraphs| paragraphs.join("\n"))
        .map_err(|e| ProjviewError::Document(format!("{}: {}", path.display(), e)))
}

/// Collects the `w:t` runs of each `w:p` paragraph in a WordprocessingML body.
fn paragraphs_from_xml(xml: &str) -> Result<Vec<String>, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut in_text = false;
    loop {
        match reader.read_event()? {
            Event::Start(e) if e.name().as_ref() == b"w:t" => in_text = true,
            Event::End(e) if e.name().as_ref() == b"w:t" => in_text = false,
            Event::Empty(e) if e.name().as_ref() == b"w:tab" => current.push('\t'),
            Event::End(e) if e.name().as_ref() == b"w:p" => {
                paragraphs.push(std::mem::take(&mut current));
            }
            Event::Text(t) if in_text => current.push_str(&t.unescape()?),
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(paragraphs)
}

fn pdf_text(path: &Path) -> Result<String, ProjviewError> {
    let document = lopdf::Document::load(path)
        .map_err(|e| ProjviewError::Document(format!("{}: {}", path.display(), e)))?;
    let pages: Vec<String> = document
        .get_pages()
        .keys()
        .map(|&number| document.extract_text(&[number]).unwrap_or_default())
        .collect();
    Ok(pages.join("\n"))
}
