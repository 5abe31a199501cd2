//! DOCX (Microsoft Word) raw text adapter
//!
//! # Architecture
//!
//! DOCX files are ZIP archives; body text lives in `word/document.xml`.
//! Only run text is kept: no styles, numbering, tables or images.
//!
//! - `w:t` runs are concatenated within a paragraph
//! - `w:tab` becomes `\t`, `w:br` and `w:cr` become `\n`
//! - paragraphs (`w:p`) are separated by a blank line
//!
//! The extraction step sits behind [`RawTextExtractor`] so callers can plug a
//! different converter in.

use crate::traits::ExtractionBackend;
use anyhow::{anyhow, Context};
use doctext_core::{ExtractionError, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::fs::File;
use std::io::{Cursor, Read, Seek};
use std::path::Path;
use std::sync::Arc;
use zip::ZipArchive;

/// Converts a DOCX container into raw text
pub trait RawTextExtractor: Send + Sync {
    /// Extract from an in-memory container
    ///
    /// # Errors
    /// Returns an error if the container or its XML is malformed.
    fn extract_from_bytes(&self, data: &[u8]) -> anyhow::Result<String>;

    /// Extract from a container on disk
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is malformed.
    fn extract_from_path(&self, path: &Path) -> anyhow::Result<String>;
}

/// Built-in extractor reading `word/document.xml` directly
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct OoxmlRawText;

impl OoxmlRawText {
    fn from_archive<R: Read + Seek>(archive: &mut ZipArchive<R>) -> anyhow::Result<String> {
        let xml_content = {
            let mut document_xml = archive
                .by_name("word/document.xml")
                .map_err(|e| anyhow!("Missing word/document.xml: {e}"))?;
            let mut content = String::new();
            document_xml
                .read_to_string(&mut content)
                .context("Failed to read word/document.xml")?;
            content
        };
        document_text(&xml_content)
    }
}

impl RawTextExtractor for OoxmlRawText {
    fn extract_from_bytes(&self, data: &[u8]) -> anyhow::Result<String> {
        let mut archive = ZipArchive::new(Cursor::new(data))
            .map_err(|e| anyhow!("Failed to open DOCX as ZIP: {e}"))?;
        Self::from_archive(&mut archive)
    }

    fn extract_from_path(&self, path: &Path) -> anyhow::Result<String> {
        let file =
            File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
        let mut archive =
            ZipArchive::new(file).map_err(|e| anyhow!("Failed to open DOCX as ZIP: {e}"))?;
        Self::from_archive(&mut archive)
    }
}

/// Collect run text from a `word/document.xml` body
///
/// # Errors
/// Returns an error on malformed XML.
pub fn document_text(xml_content: &str) -> anyhow::Result<String> {
    let mut reader = Reader::from_str(xml_content);
    reader.trim_text(false);

    let mut buf = Vec::new();
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"w:t" => in_text = true,
                b"w:p" => current.clear(),
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"w:tab" => current.push('\t'),
                b"w:br" | b"w:cr" => current.push('\n'),
                b"w:p" => paragraphs.push(String::new()),
                _ => {}
            },
            Ok(Event::Text(e)) if in_text => {
                let text = e
                    .unescape()
                    .map_err(|e| anyhow!("Invalid text run: {e}"))?;
                current.push_str(&text);
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:p" => paragraphs.push(std::mem::take(&mut current)),
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(anyhow!(
                    "Malformed XML at position {}: {e}",
                    reader.buffer_position()
                ))
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(paragraphs.join("\n\n"))
}

/// Adapter for `application/vnd.openxmlformats-officedocument.wordprocessingml.document`
#[derive(Clone)]
pub struct DocxBackend {
    extractor: Arc<dyn RawTextExtractor>,
}

impl DocxBackend {
    #[must_use]
    pub fn new(extractor: Arc<dyn RawTextExtractor>) -> Self {
        Self { extractor }
    }
}

impl Default for DocxBackend {
    fn default() -> Self {
        Self::new(Arc::new(OoxmlRawText))
    }
}

impl std::fmt::Debug for DocxBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocxBackend").finish_non_exhaustive()
    }
}

fn hard_failure(e: &anyhow::Error) -> ExtractionError {
    ExtractionError::DocumentExtractionFailure(format!("{e:#}"))
}

impl ExtractionBackend for DocxBackend {
    fn name(&self) -> &'static str {
        "DOCX"
    }

    fn extract_bytes(&self, data: &[u8]) -> Result<String> {
        self.extractor
            .extract_from_bytes(data)
            .map_err(|e| hard_failure(&e))
    }

    fn extract_file(&self, path: &Path) -> Result<String> {
        self.extractor
            .extract_from_path(path)
            .map_err(|e| hard_failure(&e))
    }
}
