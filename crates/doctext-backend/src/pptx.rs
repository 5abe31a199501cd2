//! PPTX (Microsoft PowerPoint) adapter
//!
//! Presentations are only parsed from file paths. Buffer sources always get
//! a placeholder.
//!
//! Slides are read by a primary [`SlideSource`] (`pptx-to-md`, flattened to
//! plain runs). If it fails, a fallback source that walks
//! `ppt/slides/slideN.xml` directly is tried; only when both fail does the
//! adapter return an error.

use crate::traits::ExtractionBackend;
use anyhow::{anyhow, bail, Context};
use doctext_core::{placeholder, ExtractionError, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use zip::ZipArchive;

/// One slide as reported by a slide source
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Slide {
    /// Slide text; `None` when the slide has no text
    pub text: Option<String>,
}

impl Slide {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }

    #[must_use]
    pub const fn empty() -> Self {
        Self { text: None }
    }
}

/// Something that can turn a presentation file into slides
pub trait SlideSource: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &'static str;

    /// Parse every slide in `path`, in presentation order
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or parsed.
    fn load(&self, path: &Path) -> anyhow::Result<Vec<Slide>>;
}

/// Primary source backed by `pptx-to-md`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PptxContainerSource;

impl SlideSource for PptxContainerSource {
    fn name(&self) -> &'static str {
        "pptx-to-md"
    }

    fn load(&self, path: &Path) -> anyhow::Result<Vec<Slide>> {
        use pptx_to_md::{ParserConfig, PptxContainer};

        let config = ParserConfig::builder()
            .extract_images(false)
            .include_slide_comment(false)
            .build();

        let mut container = PptxContainer::open(path, config)
            .with_context(|| format!("Failed to open PPTX: {}", path.display()))?;

        let mut slides = container
            .parse_all()
            .with_context(|| format!("Failed to parse PPTX slides: {}", path.display()))?;
        slides.sort_by_key(|slide| slide.slide_number);

        Ok(slides
            .iter()
            .map(|slide| Slide {
                text: plain_slide_text(&slide.elements),
            })
            .collect())
    }
}

/// Plain text of parsed slide elements in reading order (top to bottom, then left to right)
///
/// Runs are taken verbatim, so no formatting markup survives. Table cells are
/// tab-separated, one row per line. Images carry no text.
fn plain_slide_text(elements: &[pptx_to_md::SlideElement]) -> Option<String> {
    use pptx_to_md::{Run, SlideElement};

    fn runs_text(runs: &[Run]) -> String {
        runs.iter().map(|run| run.text.as_str()).collect()
    }

    let mut ordered: Vec<&SlideElement> = elements.iter().collect();
    ordered.sort_by_key(|element| {
        let position = element.position();
        (position.y, position.x)
    });

    let mut chunks: Vec<String> = Vec::new();
    for element in ordered {
        match element {
            SlideElement::Text(text, _) => chunks.push(runs_text(&text.runs)),
            SlideElement::List(list, _) => {
                chunks.extend(list.items.iter().map(|item| runs_text(&item.runs)));
            }
            SlideElement::Table(table, _) => {
                chunks.extend(table.rows.iter().map(|row| {
                    row.cells
                        .iter()
                        .map(|cell| runs_text(&cell.runs))
                        .collect::<Vec<_>>()
                        .join("\t")
                }));
            }
            SlideElement::Image(..) | SlideElement::Unknown => {}
        }
    }

    let lines: Vec<&str> = chunks
        .iter()
        .flat_map(|chunk| chunk.lines())
        .map(str::trim_end)
        .filter(|line| !line.trim().is_empty())
        .collect();

    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

/// Fallback source reading slide XML straight from the container
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct OoxmlSlideSource;

impl SlideSource for OoxmlSlideSource {
    fn name(&self) -> &'static str {
        "ooxml"
    }

    fn load(&self, path: &Path) -> anyhow::Result<Vec<Slide>> {
        parse_slides(path)
    }
}

/// Slide number for `ppt/slides/slideN.xml` entries
fn slide_number(entry: &str) -> Option<usize> {
    entry
        .strip_prefix("ppt/slides/slide")?
        .strip_suffix(".xml")?
        .parse()
        .ok()
}

/// Read every slide of the presentation at `path`, ordered by slide number
///
/// # Errors
/// Returns an error if the file is not a ZIP container, has no slides, or
/// holds malformed slide XML.
pub fn parse_slides(path: &Path) -> anyhow::Result<Vec<Slide>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let mut archive =
        ZipArchive::new(file).map_err(|e| anyhow!("Failed to open PPTX as ZIP: {e}"))?;

    let mut entries: Vec<(usize, String)> = archive
        .file_names()
        .filter_map(|name| slide_number(name).map(|n| (n, name.to_string())))
        .collect();
    entries.sort_by_key(|(n, _)| *n);

    if entries.is_empty() {
        bail!("No slides found in {}", path.display());
    }

    let mut slides = Vec::with_capacity(entries.len());
    for (_, entry) in entries {
        let xml_content = {
            let mut file = archive
                .by_name(&entry)
                .map_err(|e| anyhow!("Failed to read {entry}: {e}"))?;
            let mut content = String::new();
            file.read_to_string(&mut content)
                .with_context(|| format!("Failed to read {entry}"))?;
            content
        };
        let text = slide_text(&xml_content).with_context(|| format!("Malformed {entry}"))?;
        slides.push(Slide { text });
    }
    Ok(slides)
}

/// Text of one slide: `a:t` runs, one line per `a:p` paragraph
fn slide_text(xml_content: &str) -> anyhow::Result<Option<String>> {
    let mut reader = Reader::from_str(xml_content);
    reader.trim_text(false);

    let mut buf = Vec::new();
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) if e.name().as_ref() == b"a:t" => in_text = true,
            Ok(Event::Text(e)) if in_text => {
                let text = e.unescape().map_err(|e| anyhow!("Invalid text run: {e}"))?;
                current.push_str(&text);
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"a:t" => in_text = false,
                b"a:p" => {
                    let line = std::mem::take(&mut current);
                    if !line.trim().is_empty() {
                        lines.push(line);
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => bail!("XML error at position {}: {e}", reader.buffer_position()),
            _ => {}
        }
        buf.clear();
    }

    if lines.is_empty() {
        Ok(None)
    } else {
        Ok(Some(lines.join("\n")))
    }
}

/// Join present slide texts with newlines and trim the result
#[must_use]
pub fn join_slides(slides: &[Slide]) -> String {
    slides
        .iter()
        .filter_map(|slide| slide.text.as_deref())
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Adapter for `application/vnd.openxmlformats-officedocument.presentationml.presentation`
#[derive(Clone)]
pub struct PptxBackend {
    primary: Arc<dyn SlideSource>,
    fallback: Arc<dyn SlideSource>,
}

impl PptxBackend {
    #[must_use]
    pub fn new(primary: Arc<dyn SlideSource>, fallback: Arc<dyn SlideSource>) -> Self {
        Self { primary, fallback }
    }
}

impl Default for PptxBackend {
    fn default() -> Self {
        Self::new(Arc::new(PptxContainerSource), Arc::new(OoxmlSlideSource))
    }
}

impl std::fmt::Debug for PptxBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PptxBackend")
            .field("primary", &self.primary.name())
            .field("fallback", &self.fallback.name())
            .finish()
    }
}

impl ExtractionBackend for PptxBackend {
    fn name(&self) -> &'static str {
        "PPTX"
    }

    fn extract_bytes(&self, data: &[u8]) -> Result<String> {
        log::debug!("PPTX buffer of {} bytes not parsed", data.len());
        Ok(placeholder::PPTX_BUFFER_UNSUPPORTED.to_string())
    }

    fn extract_file(&self, path: &Path) -> Result<String> {
        let slides = match self.primary.load(path) {
            Ok(slides) => slides,
            Err(primary_err) => {
                log::warn!(
                    "{} failed for {}: {primary_err:#}; trying {}",
                    self.primary.name(),
                    path.display(),
                    self.fallback.name()
                );
                self.fallback.load(path).map_err(|e| {
                    ExtractionError::PresentationExtractionFailure(format!("{e:#}"))
                })?
            }
        };
        Ok(join_slides(&slides))
    }
}
