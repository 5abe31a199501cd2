//! PDF parsing engines and their capability shapes
//!
//! A [`PdfModule`] bundles whichever entry points a parsing library offers.
//! Libraries come in three shapes, tried in order:
//!
//! | Shape | Entry point | Result |
//! |-------|-------------|--------|
//! | [`PdfCapabilityShape::Session`] | construct a session from bytes, `get_text`, `destroy` | structured or bare |
//! | [`PdfCapabilityShape::DefaultExport`] | one parse function | structured or bare |
//! | [`PdfCapabilityShape::ModuleCallable`] | the module itself, called with bytes | structured or bare |
//!
//! Sessions are released through a guard, so `destroy` runs whether or not
//! text retrieval succeeds.
//!
//! The built-in module's session reads text with `lopdf` and falls back to
//! `pdf-extract` when `lopdf` cannot load the document, fails, or finds no
//! text. `pdf-extract` alone backs the default export.

use crate::panic_message;
use anyhow::{anyhow, bail};
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

/// Text returned by a parsing entry point
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PdfText {
    /// Result object carrying a `text` field
    Structured { text: String },
    /// The text itself
    Bare(String),
}

impl PdfText {
    #[must_use]
    pub fn into_text(self) -> String {
        match self {
            Self::Structured { text } | Self::Bare(text) => text,
        }
    }
}

impl From<String> for PdfText {
    fn from(text: String) -> Self {
        Self::Bare(text)
    }
}

/// An open parsing session over one document
pub trait PdfSession {
    /// Extract the document's text
    ///
    /// # Errors
    /// Returns the parser's error.
    fn get_text(&mut self) -> anyhow::Result<PdfText>;

    /// Release the session
    ///
    /// # Errors
    /// Returns an error if the parser fails to release its state.
    fn destroy(self: Box<Self>) -> anyhow::Result<()>;
}

type SessionConstructor =
    Arc<dyn Fn(&[u8]) -> anyhow::Result<Box<dyn PdfSession>> + Send + Sync>;
type ParseFunction = Arc<dyn Fn(&[u8]) -> anyhow::Result<PdfText> + Send + Sync>;

/// Capability shapes a PDF module can expose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PdfCapabilityShape {
    Session,
    DefaultExport,
    ModuleCallable,
}

/// One entry of [`SHAPE_REGISTRY`]
#[derive(Clone, Copy)]
pub struct ShapeProbe {
    pub shape: PdfCapabilityShape,
    pub matches: fn(&PdfModule) -> bool,
}

fn has_session(module: &PdfModule) -> bool {
    module.session.is_some()
}

fn has_default_export(module: &PdfModule) -> bool {
    module.default_export.is_some()
}

fn is_callable(module: &PdfModule) -> bool {
    module.call.is_some()
}

/// Shapes in precedence order; the first match wins
pub const SHAPE_REGISTRY: &[ShapeProbe] = &[
    ShapeProbe {
        shape: PdfCapabilityShape::Session,
        matches: has_session,
    },
    ShapeProbe {
        shape: PdfCapabilityShape::DefaultExport,
        matches: has_default_export,
    },
    ShapeProbe {
        shape: PdfCapabilityShape::ModuleCallable,
        matches: is_callable,
    },
];

/// A PDF parsing library, described by the entry points it exposes
#[derive(Clone, Default)]
pub struct PdfModule {
    name: String,
    session: Option<SessionConstructor>,
    default_export: Option<ParseFunction>,
    call: Option<ParseFunction>,
}

impl PdfModule {
    /// A module with no entry points yet
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// The built-in module: `lopdf` sessions backed by `pdf-extract`, and
    /// `pdf-extract` as default export
    #[must_use]
    pub fn builtin() -> Self {
        Self::new("lopdf+pdf-extract")
            .with_session(open_builtin_session)
            .with_default_export(pdf_extract_text)
    }

    #[must_use]
    pub fn with_session<F>(mut self, constructor: F) -> Self
    where
        F: Fn(&[u8]) -> anyhow::Result<Box<dyn PdfSession>> + Send + Sync + 'static,
    {
        self.session = Some(Arc::new(constructor));
        self
    }

    #[must_use]
    pub fn with_default_export<F>(mut self, parse: F) -> Self
    where
        F: Fn(&[u8]) -> anyhow::Result<PdfText> + Send + Sync + 'static,
    {
        self.default_export = Some(Arc::new(parse));
        self
    }

    #[must_use]
    pub fn with_call<F>(mut self, parse: F) -> Self
    where
        F: Fn(&[u8]) -> anyhow::Result<PdfText> + Send + Sync + 'static,
    {
        self.call = Some(Arc::new(parse));
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// First shape in [`SHAPE_REGISTRY`] this module satisfies
    #[must_use]
    pub fn resolve_shape(&self) -> Option<PdfCapabilityShape> {
        SHAPE_REGISTRY
            .iter()
            .find(|probe| (probe.matches)(self))
            .map(|probe| probe.shape)
    }

    /// Parse `data` through the entry point for `shape`
    ///
    /// # Errors
    /// Returns the parser's error, or an error if the module lacks `shape`.
    pub fn invoke(&self, shape: PdfCapabilityShape, data: &[u8]) -> anyhow::Result<PdfText> {
        let missing = || anyhow!("{} does not expose {shape:?}", self.name);
        match shape {
            PdfCapabilityShape::Session => {
                let construct = self.session.as_ref().ok_or_else(missing)?;
                let mut guard = SessionGuard::new(construct(data)?);
                guard.get_text()
            }
            PdfCapabilityShape::DefaultExport => {
                let parse = self.default_export.as_ref().ok_or_else(missing)?;
                parse(data)
            }
            PdfCapabilityShape::ModuleCallable => {
                let parse = self.call.as_ref().ok_or_else(missing)?;
                parse(data)
            }
        }
    }
}

impl fmt::Debug for PdfModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PdfModule")
            .field("name", &self.name)
            .field("shape", &self.resolve_shape())
            .finish()
    }
}

/// Destroys the wrapped session on drop
struct SessionGuard {
    session: Option<Box<dyn PdfSession>>,
}

impl SessionGuard {
    fn new(session: Box<dyn PdfSession>) -> Self {
        Self {
            session: Some(session),
        }
    }

    fn get_text(&mut self) -> anyhow::Result<PdfText> {
        match self.session.as_mut() {
            Some(session) => session.get_text(),
            None => bail!("PDF session already destroyed"),
        }
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        if let Some(session) = self.session.take() {
            if let Err(e) = session.destroy() {
                log::warn!("Error destroying PDF session: {e:#}");
            }
        }
    }
}

type TextFallback = fn(&[u8]) -> anyhow::Result<String>;

struct BuiltinSession {
    data: Vec<u8>,
    document: Result<lopdf::Document, String>,
    fallback: TextFallback,
}

fn open_builtin_session(data: &[u8]) -> anyhow::Result<Box<dyn PdfSession>> {
    open_session_with(data, pdf_extract_guarded)
}

/// Encrypted documents are rejected up front; any other `lopdf` load error
/// is left for the fallback
fn open_session_with(
    data: &[u8],
    fallback: TextFallback,
) -> anyhow::Result<Box<dyn PdfSession>> {
    let document = match lopdf::Document::load_mem(data) {
        Ok(document) if document.trailer.get(b"Encrypt").is_ok() => {
            bail!("PDF is encrypted and requires a password")
        }
        Ok(document) => Ok(document),
        Err(e) => Err(format!("Failed to load PDF: {e}")),
    };
    Ok(Box::new(BuiltinSession {
        data: data.to_vec(),
        document,
        fallback,
    }))
}

fn lopdf_text(document: &lopdf::Document) -> anyhow::Result<String> {
    let pages: Vec<u32> = document.get_pages().keys().copied().collect();
    if pages.is_empty() {
        return Ok(String::new());
    }
    document
        .extract_text(&pages)
        .map_err(|e| anyhow!("Failed to extract text: {e}"))
}

impl PdfSession for BuiltinSession {
    fn get_text(&mut self) -> anyhow::Result<PdfText> {
        let primary = match &self.document {
            Ok(document) => lopdf_text(document),
            Err(e) => Err(anyhow!("{e}")),
        };
        let (blank, primary_err) = match primary {
            Ok(text) if !text.trim().is_empty() => return Ok(PdfText::Structured { text }),
            Ok(text) => {
                log::debug!("lopdf found no text; trying pdf-extract");
                (text, None)
            }
            Err(e) => {
                log::debug!("lopdf failed: {e:#}; trying pdf-extract");
                (String::new(), Some(e))
            }
        };

        match (self.fallback)(&self.data) {
            Ok(text) => {
                log::debug!("PDF extracted with pdf-extract fallback: {} chars", text.len());
                Ok(PdfText::Structured { text })
            }
            Err(fallback_err) => match primary_err {
                Some(e) => Err(anyhow!("{e:#}; pdf-extract: {fallback_err:#}")),
                None => {
                    log::debug!("pdf-extract failed after blank lopdf text: {fallback_err:#}");
                    Ok(PdfText::Structured { text: blank })
                }
            },
        }
    }

    fn destroy(self: Box<Self>) -> anyhow::Result<()> {
        drop(self);
        Ok(())
    }
}

/// `pdf-extract` can panic on malformed input
fn pdf_extract_guarded(data: &[u8]) -> anyhow::Result<String> {
    catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_from_mem(data)))
        .map_err(|panic| anyhow!("pdf-extract panicked: {}", panic_message(panic.as_ref())))?
        .map_err(|e| anyhow!("Failed to extract text: {e}"))
}

fn pdf_extract_text(data: &[u8]) -> anyhow::Result<PdfText> {
    pdf_extract_guarded(data).map(PdfText::Bare)
}
