//! Core trait definitions for extraction backends

use doctext_core::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default PDF size threshold in megabytes
///
/// PDFs above this size are not parsed at all; the size guard answers with a
/// placeholder instead.
pub const DEFAULT_MAX_PDF_SIZE_MB: f64 = 50.0;

/// Options injected into the dispatcher at construction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtractionOptions {
    /// Whether OCR may run in this environment
    pub ocr_available: bool,

    /// PDF size threshold in megabytes
    pub max_pdf_size_mb: f64,
}

impl ExtractionOptions {
    /// Options derived from the ambient environment (see
    /// [`EnvironmentProbe`](crate::environment::EnvironmentProbe))
    #[must_use]
    pub fn from_environment() -> Self {
        let probe = crate::environment::EnvironmentProbe::detect();
        if let Some(indicator) = probe.indicator() {
            log::info!("Constrained environment detected ({indicator})");
        }
        Self::default().with_ocr_available(probe.ocr_supported())
    }

    /// Enable or disable OCR
    #[inline]
    #[must_use = "returns options with OCR availability configured"]
    pub const fn with_ocr_available(mut self, available: bool) -> Self {
        self.ocr_available = available;
        self
    }

    /// Set the PDF size threshold
    #[inline]
    #[must_use = "returns options with the PDF size threshold configured"]
    pub const fn with_max_pdf_size_mb(mut self, max_mb: f64) -> Self {
        self.max_pdf_size_mb = max_mb;
        self
    }
}

impl Default for ExtractionOptions {
    #[inline]
    fn default() -> Self {
        Self {
            ocr_available: true,
            max_pdf_size_mb: DEFAULT_MAX_PDF_SIZE_MB,
        }
    }
}

/// Borrowed document reference: exactly one of buffer or path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentSource<'a> {
    /// In-memory buffer, read but never mutated
    Bytes(&'a [u8]),
    /// Read-only path to a file on disk
    Path(&'a Path),
}

impl DocumentSource<'_> {
    /// Short description for log lines
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Bytes(data) => format!("buffer ({} bytes)", data.len()),
            Self::Path(path) => path.display().to_string(),
        }
    }
}

/// Owned document reference, for callers that hand work to another thread
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OwnedSource {
    /// Buffer moved in from the caller
    Bytes(Vec<u8>),
    /// Path to a file on disk
    Path(PathBuf),
}

impl OwnedSource {
    /// Borrow as a [`DocumentSource`]
    #[must_use]
    pub fn as_source(&self) -> DocumentSource<'_> {
        match self {
            Self::Bytes(data) => DocumentSource::Bytes(data),
            Self::Path(path) => DocumentSource::Path(path),
        }
    }
}

impl From<Vec<u8>> for OwnedSource {
    fn from(data: Vec<u8>) -> Self {
        Self::Bytes(data)
    }
}

impl From<PathBuf> for OwnedSource {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

/// Main trait for extraction backends
///
/// Each adapter owns its failure policy: soft-failing formats return
/// placeholder text in `Ok`, hard-failing formats return `Err`.
pub trait ExtractionBackend: Send + Sync {
    /// Human-readable adapter name used in logs
    fn name(&self) -> &'static str;

    /// Extract text from an in-memory buffer
    ///
    /// # Errors
    /// Returns an error if the format fails hard.
    fn extract_bytes(&self, data: &[u8]) -> Result<String>;

    /// Extract text from a file path
    ///
    /// # Errors
    /// Returns an error if the format fails hard.
    fn extract_file(&self, path: &Path) -> Result<String>;

    /// Extract text from either source kind
    ///
    /// # Errors
    /// Returns an error if the format fails hard.
    fn extract(&self, source: DocumentSource<'_>) -> Result<String> {
        match source {
            DocumentSource::Bytes(data) => self.extract_bytes(data),
            DocumentSource::Path(path) => self.extract_file(path),
        }
    }
}
