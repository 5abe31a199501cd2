//! Format adapters for doctext
//!
//! This crate turns an uploaded document (bytes or a file path) plus its
//! declared MIME type into plain text.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          Dispatcher                          │
//! │        (MIME routing, timing, async blocking offload)        │
//! └──────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │                   ExtractionBackend trait                    │
//! │  fn extract_bytes(&self, &[u8]) -> Result<String>            │
//! │  fn extract_file(&self, &Path) -> Result<String>             │
//! └──────────────────────────────────────────────────────────────┘
//!        │            │            │            │            │
//!        ▼            ▼            ▼            ▼            ▼
//!   TextBackend  DocxBackend  PptxBackend  PdfBackend  ImageBackend
//!                (zip + xml)  (pptx-to-md  (lopdf /    (doctext-ocr)
//!                              + xml)      pdf-extract)
//! ```
//!
//! # Failure policy
//!
//! | Format | On failure |
//! |--------|------------|
//! | Text | [`ExtractionError::TextReadFailure`] |
//! | DOCX | [`ExtractionError::DocumentExtractionFailure`] |
//! | PPTX | placeholder for buffers, [`ExtractionError::PresentationExtractionFailure`] when both parsers fail |
//! | PDF | placeholder (size, timeout, memory, encryption, generic) |
//! | Images | placeholder (disabled, no text, unsupported runtime, timeout, memory, generic) |
//!
//! Only a PDF library exposing no usable entry point fails hard
//! ([`ExtractionError::UnsupportedLibraryShape`]).
//!
//! # Example
//!
//! ```no_run
//! use doctext_backend::{Dispatcher, DocumentSource};
//! use std::path::Path;
//!
//! let dispatcher = Dispatcher::from_environment();
//! let text = dispatcher.extract(
//!     DocumentSource::Path(Path::new("report.pdf")),
//!     "application/pdf",
//! )?;
//! println!("{text}");
//! # Ok::<(), doctext_core::ExtractionError>(())
//! ```

pub mod converter;
pub mod docx;
pub mod environment;
pub mod image;
pub mod pdf;
pub mod pdf_engine;
pub mod pptx;
pub mod size_guard;
pub mod text;
pub mod traits;

#[cfg(feature = "async")]
pub use converter::extract_text_from_file;
pub use converter::Dispatcher;
pub use docx::{DocxBackend, OoxmlRawText, RawTextExtractor};
pub use environment::EnvironmentProbe;
pub use image::ImageBackend;
pub use pdf::PdfBackend;
pub use pdf_engine::{PdfCapabilityShape, PdfModule, PdfSession, PdfText, SHAPE_REGISTRY};
pub use pptx::{OoxmlSlideSource, PptxBackend, PptxContainerSource, Slide, SlideSource};
pub use size_guard::{SizeGuard, SizeVerdict};
pub use text::TextBackend;
pub use traits::{
    DocumentSource, ExtractionBackend, ExtractionOptions, OwnedSource, DEFAULT_MAX_PDF_SIZE_MB,
};

pub use doctext_core::{placeholder, ExtractionError, InputFormat, Result};

/// Text carried by a caught panic payload
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}
