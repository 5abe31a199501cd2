//! Error types for text extraction.
//!
//! Only hard failures are errors. Soft degradations (oversized PDFs, failed
//! OCR, unreadable PDFs) are returned as placeholder text instead, see
//! [`crate::placeholder`].

use thiserror::Error;

/// Hard failures surfaced to callers of the dispatcher.
///
/// Every message carries the originating format as a prefix, so the
/// rendered error is safe to show to end users as-is.
///
/// # Examples
///
/// ```rust,ignore
/// use doctext_backend::{Dispatcher, DocumentSource};
/// use doctext_core::ExtractionError;
///
/// let dispatcher = Dispatcher::from_environment();
///
/// match dispatcher.extract(DocumentSource::Bytes(b"PK.."), "application/zip") {
///     Err(ExtractionError::UnsupportedFormat(mime)) => eprintln!("cannot read {mime}"),
///     Err(e) => eprintln!("{e}"),
///     Ok(text) => println!("{text}"),
/// }
/// ```
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The declared MIME type has no adapter.
    #[error("Unsupported MIME type: {0}")]
    UnsupportedFormat(String),

    /// The PDF module exposes none of the known capability shapes.
    #[error("Unsupported PDF library shape: {0} exposes no recognized entry point")]
    UnsupportedLibraryShape(String),

    /// DOCX raw-text extraction failed.
    #[error("DOCX extraction failed: {0}")]
    DocumentExtractionFailure(String),

    /// Both PPTX entry points failed for a path source.
    #[error("PPTX extraction failed: {0}")]
    PresentationExtractionFailure(String),

    /// Reading a plain-text source failed.
    #[error("Text file reading failed: {0}")]
    TextReadFailure(String),

    /// The blocking extraction task could not be joined.
    #[error("Extraction task failed: {0}")]
    TaskFailure(String),
}

impl ExtractionError {
    /// Whether this error came from routing rather than from an adapter
    #[inline]
    #[must_use]
    pub const fn is_routing_error(&self) -> bool {
        matches!(self, Self::UnsupportedFormat(_))
    }
}

/// Type alias for [`Result<T, ExtractionError>`].
pub type Result<T> = std::result::Result<T, ExtractionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_format_display() {
        let error = ExtractionError::UnsupportedFormat("application/zip".to_string());
        assert_eq!(error.to_string(), "Unsupported MIME type: application/zip");
        assert!(error.is_routing_error());
    }

    #[test]
    fn test_format_prefixes() {
        let docx = ExtractionError::DocumentExtractionFailure("bad zip".to_string());
        assert_eq!(docx.to_string(), "DOCX extraction failed: bad zip");

        let pptx = ExtractionError::PresentationExtractionFailure("no slides".to_string());
        assert_eq!(pptx.to_string(), "PPTX extraction failed: no slides");

        let txt = ExtractionError::TextReadFailure("not found".to_string());
        assert_eq!(txt.to_string(), "Text file reading failed: not found");
        assert!(!txt.is_routing_error());
    }

    #[test]
    fn test_library_shape_display() {
        let error = ExtractionError::UnsupportedLibraryShape("empty-module".to_string());
        let display = error.to_string();
        assert!(display.starts_with("Unsupported PDF library shape"));
        assert!(display.contains("empty-module"));
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn inner_function() -> Result<String> {
            Err(ExtractionError::TextReadFailure("unreadable".to_string()))
        }

        fn outer_function() -> Result<String> {
            let _result = inner_function()?;
            Ok("should not reach".to_string())
        }

        match outer_function() {
            Err(ExtractionError::TextReadFailure(msg)) => assert_eq!(msg, "unreadable"),
            _ => panic!("Expected TextReadFailure to propagate"),
        }
    }

    #[test]
    fn test_error_size() {
        use std::mem::size_of;
        let size = size_of::<ExtractionError>();
        assert!(
            size < 64,
            "ExtractionError size is {size} bytes, consider boxing large variants"
        );
    }
}
