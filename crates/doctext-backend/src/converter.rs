//! MIME dispatcher
//!
//! Routes a document to exactly one adapter based on its declared MIME type.
//! Adapters are constructed once and shared; the dispatcher itself is cheap
//! to clone and safe to use from many threads at once.

use crate::docx::{DocxBackend, RawTextExtractor};
use crate::image::ImageBackend;
use crate::pdf::PdfBackend;
use crate::pdf_engine::PdfModule;
use crate::pptx::{PptxBackend, SlideSource};
use crate::size_guard::SizeGuard;
use crate::text::TextBackend;
use crate::traits::{DocumentSource, ExtractionBackend, ExtractionOptions};
#[cfg(feature = "async")]
use crate::traits::OwnedSource;
use doctext_core::{ExtractionError, InputFormat, Result};
use doctext_ocr::OcrWorkerFactory;
use std::sync::Arc;
use std::time::Instant;

/// Routes documents to format adapters
#[derive(Debug, Clone)]
pub struct Dispatcher {
    options: ExtractionOptions,
    text: TextBackend,
    docx: DocxBackend,
    pptx: PptxBackend,
    pdf: PdfBackend,
    image: ImageBackend,
}

impl Dispatcher {
    /// Dispatcher with built-in engines and the given options
    #[must_use = "creating a dispatcher that is not used is a waste of resources"]
    pub fn new(options: ExtractionOptions) -> Self {
        Self {
            options,
            text: TextBackend::new(),
            docx: DocxBackend::default(),
            pptx: PptxBackend::default(),
            pdf: PdfBackend::new(
                PdfModule::builtin(),
                SizeGuard::new(options.max_pdf_size_mb),
            ),
            image: ImageBackend::new(doctext_ocr::default_factory(), options.ocr_available),
        }
    }

    /// Dispatcher configured from the process environment
    #[must_use = "creating a dispatcher that is not used is a waste of resources"]
    pub fn from_environment() -> Self {
        Self::new(ExtractionOptions::from_environment())
    }

    #[inline]
    #[must_use]
    pub const fn options(&self) -> ExtractionOptions {
        self.options
    }

    /// Replace the PDF parsing library
    #[must_use]
    pub fn with_pdf_module(mut self, module: PdfModule) -> Self {
        self.pdf = PdfBackend::new(module, SizeGuard::new(self.options.max_pdf_size_mb));
        self
    }

    /// Replace the OCR worker factory
    #[must_use]
    pub fn with_ocr_factory(mut self, factory: Arc<dyn OcrWorkerFactory>) -> Self {
        self.image = ImageBackend::new(factory, self.options.ocr_available);
        self
    }

    /// Replace the PPTX primary and fallback slide sources
    #[must_use]
    pub fn with_slide_sources(
        mut self,
        primary: Arc<dyn SlideSource>,
        fallback: Arc<dyn SlideSource>,
    ) -> Self {
        self.pptx = PptxBackend::new(primary, fallback);
        self
    }

    /// Replace the DOCX raw text extractor
    #[must_use]
    pub fn with_raw_text_extractor(mut self, extractor: Arc<dyn RawTextExtractor>) -> Self {
        self.docx = DocxBackend::new(extractor);
        self
    }

    /// Adapter responsible for `format`
    #[must_use]
    pub fn backend_for(&self, format: InputFormat) -> &dyn ExtractionBackend {
        match format {
            InputFormat::Pdf => &self.pdf,
            InputFormat::Docx => &self.docx,
            InputFormat::Text => &self.text,
            InputFormat::Pptx => &self.pptx,
            InputFormat::Jpeg | InputFormat::Png | InputFormat::Gif | InputFormat::Webp => {
                &self.image
            }
        }
    }

    /// Extract text from `source`, routed by `mime_type`
    ///
    /// # Errors
    /// Returns [`ExtractionError::UnsupportedFormat`] for unknown MIME types,
    /// or the adapter's hard failure.
    pub fn extract(&self, source: DocumentSource<'_>, mime_type: &str) -> Result<String> {
        let format = InputFormat::from_mime(mime_type)
            .ok_or_else(|| ExtractionError::UnsupportedFormat(mime_type.to_string()))?;
        let backend = self.backend_for(format);

        log::debug!(
            "Extracting {} via {} adapter",
            source.describe(),
            backend.name()
        );
        let start = Instant::now();
        let result = backend.extract(source);

        match &result {
            Ok(text) => log::info!(
                "Extracted {} chars from {format} in {:.2?}",
                text.chars().count(),
                start.elapsed()
            ),
            Err(e) => log::error!("{format} extraction failed: {e}"),
        }
        result
    }

    /// Extract on the blocking thread pool
    ///
    /// # Errors
    /// As [`Dispatcher::extract`], plus [`ExtractionError::TaskFailure`] if
    /// the blocking task panics or is cancelled.
    #[cfg(feature = "async")]
    pub async fn extract_async(
        &self,
        source: OwnedSource,
        mime_type: impl Into<String>,
    ) -> Result<String> {
        let dispatcher = self.clone();
        let mime_type = mime_type.into();
        tokio::task::spawn_blocking(move || dispatcher.extract(source.as_source(), &mime_type))
            .await
            .map_err(|e| ExtractionError::TaskFailure(e.to_string()))?
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(ExtractionOptions::default())
    }
}

/// Extract text using a dispatcher configured from the environment
///
/// # Errors
/// As [`Dispatcher::extract_async`].
#[cfg(feature = "async")]
pub async fn extract_text_from_file(source: OwnedSource, mime_type: &str) -> Result<String> {
    Dispatcher::from_environment()
        .extract_async(source, mime_type)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use doctext_core::placeholder;

    #[test]
    fn test_unknown_mime_is_rejected() {
        let err = Dispatcher::default()
            .extract(DocumentSource::Bytes(b"x"), "application/zip")
            .unwrap_err();
        assert!(err.is_routing_error());
        assert_eq!(err.to_string(), "Unsupported MIME type: application/zip");
    }

    #[test]
    fn test_text_routing() {
        let text = Dispatcher::default()
            .extract(DocumentSource::Bytes(b"hello"), "text/plain; charset=utf-8")
            .unwrap();
        assert_eq!(text, "hello");
    }

    #[test]
    fn test_backend_for_images() {
        let dispatcher = Dispatcher::default();
        for format in InputFormat::ALL.into_iter().filter(InputFormat::is_image) {
            assert_eq!(dispatcher.backend_for(format).name(), "image");
        }
        assert_eq!(dispatcher.backend_for(InputFormat::Pdf).name(), "PDF");
        assert_eq!(dispatcher.backend_for(InputFormat::Pptx).name(), "PPTX");
    }

    #[test]
    fn test_ocr_disabled_by_options() {
        let dispatcher = Dispatcher::new(ExtractionOptions::default().with_ocr_available(false));
        let text = dispatcher
            .extract(DocumentSource::Bytes(b"\x89PNG"), "image/png")
            .unwrap();
        assert_eq!(text, placeholder::IMAGE_OCR_UNAVAILABLE);
    }

    #[test]
    fn test_with_pdf_module_keeps_limit() {
        let dispatcher = Dispatcher::new(ExtractionOptions::default().with_max_pdf_size_mb(0.001))
            .with_pdf_module(PdfModule::new("never").with_call(|_| panic!("must not parse")));
        let text = dispatcher
            .extract(DocumentSource::Bytes(&[0u8; 2048]), "application/pdf")
            .unwrap();
        assert!(text.starts_with("[Large PDF uploaded - "));
    }

    #[cfg(feature = "async")]
    #[tokio::test]
    async fn test_extract_async() {
        let text = Dispatcher::default()
            .extract_async(OwnedSource::Bytes(b"async text".to_vec()), "text/plain")
            .await
            .unwrap();
        assert_eq!(text, "async text");
    }
}
