//! PDF adapter
//!
//! PDF extraction never fails hard once a usable parser is present. Oversized
//! documents, parser errors and parser panics all become placeholder text.

use crate::panic_message;
use crate::pdf_engine::PdfModule;
use crate::size_guard::{SizeGuard, SizeVerdict};
use crate::traits::ExtractionBackend;
use doctext_core::{classify, placeholder, ExtractionError, Result, PDF_RULES};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;

/// Adapter for `application/pdf`
#[derive(Debug, Clone)]
pub struct PdfBackend {
    module: PdfModule,
    guard: SizeGuard,
}

impl PdfBackend {
    #[must_use]
    pub const fn new(module: PdfModule, guard: SizeGuard) -> Self {
        Self { module, guard }
    }

    #[must_use]
    pub const fn module(&self) -> &PdfModule {
        &self.module
    }

    fn soft_failure(message: &str) -> String {
        let category = classify(message, PDF_RULES);
        log::warn!("PDF extraction failed ({category:?}): {message}");
        placeholder::pdf_failure(category, message)
    }

    fn parse(&self, data: &[u8]) -> Result<String> {
        let shape = self.module.resolve_shape().ok_or_else(|| {
            ExtractionError::UnsupportedLibraryShape(self.module.name().to_string())
        })?;
        log::debug!("Parsing PDF with {} ({shape:?})", self.module.name());

        let outcome = catch_unwind(AssertUnwindSafe(|| self.module.invoke(shape, data)));
        match outcome {
            Ok(Ok(parsed)) => {
                let text = parsed.into_text();
                if text.trim().is_empty() {
                    Ok(placeholder::PDF_NO_TEXT.to_string())
                } else {
                    Ok(text)
                }
            }
            Ok(Err(e)) => Ok(Self::soft_failure(&format!("{e:#}"))),
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                Ok(Self::soft_failure(&format!("PDF parser panicked: {message}")))
            }
        }
    }
}

impl Default for PdfBackend {
    fn default() -> Self {
        Self::new(PdfModule::builtin(), SizeGuard::default())
    }
}

impl ExtractionBackend for PdfBackend {
    fn name(&self) -> &'static str {
        "PDF"
    }

    fn extract_bytes(&self, data: &[u8]) -> Result<String> {
        if let SizeVerdict::Exceeded { size_mb, limit_mb } = self.guard.check(data.len() as u64) {
            log::warn!("PDF of {size_mb:.1}MB exceeds {limit_mb}MB limit; skipping parse");
            return Ok(placeholder::pdf_too_large(size_mb));
        }
        self.parse(data)
    }

    fn extract_file(&self, path: &Path) -> Result<String> {
        // Check the size before reading so oversized files are never loaded
        if let Ok(metadata) = std::fs::metadata(path) {
            if let SizeVerdict::Exceeded { size_mb, limit_mb } = self.guard.check(metadata.len()) {
                log::warn!(
                    "{} is {size_mb:.1}MB, over the {limit_mb}MB limit; skipping parse",
                    path.display()
                );
                return Ok(placeholder::pdf_too_large(size_mb));
            }
        }

        match std::fs::read(path) {
            Ok(data) => self.extract_bytes(&data),
            Err(e) => Ok(Self::soft_failure(&format!(
                "Failed to read {}: {e}",
                path.display()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf_engine::PdfText;
    use anyhow::bail;

    fn backend(module: PdfModule) -> PdfBackend {
        PdfBackend::new(module, SizeGuard::default())
    }

    #[test]
    fn test_text_passes_through() {
        let module = PdfModule::new("m").with_default_export(|_| {
            Ok(PdfText::Structured {
                text: "Quarterly report".to_string(),
            })
        });
        assert_eq!(
            backend(module).extract_bytes(b"%PDF").unwrap(),
            "Quarterly report"
        );
    }

    #[test]
    fn test_whitespace_only_is_no_text() {
        let module = PdfModule::new("m").with_call(|_| Ok(PdfText::Bare(" \n\t ".to_string())));
        assert_eq!(
            backend(module).extract_bytes(b"%PDF").unwrap(),
            placeholder::PDF_NO_TEXT
        );
    }

    #[test]
    fn test_no_shape_fails_hard() {
        let err = backend(PdfModule::new("mystery"))
            .extract_bytes(b"%PDF")
            .unwrap_err();
        assert!(matches!(err, ExtractionError::UnsupportedLibraryShape(_)));
        assert!(err.to_string().contains("mystery"));
    }

    #[test]
    fn test_errors_are_classified() {
        let cases = [
            ("operation timed out", placeholder::PDF_TIMEOUT),
            ("JavaScript heap out of memory", placeholder::PDF_MEMORY),
            ("No password given", placeholder::PDF_ENCRYPTED),
        ];
        for (message, expected) in cases {
            let module = PdfModule::new("m").with_default_export(move |_| bail!("{message}"));
            assert_eq!(backend(module).extract_bytes(b"%PDF").unwrap(), expected);
        }
    }

    #[test]
    fn test_generic_error_keeps_message() {
        let module = PdfModule::new("m").with_default_export(|_| bail!("Invalid xref"));
        assert_eq!(
            backend(module).extract_bytes(b"%PDF").unwrap(),
            "[PDF extraction failed: Invalid xref]"
        );
    }

    #[test]
    fn test_panic_becomes_placeholder() {
        let module = PdfModule::new("m").with_default_export(|_| panic!("font table overflow"));
        let text = backend(module).extract_bytes(b"%PDF").unwrap();
        assert!(text.starts_with("[PDF extraction failed: "));
        assert!(text.contains("font table overflow"));
    }

    #[test]
    fn test_oversized_buffer_skips_parser() {
        let module = PdfModule::new("m").with_default_export(|_| panic!("parser must not run"));
        let pdf = PdfBackend::new(module, SizeGuard::new(0.001));

        let text = pdf.extract_bytes(&[0u8; 4096]).unwrap();
        assert!(text.starts_with("[Large PDF uploaded - "));
    }

    #[test]
    fn test_unreadable_path_is_soft() {
        let text = PdfBackend::default()
            .extract_file(Path::new("/nonexistent/report.pdf"))
            .unwrap();
        assert!(text.starts_with("[PDF extraction failed: "));
        assert!(text.contains("report.pdf"));
    }
}
