//! Image OCR adapter (JPEG, PNG, GIF, WebP)
//!
//! Every outcome is text: recognized content, or a placeholder when OCR is
//! disabled, finds nothing, fails, or panics.

use crate::panic_message;
use crate::traits::ExtractionBackend;
use doctext_core::{classify, placeholder, Result, OCR_RULES};
use doctext_ocr::{recognize_once, ImageInput, OcrWorkerFactory, OCR_LANGUAGE};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;
use std::sync::Arc;

/// Adapter for the `image/*` formats
#[derive(Clone)]
pub struct ImageBackend {
    factory: Arc<dyn OcrWorkerFactory>,
    ocr_available: bool,
}

impl ImageBackend {
    #[must_use]
    pub fn new(factory: Arc<dyn OcrWorkerFactory>, ocr_available: bool) -> Self {
        Self {
            factory,
            ocr_available,
        }
    }

    #[must_use]
    pub const fn ocr_available(&self) -> bool {
        self.ocr_available
    }

    fn recognize(&self, image: ImageInput<'_>) -> String {
        if !self.ocr_available {
            log::debug!("OCR disabled; returning placeholder");
            return placeholder::IMAGE_OCR_UNAVAILABLE.to_string();
        }

        let outcome = catch_unwind(AssertUnwindSafe(|| {
            recognize_once(self.factory.as_ref(), OCR_LANGUAGE, image)
        }));
        let result = match outcome {
            Ok(result) => result.map_err(|e| e.to_string()),
            Err(panic) => Err(format!("OCR engine panicked: {}", panic_message(panic.as_ref()))),
        };

        match result {
            Ok(text) => {
                let text = text.trim();
                if text.is_empty() {
                    placeholder::IMAGE_NO_TEXT.to_string()
                } else {
                    text.to_string()
                }
            }
            Err(message) => {
                let category = classify(&message, OCR_RULES);
                log::warn!("OCR failed ({category:?}): {message}");
                placeholder::image_failure(category, &message)
            }
        }
    }
}

impl Default for ImageBackend {
    fn default() -> Self {
        Self::new(doctext_ocr::default_factory(), true)
    }
}

impl std::fmt::Debug for ImageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageBackend")
            .field("ocr_available", &self.ocr_available)
            .finish_non_exhaustive()
    }
}

impl ExtractionBackend for ImageBackend {
    fn name(&self) -> &'static str {
        "image"
    }

    fn extract_bytes(&self, data: &[u8]) -> Result<String> {
        Ok(self.recognize(ImageInput::Bytes(data)))
    }

    fn extract_file(&self, path: &Path) -> Result<String> {
        Ok(self.recognize(ImageInput::Path(path)))
    }
}
