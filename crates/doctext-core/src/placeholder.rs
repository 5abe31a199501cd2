//! Placeholder texts returned in place of extracted content
//!
//! Placeholders are ordinary `String` results. Callers store and display them
//! like real text; the exact wording below is part of the observable contract.

use crate::classify::FailureCategory;

/// Returned for every PPTX buffer source
pub const PPTX_BUFFER_UNSUPPORTED: &str =
    "[PPTX file uploaded - processing not available in serverless environment]";

/// PDF parsed successfully but contained no text
pub const PDF_NO_TEXT: &str = "[PDF processed - no text content found]";
/// PDF parser timed out
pub const PDF_TIMEOUT: &str = "[PDF extraction timed out - file may be too complex]";
/// PDF parser ran out of memory
pub const PDF_MEMORY: &str = "[PDF extraction failed due to memory limits]";
/// PDF is encrypted
pub const PDF_ENCRYPTED: &str = "[PDF appears to be password-protected]";

/// OCR disabled for this execution environment
pub const IMAGE_OCR_UNAVAILABLE: &str =
    "[Image uploaded - OCR processing not available in serverless environment]";
/// OCR ran but found nothing
pub const IMAGE_NO_TEXT: &str = "[Image processed - no text detected]";
/// OCR engine could not run in this runtime
pub const IMAGE_OCR_UNSUPPORTED: &str =
    "[Image uploaded - OCR not supported in serverless environment]";
/// OCR timed out
pub const IMAGE_OCR_TIMEOUT: &str = "[Image OCR timed out - image may be too complex]";
/// OCR ran out of memory
pub const IMAGE_OCR_MEMORY: &str = "[Image OCR failed due to memory limits]";

const LARGE_PDF_PREFIX: &str =
    "[Large PDF uploaded - text extraction may be limited in serverless environment";

const KNOWN_PREFIXES: &[&str] = &[
    "[PPTX file uploaded - ",
    "[Large PDF uploaded - ",
    "[PDF processed - ",
    "[PDF extraction ",
    "[PDF appears to be ",
    "[Image uploaded - ",
    "[Image processed - ",
    "[Image OCR ",
];

/// Size guard rejection for a PDF of `size_mb` megabytes
#[must_use]
pub fn pdf_too_large(size_mb: f64) -> String {
    format!("{LARGE_PDF_PREFIX}. File size: {size_mb:.1}MB]")
}

/// Placeholder for a classified PDF parser failure
#[must_use]
pub fn pdf_failure(category: FailureCategory, message: &str) -> String {
    match category {
        FailureCategory::Timeout => PDF_TIMEOUT.to_string(),
        FailureCategory::Memory => PDF_MEMORY.to_string(),
        FailureCategory::Encrypted => PDF_ENCRYPTED.to_string(),
        FailureCategory::UnsupportedRuntime | FailureCategory::Generic => {
            format!("[PDF extraction failed: {message}]")
        }
    }
}

/// Placeholder for a classified OCR failure
#[must_use]
pub fn image_failure(category: FailureCategory, message: &str) -> String {
    match category {
        FailureCategory::UnsupportedRuntime => IMAGE_OCR_UNSUPPORTED.to_string(),
        FailureCategory::Timeout => IMAGE_OCR_TIMEOUT.to_string(),
        FailureCategory::Memory => IMAGE_OCR_MEMORY.to_string(),
        FailureCategory::Encrypted | FailureCategory::Generic => {
            format!("[Image OCR failed: {message}]")
        }
    }
}

/// Heuristic check for text produced by this module.
///
/// Extraction results carry no type-level marker, so this inspects the
/// string. Real documents that happen to start with one of the bracketed
/// prefixes are misreported.
#[must_use]
pub fn is_placeholder(text: &str) -> bool {
    text.ends_with(']') && KNOWN_PREFIXES.iter().any(|prefix| text.starts_with(prefix))
}
