//! Failure classification for soft-failing formats
//!
//! Parsing libraries report failures as opaque strings. This module maps such a
//! message onto a [`FailureCategory`] with ordered, case-insensitive substring
//! rules. Adapters only ever see the category, so structured error codes can
//! replace the keyword tables here without touching adapter code.

/// Coarse failure category used to pick a placeholder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureCategory {
    /// The library gave up after running too long
    Timeout,
    /// Memory or heap exhaustion
    Memory,
    /// Encrypted or password-protected input
    Encrypted,
    /// The runtime cannot execute the engine (WASM, missing native support)
    UnsupportedRuntime,
    /// Anything else
    Generic,
}

/// One keyword rule: any needle found in the message selects `category`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassificationRule {
    /// Category reported when the rule matches
    pub category: FailureCategory,
    /// Lowercase needles
    pub needles: &'static [&'static str],
}

const TIMEOUT_RULE: ClassificationRule = ClassificationRule {
    category: FailureCategory::Timeout,
    needles: &["timeout", "timed out"],
};

const MEMORY_RULE: ClassificationRule = ClassificationRule {
    category: FailureCategory::Memory,
    needles: &["memory", "heap"],
};

const ENCRYPTED_RULE: ClassificationRule = ClassificationRule {
    category: FailureCategory::Encrypted,
    needles: &["encrypted", "password"],
};

const UNSUPPORTED_RUNTIME_RULE: ClassificationRule = ClassificationRule {
    category: FailureCategory::UnsupportedRuntime,
    needles: &[
        "wasm",
        "webassembly",
        "runtime unsupported",
        "unsupported runtime",
    ],
};

/// Rules applied to PDF parser failures, in precedence order
pub const PDF_RULES: &[ClassificationRule] = &[TIMEOUT_RULE, MEMORY_RULE, ENCRYPTED_RULE];

/// Rules applied to OCR failures, in precedence order
pub const OCR_RULES: &[ClassificationRule] =
    &[TIMEOUT_RULE, UNSUPPORTED_RUNTIME_RULE, MEMORY_RULE];

/// Classify a raw failure message.
///
/// The first rule with a needle contained in `message` (ASCII
/// case-insensitive) wins; no match yields [`FailureCategory::Generic`].
#[must_use]
pub fn classify(message: &str, rules: &[ClassificationRule]) -> FailureCategory {
    let haystack = message.to_ascii_lowercase();
    rules
        .iter()
        .find(|rule| rule.needles.iter().any(|needle| haystack.contains(needle)))
        .map_or(FailureCategory::Generic, |rule| rule.category)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_pdf_categories() {
        assert_eq!(
            classify("operation timeout after 30s", PDF_RULES),
            FailureCategory::Timeout
        );
        assert_eq!(
            classify("JavaScript heap out of memory", PDF_RULES),
            FailureCategory::Memory
        );
        assert_eq!(
            classify("Document is encrypted", PDF_RULES),
            FailureCategory::Encrypted
        );
        assert_eq!(
            classify("No password given", PDF_RULES),
            FailureCategory::Encrypted
        );
        assert_eq!(
            classify("Invalid PDF structure", PDF_RULES),
            FailureCategory::Generic
        );
    }

    #[test]
    fn test_pdf_rules_never_yield_runtime_category() {
        assert_eq!(
            classify("wasm instantiation failed", PDF_RULES),
            FailureCategory::Generic
        );
    }

    #[test]
    fn test_ocr_categories() {
        assert_eq!(
            classify("WebAssembly.instantiate(): out of bounds", OCR_RULES),
            FailureCategory::UnsupportedRuntime
        );
        assert_eq!(
            classify("OCR runtime unsupported: no tesseract", OCR_RULES),
            FailureCategory::UnsupportedRuntime
        );
        assert_eq!(
            classify("recognition timed out", OCR_RULES),
            FailureCategory::Timeout
        );
        assert_eq!(
            classify("cannot allocate memory", OCR_RULES),
            FailureCategory::Memory
        );
        // Encryption is not an OCR category
        assert_eq!(
            classify("encrypted payload", OCR_RULES),
            FailureCategory::Generic
        );
    }

    #[test]
    fn test_precedence_within_rules() {
        // Timeout outranks memory in both tables
        assert_eq!(
            classify("timeout while growing heap", PDF_RULES),
            FailureCategory::Timeout
        );
        assert_eq!(
            classify("wasm memory limit", OCR_RULES),
            FailureCategory::UnsupportedRuntime
        );
    }

    #[test]
    fn test_empty_message_is_generic() {
        assert_eq!(classify("", PDF_RULES), FailureCategory::Generic);
        assert_eq!(classify("", OCR_RULES), FailureCategory::Generic);
    }

    proptest! {
        #[test]
        fn prop_timeout_wins_in_any_case(
            prefix in "[a-z ]{0,20}",
            suffix in "[a-z ]{0,20}",
            upper in proptest::collection::vec(any::<bool>(), 7),
        ) {
            let keyword: String = "timeout"
                .chars()
                .zip(upper)
                .map(|(c, up)| if up { c.to_ascii_uppercase() } else { c })
                .collect();
            let message = format!("{prefix}{keyword}{suffix}");

            prop_assert_eq!(classify(&message, PDF_RULES), FailureCategory::Timeout);
            prop_assert_eq!(classify(&message, OCR_RULES), FailureCategory::Timeout);
        }

        #[test]
        fn prop_messages_without_keywords_are_generic(message in "[0-9 .:_-]{0,40}") {
            prop_assert_eq!(classify(&message, PDF_RULES), FailureCategory::Generic);
            prop_assert_eq!(classify(&message, OCR_RULES), FailureCategory::Generic);
        }
    }
}
