//! # doctext core
//!
//! Shared vocabulary for the doctext extraction crates:
//!
//! - [`InputFormat`]: the closed set of routable formats and their MIME types
//! - [`ExtractionError`]: hard failures, each prefixed with its format
//! - [`placeholder`]: the stand-in texts returned for soft failures
//! - [`classify`]: mapping from opaque library error messages to
//!   [`FailureCategory`]
//!
//! Adapters and the dispatcher live in `doctext-backend`.

pub mod classify;
pub mod error;
pub mod format;
pub mod placeholder;

pub use classify::{classify, ClassificationRule, FailureCategory, OCR_RULES, PDF_RULES};
pub use error::{ExtractionError, Result};
pub use format::InputFormat;
