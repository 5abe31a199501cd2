//! Plain text adapter

use crate::traits::ExtractionBackend;
use doctext_core::{ExtractionError, Result};
use std::path::Path;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Decodes `text/plain` sources as UTF-8
///
/// Invalid sequences become U+FFFD rather than failing the whole document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TextBackend;

impl TextBackend {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

/// Decode bytes as UTF-8, dropping a leading byte-order mark
#[must_use]
pub fn decode_utf8(data: &[u8]) -> String {
    let data = data.strip_prefix(UTF8_BOM).unwrap_or(data);
    String::from_utf8_lossy(data).into_owned()
}

impl ExtractionBackend for TextBackend {
    fn name(&self) -> &'static str {
        "text"
    }

    fn extract_bytes(&self, data: &[u8]) -> Result<String> {
        Ok(decode_utf8(data))
    }

    fn extract_file(&self, path: &Path) -> Result<String> {
        let data = std::fs::read(path).map_err(|e| {
            ExtractionError::TextReadFailure(format!("{}: {e}", path.display()))
        })?;
        Ok(decode_utf8(&data))
    }
}
