//! Pre-parse size check for PDF sources

use crate::traits::DEFAULT_MAX_PDF_SIZE_MB;

/// Bytes in one megabyte
pub const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Convert a byte count to megabytes
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn size_in_mb(len: u64) -> f64 {
    len as f64 / BYTES_PER_MB
}

/// Outcome of a size check
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SizeVerdict {
    /// At or under the threshold; parsing may proceed
    Within { size_mb: f64 },
    /// Over the threshold; parsing is skipped
    Exceeded { size_mb: f64, limit_mb: f64 },
}

/// Rejects documents above a megabyte threshold before any parsing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeGuard {
    limit_mb: f64,
}

impl SizeGuard {
    #[must_use]
    pub const fn new(limit_mb: f64) -> Self {
        Self { limit_mb }
    }

    #[must_use]
    pub const fn limit_mb(&self) -> f64 {
        self.limit_mb
    }

    /// Check a document of `len` bytes; the limit itself is still accepted
    #[must_use]
    pub fn check(&self, len: u64) -> SizeVerdict {
        let size_mb = size_in_mb(len);
        if size_mb > self.limit_mb {
            SizeVerdict::Exceeded {
                size_mb,
                limit_mb: self.limit_mb,
            }
        } else {
            SizeVerdict::Within { size_mb }
        }
    }
}

impl Default for SizeGuard {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PDF_SIZE_MB)
    }
}
