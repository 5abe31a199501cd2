//! Input format types for text extraction
//!
//! This module defines the `InputFormat` enum, the closed set of document
//! formats the dispatcher routes, and the MIME type mapping used to select
//! an adapter for each request.

use serde::{Deserialize, Serialize};

/// MIME type for PDF documents
pub const MIME_PDF: &str = "application/pdf";
/// MIME type for Word Open XML documents
pub const MIME_DOCX: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
/// MIME type for plain text
pub const MIME_TEXT: &str = "text/plain";
/// MIME type for `PowerPoint` Open XML presentations
pub const MIME_PPTX: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation";
/// MIME type for JPEG images
pub const MIME_JPEG: &str = "image/jpeg";
/// MIME type for PNG images
pub const MIME_PNG: &str = "image/png";
/// MIME type for GIF images
pub const MIME_GIF: &str = "image/gif";
/// MIME type for WebP images
pub const MIME_WEBP: &str = "image/webp";

/// Input document format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InputFormat {
    /// PDF document
    Pdf,
    /// Microsoft Word document (.docx)
    Docx,
    /// Plain UTF-8 text
    #[serde(rename = "TXT")]
    Text,
    /// Microsoft `PowerPoint` (.pptx)
    Pptx,
    /// JPEG image
    Jpeg,
    /// PNG image
    Png,
    /// GIF image
    Gif,
    /// WebP image
    Webp,
}

impl InputFormat {
    /// Every format the dispatcher recognizes, in routing-table order
    pub const ALL: [Self; 8] = [
        Self::Pdf,
        Self::Docx,
        Self::Text,
        Self::Pptx,
        Self::Jpeg,
        Self::Png,
        Self::Gif,
        Self::Webp,
    ];

    /// Resolve a declared MIME type.
    ///
    /// Matching ignores ASCII case and any `;`-separated parameters, so
    /// `text/plain; charset=utf-8` resolves to [`InputFormat::Text`].
    #[must_use = "resolves the format for a MIME type"]
    pub fn from_mime(mime_type: &str) -> Option<Self> {
        let essence = mime_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        Self::ALL
            .into_iter()
            .find(|format| format.mime_type() == essence)
    }

    /// Canonical MIME type for this format
    #[inline]
    #[must_use = "returns the canonical MIME type"]
    pub const fn mime_type(&self) -> &'static str {
        match self {
            Self::Pdf => MIME_PDF,
            Self::Docx => MIME_DOCX,
            Self::Text => MIME_TEXT,
            Self::Pptx => MIME_PPTX,
            Self::Jpeg => MIME_JPEG,
            Self::Png => MIME_PNG,
            Self::Gif => MIME_GIF,
            Self::Webp => MIME_WEBP,
        }
    }

    /// Detect format from file extension
    #[inline]
    #[must_use = "detects format from file extension"]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            "txt" | "text" | "log" => Some(Self::Text),
            "pptx" => Some(Self::Pptx),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "gif" => Some(Self::Gif),
            "webp" => Some(Self::Webp),
            _ => None,
        }
    }

    /// Check if this is an image format (routed to OCR)
    #[inline]
    #[must_use = "returns whether this is an image format"]
    pub const fn is_image(&self) -> bool {
        matches!(self, Self::Jpeg | Self::Png | Self::Gif | Self::Webp)
    }

    /// Check whether failures for this format degrade to placeholders
    /// instead of surfacing as errors
    #[inline]
    #[must_use = "returns whether this format fails softly"]
    pub const fn fails_softly(&self) -> bool {
        matches!(self, Self::Pdf) || self.is_image()
    }
}

impl std::fmt::Display for InputFormat {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pdf => "PDF",
            Self::Docx => "DOCX",
            Self::Text => "TXT",
            Self::Pptx => "PPTX",
            Self::Jpeg => "JPEG",
            Self::Png => "PNG",
            Self::Gif => "GIF",
            Self::Webp => "WEBP",
        };
        write!(f, "{s}")
    }
}
