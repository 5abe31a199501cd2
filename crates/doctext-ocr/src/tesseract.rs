//! Tesseract-backed workers via `leptess`

use crate::{ImageInput, OcrError, OcrWorker, OcrWorkerFactory};
use leptess::LepTess;
use std::io::Cursor;

/// Creates one `LepTess` engine per worker
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TesseractFactory {
    /// Directory holding `*.traineddata`; `None` uses the system default
    pub data_path: Option<String>,
}

impl TesseractFactory {
    /// Factory reading language data from `data_path`
    #[must_use]
    pub fn with_data_path(data_path: impl Into<String>) -> Self {
        Self {
            data_path: Some(data_path.into()),
        }
    }
}

impl OcrWorkerFactory for TesseractFactory {
    fn create_worker(&self, language: &str) -> Result<Box<dyn OcrWorker>, OcrError> {
        let engine = LepTess::new(self.data_path.as_deref(), language).map_err(|e| {
            OcrError::WorkerCreation(format!(
                "Failed to initialize Tesseract with language '{language}': {e}"
            ))
        })?;
        Ok(Box::new(TesseractWorker { engine }))
    }
}

/// A live Tesseract engine
pub struct TesseractWorker {
    engine: LepTess,
}

impl TesseractWorker {
    /// Decode any supported image and re-encode it as PNG.
    ///
    /// Leptonica builds often lack GIF/WebP readers; PNG is always available.
    fn normalize(image: ImageInput<'_>) -> Result<Vec<u8>, OcrError> {
        let decoded = match image {
            ImageInput::Bytes(bytes) => image::load_from_memory(bytes),
            ImageInput::Path(path) => image::open(path),
        }
        .map_err(|e| OcrError::ImageLoad(e.to_string()))?;

        let mut png_buf = Cursor::new(Vec::new());
        decoded
            .write_to(&mut png_buf, image::ImageFormat::Png)
            .map_err(|e| OcrError::ImageLoad(format!("Failed to encode image to PNG: {e}")))?;
        Ok(png_buf.into_inner())
    }
}

impl OcrWorker for TesseractWorker {
    fn recognize(&mut self, image: ImageInput<'_>) -> Result<String, OcrError> {
        let png = Self::normalize(image)?;

        self.engine.set_image_from_mem(&png).map_err(|e| {
            OcrError::Recognition(format!("Failed to set image from memory: {e}"))
        })?;

        self.engine
            .get_utf8_text()
            .map_err(|e| OcrError::Recognition(e.to_string()))
    }

    fn terminate(self: Box<Self>) -> Result<(), OcrError> {
        // LepTess releases the Tesseract API and Pix buffers on drop
        drop(self);
        Ok(())
    }
}
