//! Optical Character Recognition (OCR) workers for doctext
//!
//! OCR engines are heavyweight: each worker loads language data and native
//! state. This crate models a worker as an ephemeral resource that lives for
//! exactly one recognition call.
//!
//! # Lifecycle
//!
//! ```text
//! OcrWorkerFactory::create_worker(lang)
//!          │
//!          ▼
//!   WorkerScope (owns Box<dyn OcrWorker>)
//!          │ recognize(image)
//!          ▼
//!   Drop ──► OcrWorker::terminate(self: Box<Self>)   (exactly once, on every exit path)
//! ```
//!
//! Termination consumes the worker, so a second termination cannot be
//! expressed. Termination failures on drop are logged and never replace the
//! recognition result or error; [`WorkerScope::release`] terminates early and
//! returns them instead.
//!
//! # Engines
//!
//! - `tesseract` feature: [`TesseractFactory`] backed by `leptess`
//! - otherwise: [`default_factory`] returns a factory that reports an
//!   unsupported runtime

use std::path::Path;
use thiserror::Error;

#[cfg(feature = "tesseract")]
mod tesseract;

#[cfg(feature = "tesseract")]
pub use tesseract::{TesseractFactory, TesseractWorker};

/// Recognition locale used for every worker
pub const OCR_LANGUAGE: &str = "eng";

/// OCR-specific errors
#[derive(Error, Debug)]
pub enum OcrError {
    /// The engine cannot run in this runtime (no native support, WASM, ...)
    #[error("OCR runtime unsupported: {0}")]
    RuntimeUnsupported(String),

    /// Creating or initializing a worker failed
    #[error("Failed to create OCR worker: {0}")]
    WorkerCreation(String),

    /// The image could not be loaded or decoded
    #[error("Failed to load image: {0}")]
    ImageLoad(String),

    /// Recognition itself failed
    #[error("OCR recognition failed: {0}")]
    Recognition(String),

    /// Releasing the worker failed
    #[error("OCR worker teardown failed: {0}")]
    Teardown(String),

    /// The scope's worker was terminated by [`WorkerScope::release`]
    #[error("OCR worker already released")]
    WorkerReleased,
}

/// Image handed to a worker; both variants use the same call shape
#[derive(Debug, Clone, Copy)]
pub enum ImageInput<'a> {
    /// Encoded image bytes (JPEG, PNG, GIF, WebP)
    Bytes(&'a [u8]),
    /// Path to an encoded image on disk
    Path(&'a Path),
}

/// A single-use recognition worker
pub trait OcrWorker {
    /// Recognize text in `image`
    ///
    /// # Errors
    /// Returns an error if the image cannot be loaded or recognition fails.
    fn recognize(&mut self, image: ImageInput<'_>) -> Result<String, OcrError>;

    /// Release the worker and its engine state
    ///
    /// # Errors
    /// Returns [`OcrError::Teardown`] if the engine fails to shut down.
    fn terminate(self: Box<Self>) -> Result<(), OcrError>;
}

/// Creates workers for one locale at a time
pub trait OcrWorkerFactory: Send + Sync {
    /// Create a fresh worker configured for `language`
    ///
    /// # Errors
    /// Returns an error if the engine is unavailable or fails to initialize.
    fn create_worker(&self, language: &str) -> Result<Box<dyn OcrWorker>, OcrError>;
}

/// Scoped ownership of one worker.
///
/// Dropping the scope terminates the worker, including during unwinding.
pub struct WorkerScope {
    worker: Option<Box<dyn OcrWorker>>,
}

impl WorkerScope {
    /// Acquire a worker from `factory`
    ///
    /// # Errors
    /// Propagates the factory's creation error; nothing needs releasing then.
    pub fn acquire(factory: &dyn OcrWorkerFactory, language: &str) -> Result<Self, OcrError> {
        let worker = factory.create_worker(language)?;
        log::debug!("OCR worker created for language '{language}'");
        Ok(Self {
            worker: Some(worker),
        })
    }

    /// Run recognition on the scoped worker
    ///
    /// # Errors
    /// Propagates the worker's recognition error, or returns
    /// [`OcrError::WorkerReleased`] after [`release`](Self::release).
    pub fn recognize(&mut self, image: ImageInput<'_>) -> Result<String, OcrError> {
        match self.worker.as_mut() {
            Some(worker) => worker.recognize(image),
            None => Err(OcrError::WorkerReleased),
        }
    }

    /// Terminate the worker now instead of on drop
    ///
    /// # Errors
    /// Returns the worker's teardown error, or [`OcrError::WorkerReleased`]
    /// if the worker was already released.
    pub fn release(&mut self) -> Result<(), OcrError> {
        let worker = self.worker.take().ok_or(OcrError::WorkerReleased)?;
        worker.terminate()?;
        log::debug!("OCR worker released");
        Ok(())
    }
}

impl Drop for WorkerScope {
    fn drop(&mut self) {
        if let Some(worker) = self.worker.take() {
            match worker.terminate() {
                Ok(()) => log::debug!("OCR worker terminated"),
                Err(e) => log::warn!("Error terminating OCR worker: {e}"),
            }
        }
    }
}

/// Create a worker, recognize one image, and release the worker.
///
/// # Errors
/// Returns the creation or recognition error. Teardown errors are only logged.
pub fn recognize_once(
    factory: &dyn OcrWorkerFactory,
    language: &str,
    image: ImageInput<'_>,
) -> Result<String, OcrError> {
    let mut scope = WorkerScope::acquire(factory, language)?;
    scope.recognize(image)
}

/// Factory used when no OCR engine is compiled in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct UnavailableFactory;

impl OcrWorkerFactory for UnavailableFactory {
    fn create_worker(&self, _language: &str) -> Result<Box<dyn OcrWorker>, OcrError> {
        Err(OcrError::RuntimeUnsupported(
            "built without the `tesseract` feature".to_string(),
        ))
    }
}

/// The best factory available in this build
#[cfg(feature = "tesseract")]
#[must_use]
pub fn default_factory() -> std::sync::Arc<dyn OcrWorkerFactory> {
    std::sync::Arc::new(TesseractFactory::default())
}

/// The best factory available in this build
#[cfg(not(feature = "tesseract"))]
#[must_use]
pub fn default_factory() -> std::sync::Arc<dyn OcrWorkerFactory> {
    std::sync::Arc::new(UnavailableFactory)
}
