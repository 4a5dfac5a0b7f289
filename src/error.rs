//! Error types for the scanning pipeline.
//!
//! Only [`ScanError::EngineInit`] is allowed to abort a run. Decode, load and
//! release failures are recorded as data (see [`crate::models`]) at the
//! smallest enclosing scope.

use crate::models::CodeFamily;
use std::path::PathBuf;
use thiserror::Error;

/// Failure reported by a recognition engine.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct EngineError {
    /// Human-readable description from the engine.
    pub message: String,
    /// The underlying error, when the engine exposes one.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl EngineError {
    /// Creates an engine error from a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an engine error wrapping an underlying cause.
    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Errors raised while reading one image file.
#[derive(Debug, Error)]
pub enum ImageLoadError {
    /// The path does not exist.
    #[error("image not found: {0}")]
    Missing(PathBuf),
    /// The file exists but could not be read.
    #[error("io")]
    Io(#[from] std::io::Error),
    /// The file could not be decoded as a raster image.
    #[error("image decode")]
    Decode(#[from] image::ImageError),
}

/// Errors that abort a scanning run.
#[derive(Debug, Error)]
pub enum ScanError {
    /// A recognition model could not be created from its profile.
    #[error("model creation failed for {family}")]
    EngineInit {
        /// Family whose model failed to initialise.
        family: CodeFamily,
        /// The engine failure.
        #[source]
        source: EngineError,
    },

    /// An image directory could not be enumerated.
    #[error("cannot list images under '{}'", path.display())]
    Listing {
        /// Directory that was being listed.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Invalid scan configuration.
    #[error("configuration: {message}")]
    Config {
        /// What was wrong.
        message: String,
    },
}

/// Result alias defaulting to [`ScanError`].
pub type Result<T, E = ScanError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn engine_init_names_the_family() {
        let err = ScanError::EngineInit {
            family: CodeFamily::QrCode,
            source: EngineError::new("license expired"),
        };
        assert_eq!(err.to_string(), "model creation failed for QR Code");
        assert_eq!(
            err.source().map(|s| s.to_string()).as_deref(),
            Some("license expired")
        );
    }

    #[test]
    fn engine_error_keeps_its_cause() {
        let io = std::io::Error::other("device gone");
        let err = EngineError::with_source("decode aborted", io);
        assert_eq!(err.to_string(), "decode aborted");
        assert!(err.source().is_some());
    }
}
