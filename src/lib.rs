//! code_scan - batch orchestration for barcode and 2D code recognition
//!
//! Drives an external recognition engine over single images or whole image
//! directories. The engine does the pixel work; this crate owns the model
//! lifecycle, the per-family recognition profiles, per-family and per-file
//! failure containment, and the aggregation of results.
//!
//! # Example
//! ```
//! use code_scan::engine::{Scene, ScriptedEngine, ScriptedLoader};
//! use code_scan::{BatchProcessor, CodeFamily, DecodedCode, summarize};
//!
//! let engine = ScriptedEngine::new();
//! let loader = ScriptedLoader::new().with_scene(
//!     "label.png",
//!     Scene::new().with_code(CodeFamily::Code128, DecodedCode::new("12345")),
//! );
//!
//! let batch = BatchProcessor::new(&engine, loader)
//!     .process(["label.png", "missing.png"])
//!     .unwrap();
//! let summary = summarize(&batch);
//! assert_eq!(summary.images_processed, 2);
//! assert_eq!(summary.images_failed, 1);
//! assert_eq!(summary.codes_1d, 1);
//! ```

#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

/// Batch summaries
pub mod aggregate;
/// Batch processing over image paths
pub mod batch;
/// Scan configuration (enabled families, image size cap)
pub mod config;
/// Per-image decode dispatch
pub mod dispatch;
/// Recognition engine boundary and the scripted engine
pub mod engine;
/// Error types
pub mod error;
/// Image file enumeration
pub mod lister;
/// Image loading
pub mod loader;
/// Recognition model lifecycle
pub mod manager;
/// Core data structures (families, outcomes, batch results)
pub mod models;
/// Per-family recognition profiles
pub mod profile;

pub use aggregate::{Summary, summarize};
pub use batch::BatchProcessor;
pub use config::ScanConfig;
pub use dispatch::decode_image;
pub use engine::RecognitionEngine;
pub use error::{EngineError, ImageLoadError, Result, ScanError};
pub use lister::list_images;
pub use loader::{ImageLoader, RasterImage, RasterLoader};
pub use manager::{ModelHandle, ModelManager, ModelSet, ReleaseReport};
pub use models::{
    BatchEntry, BatchResult, CodeFamily, DecodeOutcome, DecodedCode, Dimension, FileOutcome,
    ImageResult, Point,
};
pub use profile::{ConfigParam, ConfigProfile, ParamValue, profile_for};

use std::path::Path;

/// Scan every image under `dir` with `engine`, loading through [`RasterLoader`].
///
/// `config.max_dim` is applied to the loader.
pub fn scan_directory<E>(engine: &E, dir: impl AsRef<Path>, config: ScanConfig) -> Result<BatchResult>
where
    E: RecognitionEngine<Image = RasterImage>,
{
    let loader = RasterLoader::with_max_dim(config.max_dim);
    BatchProcessor::new(engine, loader)
        .with_config(config)
        .process_directory(dir)
}

/// Scan one image file with `engine`, loading through [`RasterLoader`]
pub fn scan_file<E>(engine: &E, path: impl AsRef<Path>, config: ScanConfig) -> Result<BatchResult>
where
    E: RecognitionEngine<Image = RasterImage>,
{
    let loader = RasterLoader::with_max_dim(config.max_dim);
    BatchProcessor::new(engine, loader)
        .with_config(config)
        .process_single(path)
}

/// Install a `tracing` subscriber filtered by `RUST_LOG`
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();
}
