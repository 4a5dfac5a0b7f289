//! Boundary to the external recognition engine.
//!
//! The pixel-level work (scanline analysis, finder patterns, error
//! correction) happens behind [`RecognitionEngine`]. This crate only drives
//! it: create one model per family, run it per image, release it.

pub mod scripted;

use crate::error::EngineError;
use crate::models::{CodeFamily, DecodedCode};
use crate::profile::ConfigProfile;

pub use scripted::{Scene, ScriptedEngine, ScriptedLoader, ScriptedModel};

/// A configured recognizer backend.
///
/// Calls are synchronous and take `&self`; engines with internal state are
/// expected to manage it themselves. Nothing here assumes an engine is safe to
/// share across threads.
pub trait RecognitionEngine {
    /// Image representation the engine decodes
    type Image;
    /// Engine-side model handle
    type Model;

    /// Create a model for `family`, applying every option of `profile` in order.
    fn create_model(
        &self,
        family: CodeFamily,
        profile: &ConfigProfile,
    ) -> Result<Self::Model, EngineError>;

    /// Run `model` against `image`.
    ///
    /// `family` doubles as the sub-selector for linear codes. Codes are
    /// returned in engine order; matrix codes may carry corner points.
    fn decode(
        &self,
        image: &Self::Image,
        model: &Self::Model,
        family: CodeFamily,
    ) -> Result<Vec<DecodedCode>, EngineError>;

    /// Free engine-side resources held by `model`.
    fn release_model(&self, model: Self::Model) -> Result<(), EngineError>;
}
