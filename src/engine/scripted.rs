//! In-memory engine and loader driven by prepared scenes.
//!
//! A [`Scene`] stands in for an image: it lists which codes a real engine
//! would report per family and which engine calls should fail. Useful for
//! dry runs of a batch layout and for exercising failure containment.

use super::RecognitionEngine;
use crate::error::{EngineError, ImageLoadError};
use crate::loader::ImageLoader;
use crate::models::{CodeFamily, DecodedCode};
use crate::profile::ConfigProfile;
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

/// Prepared content of one image
#[derive(Debug, Clone, Default)]
pub struct Scene {
    codes: Vec<(CodeFamily, DecodedCode)>,
    failures: BTreeMap<CodeFamily, String>,
    panics: BTreeMap<CodeFamily, String>,
}

impl Scene {
    /// Scene with no codes
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a code the engine will report for `family`
    pub fn with_code(mut self, family: CodeFamily, code: DecodedCode) -> Self {
        self.codes.push((family, code));
        self
    }

    /// Make decoding `family` on this scene fail with `reason`
    pub fn failing(mut self, family: CodeFamily, reason: impl Into<String>) -> Self {
        self.failures.insert(family, reason.into());
        self
    }

    /// Make decoding `family` on this scene panic with `message`
    pub fn panicking_on(mut self, family: CodeFamily, message: impl Into<String>) -> Self {
        self.panics.insert(family, message.into());
        self
    }
}

/// Handle issued by [`ScriptedEngine`]
#[derive(Debug, PartialEq, Eq)]
pub struct ScriptedModel {
    id: u64,
    family: CodeFamily,
}

impl ScriptedModel {
    /// Engine-assigned id
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Family the model was created for
    pub fn family(&self) -> CodeFamily {
        self.family
    }
}

#[derive(Debug, Default)]
struct EngineState {
    next_id: u64,
    live: BTreeMap<u64, CodeFamily>,
    created: Vec<(CodeFamily, ConfigProfile)>,
    released: Vec<CodeFamily>,
    decode_calls: usize,
    create_failures: BTreeMap<CodeFamily, String>,
    release_failures: BTreeMap<CodeFamily, String>,
}

/// Engine that answers from [`Scene`]s and tracks model lifetimes
#[derive(Debug, Default)]
pub struct ScriptedEngine {
    state: RefCell<EngineState>,
}

impl ScriptedEngine {
    /// Engine where every call succeeds
    pub fn new() -> Self {
        Self::default()
    }

    /// Make model creation for `family` fail
    pub fn fail_create(self, family: CodeFamily, reason: impl Into<String>) -> Self {
        self.state
            .borrow_mut()
            .create_failures
            .insert(family, reason.into());
        self
    }

    /// Make releasing the model for `family` fail
    pub fn fail_release(self, family: CodeFamily, reason: impl Into<String>) -> Self {
        self.state
            .borrow_mut()
            .release_failures
            .insert(family, reason.into());
        self
    }

    /// Number of models created and not yet released
    pub fn live_models(&self) -> usize {
        self.state.borrow().live.len()
    }

    /// Families in model creation order, with the profile each received
    pub fn created(&self) -> Vec<(CodeFamily, ConfigProfile)> {
        self.state.borrow().created.clone()
    }

    /// Families whose models were successfully released, in release order
    pub fn released(&self) -> Vec<CodeFamily> {
        self.state.borrow().released.clone()
    }

    /// Total decode calls received
    pub fn decode_calls(&self) -> usize {
        self.state.borrow().decode_calls
    }
}

impl RecognitionEngine for ScriptedEngine {
    type Image = Scene;
    type Model = ScriptedModel;

    fn create_model(
        &self,
        family: CodeFamily,
        profile: &ConfigProfile,
    ) -> Result<ScriptedModel, EngineError> {
        let mut state = self.state.borrow_mut();
        if let Some(reason) = state.create_failures.get(&family) {
            return Err(EngineError::new(reason.clone()));
        }
        if profile.family() != family {
            return Err(EngineError::new(format!(
                "profile for {} applied to {family}",
                profile.family()
            )));
        }
        let id = state.next_id;
        state.next_id += 1;
        state.live.insert(id, family);
        state.created.push((family, *profile));
        Ok(ScriptedModel { id, family })
    }

    fn decode(
        &self,
        image: &Scene,
        model: &ScriptedModel,
        family: CodeFamily,
    ) -> Result<Vec<DecodedCode>, EngineError> {
        {
            let mut state = self.state.borrow_mut();
            state.decode_calls += 1;
            if state.live.get(&model.id) != Some(&model.family) {
                return Err(EngineError::new(format!("model {} is not live", model.id)));
            }
        }
        if model.family != family {
            return Err(EngineError::new(format!(
                "model {} was created for {}, not {family}",
                model.id, model.family
            )));
        }
        if let Some(message) = image.panics.get(&family) {
            panic!("{message}");
        }
        if let Some(reason) = image.failures.get(&family) {
            return Err(EngineError::new(reason.clone()));
        }
        Ok(image
            .codes
            .iter()
            .filter(|(f, _)| *f == family)
            .map(|(_, code)| code.clone())
            .collect())
    }

    fn release_model(&self, model: ScriptedModel) -> Result<(), EngineError> {
        let mut state = self.state.borrow_mut();
        if let Some(reason) = state.release_failures.get(&model.family) {
            return Err(EngineError::new(reason.clone()));
        }
        if state.live.remove(&model.id).is_none() {
            return Err(EngineError::new(format!("model {} is not live", model.id)));
        }
        state.released.push(model.family);
        Ok(())
    }
}

/// Loader that serves [`Scene`]s by path
#[derive(Debug, Clone, Default)]
pub struct ScriptedLoader {
    scenes: HashMap<PathBuf, Scene>,
    panics: HashMap<PathBuf, String>,
}

impl ScriptedLoader {
    /// Loader with no images
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `scene` under `path`
    pub fn with_scene(mut self, path: impl Into<PathBuf>, scene: Scene) -> Self {
        self.scenes.insert(path.into(), scene);
        self
    }

    /// Make loading `path` panic with `message`
    pub fn panicking_at(mut self, path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        self.panics.insert(path.into(), message.into());
        self
    }
}

impl ImageLoader for ScriptedLoader {
    type Image = Scene;

    fn load(&self, path: &Path) -> Result<Scene, ImageLoadError> {
        if let Some(message) = self.panics.get(path) {
            panic!("{message}");
        }
        self.scenes
            .get(path)
            .cloned()
            .ok_or_else(|| ImageLoadError::Missing(path.to_path_buf()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::profile_for;

    #[test]
    fn test_released_model_cannot_decode() {
        let engine = ScriptedEngine::new();
        let family = CodeFamily::Code128;
        let model = engine.create_model(family, &profile_for(family)).unwrap();
        let stale = ScriptedModel {
            id: model.id(),
            family,
        };
        engine.release_model(model).unwrap();

        let err = engine.decode(&Scene::new(), &stale, family).unwrap_err();
        assert!(err.message.contains("not live"));
        assert_eq!(engine.live_models(), 0);
    }

    #[test]
    fn test_decode_filters_by_family_in_order() {
        let engine = ScriptedEngine::new();
        let family = CodeFamily::QrCode;
        let model = engine.create_model(family, &profile_for(family)).unwrap();
        let scene = Scene::new()
            .with_code(CodeFamily::QrCode, DecodedCode::new("b"))
            .with_code(CodeFamily::Code39, DecodedCode::new("x"))
            .with_code(CodeFamily::QrCode, DecodedCode::new("a"));

        let codes = engine.decode(&scene, &model, family).unwrap();
        let payloads: Vec<_> = codes.iter().map(|c| c.payload.as_str()).collect();
        assert_eq!(payloads, vec!["b", "a"]);
    }

    #[test]
    fn test_mismatched_profile_is_rejected() {
        let engine = ScriptedEngine::new();
        let result = engine.create_model(CodeFamily::QrCode, &profile_for(CodeFamily::Code39));
        assert!(result.is_err());
        assert_eq!(engine.live_models(), 0);
    }

    #[test]
    fn test_loader_reports_missing_paths() {
        let loader = ScriptedLoader::new().with_scene("a.png", Scene::new());
        assert!(loader.load(Path::new("a.png")).is_ok());
        assert!(matches!(
            loader.load(Path::new("b.png")),
            Err(ImageLoadError::Missing(_))
        ));
    }
}
