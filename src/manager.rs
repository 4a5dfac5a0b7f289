//! Recognition model lifecycle.
//!
//! A [`ModelManager`] is the only owner of engine models. It creates one
//! model per enabled family, lends them out through [`ModelSet`], and
//! releases each of them exactly once, at the latest when it is dropped.

use crate::dispatch::error_chain;
use crate::engine::RecognitionEngine;
use crate::error::{EngineError, Result, ScanError};
use crate::models::CodeFamily;
use crate::profile::{ConfigProfile, profile_for};
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

/// One family's model slot.
///
/// Empty once the model has been released.
#[derive(Debug)]
pub struct ModelHandle<M> {
    family: CodeFamily,
    profile: ConfigProfile,
    model: Option<M>,
}

impl<M> ModelHandle<M> {
    /// Family the model recognizes
    pub fn family(&self) -> CodeFamily {
        self.family
    }

    /// Profile the model was created from
    pub fn profile(&self) -> &ConfigProfile {
        &self.profile
    }

    /// True until the model is released
    pub fn is_live(&self) -> bool {
        self.model.is_some()
    }

    /// The engine model, `None` after release
    pub fn model(&self) -> Option<&M> {
        self.model.as_ref()
    }
}

/// Handles for a set of families, in dispatch order
#[derive(Debug)]
pub struct ModelSet<M> {
    handles: Vec<ModelHandle<M>>,
    unavailable: Vec<(CodeFamily, String)>,
}

impl<M> ModelSet<M> {
    /// Handles in dispatch order
    pub fn iter(&self) -> std::slice::Iter<'_, ModelHandle<M>> {
        self.handles.iter()
    }

    /// Handle for `family`
    pub fn get(&self, family: CodeFamily) -> Option<&ModelHandle<M>> {
        self.handles.iter().find(|h| h.family == family)
    }

    /// Families covered by this set
    pub fn families(&self) -> Vec<CodeFamily> {
        self.handles.iter().map(|h| h.family).collect()
    }

    /// Number of handles
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// True when no family has a handle
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Number of handles still holding a model
    pub fn live_count(&self) -> usize {
        self.handles.iter().filter(|h| h.is_live()).count()
    }

    /// Requested families left out because their model failed to initialise,
    /// with the init error
    pub fn unavailable(&self) -> &[(CodeFamily, String)] {
        &self.unavailable
    }
}

/// Outcome of [`ModelManager::release_models`]
#[derive(Debug, Default)]
pub struct ReleaseReport {
    /// Families whose models were released cleanly
    pub released: Vec<CodeFamily>,
    /// Families whose release failed
    pub failures: Vec<(CodeFamily, EngineError)>,
}

impl ReleaseReport {
    /// True when every release attempt succeeded
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Owns the models of one batch
pub struct ModelManager<'e, E: RecognitionEngine> {
    engine: &'e E,
    models: ModelSet<E::Model>,
}

impl<'e, E: RecognitionEngine> ModelManager<'e, E> {
    /// Create a model for every family in `families`.
    ///
    /// Fails on the first family the engine cannot initialise, after
    /// releasing the models already created.
    pub fn create_models(
        engine: &'e E,
        families: impl IntoIterator<Item = CodeFamily>,
    ) -> Result<Self> {
        let mut manager = Self::empty(engine);
        for family in dispatch_order(families) {
            if let Err(err) = manager.create_one(family) {
                manager.release_models();
                return Err(err);
            }
        }
        info!("Created {} recognition models", manager.models.len());
        Ok(manager)
    }

    /// Create models for whichever of `families` the engine can initialise.
    ///
    /// Returns the manager together with one [`ScanError::EngineInit`] per
    /// family that was left out.
    pub fn create_models_reduced(
        engine: &'e E,
        families: impl IntoIterator<Item = CodeFamily>,
    ) -> (Self, Vec<ScanError>) {
        let mut manager = Self::empty(engine);
        let mut failures = Vec::new();
        for family in dispatch_order(families) {
            if let Err(err) = manager.create_one(family) {
                let reason = error_chain(&err);
                warn!("Continuing without {}: {}", family, reason);
                manager.models.unavailable.push((family, reason));
                failures.push(err);
            }
        }
        info!(
            "Created {} recognition models ({} unavailable)",
            manager.models.len(),
            failures.len()
        );
        (manager, failures)
    }

    fn empty(engine: &'e E) -> Self {
        Self {
            engine,
            models: ModelSet {
                handles: Vec::new(),
                unavailable: Vec::new(),
            },
        }
    }

    fn create_one(&mut self, family: CodeFamily) -> Result<()> {
        let profile = profile_for(family);
        let model = self
            .engine
            .create_model(family, &profile)
            .map_err(|source| ScanError::EngineInit { family, source })?;
        debug!(
            "Created {} model with {} options",
            family,
            profile.params().len()
        );
        self.models.handles.push(ModelHandle {
            family,
            profile,
            model: Some(model),
        });
        Ok(())
    }

    /// The engine these models belong to
    pub fn engine(&self) -> &'e E {
        self.engine
    }

    /// Borrow the handles for dispatch
    pub fn handles(&self) -> &ModelSet<E::Model> {
        &self.models
    }

    /// Release every live model.
    ///
    /// Each release is attempted independently; failures are logged and
    /// reported, never raised. Calling this again is a no-op.
    pub fn release_models(&mut self) -> ReleaseReport {
        let mut report = ReleaseReport::default();
        for handle in &mut self.models.handles {
            let Some(model) = handle.model.take() else {
                continue;
            };
            match self.engine.release_model(model) {
                Ok(()) => report.released.push(handle.family),
                Err(err) => {
                    warn!("Failed to release {} model: {}", handle.family, err);
                    report.failures.push((handle.family, err));
                }
            }
        }
        if !report.released.is_empty() || !report.failures.is_empty() {
            debug!(
                "Released {} models, {} release failures",
                report.released.len(),
                report.failures.len()
            );
        }
        report
    }
}

impl<E: RecognitionEngine> Drop for ModelManager<'_, E> {
    fn drop(&mut self) {
        if self.models.live_count() > 0 {
            self.release_models();
        }
    }
}

fn dispatch_order(families: impl IntoIterator<Item = CodeFamily>) -> BTreeSet<CodeFamily> {
    families.into_iter().collect()
}
