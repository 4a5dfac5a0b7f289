//! Batch processing over image paths.

use crate::aggregate::summarize;
use crate::config::ScanConfig;
use crate::dispatch::{error_chain, panic_message};
use crate::engine::RecognitionEngine;
use crate::error::{Result, ScanError};
use crate::lister::list_images;
use crate::loader::ImageLoader;
use crate::manager::ModelManager;
use crate::models::{BatchResult, FileOutcome};
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use tracing::{debug, error, info, warn};

/// Drives one model lifecycle over a sequence of images.
///
/// Models are created once per [`process`](Self::process) call, shared by
/// every image in it, and released when the call returns. Failures to load or
/// decode a single image are recorded in the result and never end the batch.
pub struct BatchProcessor<'e, E: RecognitionEngine, L> {
    engine: &'e E,
    loader: L,
    config: ScanConfig,
}

impl<'e, E, L> BatchProcessor<'e, E, L>
where
    E: RecognitionEngine,
    L: ImageLoader<Image = E::Image>,
{
    /// Processor with every family enabled
    pub fn new(engine: &'e E, loader: L) -> Self {
        Self {
            engine,
            loader,
            config: ScanConfig::default(),
        }
    }

    /// Replace the scan configuration
    pub fn with_config(mut self, config: ScanConfig) -> Self {
        self.config = config;
        self
    }

    /// Current configuration
    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Process `paths` in order.
    ///
    /// Returns one entry per path. Only model creation can fail the whole
    /// call (see [`ScanConfig::allow_reduced_families`]).
    pub fn process<P, I>(&self, paths: I) -> Result<BatchResult>
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = P>,
    {
        let mut manager = self.open_models()?;
        let mut batch = BatchResult::new();

        for path in paths {
            let path = path.as_ref();
            debug!("Processing {}", path.display());
            let outcome = self.process_path(&manager, path);
            batch.push(path, outcome);
        }

        let report = manager.release_models();
        if !report.is_clean() {
            warn!(
                "{} models could not be released cleanly",
                report.failures.len()
            );
        }

        let summary = summarize(&batch);
        info!(
            "Processed {} images ({} failed): {} 1D codes, {} 2D codes",
            summary.images_processed, summary.images_failed, summary.codes_1d, summary.codes_2d
        );
        Ok(batch)
    }

    /// Process a single image under its own model lifecycle
    pub fn process_single(&self, path: impl AsRef<Path>) -> Result<BatchResult> {
        self.process([path])
    }

    /// Process every image found under `dir` (see [`list_images`])
    pub fn process_directory(&self, dir: impl AsRef<Path>) -> Result<BatchResult> {
        let dir = dir.as_ref();
        let paths = list_images(dir)?;
        info!("Found {} images under {}", paths.len(), dir.display());
        self.process(paths)
    }

    fn open_models(&self) -> Result<ModelManager<'e, E>> {
        let families = &self.config.families;
        if families.is_empty() {
            return Err(ScanError::Config {
                message: "no code families enabled".to_string(),
            });
        }
        if !self.config.allow_reduced_families {
            return ModelManager::create_models(self.engine, families.iter().copied());
        }

        let (manager, mut failures) =
            ModelManager::create_models_reduced(self.engine, families.iter().copied());
        if manager.handles().is_empty() && !failures.is_empty() {
            return Err(failures.remove(0));
        }
        Ok(manager)
    }

    fn process_path(&self, manager: &ModelManager<'e, E>, path: &Path) -> FileOutcome {
        let attempt = panic::catch_unwind(AssertUnwindSafe(|| match self.loader.load(path) {
            Ok(image) => FileOutcome::Processed {
                result: manager.decode_image(&image),
            },
            Err(err) => {
                let reason = error_chain(&err);
                warn!("Failed to load {}: {}", path.display(), reason);
                FileOutcome::LoadFailed { reason }
            }
        }));

        attempt.unwrap_or_else(|payload| {
            let reason = panic_message(payload.as_ref());
            error!("Aborted {}: {}", path.display(), reason);
            FileOutcome::Aborted { reason }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Scene, ScriptedEngine, ScriptedLoader};
    use crate::models::{CodeFamily, DecodedCode};

    #[test]
    fn test_models_are_created_once_per_batch() {
        let engine = ScriptedEngine::new();
        let loader = ScriptedLoader::new()
            .with_scene("a.png", Scene::new())
            .with_scene("b.png", Scene::new());
        let processor = BatchProcessor::new(&engine, loader)
            .with_config(ScanConfig::with_families([CodeFamily::QrCode]));

        let batch = processor.process(["a.png", "b.png", "a.png"]).unwrap();

        assert_eq!(batch.len(), 3);
        assert_eq!(engine.created().len(), 1);
        assert_eq!(engine.released(), vec![CodeFamily::QrCode]);
        assert_eq!(engine.decode_calls(), 3);
    }

    #[test]
    fn test_panicking_image_is_contained() {
        let engine = ScriptedEngine::new();
        let loader = ScriptedLoader::new()
            .panicking_at("bad.png", "decoder crashed")
            .with_scene(
                "good.png",
                Scene::new().with_code(CodeFamily::Code39, DecodedCode::new("OK")),
            );
        let processor = BatchProcessor::new(&engine, loader)
            .with_config(ScanConfig::with_families([CodeFamily::Code39]));

        let batch = processor.process(["bad.png", "good.png"]).unwrap();

        assert_eq!(
            batch.get("bad.png"),
            Some(&FileOutcome::Aborted {
                reason: "decoder crashed".to_string()
            })
        );
        let good = batch.get("good.png").and_then(FileOutcome::image_result).unwrap();
        assert_eq!(
            good.get(CodeFamily::Code39).and_then(|o| o.payloads()),
            Some(vec!["OK"])
        );
        assert_eq!(engine.live_models(), 0);
    }

    #[test]
    fn test_init_failure_aborts_unless_reduced_allowed() {
        let engine = ScriptedEngine::new().fail_create(CodeFamily::Gs1DataMatrix, "missing");
        let loader = ScriptedLoader::new().with_scene("a.png", Scene::new());

        let strict = BatchProcessor::new(&engine, loader.clone());
        assert!(matches!(
            strict.process(["a.png"]),
            Err(ScanError::EngineInit {
                family: CodeFamily::Gs1DataMatrix,
                ..
            })
        ));
        assert_eq!(engine.live_models(), 0);

        let reduced = BatchProcessor::new(&engine, loader).with_config(ScanConfig {
            allow_reduced_families: true,
            ..ScanConfig::default()
        });
        let batch = reduced.process(["a.png", "a.png"]).unwrap();
        for entry in &batch {
            let result = entry.outcome.image_result().unwrap();
            assert_eq!(result.len(), 6);
            let reason = result
                .get(CodeFamily::Gs1DataMatrix)
                .and_then(|o| o.failure_reason())
                .unwrap();
            assert!(reason.starts_with("model unavailable: "), "{reason}");
            assert!(reason.contains("GS1 DataMatrix: missing"), "{reason}");
        }
        assert_eq!(summarize(&batch).failed_decodes, 2);
        assert_eq!(engine.live_models(), 0);
    }

    #[test]
    fn test_release_failure_keeps_the_batch() {
        let engine = ScriptedEngine::new().fail_release(CodeFamily::QrCode, "engine busy");
        let loader = ScriptedLoader::new()
            .with_scene(
                "a.png",
                Scene::new().with_code(CodeFamily::QrCode, DecodedCode::new("q1")),
            )
            .with_scene("b.png", Scene::new());
        let processor = BatchProcessor::new(&engine, loader)
            .with_config(ScanConfig::with_families([CodeFamily::Code128, CodeFamily::QrCode]));

        let batch = processor.process(["a.png", "b.png", "c.png"]).unwrap();

        assert_eq!(batch.len(), 3);
        let first = batch.get("a.png").and_then(FileOutcome::image_result).unwrap();
        assert_eq!(
            first.get(CodeFamily::QrCode).and_then(|o| o.payloads()),
            Some(vec!["q1"])
        );
        assert!(batch.get("b.png").and_then(FileOutcome::image_result).is_some());
        assert!(matches!(
            batch.get("c.png"),
            Some(FileOutcome::LoadFailed { .. })
        ));
        assert_eq!(engine.released(), vec![CodeFamily::Code128]);
    }

    #[test]
    fn test_reduced_with_nothing_left_fails() {
        let engine = ScriptedEngine::new().fail_create(CodeFamily::QrCode, "missing");
        let processor = BatchProcessor::new(&engine, ScriptedLoader::new()).with_config(ScanConfig {
            families: [CodeFamily::QrCode].into_iter().collect(),
            max_dim: None,
            allow_reduced_families: true,
        });
        assert!(matches!(
            processor.process(["a.png"]),
            Err(ScanError::EngineInit { .. })
        ));
    }

    #[test]
    fn test_empty_family_set_is_rejected() {
        let engine = ScriptedEngine::new();
        let processor = BatchProcessor::new(&engine, ScriptedLoader::new())
            .with_config(ScanConfig::with_families(Vec::new()));
        assert!(matches!(
            processor.process(["a.png"]),
            Err(ScanError::Config { .. })
        ));
        assert!(engine.created().is_empty());
    }
}
