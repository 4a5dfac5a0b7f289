//! Per-image decode dispatch.

use crate::engine::RecognitionEngine;
use crate::manager::{ModelManager, ModelSet};
use crate::models::{DecodeOutcome, ImageResult};
use std::any::Any;
use std::error::Error;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, warn};

/// Run every handle in `handles` against `image`.
///
/// Each family is isolated: an engine error, an engine panic, or a handle
/// whose model was already released becomes a [`DecodeOutcome::Failed`] for
/// that family and the remaining families still run. Families whose model
/// never initialised (see [`ModelSet::unavailable`]) are recorded as failed
/// too. Decoded codes keep engine order and any corner points the engine
/// reported.
pub fn decode_image<E: RecognitionEngine>(
    engine: &E,
    image: &E::Image,
    handles: &ModelSet<E::Model>,
) -> ImageResult {
    let mut result = ImageResult::new();

    for handle in handles.iter() {
        let family = handle.family();
        let outcome = match handle.model() {
            None => DecodeOutcome::failed(format!("{family} model has been released")),
            Some(model) => {
                match panic::catch_unwind(AssertUnwindSafe(|| engine.decode(image, model, family)))
                {
                    Ok(Ok(codes)) => {
                        debug!("{}: found {} codes", family, codes.len());
                        DecodeOutcome::decoded(codes)
                    }
                    Ok(Err(err)) => {
                        let reason = error_chain(&err);
                        warn!("{}: decode failed: {}", family, reason);
                        DecodeOutcome::failed(reason)
                    }
                    Err(payload) => {
                        let reason =
                            format!("engine panicked: {}", panic_message(payload.as_ref()));
                        warn!("{}: {}", family, reason);
                        DecodeOutcome::failed(reason)
                    }
                }
            }
        };
        result.insert(family, outcome);
    }

    for (family, reason) in handles.unavailable() {
        result.insert(*family, DecodeOutcome::failed(format!("model unavailable: {reason}")));
    }

    result
}

impl<E: RecognitionEngine> ModelManager<'_, E> {
    /// Decode `image` with every model this manager owns
    pub fn decode_image(&self, image: &E::Image) -> ImageResult {
        decode_image(self.engine(), image, self.handles())
    }
}

/// `err` followed by its sources, separated by `": "`
pub(crate) fn error_chain(err: &dyn Error) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic with non-string payload".to_string()
    }
}
