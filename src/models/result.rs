use super::{CodeFamily, Point};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// One decoded code as reported by the engine
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodedCode {
    /// Decoded payload
    pub payload: String,
    /// Corner points in image coordinates (matrix codes only).
    ///
    /// Passed through from the engine untouched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corners: Option<[Point; 4]>,
}

impl DecodedCode {
    /// Create a code without placement data
    pub fn new(payload: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
            corners: None,
        }
    }

    /// Create a code carrying its corner points
    pub fn with_corners(payload: impl Into<String>, corners: [Point; 4]) -> Self {
        Self {
            payload: payload.into(),
            corners: Some(corners),
        }
    }
}

/// Result of running one family's model against one image
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DecodeOutcome {
    /// The model ran. An empty list means nothing was found.
    Decoded {
        /// Codes in engine order
        codes: Vec<DecodedCode>,
    },
    /// The model invocation itself failed
    Failed {
        /// Engine-reported reason
        reason: String,
    },
}

impl DecodeOutcome {
    /// Successful outcome
    pub fn decoded(codes: Vec<DecodedCode>) -> Self {
        DecodeOutcome::Decoded { codes }
    }

    /// Failed outcome
    pub fn failed(reason: impl Into<String>) -> Self {
        DecodeOutcome::Failed {
            reason: reason.into(),
        }
    }

    /// True when the invocation failed
    pub fn is_failure(&self) -> bool {
        matches!(self, DecodeOutcome::Failed { .. })
    }

    /// Decoded codes, `None` for failures
    pub fn codes(&self) -> Option<&[DecodedCode]> {
        match self {
            DecodeOutcome::Decoded { codes } => Some(codes),
            DecodeOutcome::Failed { .. } => None,
        }
    }

    /// Decoded payloads in engine order, `None` for failures
    pub fn payloads(&self) -> Option<Vec<&str>> {
        self.codes()
            .map(|codes| codes.iter().map(|c| c.payload.as_str()).collect())
    }

    /// Failure reason, `None` for successful outcomes
    pub fn failure_reason(&self) -> Option<&str> {
        match self {
            DecodeOutcome::Failed { reason } => Some(reason),
            DecodeOutcome::Decoded { .. } => None,
        }
    }
}

/// Per-family outcomes for one image.
///
/// Iteration follows [`CodeFamily`] declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ImageResult {
    outcomes: BTreeMap<CodeFamily, DecodeOutcome>,
}

impl ImageResult {
    /// Empty result
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome for a family, replacing any previous one
    pub fn insert(&mut self, family: CodeFamily, outcome: DecodeOutcome) {
        self.outcomes.insert(family, outcome);
    }

    /// Outcome for a family, if it was dispatched
    pub fn get(&self, family: CodeFamily) -> Option<&DecodeOutcome> {
        self.outcomes.get(&family)
    }

    /// Outcomes in dispatch order
    pub fn iter(&self) -> impl Iterator<Item = (CodeFamily, &DecodeOutcome)> {
        self.outcomes.iter().map(|(f, o)| (*f, o))
    }

    /// Number of families recorded
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// True when no family was dispatched
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

/// File-level status of one batch entry
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    /// Image loaded and dispatched
    Processed {
        /// Per-family outcomes
        result: ImageResult,
    },
    /// Image could not be loaded
    LoadFailed {
        /// Loader-reported reason
        reason: String,
    },
    /// Processing of this image was aborted by a panic in a collaborator
    Aborted {
        /// Panic message
        reason: String,
    },
}

impl FileOutcome {
    /// Per-family outcomes when the image was processed
    pub fn image_result(&self) -> Option<&ImageResult> {
        match self {
            FileOutcome::Processed { result } => Some(result),
            _ => None,
        }
    }

    /// True for load failures and aborts
    pub fn is_failure(&self) -> bool {
        !matches!(self, FileOutcome::Processed { .. })
    }
}

/// One processed path
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchEntry {
    /// Image path as given to the batch
    pub path: PathBuf,
    /// What happened to it
    #[serde(flatten)]
    pub outcome: FileOutcome,
}

/// Results for a batch, in processing order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct BatchResult {
    entries: Vec<BatchEntry>,
}

impl BatchResult {
    /// Empty batch
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry
    pub fn push(&mut self, path: impl Into<PathBuf>, outcome: FileOutcome) {
        self.entries.push(BatchEntry {
            path: path.into(),
            outcome,
        });
    }

    /// First entry recorded for `path`
    pub fn get(&self, path: impl AsRef<Path>) -> Option<&FileOutcome> {
        let path = path.as_ref();
        self.entries
            .iter()
            .find(|e| e.path == path)
            .map(|e| &e.outcome)
    }

    /// Entries in processing order
    pub fn iter(&self) -> std::slice::Iter<'_, BatchEntry> {
        self.entries.iter()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True for an empty batch
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consume into the entry list
    pub fn into_entries(self) -> Vec<BatchEntry> {
        self.entries
    }
}

impl FromIterator<BatchEntry> for BatchResult {
    fn from_iter<I: IntoIterator<Item = BatchEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a BatchResult {
    type Item = &'a BatchEntry;
    type IntoIter = std::slice::Iter<'a, BatchEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_decode_is_not_a_failure() {
        let outcome = DecodeOutcome::decoded(Vec::new());
        assert!(!outcome.is_failure());
        assert_eq!(outcome.payloads(), Some(Vec::new()));

        let failed = DecodeOutcome::failed("malformed region");
        assert!(failed.is_failure());
        assert_eq!(failed.payloads(), None);
        assert_eq!(failed.failure_reason(), Some("malformed region"));
    }

    #[test]
    fn test_image_result_iterates_in_family_order() {
        let mut result = ImageResult::new();
        result.insert(CodeFamily::QrCode, DecodeOutcome::decoded(Vec::new()));
        result.insert(CodeFamily::Code39, DecodeOutcome::decoded(Vec::new()));
        result.insert(CodeFamily::Gs1DataMatrix, DecodeOutcome::failed("x"));

        let order: Vec<_> = result.iter().map(|(f, _)| f).collect();
        assert_eq!(
            order,
            vec![CodeFamily::Code39, CodeFamily::QrCode, CodeFamily::Gs1DataMatrix]
        );
    }

    #[test]
    fn test_batch_keeps_insertion_order() {
        let mut batch = BatchResult::new();
        batch.push("b.png", FileOutcome::LoadFailed { reason: "x".into() });
        batch.push(
            "a.png",
            FileOutcome::Processed {
                result: ImageResult::new(),
            },
        );

        let paths: Vec<_> = batch.iter().map(|e| e.path.clone()).collect();
        assert_eq!(paths, vec![PathBuf::from("b.png"), PathBuf::from("a.png")]);
        assert!(batch.get("b.png").is_some_and(FileOutcome::is_failure));
        assert!(batch.get("a.png").and_then(FileOutcome::image_result).is_some());
        assert!(batch.get("c.png").is_none());
    }
}
