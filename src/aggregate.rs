//! Batch summaries.

use crate::models::{BatchResult, CodeFamily, Dimension, FileOutcome};
use serde::Serialize;
use std::collections::BTreeMap;

/// Aggregate counts over a [`BatchResult`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Entries in the batch, including ones that failed to load
    pub images_processed: usize,
    /// Entries that failed at file level
    pub images_failed: usize,
    /// Codes found by 1D families
    pub codes_1d: usize,
    /// Codes found by 2D families
    pub codes_2d: usize,
    /// Codes found per family
    pub per_family: BTreeMap<CodeFamily, usize>,
    /// (image, family) pairs whose decode failed
    pub failed_decodes: usize,
}

impl Summary {
    /// All codes found
    pub fn total_codes(&self) -> usize {
        self.codes_1d + self.codes_2d
    }
}

/// Count codes across `batch`.
///
/// Failed decodes and failed files contribute nothing to code counts.
pub fn summarize(batch: &BatchResult) -> Summary {
    let mut summary = Summary {
        images_processed: batch.len(),
        ..Summary::default()
    };

    for entry in batch {
        let result = match &entry.outcome {
            FileOutcome::Processed { result } => result,
            FileOutcome::LoadFailed { .. } | FileOutcome::Aborted { .. } => {
                summary.images_failed += 1;
                continue;
            }
        };

        for (family, outcome) in result.iter() {
            let Some(codes) = outcome.codes() else {
                summary.failed_decodes += 1;
                continue;
            };
            let count = codes.len();
            *summary.per_family.entry(family).or_default() += count;
            match family.dimension() {
                Dimension::Linear => summary.codes_1d += count,
                Dimension::Matrix => summary.codes_2d += count,
            }
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DecodeOutcome, DecodedCode, ImageResult};

    fn image(outcomes: &[(CodeFamily, DecodeOutcome)]) -> FileOutcome {
        let mut result = ImageResult::new();
        for (family, outcome) in outcomes {
            result.insert(*family, outcome.clone());
        }
        FileOutcome::Processed { result }
    }

    fn found(payloads: &[&str]) -> DecodeOutcome {
        DecodeOutcome::decoded(payloads.iter().map(|p| DecodedCode::new(*p)).collect())
    }

    #[test]
    fn test_failures_are_excluded_from_counts() {
        let mut batch = BatchResult::new();
        batch.push(
            "one.png",
            image(&[
                (CodeFamily::Code128, found(&["1", "2"])),
                (CodeFamily::Code39, DecodeOutcome::failed("Error: bad region")),
                (CodeFamily::QrCode, found(&["q"])),
            ]),
        );
        batch.push(
            "two.png",
            FileOutcome::LoadFailed {
                reason: "truncated".into(),
            },
        );

        let summary = summarize(&batch);
        assert_eq!(summary.images_processed, 2);
        assert_eq!(summary.images_failed, 1);
        assert_eq!(summary.codes_1d, 2);
        assert_eq!(summary.codes_2d, 1);
        assert_eq!(summary.total_codes(), 3);
        assert_eq!(summary.failed_decodes, 1);
        assert_eq!(summary.per_family.get(&CodeFamily::Code39), None);
        assert_eq!(summary.per_family.get(&CodeFamily::Code128), Some(&2));
    }

    #[test]
    fn test_empty_outcomes_count_as_zero() {
        let mut batch = BatchResult::new();
        batch.push("blank.png", image(&[(CodeFamily::QrCode, found(&[]))]));

        let summary = summarize(&batch);
        assert_eq!(summary.total_codes(), 0);
        assert_eq!(summary.failed_decodes, 0);
        assert_eq!(summary.per_family.get(&CodeFamily::QrCode), Some(&0));
    }

    #[test]
    fn test_empty_batch() {
        assert_eq!(summarize(&BatchResult::new()), Summary::default());
    }
}
