//! Reliability burn-in evidence.

use serde::{Deserialize, Serialize};

use super::{EvidenceNormalizer, FieldSpec, ResolvedFields};
use crate::thresholds::MIN_CONSECUTIVE_PASSES;
use crate::types::{EvidenceKind, EvidenceStatus};

const SUITE: &str = "core-invariant-suite";

const FIELDS: &[FieldSpec] = &[
    FieldSpec::int(
        "consecutive_passes",
        &[
            &["consecutive_passes"],
            &["summary", "consecutive_passes"],
            &["metrics", "consecutive_passes"],
            &["consecutive_successes"],
        ],
    ),
    FieldSpec::int(
        "total_runs",
        &[&["total_runs"], &["summary", "total_runs"], &["runs"]],
    ),
    FieldSpec::int(
        "failure_count",
        &[&["failure_count"], &["summary", "failure_count"], &["failures"]],
    ),
];

/// Canonical burn-in summary document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BurnInSummary {
    pub generated_at: String,
    pub suite: String,
    pub summary: BurnInCounts,
    pub metrics: BurnInMetrics,
    pub status: EvidenceStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BurnInCounts {
    pub consecutive_passes: i64,
    pub total_runs: i64,
    pub failure_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BurnInMetrics {
    pub consecutive_passes: i64,
    pub stability_rate: f64,
}

/// Normalizer for burn-in harness output.
pub struct BurnInNormalizer;

impl BurnInNormalizer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for BurnInNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl EvidenceNormalizer for BurnInNormalizer {
    type Document = BurnInSummary;

    fn kind(&self) -> EvidenceKind {
        EvidenceKind::BurnIn
    }

    fn fields(&self) -> &'static [FieldSpec] {
        FIELDS
    }

    fn assemble(&self, fields: &ResolvedFields, generated_at: &str) -> BurnInSummary {
        let consecutive_passes = fields.int_or("consecutive_passes", 0);
        // No run count reported: assume every run passed.
        let total_runs = fields.int_or("total_runs", consecutive_passes);
        let failure_count = fields.int_or(
            "failure_count",
            total_runs.saturating_sub(consecutive_passes).max(0),
        );

        let stability_rate = if total_runs == 0 {
            0.0
        } else {
            consecutive_passes as f64 / total_runs as f64
        };

        BurnInSummary {
            generated_at: generated_at.to_string(),
            suite: SUITE.to_string(),
            summary: BurnInCounts {
                consecutive_passes,
                total_runs,
                failure_count,
            },
            metrics: BurnInMetrics {
                consecutive_passes,
                stability_rate,
            },
            status: EvidenceStatus::from_check(consecutive_passes >= MIN_CONSECUTIVE_PASSES),
        }
    }
}
