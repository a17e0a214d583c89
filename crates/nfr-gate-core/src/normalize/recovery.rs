//! Backup/restore recovery drill evidence.

use serde::{Deserialize, Serialize};

use super::{EvidenceNormalizer, FieldSpec, ResolvedFields};
use crate::thresholds::MIN_RECOVERY_SUCCESS_RATE;
use crate::types::{EvidenceKind, EvidenceStatus};

const FIELDS: &[FieldSpec] = &[
    FieldSpec::float(
        "success_rate",
        &[
            &["success_rate"],
            &["summary", "success_rate"],
            &["recovery", "success_rate"],
            &["metrics", "success_rate"],
        ],
    ),
    FieldSpec::int(
        "drill_count",
        &[&["drill_count"], &["recovery", "drill_count"], &["summary", "drill_count"]],
    ),
    FieldSpec::int(
        "success_count",
        &[&["success_count"], &["recovery", "success_count"], &["summary", "success_count"]],
    ),
    FieldSpec::int(
        "rto_minutes",
        &[&["rto_minutes"], &["summary", "rto_minutes"], &["recovery", "rto_minutes"]],
    ),
    FieldSpec::int(
        "rpo_minutes",
        &[&["rpo_minutes"], &["summary", "rpo_minutes"], &["recovery", "rpo_minutes"]],
    ),
];

/// Canonical recovery drill summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecoveryDrillSummary {
    pub generated_at: String,
    pub recovery: RecoveryMetrics,
    pub summary: RecoverySummary,
    pub status: EvidenceStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecoveryMetrics {
    pub success_rate: f64,
    pub drill_count: i64,
    pub success_count: i64,
    pub rto_minutes: i64,
    pub rpo_minutes: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecoverySummary {
    pub success_rate: f64,
    pub rto_minutes: i64,
    pub rpo_minutes: i64,
}

/// Normalizer for recovery drill output.
pub struct RecoveryNormalizer;

impl RecoveryNormalizer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RecoveryNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl EvidenceNormalizer for RecoveryNormalizer {
    type Document = RecoveryDrillSummary;

    fn kind(&self) -> EvidenceKind {
        EvidenceKind::Recovery
    }

    fn fields(&self) -> &'static [FieldSpec] {
        FIELDS
    }

    fn assemble(&self, fields: &ResolvedFields, generated_at: &str) -> RecoveryDrillSummary {
        let success_rate = fields.float_or("success_rate", 0.0);
        let rto_minutes = fields.int_or("rto_minutes", 0);
        let rpo_minutes = fields.int_or("rpo_minutes", 0);

        RecoveryDrillSummary {
            generated_at: generated_at.to_string(),
            recovery: RecoveryMetrics {
                success_rate,
                drill_count: fields.int_or("drill_count", 0),
                success_count: fields.int_or("success_count", 0),
                rto_minutes,
                rpo_minutes,
            },
            summary: RecoverySummary {
                success_rate,
                rto_minutes,
                rpo_minutes,
            },
            status: EvidenceStatus::from_check(success_rate >= MIN_RECOVERY_SUCCESS_RATE),
        }
    }
}
