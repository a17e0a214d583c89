//! Performance baseline evidence.

use serde::{Deserialize, Serialize};

use super::{EvidenceNormalizer, FieldSpec, ResolvedFields};
use crate::thresholds::{
    MAX_API_COMMAND_LATENCY_P95_MS, MAX_API_COMMAND_LATENCY_P99_MS,
    MAX_HIGHLIGHT_SYNC_LATENCY_MS, MAX_QUEUE_ADVANCE_LATENCY_MS, MAX_REGRESSION_PCT,
};
use crate::types::{EvidenceKind, EvidenceStatus};

const BASELINE_ID: &str = "normalized-baseline";

const FIELDS: &[FieldSpec] = &[
    FieldSpec::int(
        "api_command_latency_p95_ms",
        &[&["summary", "api_command_latency_p95_ms"], &["p95_ms"], &["p95"]],
    ),
    FieldSpec::int(
        "api_command_latency_p99_ms",
        &[&["summary", "api_command_latency_p99_ms"], &["p99_ms"], &["p99"]],
    ),
    FieldSpec::int(
        "queue_advance_latency_ms",
        &[&["summary", "queue_advance_latency_ms"], &["queue_advance_latency_ms"]],
    ),
    FieldSpec::int(
        "highlight_sync_latency_ms",
        &[&["summary", "highlight_sync_latency_ms"], &["highlight_sync_latency_ms"]],
    ),
    FieldSpec::float(
        "regression_pct",
        &[&["regression_pct"], &["summary", "regression_pct"], &["comparison", "regression_pct"]],
    ),
];

/// Canonical performance baseline document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerfBaseline {
    pub generated_at: String,
    pub summary: PerfSummary,
    pub thresholds: PerfThresholds,
    pub comparison: PerfComparison,
    pub status: EvidenceStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerfSummary {
    pub api_command_latency_p95_ms: i64,
    pub api_command_latency_p99_ms: i64,
    pub queue_advance_latency_ms: i64,
    pub highlight_sync_latency_ms: i64,
    pub regression_pct: f64,
}

/// Latency budgets recorded alongside the measurements. Only the regression
/// budget feeds the status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerfThresholds {
    pub api_command_latency_p95_ms_max: i64,
    pub api_command_latency_p99_ms_max: i64,
    pub queue_advance_latency_ms_max: i64,
    pub highlight_sync_latency_ms_max: i64,
    pub regression_pct_max: f64,
}

impl Default for PerfThresholds {
    fn default() -> Self {
        Self {
            api_command_latency_p95_ms_max: MAX_API_COMMAND_LATENCY_P95_MS,
            api_command_latency_p99_ms_max: MAX_API_COMMAND_LATENCY_P99_MS,
            queue_advance_latency_ms_max: MAX_QUEUE_ADVANCE_LATENCY_MS,
            highlight_sync_latency_ms_max: MAX_HIGHLIGHT_SYNC_LATENCY_MS,
            regression_pct_max: MAX_REGRESSION_PCT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerfComparison {
    pub baseline_id: String,
    pub regression_pct: f64,
}

/// Normalizer for performance baselines.
pub struct PerfBaselineNormalizer;

impl PerfBaselineNormalizer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PerfBaselineNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl EvidenceNormalizer for PerfBaselineNormalizer {
    type Document = PerfBaseline;

    fn kind(&self) -> EvidenceKind {
        EvidenceKind::PerfBaseline
    }

    fn fields(&self) -> &'static [FieldSpec] {
        FIELDS
    }

    fn assemble(&self, fields: &ResolvedFields, generated_at: &str) -> PerfBaseline {
        // A missing regression figure reads as "no regression".
        let regression_pct = fields.float_or("regression_pct", 0.0);

        PerfBaseline {
            generated_at: generated_at.to_string(),
            summary: PerfSummary {
                api_command_latency_p95_ms: fields.int_or("api_command_latency_p95_ms", 0),
                api_command_latency_p99_ms: fields.int_or("api_command_latency_p99_ms", 0),
                queue_advance_latency_ms: fields.int_or("queue_advance_latency_ms", 0),
                highlight_sync_latency_ms: fields.int_or("highlight_sync_latency_ms", 0),
                regression_pct,
            },
            thresholds: PerfThresholds::default(),
            comparison: PerfComparison {
                baseline_id: BASELINE_ID.to_string(),
                regression_pct,
            },
            status: EvidenceStatus::from_check(regression_pct <= MAX_REGRESSION_PCT),
        }
    }
}
