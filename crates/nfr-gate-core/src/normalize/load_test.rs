//! Load-test (k6) summary evidence.
//!
//! k6 reports trend metrics as `metrics.<name>.values.<stat>`; flatter aliases
//! cover hand-written and previously normalized summaries.

use serde::{Deserialize, Serialize};

use super::{EvidenceNormalizer, FieldSpec, ResolvedFields};
use crate::thresholds::MAX_ERROR_RATE;
use crate::types::{EvidenceKind, EvidenceStatus};

const TOOL: &str = "k6";
const SCENARIO: &str = "normalized-k6-input";

const FIELDS: &[FieldSpec] = &[
    FieldSpec::int(
        "http_req_duration_p95_ms",
        &[
            &["metrics", "http_req_duration", "values", "p(95)"],
            &["metrics", "http_req_duration_p95_ms"],
            &["http_req_duration_p95_ms"],
        ],
    ),
    FieldSpec::int(
        "http_req_duration_p99_ms",
        &[
            &["metrics", "http_req_duration", "values", "p(99)"],
            &["metrics", "http_req_duration_p99_ms"],
            &["http_req_duration_p99_ms"],
        ],
    ),
    FieldSpec::float(
        "throughput_rps",
        &[
            &["metrics", "http_reqs", "values", "rate"],
            &["metrics", "throughput_rps"],
            &["throughput_rps"],
        ],
    ),
    FieldSpec::float(
        "error_rate",
        &[
            &["metrics", "http_req_failed", "values", "rate"],
            &["metrics", "error_rate"],
            &["error_rate"],
        ],
    ),
];

/// Canonical load-test summary. Informational: not gated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadTestSummary {
    pub tool: String,
    pub generated_at: String,
    pub scenario: String,
    pub metrics: LoadTestMetrics,
    pub status: EvidenceStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadTestMetrics {
    pub http_req_duration_p95_ms: i64,
    pub http_req_duration_p99_ms: i64,
    pub throughput_rps: f64,
    pub error_rate: f64,
}

/// Normalizer for k6-style load-test summaries.
pub struct LoadTestNormalizer;

impl LoadTestNormalizer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LoadTestNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl EvidenceNormalizer for LoadTestNormalizer {
    type Document = LoadTestSummary;

    fn kind(&self) -> EvidenceKind {
        EvidenceKind::LoadTest
    }

    fn fields(&self) -> &'static [FieldSpec] {
        FIELDS
    }

    fn assemble(&self, fields: &ResolvedFields, generated_at: &str) -> LoadTestSummary {
        let error_rate = fields.float_or("error_rate", 0.0);

        LoadTestSummary {
            tool: TOOL.to_string(),
            generated_at: generated_at.to_string(),
            scenario: SCENARIO.to_string(),
            metrics: LoadTestMetrics {
                http_req_duration_p95_ms: fields.int_or("http_req_duration_p95_ms", 0),
                http_req_duration_p99_ms: fields.int_or("http_req_duration_p99_ms", 0),
                throughput_rps: fields.float_or("throughput_rps", 0.0),
                error_rate,
            },
            status: EvidenceStatus::from_check(error_rate <= MAX_ERROR_RATE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const STAMP: &str = "2026-01-01T00:00:00+00:00";

    fn k6_native() -> serde_json::Value {
        json!({
            "metrics": {
                "http_req_duration": { "values": { "avg": 80.1, "p(95)": 187.92, "p(99)": 301.5 } },
                "http_reqs": { "values": { "count": 6000, "rate": 99.87 } },
                "http_req_failed": { "values": { "rate": 0.002 } }
            }
        })
    }

    #[test]
    fn test_native_k6_summary() {
        let summary = LoadTestNormalizer::new().normalize_at(&k6_native(), STAMP);

        assert_eq!(summary.tool, "k6");
        assert_eq!(summary.scenario, "normalized-k6-input");
        assert_eq!(summary.metrics.http_req_duration_p95_ms, 187);
        assert_eq!(summary.metrics.http_req_duration_p99_ms, 301);
        assert_eq!(summary.metrics.throughput_rps, 99.87);
        assert_eq!(summary.metrics.error_rate, 0.002);
        assert_eq!(summary.status, EvidenceStatus::Pass);
    }

    #[test]
    fn test_flat_aliases() {
        let raw = json!({ "http_req_duration_p95_ms": 200, "error_rate": 0.05 });
        let summary = LoadTestNormalizer::new().normalize_at(&raw, STAMP);
        assert_eq!(summary.metrics.http_req_duration_p95_ms, 200);
        assert_eq!(summary.status, EvidenceStatus::Concerns);
    }

    #[test]
    fn test_error_rate_boundary() {
        let raw = json!({ "metrics": { "error_rate": 0.01 } });
        let summary = LoadTestNormalizer::new().normalize_at(&raw, STAMP);
        assert_eq!(summary.status, EvidenceStatus::Pass);
    }

    #[test]
    fn test_renormalizing_canonical_is_identity() {
        let handler = LoadTestNormalizer::new();
        let first = handler.normalize_at(&k6_native(), STAMP);
        let second = handler.normalize_at(&serde_json::to_value(&first).unwrap(), STAMP);
        assert_eq!(first, second);
    }
}
