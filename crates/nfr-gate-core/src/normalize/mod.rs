//! Normalization of raw tool reports into canonical evidence documents.
//!
//! Every evidence kind follows the same shape: resolve each canonical field
//! through its candidate paths, coerce it, fill defaults, derive the status.
//! A handler only declares its field table and how to assemble the result.
//!
//! ## Guarantees
//!
//! - Total: any raw document, including an empty or non-mapping one,
//!   produces a complete canonical document.
//! - A value that cannot be coerced is treated exactly like a missing one.
//! - Status is derived from the assembled numbers and nothing else.

mod burnin;
mod load_test;
mod perf;
mod recovery;
mod security;

pub use burnin::{BurnInCounts, BurnInMetrics, BurnInNormalizer, BurnInSummary};
pub use load_test::{LoadTestMetrics, LoadTestNormalizer, LoadTestSummary};
pub use perf::{PerfBaseline, PerfBaselineNormalizer, PerfComparison, PerfSummary, PerfThresholds};
pub use recovery::{RecoveryDrillSummary, RecoveryMetrics, RecoveryNormalizer, RecoverySummary};
pub use security::{tally_findings, SecurityNormalizer, SecurityReport, VulnerabilityBreakdown};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::resolve::{resolve, try_float, try_int, CandidatePath};
use crate::types::EvidenceKind;

/// Numeric type a canonical field is coerced to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Int,
    Float,
}

/// One canonical field: its name and where to look for it.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub paths: &'static [CandidatePath],
    pub field_type: FieldType,
}

impl FieldSpec {
    pub const fn int(name: &'static str, paths: &'static [CandidatePath]) -> Self {
        Self {
            name,
            paths,
            field_type: FieldType::Int,
        }
    }

    pub const fn float(name: &'static str, paths: &'static [CandidatePath]) -> Self {
        Self {
            name,
            paths,
            field_type: FieldType::Float,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Measured {
    Int(i64),
    Float(f64),
}

/// Fields that resolved to a usable number. Anything absent here was either
/// missing from the raw document or not coercible, and falls back to its
/// default during assembly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedFields {
    values: BTreeMap<&'static str, Measured>,
}

impl ResolvedFields {
    /// Resolve and coerce every field in the table against `raw`.
    pub fn extract(raw: &Value, table: &[FieldSpec]) -> Self {
        let mut values = BTreeMap::new();

        for spec in table {
            let found = resolve(raw, spec.paths);
            let measured = match spec.field_type {
                FieldType::Int => try_int(found).map(Measured::Int),
                FieldType::Float => try_float(found).map(Measured::Float),
            };

            match measured {
                Some(value) => {
                    values.insert(spec.name, value);
                }
                None if found.is_some() => {
                    tracing::debug!(field = spec.name, "unusable value, treating as absent");
                }
                None => {}
            }
        }

        Self { values }
    }

    /// Integer value, if the field was measured.
    pub fn int(&self, name: &str) -> Option<i64> {
        match self.values.get(name)? {
            Measured::Int(value) => Some(*value),
            Measured::Float(value) => Some(value.trunc() as i64),
        }
    }

    /// Float value, if the field was measured.
    pub fn float(&self, name: &str) -> Option<f64> {
        match self.values.get(name)? {
            Measured::Int(value) => Some(*value as f64),
            Measured::Float(value) => Some(*value),
        }
    }

    pub fn int_or(&self, name: &str, default: i64) -> i64 {
        self.int(name).unwrap_or(default)
    }

    pub fn float_or(&self, name: &str, default: f64) -> f64 {
        self.float(name).unwrap_or(default)
    }

    /// Whether the field resolved to a real value rather than a default.
    pub fn is_measured(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Trait implemented by every evidence-kind handler.
pub trait EvidenceNormalizer {
    /// The canonical document this handler produces.
    type Document: Serialize;

    /// Which evidence kind this handler covers.
    fn kind(&self) -> EvidenceKind;

    /// Candidate-path table for the canonical numeric fields.
    fn fields(&self) -> &'static [FieldSpec];

    /// Apply defaults, derive status and build the canonical document.
    fn assemble(&self, fields: &ResolvedFields, generated_at: &str) -> Self::Document;

    /// Normalize a raw document with an explicit generation stamp.
    fn normalize_at(&self, raw: &Value, generated_at: &str) -> Self::Document {
        let fields = ResolvedFields::extract(raw, self.fields());
        if fields.is_empty() {
            tracing::debug!(kind = ?self.kind(), "no recognizable fields, using defaults");
        }
        self.assemble(&fields, generated_at)
    }
}

/// Format a timestamp the way canonical documents record it: UTC, whole
/// seconds, explicit `+00:00` offset.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, false)
}

/// Entry point for normalization. Holds the generation stamp shared by every
/// document produced in one run.
#[derive(Debug, Clone)]
pub struct Normalizer {
    generated_at: String,
}

impl Normalizer {
    /// Stamp documents with the current time.
    pub fn new() -> Self {
        Self::at(Utc::now())
    }

    /// Stamp documents with a fixed time.
    pub fn at(when: DateTime<Utc>) -> Self {
        Self {
            generated_at: format_timestamp(when),
        }
    }

    pub fn generated_at(&self) -> &str {
        &self.generated_at
    }

    /// Normalize `raw` with the given handler.
    pub fn normalize<N: EvidenceNormalizer>(&self, handler: &N, raw: &Value) -> N::Document {
        handler.normalize_at(raw, &self.generated_at)
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}
