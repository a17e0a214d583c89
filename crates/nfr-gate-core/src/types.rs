//! Shared vocabulary for evidence documents.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// The kinds of canonical evidence the pipeline produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceKind {
    SecuritySast,
    SecurityDeps,
    PerfBaseline,
    LoadTest,
    BurnIn,
    Recovery,
}

impl EvidenceKind {
    /// Every kind, in artifact-writing order.
    pub const ALL: [EvidenceKind; 6] = [
        EvidenceKind::SecuritySast,
        EvidenceKind::SecurityDeps,
        EvidenceKind::PerfBaseline,
        EvidenceKind::LoadTest,
        EvidenceKind::BurnIn,
        EvidenceKind::Recovery,
    ];

    /// Fixed filename of the persisted canonical artifact.
    pub fn artifact_name(&self) -> &'static str {
        match self {
            EvidenceKind::SecuritySast => "security-sast-report.json",
            EvidenceKind::SecurityDeps => "security-deps-report.json",
            EvidenceKind::PerfBaseline => "perf-baseline.json",
            EvidenceKind::LoadTest => "perf-k6-summary.json",
            EvidenceKind::BurnIn => "reliability-burnin-summary.json",
            EvidenceKind::Recovery => "recovery-rto-rpo.json",
        }
    }

    /// Whether the release gate evaluates this kind. Load-test summaries are
    /// informational only.
    pub fn is_gated(&self) -> bool {
        !matches!(self, EvidenceKind::LoadTest)
    }
}

impl fmt::Display for EvidenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.artifact_name())
    }
}

/// Status embedded in every canonical document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EvidenceStatus {
    Pass,
    Concerns,
}

impl EvidenceStatus {
    /// `Pass` when the check holds, `Concerns` otherwise.
    pub fn from_check(passed: bool) -> Self {
        if passed {
            EvidenceStatus::Pass
        } else {
            EvidenceStatus::Concerns
        }
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, EvidenceStatus::Pass)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EvidenceStatus::Pass => "PASS",
            EvidenceStatus::Concerns => "CONCERNS",
        }
    }
}

impl fmt::Display for EvidenceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity buckets used by security scanners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    Info,
}

impl Severity {
    /// Bucket a scanner severity label. Matching is case-insensitive on the
    /// trimmed label; anything unrecognized lands in `Info`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "critical" | "crit" | "5" => Severity::Critical,
            "high" | "4" => Severity::High,
            "medium" | "med" | "moderate" | "3" => Severity::Medium,
            "low" | "2" => Severity::Low,
            _ => Severity::Info,
        }
    }

    /// Bucket a raw JSON severity. Numbers use their textual form, so `4`
    /// is high while `4.0` is not.
    pub fn from_value(value: Option<&Value>) -> Self {
        match value {
            Some(Value::String(label)) => Self::from_label(label),
            Some(Value::Number(number)) => Self::from_label(&number.to_string()),
            _ => Severity::Info,
        }
    }
}

/// Per-severity finding counts, serialized as
/// `{critical, high, medium, low, info}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    pub critical: i64,
    pub high: i64,
    pub medium: i64,
    pub low: i64,
    pub info: i64,
}

impl SeverityCounts {
    /// Count one finding.
    pub fn record(&mut self, severity: Severity) {
        let slot = match severity {
            Severity::Critical => &mut self.critical,
            Severity::High => &mut self.high,
            Severity::Medium => &mut self.medium,
            Severity::Low => &mut self.low,
            Severity::Info => &mut self.info,
        };
        *slot += 1;
    }

    pub fn total(&self) -> i64 {
        self.critical + self.high + self.medium + self.low + self.info
    }
}
