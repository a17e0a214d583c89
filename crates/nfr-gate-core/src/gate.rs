//! Gate evaluator: checks canonical evidence against the release thresholds.
//!
//! The evaluator applies a fixed, non-configurable rule battery:
//! 1. Every rule runs; a failing rule never stops the ones after it
//! 2. A required field that cannot be found is itself a violation
//! 3. The regression figure is the only field allowed to be absent
//!
//! Documents are read as untrusted JSON. Fields are re-resolved here rather
//! than trusting the normalizer's defaults, so a missing count is reported
//! as missing instead of passing as zero.

use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use crate::io::{load_report, ReportError};
use crate::resolve::{resolve_numeric, try_float, try_int, CandidatePath};
use crate::thresholds::{
    MAX_REGRESSION_PCT, MAX_SECURITY_FINDINGS, MIN_CONSECUTIVE_PASSES, MIN_RECOVERY_SUCCESS_RATE,
};
use crate::types::EvidenceKind;

const CRITICAL_PATHS: &[CandidatePath] =
    &[&["critical"], &["summary", "critical"], &["vulnerabilities", "critical"]];
const HIGH_PATHS: &[CandidatePath] =
    &[&["high"], &["summary", "high"], &["vulnerabilities", "high"]];

/// Numeric predicate applied to one field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Check {
    IntEquals(i64),
    IntAtLeast(i64),
    FloatAtLeast(f64),
    FloatAtMost(f64),
}

impl Check {
    /// Evaluate against a numeric JSON value. Returns the observed value on
    /// failure.
    fn evaluate(&self, value: &Value) -> Result<(), Observed> {
        match *self {
            Check::IntEquals(expected) => {
                let observed = try_int(Some(value)).unwrap_or_default();
                (observed == expected).then_some(()).ok_or(Observed::Int(observed))
            }
            Check::IntAtLeast(min) => {
                let observed = try_int(Some(value)).unwrap_or_default();
                (observed >= min).then_some(()).ok_or(Observed::Int(observed))
            }
            Check::FloatAtLeast(min) => {
                let observed = try_float(Some(value)).unwrap_or_default();
                (observed >= min).then_some(()).ok_or(Observed::Float(observed))
            }
            Check::FloatAtMost(max) => {
                let observed = try_float(Some(value)).unwrap_or_default();
                (observed <= max).then_some(()).ok_or(Observed::Float(observed))
            }
        }
    }

    /// How a failure is explained next to the observed value.
    pub fn describe_failure(&self) -> String {
        match self {
            Check::IntEquals(expected) => format!("must be {}", expected),
            Check::IntAtLeast(min) => format!("<{}", min),
            Check::FloatAtLeast(min) => format!("<{}", min),
            Check::FloatAtMost(max) => format!(">{}", max),
        }
    }
}

/// What to do when the field is not present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Absence is a violation described by the label.
    Required { label: &'static str },
    /// Absence is not a violation.
    Optional,
}

/// One gate rule.
#[derive(Debug, Clone, Copy)]
pub struct GateRule {
    pub document: EvidenceKind,
    pub field: &'static str,
    pub paths: &'static [CandidatePath],
    pub check: Check,
    pub presence: Presence,
}

/// The release gate battery, in evaluation order.
pub const RULES: &[GateRule] = &[
    GateRule {
        document: EvidenceKind::SecuritySast,
        field: "critical",
        paths: CRITICAL_PATHS,
        check: Check::IntEquals(MAX_SECURITY_FINDINGS),
        presence: Presence::Required {
            label: "critical count field",
        },
    },
    GateRule {
        document: EvidenceKind::SecuritySast,
        field: "high",
        paths: HIGH_PATHS,
        check: Check::IntEquals(MAX_SECURITY_FINDINGS),
        presence: Presence::Required {
            label: "high count field",
        },
    },
    GateRule {
        document: EvidenceKind::SecurityDeps,
        field: "critical",
        paths: CRITICAL_PATHS,
        check: Check::IntEquals(MAX_SECURITY_FINDINGS),
        presence: Presence::Required {
            label: "critical count field",
        },
    },
    GateRule {
        document: EvidenceKind::SecurityDeps,
        field: "high",
        paths: HIGH_PATHS,
        check: Check::IntEquals(MAX_SECURITY_FINDINGS),
        presence: Presence::Required {
            label: "high count field",
        },
    },
    GateRule {
        document: EvidenceKind::BurnIn,
        field: "consecutive_passes",
        paths: &[
            &["consecutive_passes"],
            &["summary", "consecutive_passes"],
            &["metrics", "consecutive_passes"],
        ],
        check: Check::IntAtLeast(MIN_CONSECUTIVE_PASSES),
        presence: Presence::Required {
            label: "consecutive_passes",
        },
    },
    GateRule {
        document: EvidenceKind::Recovery,
        field: "success_rate",
        paths: &[
            &["success_rate"],
            &["summary", "success_rate"],
            &["recovery", "success_rate"],
        ],
        check: Check::FloatAtLeast(MIN_RECOVERY_SUCCESS_RATE),
        presence: Presence::Required {
            label: "success_rate",
        },
    },
    GateRule {
        document: EvidenceKind::PerfBaseline,
        field: "regression_pct",
        paths: &[
            &["regression_pct"],
            &["summary", "regression_pct"],
            &["comparison", "regression_pct"],
        ],
        check: Check::FloatAtMost(MAX_REGRESSION_PCT),
        presence: Presence::Optional,
    },
];

/// Observed value of a failing field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Observed {
    Int(i64),
    Float(f64),
}

impl fmt::Display for Observed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Observed::Int(value) => write!(f, "{}", value),
            // Debug keeps the fractional part on whole numbers: `12.0`, not `12`.
            Observed::Float(value) => write!(f, "{:?}", value),
        }
    }
}

/// Why a rule failed.
#[derive(Debug, Clone, PartialEq)]
pub enum ViolationKind {
    Missing { label: &'static str },
    Threshold { observed: Observed, rule: String },
}

/// One failed gate rule.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    pub document: EvidenceKind,
    pub field: &'static str,
    pub kind: ViolationKind,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ViolationKind::Missing { label } => write!(f, "{}: missing {}", self.document, label),
            ViolationKind::Threshold { observed, rule } => {
                write!(f, "{}: {}={} ({})", self.document, self.field, observed, rule)
            }
        }
    }
}

/// The canonical documents handed to the gate, keyed by kind.
#[derive(Debug, Clone, Default)]
pub struct EvidenceSet {
    documents: HashMap<EvidenceKind, Value>,
}

impl EvidenceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every gated artifact from a directory. A missing artifact loads
    /// as an empty document, so its required fields report as missing.
    pub fn load(artifact_dir: impl AsRef<Path>) -> Result<Self, ReportError> {
        let artifact_dir = artifact_dir.as_ref();
        let mut set = Self::new();
        for kind in EvidenceKind::ALL.into_iter().filter(EvidenceKind::is_gated) {
            set.insert(kind, load_report(artifact_dir.join(kind.artifact_name()))?);
        }
        Ok(set)
    }

    pub fn insert(&mut self, kind: EvidenceKind, document: Value) {
        self.documents.insert(kind, document);
    }

    /// Builder-style insert.
    pub fn with(mut self, kind: EvidenceKind, document: Value) -> Self {
        self.insert(kind, document);
        self
    }

    pub fn get(&self, kind: EvidenceKind) -> Option<&Value> {
        self.documents.get(&kind)
    }
}

/// Outcome of a gate evaluation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GateReport {
    pub violations: Vec<Violation>,
}

impl GateReport {
    /// The gate passes iff nothing was violated.
    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }

    /// Violations as human-readable lines, in evaluation order.
    pub fn messages(&self) -> Vec<String> {
        self.violations.iter().map(ToString::to_string).collect()
    }

    /// Machine-readable form.
    pub fn summary(&self) -> GateSummary {
        GateSummary {
            passed: self.passed(),
            violations: self.messages(),
        }
    }
}

impl fmt::Display for GateReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.passed() {
            return writeln!(f, "NFR numeric gates passed.");
        }
        writeln!(f, "NFR numeric gates failed:")?;
        for violation in &self.violations {
            writeln!(f, "- {}", violation)?;
        }
        Ok(())
    }
}

/// Serializable gate verdict.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GateSummary {
    pub passed: bool,
    pub violations: Vec<String>,
}

/// Evaluates canonical evidence against [`RULES`].
pub struct GateEvaluator {
    rules: &'static [GateRule],
}

impl GateEvaluator {
    pub fn new() -> Self {
        Self { rules: RULES }
    }

    /// Evaluate every rule and collect all violations.
    pub fn evaluate(&self, evidence: &EvidenceSet) -> GateReport {
        let violations: Vec<Violation> = self
            .rules
            .iter()
            .filter_map(|rule| self.evaluate_rule(rule, evidence))
            .collect();

        tracing::info!(
            rules = self.rules.len(),
            violations = violations.len(),
            "gate evaluation complete"
        );

        GateReport { violations }
    }

    /// Evaluate a single rule. `None` means the rule holds.
    pub fn evaluate_rule(&self, rule: &GateRule, evidence: &EvidenceSet) -> Option<Violation> {
        let found = evidence
            .get(rule.document)
            .and_then(|document| resolve_numeric(document, rule.paths));

        let kind = match (found, rule.presence) {
            (None, Presence::Required { label }) => ViolationKind::Missing { label },
            (None, Presence::Optional) => return None,
            (Some(value), _) => match rule.check.evaluate(value) {
                Ok(()) => return None,
                Err(observed) => ViolationKind::Threshold {
                    observed,
                    rule: rule.check.describe_failure(),
                },
            },
        };

        let violation = Violation {
            document: rule.document,
            field: rule.field,
            kind,
        };
        tracing::debug!(%violation, "gate rule failed");
        Some(violation)
    }
}

impl Default for GateEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

/// Load the gated artifacts from `artifact_dir` and evaluate them.
pub fn check_artifacts(artifact_dir: impl AsRef<Path>) -> Result<GateReport, ReportError> {
    let evidence = EvidenceSet::load(artifact_dir)?;
    Ok(GateEvaluator::new().evaluate(&evidence))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::{
        BurnInNormalizer, EvidenceNormalizer, PerfBaselineNormalizer, RecoveryNormalizer,
        SecurityNormalizer,
    };
    use serde_json::json;

    const STAMP: &str = "2026-01-01T00:00:00+00:00";

    fn canonical<N: EvidenceNormalizer>(handler: N, raw: Value) -> Value {
        serde_json::to_value(handler.normalize_at(&raw, STAMP)).unwrap()
    }

    fn passing_set() -> EvidenceSet {
        EvidenceSet::new()
            .with(EvidenceKind::SecuritySast, canonical(SecurityNormalizer::sast(), json!({})))
            .with(EvidenceKind::SecurityDeps, canonical(SecurityNormalizer::deps(), json!({})))
            .with(
                EvidenceKind::BurnIn,
                canonical(BurnInNormalizer::new(), json!({ "consecutive_passes": 100 })),
            )
            .with(
                EvidenceKind::Recovery,
                canonical(RecoveryNormalizer::new(), json!({ "success_rate": 1.0 })),
            )
            .with(EvidenceKind::PerfBaseline, canonical(PerfBaselineNormalizer::new(), json!({})))
    }

    #[test]
    fn test_clean_evidence_passes() {
        let report = GateEvaluator::new().evaluate(&passing_set());
        assert!(report.passed());
        assert_eq!(report.to_string(), "NFR numeric gates passed.\n");
    }

    #[test]
    fn test_burnin_scenario_passes_gate() {
        let burnin = canonical(
            BurnInNormalizer::new(),
            json!({ "summary": { "consecutive_passes": 100, "total_runs": 100 } }),
        );
        let evidence = passing_set().with(EvidenceKind::BurnIn, burnin);
        assert!(GateEvaluator::new().evaluate(&evidence).passed());
    }

    #[test]
    fn test_recovery_scenario_reports_rate() {
        let recovery = canonical(RecoveryNormalizer::new(), json!({ "success_rate": 0.95 }));
        let evidence = passing_set().with(EvidenceKind::Recovery, recovery);

        let report = GateEvaluator::new().evaluate(&evidence);
        assert_eq!(
            report.messages(),
            vec!["recovery-rto-rpo.json: success_rate=0.95 (<0.99)"]
        );
    }

    #[test]
    fn test_absent_regression_is_not_a_violation() {
        let evidence = passing_set().with(EvidenceKind::PerfBaseline, json!({}));
        assert!(GateEvaluator::new().evaluate(&evidence).passed());
    }

    #[test]
    fn test_regression_over_budget() {
        let evidence =
            passing_set().with(EvidenceKind::PerfBaseline, json!({ "regression_pct": 12 }));
        let report = GateEvaluator::new().evaluate(&evidence);
        assert_eq!(report.messages(), vec!["perf-baseline.json: regression_pct=12.0 (>10)"]);
    }

    #[test]
    fn test_missing_documents_report_missing_fields() {
        let report = GateEvaluator::new().evaluate(&EvidenceSet::new());
        assert_eq!(
            report.messages(),
            vec![
                "security-sast-report.json: missing critical count field",
                "security-sast-report.json: missing high count field",
                "security-deps-report.json: missing critical count field",
                "security-deps-report.json: missing high count field",
                "reliability-burnin-summary.json: missing consecutive_passes",
                "recovery-rto-rpo.json: missing success_rate",
            ]
        );
    }

    #[test]
    fn test_string_values_count_as_missing() {
        let evidence =
            passing_set().with(EvidenceKind::BurnIn, json!({ "consecutive_passes": "150" }));
        let report = GateEvaluator::new().evaluate(&evidence);
        assert_eq!(
            report.messages(),
            vec!["reliability-burnin-summary.json: missing consecutive_passes"]
        );
    }

    #[test]
    fn test_float_counts_truncate() {
        let evidence = passing_set().with(
            EvidenceKind::SecurityDeps,
            json!({ "critical": 0.7, "high": 2.9 }),
        );
        let report = GateEvaluator::new().evaluate(&evidence);
        assert_eq!(
            report.messages(),
            vec!["security-deps-report.json: high=2 (must be 0)"]
        );
    }

    #[test]
    fn test_one_violation_per_document_in_order() {
        let evidence = EvidenceSet::new()
            .with(EvidenceKind::SecuritySast, json!({ "summary": { "critical": 1, "high": 0 } }))
            .with(EvidenceKind::SecurityDeps, json!({ "summary": { "critical": 0, "high": 3 } }))
            .with(EvidenceKind::BurnIn, json!({ "summary": { "consecutive_passes": 40 } }))
            .with(EvidenceKind::Recovery, json!({ "recovery": { "success_rate": 0.5 } }))
            .with(EvidenceKind::PerfBaseline, json!({ "comparison": { "regression_pct": 25.5 } }));

        let report = GateEvaluator::new().evaluate(&evidence);

        assert!(!report.passed());
        assert_eq!(
            report.messages(),
            vec![
                "security-sast-report.json: critical=1 (must be 0)",
                "security-deps-report.json: high=3 (must be 0)",
                "reliability-burnin-summary.json: consecutive_passes=40 (<100)",
                "recovery-rto-rpo.json: success_rate=0.5 (<0.99)",
                "perf-baseline.json: regression_pct=25.5 (>10)",
            ]
        );
        assert_eq!(
            report.to_string(),
            "NFR numeric gates failed:\n\
             - security-sast-report.json: critical=1 (must be 0)\n\
             - security-deps-report.json: high=3 (must be 0)\n\
             - reliability-burnin-summary.json: consecutive_passes=40 (<100)\n\
             - recovery-rto-rpo.json: success_rate=0.5 (<0.99)\n\
             - perf-baseline.json: regression_pct=25.5 (>10)\n"
        );
    }

    #[test]
    fn test_summary_serializes() {
        let report = GateEvaluator::new().evaluate(&passing_set().with(
            EvidenceKind::Recovery,
            json!({ "success_rate": 0.9 }),
        ));
        let value = serde_json::to_value(report.summary()).unwrap();
        assert_eq!(
            value,
            json!({
                "passed": false,
                "violations": ["recovery-rto-rpo.json: success_rate=0.9 (<0.99)"]
            })
        );
    }

    #[test]
    fn test_boolean_counts_as_numeric() {
        let evidence = passing_set().with(
            EvidenceKind::SecuritySast,
            json!({ "critical": false, "high": true }),
        );
        let report = GateEvaluator::new().evaluate(&evidence);
        assert_eq!(report.messages(), vec!["security-sast-report.json: high=1 (must be 0)"]);
    }
}
