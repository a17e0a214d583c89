//! Security scan evidence (SAST and dependency audits).
//!
//! Counts are read from summary-style fields first. When a report carries no
//! counts at all but does carry scanner-native findings (bandit `results` or
//! pip-audit `dependencies`), the findings are bucketed and counted instead.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{EvidenceNormalizer, FieldSpec, ResolvedFields};
use crate::thresholds::MAX_SECURITY_FINDINGS;
use crate::types::{EvidenceKind, EvidenceStatus, Severity, SeverityCounts};

const FIELDS: &[FieldSpec] = &[
    FieldSpec::int(
        "critical",
        &[&["critical"], &["summary", "critical"], &["vulnerabilities", "critical"]],
    ),
    FieldSpec::int(
        "high",
        &[&["high"], &["summary", "high"], &["vulnerabilities", "high"]],
    ),
    FieldSpec::int(
        "medium",
        &[&["medium"], &["summary", "medium"], &["vulnerabilities", "medium"]],
    ),
    FieldSpec::int(
        "low",
        &[&["low"], &["summary", "low"], &["vulnerabilities", "low"]],
    ),
    FieldSpec::int("info", &[&["info"], &["summary", "info"]]),
];

/// Canonical security scan document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityReport {
    pub tool: String,
    pub generated_at: String,
    pub summary: SeverityCounts,
    pub vulnerabilities: VulnerabilityBreakdown,
    pub status: EvidenceStatus,
}

/// Vulnerability counts mirrored from the summary. `items` is always empty;
/// individual findings are not carried into canonical evidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VulnerabilityBreakdown {
    pub critical: i64,
    pub high: i64,
    pub medium: i64,
    pub low: i64,
    pub items: Vec<Value>,
}

/// Normalizer for security scan reports.
pub struct SecurityNormalizer {
    kind: EvidenceKind,
    tool: String,
}

impl SecurityNormalizer {
    /// Handler for static-analysis reports.
    pub fn sast() -> Self {
        Self::new(EvidenceKind::SecuritySast, "normalized-sast")
    }

    /// Handler for dependency-audit reports.
    pub fn deps() -> Self {
        Self::new(EvidenceKind::SecurityDeps, "normalized-deps")
    }

    pub fn new(kind: EvidenceKind, tool: impl Into<String>) -> Self {
        Self {
            kind,
            tool: tool.into(),
        }
    }

    fn build(&self, summary: SeverityCounts, generated_at: &str) -> SecurityReport {
        let status = EvidenceStatus::from_check(
            summary.critical == MAX_SECURITY_FINDINGS && summary.high == MAX_SECURITY_FINDINGS,
        );

        SecurityReport {
            tool: self.tool.clone(),
            generated_at: generated_at.to_string(),
            summary,
            vulnerabilities: VulnerabilityBreakdown {
                critical: summary.critical,
                high: summary.high,
                medium: summary.medium,
                low: summary.low,
                items: Vec::new(),
            },
            status,
        }
    }
}

/// Count scanner-native findings: bandit-style `results[].issue_severity`
/// and pip-audit-style `dependencies[].vulns[].severity`.
///
/// Returns `None` when the document carries neither list.
pub fn tally_findings(raw: &Value) -> Option<SeverityCounts> {
    let results = raw.get("results").and_then(Value::as_array);
    let dependencies = raw.get("dependencies").and_then(Value::as_array);
    if results.is_none() && dependencies.is_none() {
        return None;
    }

    let mut counts = SeverityCounts::default();
    for finding in results.into_iter().flatten() {
        counts.record(Severity::from_value(finding.get("issue_severity")));
    }

    let vulns = dependencies
        .into_iter()
        .flatten()
        .filter_map(|dependency| dependency.get("vulns").and_then(Value::as_array))
        .flatten();
    for vuln in vulns {
        counts.record(Severity::from_value(dependency_severity(vuln)));
    }

    Some(counts)
}

// pip-audit leaves `severity` empty for some advisories and reports the
// CVSS rating separately.
fn dependency_severity(vuln: &Value) -> Option<&Value> {
    vuln.get("severity")
        .filter(|value| is_truthy(value))
        .or_else(|| vuln.get("cvss_severity"))
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

impl EvidenceNormalizer for SecurityNormalizer {
    type Document = SecurityReport;

    fn kind(&self) -> EvidenceKind {
        self.kind
    }

    fn fields(&self) -> &'static [FieldSpec] {
        FIELDS
    }

    fn assemble(&self, fields: &ResolvedFields, generated_at: &str) -> SecurityReport {
        let summary = SeverityCounts {
            critical: fields.int_or("critical", 0),
            high: fields.int_or("high", 0),
            medium: fields.int_or("medium", 0),
            low: fields.int_or("low", 0),
            info: fields.int_or("info", 0),
        };
        self.build(summary, generated_at)
    }

    fn normalize_at(&self, raw: &Value, generated_at: &str) -> SecurityReport {
        let fields = ResolvedFields::extract(raw, FIELDS);
        if fields.is_empty() {
            if let Some(counts) = tally_findings(raw) {
                tracing::debug!(
                    tool = %self.tool,
                    findings = counts.total(),
                    "counted scanner findings"
                );
                return self.build(counts, generated_at);
            }
            tracing::warn!(tool = %self.tool, "no severity counts found, recording a clean scan");
        }
        self.assemble(&fields, generated_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const STAMP: &str = "2026-01-01T00:00:00+00:00";

    #[test]
    fn test_summary_counts_from_collected_raw() {
        let raw = json!({
            "tool": "bandit",
            "summary": { "critical": 0, "high": 1, "medium": 0, "low": 1, "info": 0 }
        });
        let report = SecurityNormalizer::sast().normalize_at(&raw, STAMP);

        assert_eq!(report.tool, "normalized-sast");
        assert_eq!(report.summary.high, 1);
        assert_eq!(report.summary.low, 1);
        assert_eq!(report.vulnerabilities.high, 1);
        assert_eq!(report.status, EvidenceStatus::Concerns);
    }

    #[test]
    fn test_top_level_beats_summary() {
        let raw = json!({ "critical": 0, "summary": { "critical": 5 } });
        let report = SecurityNormalizer::deps().normalize_at(&raw, STAMP);
        assert_eq!(report.summary.critical, 0);
        assert_eq!(report.status, EvidenceStatus::Pass);
    }

    #[test]
    fn test_info_has_no_vulnerabilities_fallback() {
        let raw = json!({ "vulnerabilities": { "info": 3, "medium": 2 } });
        let report = SecurityNormalizer::sast().normalize_at(&raw, STAMP);
        assert_eq!(report.summary.info, 0);
        assert_eq!(report.summary.medium, 2);
    }

    #[test]
    fn test_bandit_results_are_bucketed() {
        let raw = json!({ "results": [{ "issue_severity": "HIGH" }, { "issue_severity": "low" }] });
        let report = SecurityNormalizer::sast().normalize_at(&raw, STAMP);
        assert_eq!(
            report.summary,
            SeverityCounts { critical: 0, high: 1, medium: 0, low: 1, info: 0 }
        );
        assert_eq!(report.status, EvidenceStatus::Concerns);
    }

    #[test]
    fn test_pip_audit_vulns_are_bucketed() {
        let raw = json!({
            "dependencies": [
                {
                    "name": "a",
                    "vulns": [
                        { "severity": "moderate" },
                        { "severity": "", "cvss_severity": "CRITICAL" }
                    ]
                },
                { "name": "b", "vulns": [] },
                { "name": "c" }
            ]
        });
        let counts = tally_findings(&raw).unwrap();
        assert_eq!(counts.medium, 1);
        assert_eq!(counts.critical, 1);
        assert_eq!(counts.total(), 2);
    }

    #[test]
    fn test_summary_counts_take_precedence_over_findings() {
        let raw = json!({ "high": 0, "results": [{ "issue_severity": "HIGH" }] });
        let report = SecurityNormalizer::sast().normalize_at(&raw, STAMP);
        assert_eq!(report.summary.high, 0);
        assert_eq!(report.status, EvidenceStatus::Pass);
    }

    #[test]
    fn test_unreadable_findings_count_as_info() {
        let raw = json!({ "results": [{ "issue_severity": null }, "garbage", { "other": 1 }] });
        let counts = tally_findings(&raw).unwrap();
        assert_eq!(counts.info, 3);
    }

    #[test]
    fn test_empty_raw_is_clean() {
        let report = SecurityNormalizer::sast().normalize_at(&json!({}), STAMP);
        assert_eq!(report.summary, SeverityCounts::default());
        assert_eq!(report.status, EvidenceStatus::Pass);
    }

    #[test]
    fn test_canonical_shape() {
        let report = SecurityNormalizer::deps().normalize_at(&json!({ "critical": 2 }), STAMP);
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(
            value,
            json!({
                "tool": "normalized-deps",
                "generated_at": STAMP,
                "summary": { "critical": 2, "high": 0, "medium": 0, "low": 0, "info": 0 },
                "vulnerabilities": { "critical": 2, "high": 0, "medium": 0, "low": 0, "items": [] },
                "status": "CONCERNS"
            })
        );
    }

    #[test]
    fn test_renormalizing_canonical_is_identity() {
        let raw = json!({
            "summary": { "critical": 1, "high": 2, "medium": 3, "low": 4, "info": 5 }
        });
        let handler = SecurityNormalizer::sast();
        let first = handler.normalize_at(&raw, STAMP);
        let second = handler.normalize_at(&serde_json::to_value(&first).unwrap(), STAMP);
        assert_eq!(first, second);
    }
}
