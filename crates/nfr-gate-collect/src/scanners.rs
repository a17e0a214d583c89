//! Scanner output tallies.
//!
//! Bandit and pip-audit report individual findings; the raw evidence only
//! keeps per-severity counts.

use nfr_gate_core::{tally_findings, SeverityCounts};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Tool name recorded for SAST raw evidence.
pub const SAST_TOOL: &str = "bandit";

/// Tool name recorded for dependency-audit raw evidence.
pub const DEPS_TOOL: &str = "pip-audit";

/// Raw security evidence: a tool name and its severity counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanSummary {
    pub tool: String,
    pub summary: SeverityCounts,
}

impl ScanSummary {
    pub fn new(tool: impl Into<String>, summary: SeverityCounts) -> Self {
        Self {
            tool: tool.into(),
            summary,
        }
    }
}

/// Count findings in a bandit or pip-audit report.
///
/// Documents with no finding lists (including empty or missing reports)
/// count as zero findings.
pub fn count_findings(report: &Value) -> SeverityCounts {
    tally_findings(report).unwrap_or_default()
}

/// Summarize a bandit JSON report.
pub fn summarize_bandit(report: &Value) -> ScanSummary {
    ScanSummary::new(SAST_TOOL, count_findings(report))
}

/// Summarize a pip-audit JSON report.
pub fn summarize_pip_audit(report: &Value) -> ScanSummary {
    ScanSummary::new(DEPS_TOOL, count_findings(report))
}
