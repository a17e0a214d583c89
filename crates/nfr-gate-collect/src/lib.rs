//! # nfr-gate-collect
//!
//! Produces raw NFR evidence for `nfr-gate-core` to normalize.
//!
//! This crate measures things; it never judges them. The gate thresholds
//! live in the core crate and are applied after normalization.
//!
//! Producers:
//! - Scanner tallies for bandit and pip-audit reports
//! - A burn-in harness that runs a probe repeatedly
//! - Local backup/restore recovery drills
//!
//! ## Example
//!
//! ```rust,ignore
//! use nfr_gate_collect::{collect_all, CollectRequest, ProbeSpec};
//!
//! let artifacts = collect_all(&CollectRequest {
//!     raw_dir: "artifacts/raw".into(),
//!     bandit_json: "bandit.json".into(),
//!     deps_json: "pip-audit.json".into(),
//!     k6_json: "k6-summary.json".into(),
//!     burnin_runs: 100,
//!     recovery_drills: 5,
//!     probe: ProbeSpec::Parse,
//! })?;
//! ```

pub mod artifacts;
pub mod burnin;
pub mod recovery;
pub mod scanners;

pub use artifacts::{collect_all, CollectRequest, CollectedArtifacts, ProbeSpec};
pub use burnin::{run_burnin, BurnInProbe, BurnInReport, CommandProbe, ParseProbe};
pub use recovery::{run_recovery_drills, RecoveryReport};
pub use scanners::{count_findings, summarize_bandit, summarize_pip_audit, ScanSummary};

use nfr_gate_core::ReportError;
use thiserror::Error;

/// Errors from raw evidence collection.
#[derive(Error, Debug)]
pub enum CollectError {
    #[error("Report I/O failed: {0}")]
    Report(#[from] ReportError),

    #[error("Failed to launch burn-in probe `{program}`: {source}")]
    ProbeLaunch {
        program: String,
        source: std::io::Error,
    },

    #[error("Burn-in probe command is empty")]
    EmptyCommand,

    #[error("Recovery drill failed: {0}")]
    Drill(#[from] std::io::Error),
}

/// Round to a fixed number of decimal places.
pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(12.34567, 3), 12.346);
        assert_eq!(round_to(0.0000004, 6), 0.0);
        assert_eq!(round_to(1.0, 6), 1.0);
    }

    proptest! {
        #[test]
        fn prop_rounding_stays_close(value in -1.0e6f64..1.0e6, places in 0i32..7) {
            let rounded = round_to(value, places);
            prop_assert!((rounded - value).abs() <= 0.5 * 10f64.powi(-places) + 1e-9);
        }
    }
}
