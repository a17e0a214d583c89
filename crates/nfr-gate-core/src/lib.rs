//! # nfr-gate-core
//!
//! Deterministic NFR evidence normalization and release gate evaluation.
//!
//! This crate turns tool-specific reports into canonical evidence and answers:
//! - What did the scanners, load tests, burn-in and recovery drills measure?
//! - Does that evidence clear the release thresholds?
//! - If not, which fields failed and by how much?
//!
//! ## Key Guarantees
//!
//! 1. **Total**: Any raw JSON, however malformed, normalizes to a complete document
//! 2. **Deterministic**: Same input and timestamp always produce the same output
//! 3. **Exhaustive**: The gate reports every violation, never just the first
//!
//! ## Example
//!
//! ```rust,ignore
//! use nfr_gate_core::{check_artifacts, normalize_all, NormalizeInputs, Normalizer, RawInputs};
//!
//! let inputs = NormalizeInputs::load(&RawInputs {
//!     sast: Some("bandit.json".into()),
//!     ..Default::default()
//! })?;
//! normalize_all(&inputs, &Normalizer::new(), "artifacts")?;
//!
//! let report = check_artifacts("artifacts")?;
//! print!("{}", report);
//! ```

pub mod config;
pub mod gate;
pub mod io;
pub mod normalize;
pub mod pipeline;
pub mod resolve;
pub mod thresholds;
pub mod types;

// Re-export main types at crate root
pub use config::{CollectSettings, ConfigError, PipelineConfig, RawInputs};
pub use gate::{
    check_artifacts, Check, EvidenceSet, GateEvaluator, GateReport, GateRule, GateSummary,
    Observed, Presence, Violation, ViolationKind,
};
pub use io::{empty_document, load_optional, load_report, write_report, ReportError};
pub use normalize::{
    tally_findings, BurnInNormalizer, BurnInSummary, EvidenceNormalizer, LoadTestNormalizer,
    LoadTestSummary, Normalizer, PerfBaseline, PerfBaselineNormalizer, RecoveryDrillSummary,
    RecoveryNormalizer, SecurityNormalizer, SecurityReport,
};
pub use pipeline::{normalize_all, NormalizeInputs};
pub use resolve::{coerce_float, coerce_int, resolve, CandidatePath};
pub use types::{EvidenceKind, EvidenceStatus, Severity, SeverityCounts};
