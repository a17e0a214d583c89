//! Release gate thresholds.
//!
//! Canonical documents embed a status derived from these same constants, so a
//! persisted document reads correctly without re-running the gate.

/// Critical and high findings must both be exactly zero.
pub const MAX_SECURITY_FINDINGS: i64 = 0;

/// Performance regression against the baseline, in percent.
pub const MAX_REGRESSION_PCT: f64 = 10.0;

/// Load-test request failure rate.
pub const MAX_ERROR_RATE: f64 = 0.01;

/// Burn-in consecutive passing cycles.
pub const MIN_CONSECUTIVE_PASSES: i64 = 100;

/// Recovery drill success rate.
pub const MIN_RECOVERY_SUCCESS_RATE: f64 = 0.99;

/// Informational latency budgets recorded in the performance baseline.
pub const MAX_API_COMMAND_LATENCY_P95_MS: i64 = 300;
pub const MAX_API_COMMAND_LATENCY_P99_MS: i64 = 700;
pub const MAX_QUEUE_ADVANCE_LATENCY_MS: i64 = 150;
pub const MAX_HIGHLIGHT_SYNC_LATENCY_MS: i64 = 100;
