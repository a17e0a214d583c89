//! Normalize a set of raw reports into the canonical artifact directory.

use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::config::RawInputs;
use crate::io::{load_optional, write_report, ReportError};
use crate::normalize::{
    BurnInNormalizer, LoadTestNormalizer, Normalizer, PerfBaselineNormalizer, RecoveryNormalizer,
    SecurityNormalizer,
};
use crate::types::EvidenceKind;

/// Raw documents for one normalization run. [`NormalizeInputs::load`] reads
/// absent inputs as empty mappings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizeInputs {
    pub sast: Value,
    pub deps: Value,
    pub k6: Value,
    /// Dedicated perf baseline input, if any
    pub perf: Option<Value>,
    pub burnin: Value,
    pub recovery: Value,
}

impl NormalizeInputs {
    /// Read every configured input from disk.
    pub fn load(inputs: &RawInputs) -> Result<Self, ReportError> {
        Ok(Self {
            sast: load_optional(inputs.sast.as_deref())?,
            deps: load_optional(inputs.deps.as_deref())?,
            k6: load_optional(inputs.k6.as_deref())?,
            perf: inputs
                .perf
                .as_deref()
                .map(|path| load_optional(Some(path)))
                .transpose()?,
            burnin: load_optional(inputs.burnin.as_deref())?,
            recovery: load_optional(inputs.recovery.as_deref())?,
        })
    }

    /// The document the perf baseline is derived from.
    pub fn perf_source(&self) -> &Value {
        self.perf.as_ref().unwrap_or(&self.k6)
    }
}

/// Normalize every evidence kind and write the canonical artifacts.
///
/// Returns the written paths in [`EvidenceKind::ALL`] order. Writes are
/// independent: a failure leaves earlier artifacts in place.
pub fn normalize_all(
    inputs: &NormalizeInputs,
    normalizer: &Normalizer,
    artifact_dir: impl AsRef<Path>,
) -> Result<Vec<PathBuf>, ReportError> {
    let artifact_dir = artifact_dir.as_ref();
    let mut written = Vec::with_capacity(EvidenceKind::ALL.len());

    for kind in EvidenceKind::ALL {
        let path = artifact_dir.join(kind.artifact_name());
        match kind {
            EvidenceKind::SecuritySast => write_report(
                &path,
                &normalizer.normalize(&SecurityNormalizer::sast(), &inputs.sast),
            )?,
            EvidenceKind::SecurityDeps => write_report(
                &path,
                &normalizer.normalize(&SecurityNormalizer::deps(), &inputs.deps),
            )?,
            EvidenceKind::PerfBaseline => write_report(
                &path,
                &normalizer.normalize(&PerfBaselineNormalizer::new(), inputs.perf_source()),
            )?,
            EvidenceKind::LoadTest => write_report(
                &path,
                &normalizer.normalize(&LoadTestNormalizer::new(), &inputs.k6),
            )?,
            EvidenceKind::BurnIn => write_report(
                &path,
                &normalizer.normalize(&BurnInNormalizer::new(), &inputs.burnin),
            )?,
            EvidenceKind::Recovery => write_report(
                &path,
                &normalizer.normalize(&RecoveryNormalizer::new(), &inputs.recovery),
            )?,
        }
        written.push(path);
    }

    tracing::info!(
        artifact_dir = %artifact_dir.display(),
        artifacts = written.len(),
        generated_at = normalizer.generated_at(),
        "normalized artifacts written"
    );
    Ok(written)
}
