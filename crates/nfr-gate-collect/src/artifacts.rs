//! Write the full set of raw evidence artifacts.

use nfr_gate_core::{load_report, write_report};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::burnin::{run_burnin, BurnInProbe, CommandProbe, ParseProbe};
use crate::recovery::run_recovery_drills;
use crate::scanners::{summarize_bandit, summarize_pip_audit};
use crate::CollectError;

pub const SAST_RAW: &str = "security-sast-raw.json";
pub const DEPS_RAW: &str = "security-deps-raw.json";
pub const K6_RAW: &str = "perf-k6-raw.json";
pub const BURNIN_RAW: &str = "reliability-burnin-raw.json";
pub const RECOVERY_RAW: &str = "recovery-rto-rpo-raw.json";

/// Which probe the burn-in harness runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ProbeSpec {
    /// Re-parse the scanner and k6 inputs.
    #[default]
    Parse,
    /// Run a command line; exit status 0 passes.
    Command(Vec<String>),
}

/// Everything one collection run needs.
#[derive(Debug, Clone)]
pub struct CollectRequest {
    pub raw_dir: PathBuf,
    pub bandit_json: PathBuf,
    pub deps_json: PathBuf,
    pub k6_json: PathBuf,
    pub burnin_runs: u32,
    pub recovery_drills: u32,
    pub probe: ProbeSpec,
}

impl CollectRequest {
    fn build_probe(&self) -> Result<Box<dyn BurnInProbe>, CollectError> {
        Ok(match &self.probe {
            ProbeSpec::Parse => Box::new(ParseProbe::new(vec![
                self.bandit_json.clone(),
                self.deps_json.clone(),
                self.k6_json.clone(),
            ])),
            ProbeSpec::Command(argv) => Box::new(CommandProbe::from_argv(argv)?),
        })
    }
}

/// Paths of the raw artifacts written by [`collect_all`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectedArtifacts {
    pub sast: PathBuf,
    pub deps: PathBuf,
    pub k6: PathBuf,
    pub burnin: PathBuf,
    pub recovery: PathBuf,
}

impl CollectedArtifacts {
    fn under(raw_dir: &Path) -> Self {
        Self {
            sast: raw_dir.join(SAST_RAW),
            deps: raw_dir.join(DEPS_RAW),
            k6: raw_dir.join(K6_RAW),
            burnin: raw_dir.join(BURNIN_RAW),
            recovery: raw_dir.join(RECOVERY_RAW),
        }
    }

    pub fn paths(&self) -> [&Path; 5] {
        [&self.sast, &self.deps, &self.k6, &self.burnin, &self.recovery]
    }
}

/// Produce all raw evidence and write it under `request.raw_dir`.
///
/// Scanner reports that do not exist count as clean scans. Everything is
/// measured before anything is written.
pub fn collect_all(request: &CollectRequest) -> Result<CollectedArtifacts, CollectError> {
    let sast = summarize_bandit(&load_report(&request.bandit_json)?);
    let deps = summarize_pip_audit(&load_report(&request.deps_json)?);
    let k6 = load_report(&request.k6_json)?;

    let mut probe = request.build_probe()?;
    let burnin = run_burnin(probe.as_mut(), request.burnin_runs)?;
    let recovery = run_recovery_drills(request.recovery_drills)?;

    let artifacts = CollectedArtifacts::under(&request.raw_dir);
    write(&artifacts.sast, &sast)?;
    write(&artifacts.deps, &deps)?;
    write(&artifacts.k6, &k6)?;
    write(&artifacts.burnin, &burnin)?;
    write(&artifacts.recovery, &recovery)?;

    tracing::info!(raw_dir = %request.raw_dir.display(), "raw artifacts written");
    Ok(artifacts)
}

fn write<T: Serialize>(path: &Path, document: &T) -> Result<(), CollectError> {
    write_report(path, document)?;
    Ok(())
}
