//! Burn-in harness: run a probe repeatedly and record the streak.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::Instant;

use crate::{round_to, CollectError};

/// Something the harness can run once and judge.
pub trait BurnInProbe {
    /// Short name, recorded in the tool field.
    fn name(&self) -> &str;

    /// Run one iteration. `Ok(false)` is a failed run; `Err` aborts the harness.
    fn run_once(&mut self) -> Result<bool, CollectError>;
}

/// Runs an external command; a run passes when it exits with status 0.
#[derive(Debug, Clone)]
pub struct CommandProbe {
    program: String,
    args: Vec<String>,
}

impl CommandProbe {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Build from a full command line (program followed by arguments).
    pub fn from_argv(argv: &[String]) -> Result<Self, CollectError> {
        match argv.split_first() {
            Some((program, args)) if !program.trim().is_empty() => {
                Ok(Self::new(program.clone(), args.to_vec()))
            }
            _ => Err(CollectError::EmptyCommand),
        }
    }
}

impl BurnInProbe for CommandProbe {
    fn name(&self) -> &str {
        "command"
    }

    fn run_once(&mut self) -> Result<bool, CollectError> {
        let status = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|source| CollectError::ProbeLaunch {
                program: self.program.clone(),
                source,
            })?;
        Ok(status.success())
    }
}

/// Re-reads a set of JSON inputs; a run passes when every present file parses.
#[derive(Debug, Clone, Default)]
pub struct ParseProbe {
    inputs: Vec<PathBuf>,
}

impl ParseProbe {
    pub fn new(inputs: Vec<PathBuf>) -> Self {
        Self { inputs }
    }
}

impl BurnInProbe for ParseProbe {
    fn name(&self) -> &str {
        "parse"
    }

    fn run_once(&mut self) -> Result<bool, CollectError> {
        for path in &self.inputs {
            let contents = match fs::read_to_string(path) {
                Ok(contents) => contents,
                Err(err) if err.kind() == io::ErrorKind::NotFound => continue,
                Err(err) => {
                    tracing::debug!(path = %path.display(), error = %err, "probe input unreadable");
                    return Ok(false);
                }
            };
            if let Err(err) = serde_json::from_str::<serde_json::Value>(&contents) {
                tracing::debug!(path = %path.display(), error = %err, "probe input does not parse");
                return Ok(false);
            }
        }
        Ok(true)
    }
}

/// Raw burn-in evidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BurnInReport {
    pub tool: String,
    pub summary: BurnInRunSummary,
    pub metrics: BurnInTimings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BurnInRunSummary {
    /// Passing runs since the last failure
    pub consecutive_passes: u32,
    pub total_runs: u32,
    pub failure_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BurnInTimings {
    /// Mean wall time per run, milliseconds, three decimals
    pub avg_cycle_ms: f64,
}

/// Run `probe` `runs` times.
pub fn run_burnin(probe: &mut dyn BurnInProbe, runs: u32) -> Result<BurnInReport, CollectError> {
    let mut streak = 0u32;
    let mut failures = 0u32;
    let mut total_ms = 0.0f64;

    for run in 0..runs {
        let started = Instant::now();
        let passed = probe.run_once()?;
        total_ms += started.elapsed().as_secs_f64() * 1000.0;

        if passed {
            streak += 1;
        } else {
            tracing::debug!(run, probe = probe.name(), "burn-in run failed");
            failures += 1;
            streak = 0;
        }
    }

    let avg_cycle_ms = if runs == 0 {
        0.0
    } else {
        round_to(total_ms / f64::from(runs), 3)
    };

    tracing::info!(
        probe = probe.name(),
        runs,
        failures,
        consecutive_passes = streak,
        "burn-in complete"
    );

    Ok(BurnInReport {
        tool: format!("nfr-gate-{}-burnin", probe.name()),
        summary: BurnInRunSummary {
            consecutive_passes: streak,
            total_runs: runs,
            failure_count: failures,
        },
        metrics: BurnInTimings { avg_cycle_ms },
    })
}
