//! `nfr-gate`: collect raw NFR evidence, normalize it, gate a release on it.
//!
//! Exit status: 0 when the command succeeds and the gate (if run) passes,
//! 1 when the gate reports violations, 2 on any other failure.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use nfr_gate_collect::{collect_all, CollectRequest, ProbeSpec};
use nfr_gate_core::{
    check_artifacts, normalize_all, NormalizeInputs, Normalizer, PipelineConfig, RawInputs,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "nfr-gate", version, about = "Normalize NFR evidence and enforce release gates.")]
struct Cli {
    /// Pipeline configuration file (YAML). Flags override its values.
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Normalize raw tool reports into canonical evidence artifacts.
    Normalize(NormalizeArgs),
    /// Evaluate canonical artifacts against the release gates.
    Check(CheckArgs),
    /// Produce raw evidence from scanner reports, burn-in and recovery drills.
    Collect(CollectArgs),
}

#[derive(Debug, Args)]
struct NormalizeArgs {
    #[arg(long, value_name = "DIR")]
    artifact_dir: Option<PathBuf>,
    #[arg(long, value_name = "FILE")]
    sast_raw: Option<PathBuf>,
    #[arg(long, value_name = "FILE")]
    deps_raw: Option<PathBuf>,
    #[arg(long, value_name = "FILE")]
    k6_raw: Option<PathBuf>,
    /// Performance baseline input; the k6 input is used when omitted.
    #[arg(long, value_name = "FILE")]
    perf_raw: Option<PathBuf>,
    #[arg(long, value_name = "FILE")]
    burnin_raw: Option<PathBuf>,
    #[arg(long, value_name = "FILE")]
    recovery_raw: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct CheckArgs {
    #[arg(long, value_name = "DIR")]
    artifact_dir: Option<PathBuf>,
    /// Print the verdict as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Args)]
struct CollectArgs {
    #[arg(long, value_name = "DIR")]
    raw_dir: Option<PathBuf>,
    #[arg(long, value_name = "FILE")]
    bandit_json: Option<PathBuf>,
    #[arg(long, value_name = "FILE")]
    deps_json: Option<PathBuf>,
    #[arg(long, value_name = "FILE")]
    k6_json: Option<PathBuf>,
    #[arg(long, value_name = "N")]
    burnin_runs: Option<u32>,
    #[arg(long, value_name = "N")]
    recovery_drills: Option<u32>,
    /// Burn-in probe command; consumes the remaining arguments.
    #[arg(long, value_name = "CMD", num_args = 1.., allow_hyphen_values = true)]
    burnin_command: Vec<String>,
}

enum Outcome {
    Success,
    GateFailed,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(Outcome::Success) => ExitCode::SUCCESS,
        Ok(Outcome::GateFailed) => ExitCode::from(1),
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(2)
        }
    }
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn run(cli: Cli) -> Result<Outcome> {
    let config =
        PipelineConfig::load(cli.config.as_deref()).context("failed to load pipeline config")?;

    match cli.command {
        Command::Normalize(args) => normalize(&args, &config),
        Command::Check(args) => check(&args, &config),
        Command::Collect(args) => collect(&args, &config),
    }
}

fn normalize(args: &NormalizeArgs, config: &PipelineConfig) -> Result<Outcome> {
    let artifact_dir = args.artifact_dir.clone().unwrap_or_else(|| config.artifact_dir.clone());
    let inputs = NormalizeInputs::load(&normalize_inputs(args, &config.inputs))
        .context("failed to read raw reports")?;

    normalize_all(&inputs, &Normalizer::new(), &artifact_dir)
        .with_context(|| format!("failed to write artifacts to {}", artifact_dir.display()))?;

    println!("Normalized artifacts written to: {}", artifact_dir.display());
    Ok(Outcome::Success)
}

fn normalize_inputs(args: &NormalizeArgs, configured: &RawInputs) -> RawInputs {
    let pick =
        |flag: &Option<PathBuf>, file: &Option<PathBuf>| flag.clone().or_else(|| file.clone());
    RawInputs {
        sast: pick(&args.sast_raw, &configured.sast),
        deps: pick(&args.deps_raw, &configured.deps),
        k6: pick(&args.k6_raw, &configured.k6),
        perf: pick(&args.perf_raw, &configured.perf),
        burnin: pick(&args.burnin_raw, &configured.burnin),
        recovery: pick(&args.recovery_raw, &configured.recovery),
    }
}

fn check(args: &CheckArgs, config: &PipelineConfig) -> Result<Outcome> {
    let artifact_dir = args.artifact_dir.as_deref().unwrap_or(&config.artifact_dir);
    let report = check_artifacts(artifact_dir)
        .with_context(|| format!("failed to read artifacts from {}", artifact_dir.display()))?;

    if args.json {
        let rendered = serde_json::to_string_pretty(&report.summary())
            .context("failed to render gate verdict")?;
        println!("{rendered}");
    } else {
        print!("{report}");
    }

    Ok(if report.passed() {
        Outcome::Success
    } else {
        Outcome::GateFailed
    })
}

fn collect(args: &CollectArgs, config: &PipelineConfig) -> Result<Outcome> {
    let request = collect_request(args, config)?;
    collect_all(&request).context("failed to collect raw evidence")?;

    println!("Raw NFR artifacts written to: {}", request.raw_dir.display());
    Ok(Outcome::Success)
}

fn collect_request(args: &CollectArgs, config: &PipelineConfig) -> Result<CollectRequest> {
    let command = if args.burnin_command.is_empty() {
        config.collect.burnin_command.clone()
    } else {
        args.burnin_command.clone()
    };

    Ok(CollectRequest {
        raw_dir: args.raw_dir.clone().unwrap_or_else(|| config.raw_dir()),
        bandit_json: required_input(&args.bandit_json, &config.inputs.sast, "bandit-json")?,
        deps_json: required_input(&args.deps_json, &config.inputs.deps, "deps-json")?,
        k6_json: required_input(&args.k6_json, &config.inputs.k6, "k6-json")?,
        burnin_runs: args.burnin_runs.unwrap_or(config.collect.burnin_runs),
        recovery_drills: args.recovery_drills.unwrap_or(config.collect.recovery_drills),
        probe: if command.is_empty() {
            ProbeSpec::Parse
        } else {
            ProbeSpec::Command(command)
        },
    })
}

fn required_input(
    flag: &Option<PathBuf>,
    configured: &Option<PathBuf>,
    name: &str,
) -> Result<PathBuf> {
    match flag.as_ref().or(configured.as_ref()) {
        Some(path) => Ok(path.clone()),
        None => bail!("--{name} is required (or set it under `inputs` in the config file)"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("nfr-gate").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_normalize_flags_override_config() {
        let cli = parse(&["normalize", "--sast-raw", "cli-bandit.json"]);
        let Command::Normalize(args) = cli.command else {
            panic!("expected normalize");
        };
        let configured = RawInputs {
            sast: Some("config-bandit.json".into()),
            k6: Some("config-k6.json".into()),
            ..Default::default()
        };

        let inputs = normalize_inputs(&args, &configured);
        assert_eq!(inputs.sast, Some(PathBuf::from("cli-bandit.json")));
        assert_eq!(inputs.k6, Some(PathBuf::from("config-k6.json")));
        assert_eq!(inputs.perf, None);
    }

    #[test]
    fn test_collect_request_defaults() {
        let cli = parse(&[
            "-v",
            "collect",
            "--bandit-json",
            "b.json",
            "--deps-json",
            "d.json",
            "--k6-json",
            "k.json",
        ]);
        assert_eq!(cli.verbose, 1);
        let Command::Collect(args) = cli.command else {
            panic!("expected collect");
        };

        let request = collect_request(&args, &PipelineConfig::default()).unwrap();
        assert_eq!(request.raw_dir, PathBuf::from("_bmad-output/test-artifacts/raw"));
        assert_eq!(request.burnin_runs, 100);
        assert_eq!(request.recovery_drills, 5);
        assert_eq!(request.probe, ProbeSpec::Parse);
    }

    #[test]
    fn test_collect_requires_scanner_inputs() {
        let Command::Collect(args) = parse(&["collect", "--bandit-json", "b.json"]).command else {
            panic!("expected collect");
        };
        let err = collect_request(&args, &PipelineConfig::default()).unwrap_err();
        assert!(err.to_string().contains("--deps-json"));
    }

    #[test]
    fn test_burnin_command_takes_trailing_args() {
        let cli = parse(&[
            "collect",
            "--bandit-json",
            "b.json",
            "--deps-json",
            "d.json",
            "--k6-json",
            "k.json",
            "--burnin-command",
            "cargo",
            "check",
            "--quiet",
        ]);
        let Command::Collect(args) = cli.command else {
            panic!("expected collect");
        };
        let request = collect_request(&args, &PipelineConfig::default()).unwrap();
        assert_eq!(
            request.probe,
            ProbeSpec::Command(vec!["cargo".into(), "check".into(), "--quiet".into()])
        );
    }

    #[test]
    fn test_check_reports_gate_failure() {
        let dir = tempfile::tempdir().unwrap();
        let args = CheckArgs {
            artifact_dir: Some(dir.path().to_path_buf()),
            json: true,
        };
        let outcome = check(&args, &PipelineConfig::default()).unwrap();
        assert!(matches!(outcome, Outcome::GateFailed));
    }

    #[test]
    fn test_normalize_then_check_passes() {
        let dir = tempfile::tempdir().unwrap();
        let burnin = dir.path().join("burnin.json");
        let recovery = dir.path().join("recovery.json");
        std::fs::write(&burnin, r#"{"consecutive_passes": 150}"#).unwrap();
        std::fs::write(&recovery, r#"{"success_rate": 1.0}"#).unwrap();

        let artifact_dir = dir.path().join("artifacts");
        let cli = parse(&[
            "normalize",
            "--artifact-dir",
            artifact_dir.to_str().unwrap(),
            "--burnin-raw",
            burnin.to_str().unwrap(),
            "--recovery-raw",
            recovery.to_str().unwrap(),
        ]);
        assert!(matches!(run(cli).unwrap(), Outcome::Success));

        let cli = parse(&["check", "--artifact-dir", artifact_dir.to_str().unwrap()]);
        assert!(matches!(run(cli).unwrap(), Outcome::Success));
    }
}
