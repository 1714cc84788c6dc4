//! kernelcheck CLI Library
//!
//! Command-line front end of the harness: load a challenge and a solution,
//! run the functional and performance phases, print the report.
//! Use `kernelcheck::run()` (or `kernelcheck_cli::run()`) in a harness binary's
//! main function; challenges and solutions registered in that binary are found
//! before shared libraries on disk.
//!
//! # Example
//!
//! ```ignore
//! use kernelcheck::prelude::*;
//!
//! register_challenge!("easy/vector_add", VectorAdd::new);
//! register_solution!("vector_add", solve);
//!
//! fn main() -> anyhow::Result<()> {
//!     kernelcheck::run()
//! }
//! ```

mod config;
mod executor;
mod loader;

pub use config::*;
pub use executor::{
    CaseOutcome, FailureReason, FunctionalReport, HarnessError, PerformanceComparison, RunInfo,
    WARMUP_ITERATIONS, benchmark, build_report, format_human_output, invoke_guarded,
    run_functional_tests, run_performance_test,
};
pub use loader::{
    DylibLoader, HarnessLoader, LoadError, LoadedChallenge, LoadedSolution, ModuleKind,
    ModuleLoader, ModuleOrigin, RegistryLoader, SearchPath, challenge_root, solution_key,
};

use anyhow::Context;
use clap::Parser;
use kernelcheck_core::{Challenge, Device, HostDevice, Solve};
use kernelcheck_report::{OutputFormat, Report, generate_json_report};
use std::io::Write;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// kernelcheck CLI arguments
#[derive(Parser, Debug)]
#[command(name = "kernelcheck")]
#[command(
    author,
    version,
    about = "kernelcheck - check a kernel solution against its challenge and time it"
)]
pub struct Cli {
    /// Challenge directory (e.g. challenges/easy/vector_add)
    pub challenge: PathBuf,

    /// Solution file or shared library
    pub solution: PathBuf,

    /// Only run performance tests
    #[arg(long)]
    pub perf_only: bool,

    /// Only run functional tests
    #[arg(long)]
    pub functional_only: bool,

    /// Timed iterations per callable [default: 100, or kernelcheck.toml]
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub iterations: Option<u64>,

    /// Output format: human, json [default: human, or kernelcheck.toml]
    #[arg(long)]
    pub format: Option<String>,

    /// Output file (stdout if not specified)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file (default: discover kernelcheck.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Which phases to run and how long to measure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunPlan {
    pub functional: bool,
    pub performance: bool,
    pub iterations: usize,
}

impl RunPlan {
    /// `--perf-only` disables the functional phase and `--functional-only`
    /// the performance phase; passing both leaves nothing to run.
    pub fn from_cli(cli: &Cli, config: &KernelcheckConfig) -> Self {
        Self {
            functional: !cli.perf_only,
            performance: !cli.functional_only,
            iterations: cli
                .iterations
                .map(|n| n as usize)
                .unwrap_or(config.runner.iterations),
        }
    }
}

/// Run the kernelcheck CLI with the given arguments.
/// This is the main entry point for harness binaries.
///
/// # Returns
/// Returns `Ok(())` on success, or an error if something goes wrong.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_with_cli(cli)
}

/// Run the kernelcheck CLI with pre-parsed arguments.
pub fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    init_tracing(cli.verbose);

    // Explicit --config must load; a discovered one is best-effort
    let config = match &cli.config {
        Some(path) => KernelcheckConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => KernelcheckConfig::discover().unwrap_or_default(),
    };

    let format_name = cli.format.as_deref().unwrap_or(&config.output.format);
    let format: OutputFormat = format_name.parse().unwrap_or_else(|e| {
        warn!("{}; using human output", e);
        OutputFormat::Human
    });

    let plan = RunPlan::from_cli(&cli, &config);
    if plan.performance && plan.iterations == 0 {
        anyhow::bail!("iterations must be at least 1");
    }

    let mut loader = HarnessLoader::with_search_paths(config.loader.search_paths.clone());
    let challenge = loader
        .load_challenge(&cli.challenge)
        .context("failed to load challenge")?;
    let solution = loader
        .load_solution(&cli.solution)
        .context("failed to load solution")?;

    let device = HostDevice::new();
    let report = run_harness(
        &device,
        challenge.challenge(),
        &solution,
        &cli.solution.display().to_string(),
        plan,
    )?;

    let output = match format {
        OutputFormat::Json => generate_json_report(&report)?,
        OutputFormat::Human => format_human_output(&report),
    };

    if let Some(ref path) = cli.output {
        let mut file = std::fs::File::create(path)?;
        file.write_all(output.as_bytes())?;
        println!("Report written to: {}", path.display());
    } else {
        print!("{}", output);
    }

    if !report.all_passed() {
        if let Some(functional) = &report.functional {
            eprintln!(
                "\n{} of {} functional test(s) failed",
                functional.total - functional.passed,
                functional.total
            );
        }
        std::process::exit(1);
    }

    Ok(())
}

/// Run the requested phases of `challenge` against `solve` and build the report.
///
/// Solution failures on functional cases are recorded in the report; every
/// other failure aborts with a [`HarnessError`].
pub fn run_harness<D: Device>(
    device: &D,
    challenge: &dyn Challenge,
    solve: &dyn Solve,
    solution_label: &str,
    plan: RunPlan,
) -> Result<Report, HarnessError> {
    info!(
        challenge = challenge.name(),
        device = device.name(),
        functional = plan.functional,
        performance = plan.performance,
        "starting run"
    );

    let functional = if plan.functional {
        Some(run_functional_tests(device, challenge, solve)?)
    } else {
        None
    };

    let performance = if plan.performance {
        Some(run_performance_test(
            device,
            challenge,
            solve,
            plan.iterations,
        )?)
    } else {
        None
    };

    let info = RunInfo {
        solution: solution_label.to_string(),
        device: device.name().to_string(),
        iterations: plan.iterations,
        warmup: WARMUP_ITERATIONS,
        functional: plan.functional,
        performance: plan.performance,
    };

    Ok(build_report(
        challenge.name(),
        &info,
        functional.as_ref(),
        performance.as_ref(),
    ))
}

/// Logs go to stderr so stdout carries only the report
fn init_tracing(verbose: bool) {
    let default = if verbose {
        "kernelcheck=debug"
    } else {
        "kernelcheck=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    // A subscriber may already be installed when embedded in a larger binary
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
