use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{debug, info};

use crate::report::{self, OutputFormat};
use crate::runtime::benchmark::{Benchmark, BenchmarkConfig, compare_benchmarks};
use crate::series::{Formulation, SeriesEvaluator};
use crate::utils::logger;
use crate::version::VERSION;

#[derive(Parser, Debug)]
#[command(
    name = "pibench",
    version = VERSION,
    about = "Approximates π with 200M terms of the Leibniz series and times the loop"
)]
pub struct PibenchCli {
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    /// Log more to stderr (-v info, -vv debug). RUST_LOG takes precedence.
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

impl PibenchCli {
    /// The requested command; a bare invocation runs the default benchmark.
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or_default()
    }

    pub const fn verbose(&self) -> u8 {
        self.verbose
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Runs the benchmark once (the default when no command is given).
    Run(RunArgs),
    /// Runs both formulations and compares their loop times.
    Compare(CompareArgs),
}

impl Default for Command {
    fn default() -> Self {
        Self::Run(RunArgs::default())
    }
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct RunArgs {
    /// Loop formulation: `direct` recomputes denominators, `incremental` carries them.
    #[arg(long, default_value_t = Formulation::Direct)]
    pub formulation: Formulation,

    #[command(flatten)]
    pub harness: HarnessArgs,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

impl Default for RunArgs {
    fn default() -> Self {
        Self {
            formulation: Formulation::Direct,
            harness: HarnessArgs::default(),
            format: OutputFormat::Text,
        }
    }
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct CompareArgs {
    #[command(flatten)]
    pub harness: HarnessArgs,
}

#[derive(Args, Debug, Clone, Copy, PartialEq, Eq)]
pub struct HarnessArgs {
    /// Measured runs; with more than one, a timing summary follows the result.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub runs: u32,

    /// Unmeasured runs before measuring.
    #[arg(long, default_value_t = 0)]
    pub warmup: u32,
}

impl Default for HarnessArgs {
    fn default() -> Self {
        Self { runs: 1, warmup: 0 }
    }
}

impl From<HarnessArgs> for BenchmarkConfig {
    fn from(args: HarnessArgs) -> Self {
        Self {
            warmup_runs: args.warmup as usize,
            runs: args.runs as usize,
        }
    }
}

pub fn run() -> Result<()> {
    let cli = PibenchCli::parse();
    logger::init_logging(cli.verbose());
    let stdout = io::stdout();
    execute(&cli.command(), &mut stdout.lock())
}

/// Runs `command` against the fixed benchmark, writing its report to `out`.
pub fn execute<W: Write>(command: &Command, out: &mut W) -> Result<()> {
    execute_with(command, out, SeriesEvaluator::standard)
}

/// Like [`execute`], building each formulation's evaluator with `evaluator`.
pub fn execute_with<W, F>(command: &Command, out: &mut W, evaluator: F) -> Result<()>
where
    W: Write,
    F: Fn(Formulation) -> SeriesEvaluator,
{
    debug!(?command, "dispatching");
    let rendered = match command {
        Command::Run(args) => handle_run(args, &evaluator)?,
        Command::Compare(args) => handle_compare(args, &evaluator)?,
    };
    out.write_all(rendered.as_bytes())
        .and_then(|()| out.flush())
        .context("failed to write report to stdout")
}

fn handle_run<F>(args: &RunArgs, evaluator: &F) -> Result<String>
where
    F: Fn(Formulation) -> SeriesEvaluator,
{
    let outcome = Benchmark::new(evaluator(args.formulation))
        .with_config(args.harness.into())
        .run();
    report::render(&outcome, args.format).context("failed to render benchmark report")
}

fn handle_compare<F>(args: &CompareArgs, evaluator: &F) -> Result<String>
where
    F: Fn(Formulation) -> SeriesEvaluator,
{
    let config = BenchmarkConfig::from(args.harness);
    let [baseline, current] = Formulation::ALL.map(|formulation| {
        info!(%formulation, "benchmarking");
        Benchmark::new(evaluator(formulation))
            .with_config(config)
            .run()
    });
    let comparison = compare_benchmarks(&baseline, &current);
    report::render_comparison(&baseline, &current, &comparison)
        .context("failed to render comparison")
}
