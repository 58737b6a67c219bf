//! Tandem CLI: differential equivalence harnesses for Verilog modules.
//!
//! `tandem ports` prints a module's interface, `tandem check` compares two
//! interfaces, `tandem harness` emits a differential testbench, `tandem sim`
//! runs one through the simulator, and `tandem generate` drives the whole
//! pipeline against a generated golden module.

#![warn(missing_docs)]

mod check;
mod generate;
mod harness;
mod pipeline;
mod ports;
mod sim;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

/// Tandem: find where two Verilog modules disagree.
#[derive(Parser, Debug)]
#[command(name = "tandem", version, about = "Differential equivalence checking for Verilog")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Control colored output.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to a `tandem.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the port interface of a module.
    Ports(PortsArgs),
    /// Check that two modules have compatible interfaces.
    Check(CheckArgs),
    /// Write a differential harness for two modules.
    Harness(HarnessArgs),
    /// Simulate two modules against each other.
    Sim(SimArgs),
    /// Generate a golden module from a description and find a passing harness.
    Generate(GenerateArgs),
}

/// Arguments for `tandem ports`.
#[derive(Parser, Debug)]
pub struct PortsArgs {
    /// Verilog source file.
    pub file: PathBuf,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Arguments for `tandem check`.
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// First module.
    pub left: PathBuf,
    /// Second module.
    pub right: PathBuf,
}

/// Stimulus settings shared by `harness`, `sim` and `generate`.
#[derive(Parser, Debug, Default)]
pub struct StimulusArgs {
    /// Stimulus seed (default: from config, else random).
    #[arg(long)]
    pub seed: Option<u32>,

    /// Number of random trials.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub trials: Option<u32>,
}

/// Arguments for `tandem harness`.
#[derive(Parser, Debug)]
pub struct HarnessArgs {
    /// Golden (reference) module.
    pub golden: PathBuf,
    /// Candidate module.
    pub candidate: PathBuf,

    /// Write the harness here instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub stimulus: StimulusArgs,
}

/// Arguments for `tandem sim`.
#[derive(Parser, Debug)]
pub struct SimArgs {
    /// Golden (reference) module.
    pub golden: PathBuf,
    /// Candidate module.
    pub candidate: PathBuf,

    /// Also write the synthesized harness here.
    #[arg(long)]
    pub keep_harness: Option<PathBuf>,

    /// Output format for the verdict.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    #[command(flatten)]
    pub stimulus: StimulusArgs,
}

/// Arguments for `tandem generate`.
#[derive(Parser, Debug)]
pub struct GenerateArgs {
    /// Natural-language description of the intended behavior.
    #[arg(long)]
    pub spec: PathBuf,

    /// Candidate modules; the first parseable one fixes the interface.
    #[arg(required = true, num_args = 1..)]
    pub candidates: Vec<PathBuf>,

    /// Write the selected harness here instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Write the generated golden module here.
    #[arg(long)]
    pub golden_out: Option<PathBuf>,

    /// Proposer command, overriding `[proposer] command`.
    #[arg(long)]
    pub proposer: Option<String>,

    /// Argument for the proposer command (repeatable).
    #[arg(long = "proposer-arg", allow_hyphen_values = true)]
    pub proposer_args: Vec<String>,

    /// Maximum simultaneous simulations.
    #[arg(short, long, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    pub jobs: Option<usize>,

    /// Seed for choosing among passing harnesses.
    #[arg(long)]
    pub selection_seed: Option<u64>,

    /// Output format for the per-candidate report.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    #[command(flatten)]
    pub stimulus: StimulusArgs,
}

/// Controls whether colored output is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Detect from the environment.
    Auto,
    /// Always produce colored output.
    Always,
    /// Never produce colored output.
    Never,
}

/// Report output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print debug information.
    pub verbose: bool,
    /// Whether to use colored output.
    pub color: bool,
    /// Optional path to a config file.
    pub config: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    let color = match cli.color {
        ColorChoice::Auto => {
            std::env::var_os("NO_COLOR").is_none() && std::env::var_os("TERM").is_some()
        }
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        color,
        config: cli.config,
    };
    pipeline::init_tracing(&global);

    let result = match cli.command {
        Command::Ports(ref args) => ports::run(args, &global),
        Command::Check(ref args) => check::run(args, &global),
        Command::Harness(ref args) => harness::run(args, &global),
        Command::Sim(ref args) => sim::run(args, &global),
        Command::Generate(ref args) => generate::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(2);
        }
    }
}
