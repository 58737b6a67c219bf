//! Configuration types deserialized from `tandem.toml`.

use serde::Deserialize;
use std::time::Duration;

/// The whole configuration file.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TandemConfig {
    /// External simulator commands.
    #[serde(default)]
    pub toolchain: ToolchainConfig,
    /// Stimulus and timing of synthesized harnesses.
    #[serde(default)]
    pub harness: HarnessConfig,
    /// The text-generation command used to propose golden modules.
    #[serde(default)]
    pub proposer: ProposerConfig,
    /// Fan-out and selection settings for multi-candidate runs.
    #[serde(default)]
    pub orchestrator: OrchestratorConfig,
}

/// The compile-then-execute simulator.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ToolchainConfig {
    /// Compiler executable, invoked as `<compiler> <args> -o <unit> <sources>`.
    #[serde(default = "default_compiler")]
    pub compiler: String,
    /// Extra compiler arguments placed before `-o`.
    #[serde(default = "default_compiler_args")]
    pub compiler_args: Vec<String>,
    /// Runtime executable, invoked as `<runtime> <args> <unit>`.
    #[serde(default = "default_runtime")]
    pub runtime: String,
    /// Extra runtime arguments placed before the unit.
    #[serde(default)]
    pub runtime_args: Vec<String>,
    /// Upper bound on one compile + execute invocation.
    #[serde(default = "default_sim_timeout")]
    pub timeout_secs: u64,
}

impl ToolchainConfig {
    /// The per-simulation timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            compiler: default_compiler(),
            compiler_args: default_compiler_args(),
            runtime: default_runtime(),
            runtime_args: Vec::new(),
            timeout_secs: default_sim_timeout(),
        }
    }
}

/// Stimulus budget and simulated-time constants of the harness.
///
/// Delays are in harness time units (`1ns` under the emitted timescale).
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct HarnessConfig {
    /// Number of randomized stimulus iterations.
    #[serde(default = "default_trials")]
    pub trials: u32,
    /// Half period of the generated clock.
    #[serde(default = "default_half_period")]
    pub clock_half_period: u32,
    /// How long reset is held asserted.
    #[serde(default = "default_reset_assert")]
    pub reset_assert: u32,
    /// Settling time after reset is released.
    #[serde(default = "default_reset_release")]
    pub reset_release: u32,
    /// Wait between applying stimulus and comparing outputs.
    #[serde(default = "default_settle_delay")]
    pub settle_delay: u32,
    /// Fixed stimulus seed; a fresh random seed is drawn per run when absent.
    #[serde(default)]
    pub seed: Option<u32>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            trials: default_trials(),
            clock_half_period: default_half_period(),
            reset_assert: default_reset_assert(),
            reset_release: default_reset_release(),
            settle_delay: default_settle_delay(),
            seed: None,
        }
    }
}

/// External command that turns a prompt on stdin into a module on stdout.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ProposerConfig {
    /// Executable to run. Required only by `tandem generate`.
    #[serde(default)]
    pub command: Option<String>,
    /// Arguments passed to the executable.
    #[serde(default)]
    pub args: Vec<String>,
    /// Upper bound on one proposal.
    #[serde(default = "default_proposer_timeout")]
    pub timeout_secs: u64,
}

impl ProposerConfig {
    /// The proposal timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ProposerConfig {
    fn default() -> Self {
        Self {
            command: None,
            args: Vec::new(),
            timeout_secs: default_proposer_timeout(),
        }
    }
}

/// Multi-candidate run settings.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct OrchestratorConfig {
    /// Maximum simultaneous simulations; defaults to available parallelism.
    #[serde(default)]
    pub max_parallel: Option<usize>,
    /// Seed for choosing among passing harnesses; random when absent.
    #[serde(default)]
    pub selection_seed: Option<u64>,
}

fn default_compiler() -> String {
    "iverilog".to_string()
}

fn default_compiler_args() -> Vec<String> {
    vec!["-g2005".to_string()]
}

fn default_runtime() -> String {
    "vvp".to_string()
}

fn default_sim_timeout() -> u64 {
    60
}

fn default_trials() -> u32 {
    1000
}

fn default_half_period() -> u32 {
    5
}

fn default_reset_assert() -> u32 {
    20
}

fn default_reset_release() -> u32 {
    10
}

fn default_settle_delay() -> u32 {
    10
}

fn default_proposer_timeout() -> u64 {
    120
}
