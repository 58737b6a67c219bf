//! Conformance test helpers for the Tandem pipeline.
//!
//! Provides shared functions that run module text through extraction,
//! compatibility checking and harness synthesis, plus a scripted proposer
//! and Icarus detection for end-to-end tests.

#![warn(missing_docs)]

use async_trait::async_trait;
use tandem_config::TandemConfig;
use tandem_diagnostics::{Diagnostic, DiagnosticSink, Severity};
use tandem_harness::HarnessOptions;
use tandem_orchestrate::{ModuleProposer, ProposerError};
use tandem_sim::{SimError, SimulationRequest, SimulationVerdict, Simulator};
use tandem_source::SourceDb;
use tandem_verilog::{extract, extract_interface, rename_module, InterfaceDescriptor};

/// Result of extracting one module with diagnostics collected.
pub struct ExtractResult {
    /// The interface, if extraction succeeded.
    pub interface: Option<InterfaceDescriptor>,
    /// All diagnostics emitted, including the error on failure.
    pub diagnostics: Vec<Diagnostic>,
    /// Number of warning-severity diagnostics.
    pub warning_count: usize,
}

/// Extracts `source` as a file named `name`, collecting diagnostics.
pub fn extract_file(name: &str, source: &str) -> ExtractResult {
    let mut db = SourceDb::new();
    let file = db.add_source(name, source.to_string());
    let sink = DiagnosticSink::new();
    let interface = match extract_interface(file, &db, &sink) {
        Ok(iface) => Some(iface),
        Err(e) => {
            sink.emit(e.to_diagnostic());
            None
        }
    };
    let diagnostics = sink.take_all();
    let warning_count = diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Warning)
        .count();
    ExtractResult {
        interface,
        diagnostics,
        warning_count,
    }
}

/// Harness options with a fixed seed and trial budget.
pub fn options(seed: u32, trials: u32) -> HarnessOptions {
    HarnessOptions::default().with_seed(seed).with_trials(trials)
}

/// Builds the simulation request for a golden and candidate module,
/// renaming the candidate if both declare the same name.
///
/// Panics if either module is unusable or the interfaces differ.
pub fn pair_request(golden: &str, candidate: &str, options: &HarnessOptions) -> SimulationRequest {
    let golden_iface = extract(golden).expect("golden module should parse");
    let mut candidate_source = candidate.to_string();
    let mut candidate_iface = extract(candidate).expect("candidate module should parse");
    tandem_verilog::check(&golden_iface, &candidate_iface).expect("interfaces should match");
    if golden_iface.module_name() == candidate_iface.module_name() {
        let renamed = format!("{}_candidate", candidate_iface.module_name());
        candidate_source = rename_module(candidate, &renamed).expect("rename");
        candidate_iface = extract(&candidate_source).expect("renamed module should parse");
    }
    SimulationRequest {
        harness: tandem_harness::synthesize(&golden_iface, &candidate_iface, options),
        golden: golden.to_string(),
        candidate: candidate_source,
        seed: options.seed,
    }
}

/// Simulates a pair with the default Icarus toolchain.
pub async fn simulate_pair(
    golden: &str,
    candidate: &str,
    options: &HarnessOptions,
) -> Result<SimulationVerdict, SimError> {
    let simulator = Simulator::from_config(&TandemConfig::default().toolchain);
    simulator.run(&pair_request(golden, candidate, options)).await
}

/// Returns `true` if `iverilog` and `vvp` can be launched.
pub fn icarus_available() -> bool {
    let runs = |program: &str, flag: &str| {
        std::process::Command::new(program)
            .arg(flag)
            .output()
            .is_ok()
    };
    runs("iverilog", "-V") && runs("vvp", "-V")
}

/// A proposer that always answers with the same text.
pub struct ScriptedProposer {
    response: String,
}

impl ScriptedProposer {
    /// Creates a proposer answering `response`.
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
        }
    }
}

#[async_trait]
impl ModuleProposer for ScriptedProposer {
    async fn propose(&self, _prompt: &str) -> Result<String, ProposerError> {
        Ok(self.response.clone())
    }
}
