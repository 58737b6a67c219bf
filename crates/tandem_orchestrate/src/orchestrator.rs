//! The multi-candidate pipeline.

use crate::error::{CandidateFailure, OrchestrateError};
use crate::outcome::{CandidateOutcome, Deliverable, Outcome};
use crate::prompt::{build_prompt, extract_module_text};
use crate::proposer::ModuleProposer;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tandem_config::TandemConfig;
use tandem_harness::{synthesize, HarnessOptions};
use tandem_sim::{SimulationRequest, Simulator};
use tandem_verilog::{check, extract, rename_module, InterfaceDescriptor};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// A named module under test.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidate {
    /// Display name, usually the file name.
    pub name: String,
    /// Module source text.
    pub source: String,
}

impl Candidate {
    /// Creates a candidate.
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }
}

/// Drives golden-module generation and one pipeline run per candidate.
pub struct Orchestrator {
    proposer: Arc<dyn ModuleProposer>,
    simulator: Simulator,
    harness: HarnessOptions,
    max_parallel: usize,
    selection_seed: Option<u64>,
}

impl Orchestrator {
    /// Creates an orchestrator with default harness options, parallelism
    /// bounded by the available cores, and random selection.
    pub fn new(proposer: Arc<dyn ModuleProposer>, simulator: Simulator) -> Self {
        Self {
            proposer,
            simulator,
            harness: HarnessOptions::default(),
            max_parallel: std::thread::available_parallelism().map_or(1, NonZeroUsize::get),
            selection_seed: None,
        }
    }

    /// Creates an Icarus-backed orchestrator from configuration.
    pub fn from_config(config: &TandemConfig, proposer: Arc<dyn ModuleProposer>) -> Self {
        let mut orchestrator = Self::new(proposer, Simulator::from_config(&config.toolchain))
            .with_harness_options(HarnessOptions::from_config(&config.harness));
        if let Some(max) = config.orchestrator.max_parallel {
            orchestrator = orchestrator.with_max_parallel(max);
        }
        orchestrator.selection_seed = config.orchestrator.selection_seed;
        orchestrator
    }

    /// Replaces the harness options used for every candidate.
    pub fn with_harness_options(mut self, options: HarnessOptions) -> Self {
        self.harness = options;
        self
    }

    /// Bounds the number of simultaneous simulations (at least 1).
    pub fn with_max_parallel(mut self, max: usize) -> Self {
        self.max_parallel = max.max(1);
        self
    }

    /// Makes the choice among passing harnesses reproducible.
    pub fn with_selection_seed(mut self, seed: u64) -> Self {
        self.selection_seed = Some(seed);
        self
    }

    /// The harness options applied to every candidate.
    pub fn harness_options(&self) -> &HarnessOptions {
        &self.harness
    }

    /// Runs the whole pipeline.
    ///
    /// The first candidate whose interface parses pins the port header given
    /// to the proposer. Per-candidate failures are recorded in the outcomes
    /// and never stop the other candidates. Dropping the returned future
    /// aborts every in-flight simulation.
    pub async fn run(
        &self,
        spec: &str,
        candidates: &[Candidate],
    ) -> Result<Deliverable, OrchestrateError> {
        let Some(reference) = candidates.iter().find_map(|c| extract(&c.source).ok()) else {
            tracing::warn!("no candidate has a parseable interface");
            let outcomes = candidates
                .iter()
                .filter_map(|c| {
                    extract(&c.source)
                        .err()
                        .map(|e| CandidateOutcome::failed(&c.name, e))
                })
                .collect();
            return Err(OrchestrateError::NoPassingHarness { outcomes });
        };

        let prompt = build_prompt(spec, &reference.port_header());
        let response = self.proposer.propose(&prompt).await?;
        let golden = extract_module_text(&response)?;
        let golden_iface = extract(&golden).map_err(OrchestrateError::MalformedGolden)?;
        tracing::info!(
            module = golden_iface.module_name(),
            candidates = candidates.len(),
            "golden module received"
        );

        // Preparation is CPU-bound; keep it off the async workers.
        let requests = {
            let (golden, options, batch) =
                (golden.clone(), self.harness.clone(), candidates.to_vec());
            tokio::task::spawn_blocking(move || {
                batch
                    .par_iter()
                    .map(|c| prepare(&golden, &golden_iface, c, &options))
                    .collect::<Vec<Result<SimulationRequest, CandidateFailure>>>()
            })
            .await?
        };

        let mut outcomes: Vec<CandidateOutcome> = candidates
            .iter()
            .map(|c| {
                CandidateOutcome::failed(
                    &c.name,
                    CandidateFailure::Aborted("simulation did not report back".to_string()),
                )
            })
            .collect();

        let semaphore = Arc::new(Semaphore::new(self.max_parallel));
        let mut tasks = JoinSet::new();
        for (index, request) in requests.into_iter().enumerate() {
            let request = match request {
                Ok(request) => request,
                Err(failure) => {
                    tracing::info!(candidate = %candidates[index].name, %failure, "candidate skipped");
                    outcomes[index].outcome = Outcome::Failed(failure);
                    continue;
                }
            };
            let simulator = self.simulator.clone();
            let semaphore = Arc::clone(&semaphore);
            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await;
                let result = simulator.run(&request).await;
                (index, request.harness, result)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            let (index, harness, result) = match joined {
                Ok(done) => done,
                Err(e) => {
                    tracing::warn!(error = %e, "simulation task failed");
                    continue;
                }
            };
            outcomes[index].outcome = match result {
                Ok(verdict) => Outcome::Simulated { harness, verdict },
                Err(e) => Outcome::Failed(CandidateFailure::Toolchain(e)),
            };
            tracing::info!(outcome = %outcomes[index], "candidate finished");
        }

        let passing: Vec<usize> = outcomes
            .iter()
            .enumerate()
            .filter(|(_, o)| o.is_passing())
            .map(|(i, _)| i)
            .collect();
        if passing.is_empty() {
            return Err(OrchestrateError::NoPassingHarness { outcomes });
        }

        let pick = match self.selection_seed {
            Some(seed) => StdRng::seed_from_u64(seed).gen_range(0..passing.len()),
            None => rand::thread_rng().gen_range(0..passing.len()),
        };
        let chosen = &outcomes[passing[pick]];
        let (candidate, harness, verdict) = match &chosen.outcome {
            Outcome::Simulated { harness, verdict } => {
                (chosen.name.clone(), harness.clone(), verdict.clone())
            }
            Outcome::Failed(_) => return Err(OrchestrateError::NoPassingHarness { outcomes }),
        };
        tracing::info!(%candidate, passing = passing.len(), "selected passing harness");
        Ok(Deliverable {
            candidate,
            harness,
            verdict,
            golden,
            outcomes,
        })
    }
}

/// Extraction, compatibility check and synthesis for one candidate.
///
/// A candidate declaring the golden module's name is renamed so both can be
/// elaborated together.
fn prepare(
    golden: &str,
    golden_iface: &InterfaceDescriptor,
    candidate: &Candidate,
    options: &HarnessOptions,
) -> Result<SimulationRequest, CandidateFailure> {
    let candidate_iface = extract(&candidate.source)?;
    check(golden_iface, &candidate_iface)?;

    let (source, candidate_iface) = if golden_iface.module_name() == candidate_iface.module_name()
    {
        let renamed = format!("{}_candidate", candidate_iface.module_name());
        let source = rename_module(&candidate.source, &renamed)?;
        let iface = extract(&source)?;
        (source, iface)
    } else {
        (candidate.source.clone(), candidate_iface)
    };

    Ok(SimulationRequest {
        harness: synthesize(golden_iface, &candidate_iface, options),
        golden: golden.to_string(),
        candidate: source,
        seed: options.seed,
    })
}
