//! Per-candidate results and the final deliverable.

use crate::error::CandidateFailure;
use std::fmt;
use tandem_sim::SimulationVerdict;

/// What happened to one candidate.
#[derive(Debug)]
pub enum Outcome {
    /// The harness ran to completion.
    Simulated {
        /// The harness that was run.
        harness: String,
        /// Its classified output.
        verdict: SimulationVerdict,
    },
    /// The candidate could not be tested.
    Failed(CandidateFailure),
}

/// A candidate's name paired with its outcome.
#[derive(Debug)]
pub struct CandidateOutcome {
    /// Candidate name as given to the orchestrator.
    pub name: String,
    /// What happened.
    pub outcome: Outcome,
}

impl CandidateOutcome {
    pub(crate) fn failed(name: impl Into<String>, failure: impl Into<CandidateFailure>) -> Self {
        Self {
            name: name.into(),
            outcome: Outcome::Failed(failure.into()),
        }
    }

    /// The verdict, if the simulation completed.
    pub fn verdict(&self) -> Option<&SimulationVerdict> {
        match &self.outcome {
            Outcome::Simulated { verdict, .. } => Some(verdict),
            Outcome::Failed(_) => None,
        }
    }

    /// The failure, if the candidate could not be tested.
    pub fn failure(&self) -> Option<&CandidateFailure> {
        match &self.outcome {
            Outcome::Failed(failure) => Some(failure),
            Outcome::Simulated { .. } => None,
        }
    }

    /// Returns `true` if the candidate ran and matched the golden module.
    pub fn is_passing(&self) -> bool {
        self.verdict().is_some_and(|v| !v.has_divergence)
    }
}

impl fmt::Display for CandidateOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            Outcome::Simulated { verdict, .. } if verdict.has_divergence => {
                write!(f, "{}: divergence (seed {})", self.name, verdict.seed)
            }
            Outcome::Simulated { verdict, .. } => {
                write!(f, "{}: pass (seed {})", self.name, verdict.seed)
            }
            Outcome::Failed(failure) => write!(f, "{}: error: {failure}", self.name),
        }
    }
}

/// A harness known to pass against the generated golden module.
#[derive(Debug)]
pub struct Deliverable {
    /// Name of the candidate the harness passed against.
    pub candidate: String,
    /// The harness text.
    pub harness: String,
    /// The passing verdict.
    pub verdict: SimulationVerdict,
    /// The generated golden module, as simulated.
    pub golden: String,
    /// Every candidate's outcome, in input order.
    pub outcomes: Vec<CandidateOutcome>,
}
