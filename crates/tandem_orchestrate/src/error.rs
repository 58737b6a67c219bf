//! Orchestration error types.

use crate::outcome::CandidateOutcome;
use std::io;
use std::time::Duration;
use tandem_sim::SimError;
use tandem_verilog::{ExtractError, Incompatibility};

/// Errors from the text-generation collaborator.
#[derive(Debug, thiserror::Error)]
pub enum ProposerError {
    /// The proposer command could not be started.
    #[error("failed to launch proposer `{program}`: {source}")]
    Launch {
        /// The program that failed to start.
        program: String,
        /// The underlying OS error.
        #[source]
        source: io::Error,
    },

    /// Reading from or writing to the proposer failed.
    #[error("proposer I/O failed: {0}")]
    Io(#[from] io::Error),

    /// The proposer exited unsuccessfully.
    #[error("proposer exited with status {status:?}: {stderr}")]
    Failed {
        /// Exit code, or `None` if killed by a signal.
        status: Option<i32>,
        /// What the proposer printed to stderr.
        stderr: String,
    },

    /// The proposer did not answer in time.
    #[error("proposer timed out after {}s", .0.as_secs())]
    TimedOut(Duration),
}

/// Why one candidate could not produce a verdict. Never aborts siblings.
#[derive(Debug, thiserror::Error)]
pub enum CandidateFailure {
    /// The candidate's interface could not be extracted.
    #[error(transparent)]
    Malformed(#[from] ExtractError),

    /// The candidate's interface differs from the golden module's.
    #[error(transparent)]
    Incompatible(#[from] Incompatibility),

    /// The toolchain failed or timed out.
    #[error("toolchain error: {0}")]
    Toolchain(#[from] SimError),

    /// The simulation task ended without reporting back.
    #[error("simulation task aborted: {0}")]
    Aborted(String),
}

/// Errors that end an orchestration run.
#[derive(Debug, thiserror::Error)]
pub enum OrchestrateError {
    /// The proposer failed.
    #[error("golden module generation failed: {0}")]
    Proposer(#[from] ProposerError),

    /// The proposer answered without a `module ... endmodule` span.
    #[error("no module definition found in the generated response")]
    NoModuleInResponse,

    /// The generated golden module has no usable interface.
    #[error("generated golden module is unusable: {0}")]
    MalformedGolden(#[source] ExtractError),

    /// The background preparation stage panicked or was cancelled.
    #[error("candidate preparation did not complete: {0}")]
    Preparation(#[from] tokio::task::JoinError),

    /// Every candidate diverged or failed.
    #[error("no candidate produced a passing harness ({} tried)", outcomes.len())]
    NoPassingHarness {
        /// What happened to each candidate, in input order.
        outcomes: Vec<CandidateOutcome>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(
            OrchestrateError::NoModuleInResponse.to_string(),
            "no module definition found in the generated response"
        );
        assert_eq!(
            OrchestrateError::NoPassingHarness {
                outcomes: Vec::new()
            }
            .to_string(),
            "no candidate produced a passing harness (0 tried)"
        );
        assert_eq!(
            ProposerError::TimedOut(Duration::from_secs(120)).to_string(),
            "proposer timed out after 120s"
        );
    }

    #[test]
    fn malformed_candidate_is_transparent() {
        let err = tandem_verilog::extract("wire w;").unwrap_err();
        let failure = CandidateFailure::from(err);
        assert_eq!(
            failure.to_string(),
            "malformed module: no module declaration found"
        );
    }
}
