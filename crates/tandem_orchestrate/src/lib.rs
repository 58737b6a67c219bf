//! Multi-candidate orchestration.
//!
//! An [`Orchestrator`] asks a [`ModuleProposer`] for a golden module matching
//! a natural-language description and the port header of a reference
//! candidate, runs the extract, check, synthesize and simulate pipeline for
//! every candidate, and returns one harness that passed.

#![warn(missing_docs)]

pub mod error;
pub mod orchestrator;
pub mod outcome;
pub mod prompt;
pub mod proposer;

pub use error::{CandidateFailure, OrchestrateError, ProposerError};
pub use orchestrator::{Candidate, Orchestrator};
pub use outcome::{CandidateOutcome, Deliverable, Outcome};
pub use prompt::{build_prompt, extract_module_text};
pub use proposer::{CommandProposer, ModuleProposer};
