//! Running a synthesized harness through an external simulator.
//!
//! A [`Simulator`] stages the harness and both modules in a private
//! temporary directory, drives a [`SimulationToolchain`] through its compile
//! and execute phases under a timeout, and classifies the printed output
//! into a [`SimulationVerdict`]. The directory is removed on every exit
//! path, including cancellation.

#![warn(missing_docs)]

pub mod error;
pub mod icarus;
pub mod simulator;
pub mod toolchain;

pub use error::SimError;
pub use icarus::IcarusToolchain;
pub use simulator::{SimulationRequest, SimulationVerdict, Simulator};
pub use toolchain::{SimulationToolchain, ToolOutput};
