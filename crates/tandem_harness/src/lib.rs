//! Differential test-harness synthesis and verdict classification.
//!
//! Given two interface-compatible modules, [`synthesize`] emits a
//! Verilog-2005 `testbench` module that instantiates both, drives them with
//! identical seeded pseudo-random stimulus, and stops at the first output
//! divergence. [`interpret`] classifies the simulator's printed output.

#![warn(missing_docs)]

pub mod interpret;
pub mod options;
pub mod spec;
pub mod synth;

pub use interpret::{interpret, DIVERGENCE_MARKER, PASS_MESSAGE};
pub use options::HarnessOptions;
pub use spec::{Comparison, HarnessSpec};
pub use synth::synthesize;
