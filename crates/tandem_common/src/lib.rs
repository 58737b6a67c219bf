//! Shared foundational types used across the tandem workspace.
//!
//! Currently this is the content fingerprint used to tag module sources and
//! synthesized harnesses so a simulation run can be traced back to the exact
//! text that produced it.

#![warn(missing_docs)]

pub mod hash;

pub use hash::ContentHash;
