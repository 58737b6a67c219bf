//! Classifying simulator output.
//!
//! The harness reports a divergence with a line ending in
//! [`DIVERGENCE_MARKER`]; the pass summary is worded so it never contains
//! that phrase.

/// Phrase printed by the harness when a divergence is found.
pub const DIVERGENCE_MARKER: &str = "discrepancies found";

/// Summary printed when every trial matched. Takes the trial count.
pub const PASS_MESSAGE: &str = "Equivalence check passed: no mismatches after %0d tests.";

/// Returns `true` if `raw` simulator output reports a divergence.
pub fn interpret(raw: &str) -> bool {
    raw.to_ascii_lowercase().contains(DIVERGENCE_MARKER)
}
