//! The compile-then-execute simulator capability.

use crate::error::SimError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Captured result of one toolchain phase.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ToolOutput {
    /// Exit code, or `None` if the process was killed by a signal.
    pub status: Option<i32>,
    /// Standard output, lossily decoded.
    pub stdout: String,
    /// Standard error, lossily decoded.
    pub stderr: String,
}

impl ToolOutput {
    /// Returns `true` if the process exited with status 0.
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }

    pub(crate) fn from_process(output: std::process::Output) -> Self {
        Self {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

/// A two-phase external simulator.
///
/// Implementations must not outlive a dropped call: when the future is
/// dropped (timeout or cancellation) any spawned process has to die with it.
#[async_trait]
pub trait SimulationToolchain: Send + Sync {
    /// Compiles `sources`, in order, into a runnable unit at `output`.
    async fn compile(
        &self,
        workdir: &Path,
        sources: &[PathBuf],
        output: &Path,
    ) -> Result<ToolOutput, SimError>;

    /// Runs a unit produced by [`compile`](Self::compile).
    async fn execute(&self, workdir: &Path, unit: &Path) -> Result<ToolOutput, SimError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_requires_zero_status() {
        let ok = ToolOutput {
            status: Some(0),
            ..ToolOutput::default()
        };
        assert!(ok.success());
        assert!(!ToolOutput::default().success());
        let failed = ToolOutput {
            status: Some(1),
            ..ToolOutput::default()
        };
        assert!(!failed.success());
    }
}
