//! Icarus Verilog (`iverilog` + `vvp`) as the simulation toolchain.

use crate::error::SimError;
use crate::toolchain::{SimulationToolchain, ToolOutput};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tandem_config::ToolchainConfig;
use tokio::process::Command;

/// Runs `<compiler> <compiler_args> -o <unit> <sources>` and then
/// `<runtime> <runtime_args> <unit>`.
#[derive(Clone, Debug)]
pub struct IcarusToolchain {
    compiler: String,
    compiler_args: Vec<String>,
    runtime: String,
    runtime_args: Vec<String>,
}

impl IcarusToolchain {
    /// Uses the programs and arguments from configuration.
    pub fn from_config(config: &ToolchainConfig) -> Self {
        Self {
            compiler: config.compiler.clone(),
            compiler_args: config.compiler_args.clone(),
            runtime: config.runtime.clone(),
            runtime_args: config.runtime_args.clone(),
        }
    }

    async fn run(
        &self,
        program: &str,
        args: Vec<&std::ffi::OsStr>,
        workdir: &Path,
    ) -> Result<ToolOutput, SimError> {
        tracing::debug!(program, ?args, workdir = %workdir.display(), "running toolchain");
        let output = Command::new(program)
            .args(args)
            .current_dir(workdir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| SimError::Launch {
                program: program.to_string(),
                source,
            })?;
        Ok(ToolOutput::from_process(output))
    }
}

impl Default for IcarusToolchain {
    fn default() -> Self {
        Self::from_config(&ToolchainConfig::default())
    }
}

#[async_trait]
impl SimulationToolchain for IcarusToolchain {
    async fn compile(
        &self,
        workdir: &Path,
        sources: &[PathBuf],
        output: &Path,
    ) -> Result<ToolOutput, SimError> {
        let mut args: Vec<&std::ffi::OsStr> =
            self.compiler_args.iter().map(|a| a.as_ref()).collect();
        args.push("-o".as_ref());
        args.push(output.as_os_str());
        args.extend(sources.iter().map(|s| s.as_os_str()));
        self.run(&self.compiler, args, workdir).await
    }

    async fn execute(&self, workdir: &Path, unit: &Path) -> Result<ToolOutput, SimError> {
        let mut args: Vec<&std::ffi::OsStr> =
            self.runtime_args.iter().map(|a| a.as_ref()).collect();
        args.push(unit.as_os_str());
        self.run(&self.runtime, args, workdir).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_uses_iverilog_and_vvp() {
        let tc = IcarusToolchain::default();
        assert_eq!(tc.compiler, "iverilog");
        assert_eq!(tc.compiler_args, vec!["-g2005"]);
        assert_eq!(tc.runtime, "vvp");
    }

    #[tokio::test]
    async fn missing_program_is_launch_error() {
        let tc = IcarusToolchain {
            compiler: "tandem-no-such-compiler".to_string(),
            compiler_args: Vec::new(),
            runtime: "tandem-no-such-runtime".to_string(),
            runtime_args: Vec::new(),
        };
        let dir = tempfile::tempdir().unwrap();
        let err = tc
            .compile(dir.path(), &[dir.path().join("a.v")], &dir.path().join("out"))
            .await
            .unwrap_err();
        assert!(matches!(err, SimError::Launch { ref program, .. } if program == "tandem-no-such-compiler"));
    }
}
