//! Staging, running and classifying one simulation.

use crate::error::SimError;
use crate::icarus::IcarusToolchain;
use crate::toolchain::SimulationToolchain;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tandem_common::ContentHash;
use tandem_config::ToolchainConfig;

/// File name of the staged harness; compiled first as the entry point.
pub const HARNESS_FILE: &str = "testbench.v";
/// File name of the staged golden module.
pub const GOLDEN_FILE: &str = "golden.v";
/// File name of the staged candidate module.
pub const CANDIDATE_FILE: &str = "candidate.v";
/// File name of the compiled unit.
pub const UNIT_FILE: &str = "testbench.vvp";

/// The three texts of one differential run.
#[derive(Clone, Debug)]
pub struct SimulationRequest {
    /// Golden module source.
    pub golden: String,
    /// Candidate module source.
    pub candidate: String,
    /// Synthesized harness source.
    pub harness: String,
    /// Seed the harness was synthesized with, carried into the verdict.
    pub seed: u32,
}

/// Classified outcome of a simulation that ran to completion.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SimulationVerdict {
    /// Everything the simulation printed to stdout.
    pub raw: String,
    /// Whether the harness reported a divergence.
    pub has_divergence: bool,
    /// Stimulus seed, for replay.
    pub seed: u32,
    /// Fingerprint of the harness text that produced this verdict.
    pub harness_hash: ContentHash,
}

impl SimulationVerdict {
    /// Classifies raw output produced by `harness` under `seed`.
    pub fn classify(raw: String, seed: u32, harness: &str) -> Self {
        Self {
            has_divergence: tandem_harness::interpret(&raw),
            raw,
            seed,
            harness_hash: ContentHash::of_text(harness),
        }
    }
}

/// Runs requests through a toolchain with a per-run time limit.
#[derive(Clone)]
pub struct Simulator {
    toolchain: Arc<dyn SimulationToolchain>,
    timeout: Duration,
}

impl Simulator {
    /// Creates a simulator over any toolchain.
    pub fn new(toolchain: Arc<dyn SimulationToolchain>, timeout: Duration) -> Self {
        Self { toolchain, timeout }
    }

    /// Creates an Icarus-backed simulator from configuration.
    pub fn from_config(config: &ToolchainConfig) -> Self {
        Self::new(
            Arc::new(IcarusToolchain::from_config(config)),
            config.timeout(),
        )
    }

    /// The per-run time limit.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Stages the request in a fresh temporary directory, compiles the
    /// harness with both modules, runs it and classifies its output.
    ///
    /// A failed compile, a launch failure or an exceeded time limit is an
    /// error; the execute phase's exit status is not consulted.
    pub async fn run(&self, request: &SimulationRequest) -> Result<SimulationVerdict, SimError> {
        let workspace = tempfile::Builder::new().prefix("tandem-sim-").tempdir()?;
        let dir = workspace.path().to_path_buf();
        tracing::debug!(workspace = %dir.display(), seed = request.seed, "staging simulation");

        let mut sources: Vec<PathBuf> = Vec::with_capacity(3);
        for (name, text) in [
            (HARNESS_FILE, &request.harness),
            (GOLDEN_FILE, &request.golden),
            (CANDIDATE_FILE, &request.candidate),
        ] {
            let path = dir.join(name);
            tokio::fs::write(&path, text).await?;
            sources.push(path);
        }
        let unit = dir.join(UNIT_FILE);

        let phases = async {
            let compiled = self.toolchain.compile(&dir, &sources, &unit).await?;
            if !compiled.success() {
                let log = if compiled.stderr.trim().is_empty() {
                    compiled.stdout
                } else {
                    compiled.stderr
                };
                return Err(SimError::CompileFailed {
                    status: compiled.status,
                    log,
                });
            }
            let executed = self.toolchain.execute(&dir, &unit).await?;
            if !executed.success() {
                tracing::debug!(status = ?executed.status, "simulation exited unsuccessfully");
            }
            Ok::<_, SimError>(executed.stdout)
        };

        let raw = tokio::time::timeout(self.timeout, phases)
            .await
            .map_err(|_| SimError::TimedOut(self.timeout))??;
        let verdict = SimulationVerdict::classify(raw, request.seed, &request.harness);
        tracing::info!(
            divergence = verdict.has_divergence,
            harness = %verdict.harness_hash.short(),
            "simulation finished"
        );
        Ok(verdict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toolchain::ToolOutput;
    use async_trait::async_trait;
    use std::path::Path;
    use std::sync::Mutex;

    /// Toolchain that prints canned output and remembers where it ran.
    #[derive(Default)]
    struct FakeToolchain {
        compile_status: i32,
        stdout: String,
        hang: bool,
        workdirs: Mutex<Vec<PathBuf>>,
        staged: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl SimulationToolchain for FakeToolchain {
        async fn compile(
            &self,
            workdir: &Path,
            sources: &[PathBuf],
            output: &Path,
        ) -> Result<ToolOutput, SimError> {
            self.workdirs.lock().unwrap().push(workdir.to_path_buf());
            for source in sources {
                let name = source.file_name().unwrap().to_string_lossy().into_owned();
                let text = std::fs::read_to_string(source).unwrap();
                self.staged.lock().unwrap().push((name, text));
            }
            if self.hang {
                tokio::time::sleep(Duration::from_secs(30)).await;
            }
            std::fs::write(output, b"unit").unwrap();
            Ok(ToolOutput {
                status: Some(self.compile_status),
                stdout: String::new(),
                stderr: if self.compile_status == 0 {
                    String::new()
                } else {
                    "candidate.v:1: syntax error".to_string()
                },
            })
        }

        async fn execute(&self, _workdir: &Path, unit: &Path) -> Result<ToolOutput, SimError> {
            assert!(unit.exists());
            Ok(ToolOutput {
                status: Some(0),
                stdout: self.stdout.clone(),
                stderr: String::new(),
            })
        }
    }

    fn request() -> SimulationRequest {
        SimulationRequest {
            golden: "module g; endmodule\n".to_string(),
            candidate: "module c; endmodule\n".to_string(),
            harness: "module testbench; endmodule\n".to_string(),
            seed: 99,
        }
    }

    fn simulator(fake: Arc<FakeToolchain>, timeout: Duration) -> Simulator {
        Simulator::new(fake, timeout)
    }

    #[tokio::test]
    async fn stages_harness_first() {
        let fake = Arc::new(FakeToolchain::default());
        simulator(fake.clone(), Duration::from_secs(5))
            .run(&request())
            .await
            .unwrap();
        let staged = fake.staged.lock().unwrap().clone();
        let names: Vec<&str> = staged.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec![HARNESS_FILE, GOLDEN_FILE, CANDIDATE_FILE]);
        assert_eq!(staged[0].1, "module testbench; endmodule\n");
        assert_eq!(staged[2].1, "module c; endmodule\n");
    }

    #[tokio::test]
    async fn passing_output() {
        let fake = Arc::new(FakeToolchain {
            stdout: "Equivalence check passed: no mismatches after 1000 tests.\n".to_string(),
            ..FakeToolchain::default()
        });
        let verdict = simulator(fake, Duration::from_secs(5))
            .run(&request())
            .await
            .unwrap();
        assert!(!verdict.has_divergence);
        assert_eq!(verdict.seed, 99);
        assert_eq!(
            verdict.harness_hash,
            ContentHash::of_text("module testbench; endmodule\n")
        );
    }

    #[tokio::test]
    async fn divergent_output() {
        let fake = Arc::new(FakeToolchain {
            stdout: "Mismatch on output y at time 40000\n1 discrepancies found.\n".to_string(),
            ..FakeToolchain::default()
        });
        let verdict = simulator(fake, Duration::from_secs(5))
            .run(&request())
            .await
            .unwrap();
        assert!(verdict.has_divergence);
        assert!(verdict.raw.starts_with("Mismatch"));
    }

    #[tokio::test]
    async fn compile_failure_is_error_and_cleans_up() {
        let fake = Arc::new(FakeToolchain {
            compile_status: 1,
            ..FakeToolchain::default()
        });
        let err = simulator(fake.clone(), Duration::from_secs(5))
            .run(&request())
            .await
            .unwrap_err();
        match err {
            SimError::CompileFailed { status, log } => {
                assert_eq!(status, Some(1));
                assert!(log.contains("syntax error"));
            }
            other => panic!("expected compile failure, got {other:?}"),
        }
        let dirs = fake.workdirs.lock().unwrap().clone();
        assert_eq!(dirs.len(), 1);
        assert!(!dirs[0].exists());
    }

    #[tokio::test]
    async fn hang_times_out_and_cleans_up() {
        let fake = Arc::new(FakeToolchain {
            hang: true,
            ..FakeToolchain::default()
        });
        let err = simulator(fake.clone(), Duration::from_millis(100))
            .run(&request())
            .await
            .unwrap_err();
        assert!(matches!(err, SimError::TimedOut(d) if d == Duration::from_millis(100)));
        let dirs = fake.workdirs.lock().unwrap().clone();
        assert!(!dirs[0].exists());
    }

    #[tokio::test]
    async fn workspaces_are_isolated() {
        let fake = Arc::new(FakeToolchain::default());
        let sim = simulator(fake.clone(), Duration::from_secs(5));
        let (req_a, req_b) = (request(), request());
        let (a, b) = tokio::join!(sim.run(&req_a), sim.run(&req_b));
        a.unwrap();
        b.unwrap();
        let dirs = fake.workdirs.lock().unwrap().clone();
        assert_eq!(dirs.len(), 2);
        assert_ne!(dirs[0], dirs[1]);
        assert!(dirs.iter().all(|d| !d.exists()));
    }

    #[test]
    fn verdict_serializes() {
        let verdict = SimulationVerdict::classify("3 Discrepancies Found".into(), 7, "tb");
        let json = serde_json::to_value(&verdict).unwrap();
        assert_eq!(json["has_divergence"], true);
        assert_eq!(json["seed"], 7);
    }
}
