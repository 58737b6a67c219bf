//! The text-generation capability.

use crate::error::ProposerError;
use async_trait::async_trait;
use std::io;
use std::process::Stdio;
use std::time::Duration;
use tandem_config::ProposerConfig;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Produces free-form text, expected to contain a module, from a prompt.
#[async_trait]
pub trait ModuleProposer: Send + Sync {
    /// Answers `prompt`.
    async fn propose(&self, prompt: &str) -> Result<String, ProposerError>;
}

/// Runs an external command with the prompt on stdin and takes its stdout
/// as the response.
#[derive(Clone, Debug)]
pub struct CommandProposer {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandProposer {
    /// Creates a proposer for `program args...`.
    pub fn new(program: impl Into<String>, args: Vec<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args,
            timeout,
        }
    }

    /// Creates a proposer from configuration, or `None` when no command is
    /// configured.
    pub fn from_config(config: &ProposerConfig) -> Option<Self> {
        let program = config.command.as_ref()?;
        Some(Self::new(program.clone(), config.args.clone(), config.timeout()))
    }
}

#[async_trait]
impl ModuleProposer for CommandProposer {
    async fn propose(&self, prompt: &str) -> Result<String, ProposerError> {
        tracing::info!(program = %self.program, "requesting golden module");
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ProposerError::Launch {
                program: self.program.clone(),
                source,
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| io::Error::new(io::ErrorKind::BrokenPipe, "proposer stdin unavailable"))?;
        let feed = async move {
            match stdin.write_all(prompt.as_bytes()).await {
                // A command that answers without reading its input is fine.
                Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
                other => other,
            }
            // stdin is dropped here, closing the pipe
        };

        let exchange = async { tokio::try_join!(feed, child.wait_with_output()) };
        let (_, output) = tokio::time::timeout(self.timeout, exchange)
            .await
            .map_err(|_| ProposerError::TimedOut(self.timeout))??;

        if !output.status.success() {
            return Err(ProposerError::Failed {
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        let response = String::from_utf8_lossy(&output.stdout).into_owned();
        tracing::debug!(bytes = response.len(), "proposer answered");
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shell(script: &str, timeout: Duration) -> CommandProposer {
        CommandProposer::new("sh", vec!["-c".to_string(), script.to_string()], timeout)
    }

    #[test]
    fn from_config_requires_command() {
        assert!(CommandProposer::from_config(&ProposerConfig::default()).is_none());
        let config = ProposerConfig {
            command: Some("llm".to_string()),
            args: vec!["--quiet".to_string()],
            timeout_secs: 5,
        };
        let proposer = CommandProposer::from_config(&config).unwrap();
        assert_eq!(proposer.program, "llm");
        assert_eq!(proposer.timeout, Duration::from_secs(5));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn prompt_goes_to_stdin() {
        let proposer = shell("cat", Duration::from_secs(10));
        let response = proposer.propose("module echo; endmodule").await.unwrap();
        assert_eq!(response, "module echo; endmodule");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn nonzero_exit_is_failure() {
        let proposer = shell("echo quota exceeded >&2; exit 3", Duration::from_secs(10));
        let err = proposer.propose("prompt").await.unwrap_err();
        match err {
            ProposerError::Failed { status, stderr } => {
                assert_eq!(status, Some(3));
                assert_eq!(stderr, "quota exceeded");
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn slow_command_times_out() {
        let proposer = shell("sleep 30", Duration::from_millis(200));
        let err = proposer.propose("prompt").await.unwrap_err();
        assert!(matches!(err, ProposerError::TimedOut(_)));
    }

    #[tokio::test]
    async fn missing_program_is_launch_error() {
        let proposer = CommandProposer::new("tandem-no-such-llm", Vec::new(), Duration::from_secs(1));
        let err = proposer.propose("prompt").await.unwrap_err();
        assert!(matches!(err, ProposerError::Launch { .. }));
    }
}
