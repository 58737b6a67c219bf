//! Simulation error types.
//!
//! Every variant means the pair could not be tested at all; none of them is
//! a divergence.

use std::io;
use std::time::Duration;

/// Errors raised while staging, compiling or running a simulation.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// The temporary workspace could not be created or written.
    #[error("failed to stage simulation workspace: {0}")]
    Workspace(#[from] io::Error),

    /// A toolchain program could not be started.
    #[error("failed to launch `{program}`: {source}")]
    Launch {
        /// The program that failed to start.
        program: String,
        /// The underlying OS error.
        #[source]
        source: io::Error,
    },

    /// The compile phase exited unsuccessfully.
    #[error("compilation failed ({}):\n{log}", describe_status(.status))]
    CompileFailed {
        /// Exit code, or `None` if the compiler was killed by a signal.
        status: Option<i32>,
        /// Compiler diagnostics (stderr, falling back to stdout).
        log: String,
    },

    /// Compile and execute together exceeded the configured limit.
    #[error("simulation timed out after {}s", .0.as_secs_f64())]
    TimedOut(Duration),
}

fn describe_status(status: &Option<i32>) -> String {
    match *status {
        Some(code) => format!("exit code {code}"),
        None => "terminated by signal".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_compile_failed() {
        let err = SimError::CompileFailed {
            status: Some(2),
            log: "golden.v:3: syntax error".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "compilation failed (exit code 2):\ngolden.v:3: syntax error"
        );
        let err = SimError::CompileFailed {
            status: None,
            log: String::new(),
        };
        assert!(err.to_string().contains("terminated by signal"));
    }

    #[test]
    fn display_timed_out() {
        let err = SimError::TimedOut(Duration::from_millis(1500));
        assert_eq!(err.to_string(), "simulation timed out after 1.5s");
    }

    #[test]
    fn display_launch() {
        let err = SimError::Launch {
            program: "iverilog".to_string(),
            source: io::Error::new(io::ErrorKind::NotFound, "No such file or directory"),
        };
        assert_eq!(
            err.to_string(),
            "failed to launch `iverilog`: No such file or directory"
        );
    }
}
