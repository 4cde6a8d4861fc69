//! External command plumbing.
//!
//! Everything kindload does outside the process (querying nodes, loading
//! images, reading the kube context) goes through a `CommandRunner`, so the
//! callers can be exercised with fakes.

mod process;

pub use process::ProcessRunner;

use async_trait::async_trait;
use thiserror::Error;

/// Captured result of a finished command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when terminated by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Successful output with the given stdout
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Failed output with the given exit code and stderr
    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// stdout followed by stderr, trimmed
    pub fn combined(&self) -> String {
        let stdout = self.stdout.trim();
        let stderr = self.stderr.trim();
        match (stdout.is_empty(), stderr.is_empty()) {
            (true, _) => stderr.to_string(),
            (false, true) => stdout.to_string(),
            (false, false) => format!("{}\n{}", stdout, stderr),
        }
    }
}

/// Errors raised while running an external command
#[derive(Debug, Error)]
pub enum CommandError {
    /// The program could not be started
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The program ran but exited unsuccessfully
    #[error("{program} exited with status {}", display_code(.code))]
    Failed {
        program: String,
        code: Option<i32>,
        output: String,
    },

    /// The program did not finish in time
    #[error("{program} timed out after {timeout_ms}ms")]
    TimedOut { program: String, timeout_ms: u64 },
}

fn display_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "signal".to_string(),
    }
}

impl CommandError {
    /// Output captured before the failure, empty if none
    pub fn output(&self) -> &str {
        match self {
            CommandError::Failed { output, .. } => output,
            _ => "",
        }
    }
}

/// Runs a program to completion and captures its output
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput, CommandError>;
}

/// Run a command and return its stdout, failing on a non-zero exit
pub async fn run_out(
    runner: &dyn CommandRunner,
    program: &str,
    args: &[String],
) -> Result<String, CommandError> {
    let output = runner.run(program, args).await?;
    if output.success() {
        Ok(output.stdout)
    } else {
        Err(CommandError::Failed {
            program: program.to_string(),
            code: output.code,
            output: output.combined(),
        })
    }
}
