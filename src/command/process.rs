// Runs commands as child processes via tokio

use async_trait::async_trait;
use log::debug;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

use super::{CommandError, CommandOutput, CommandRunner};

/// `CommandRunner` backed by real child processes.
///
/// Children are spawned with `kill_on_drop`, so cancelling the future that
/// awaits a command also terminates the process.
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner {
    timeout_ms: Option<u64>,
}

impl ProcessRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a timeout in milliseconds for every command
    pub fn timeout_ms(mut self, ms: Option<u64>) -> Self {
        self.timeout_ms = ms;
        self
    }
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput, CommandError> {
        debug!("Running: {} {}", program, args.join(" "));

        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| CommandError::Spawn {
                program: program.to_string(),
                source,
            })?;

        let output = match self.timeout_ms {
            Some(ms) => tokio::time::timeout(Duration::from_millis(ms), child.wait_with_output())
                .await
                .map_err(|_| CommandError::TimedOut {
                    program: program.to_string(),
                    timeout_ms: ms,
                })?,
            None => child.wait_with_output().await,
        }
        .map_err(|source| CommandError::Spawn {
            program: program.to_string(),
            source,
        })?;

        debug!("{} exited with {:?}", program, output.status.code());

        Ok(CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::run_out;

    fn sh(script: &str) -> Vec<String> {
        vec!["-c".to_string(), script.to_string()]
    }

    #[tokio::test]
    async fn test_run_echo() {
        let runner = ProcessRunner::new();
        let output = runner.run("sh", &sh("echo hello")).await.unwrap();
        assert!(output.success());
        assert_eq!(output.stdout.trim(), "hello");
    }

    #[tokio::test]
    async fn test_run_captures_stderr_and_code() {
        let runner = ProcessRunner::new();
        let output = runner.run("sh", &sh("echo oops >&2; exit 3")).await.unwrap();
        assert_eq!(output.code, Some(3));
        assert_eq!(output.stderr.trim(), "oops");
    }

    #[tokio::test]
    async fn test_run_out_nonzero() {
        let runner = ProcessRunner::new();
        let err = run_out(&runner, "sh", &sh("echo no such image >&2; exit 1"))
            .await
            .unwrap_err();
        assert!(err.output().contains("no such image"));
    }

    #[tokio::test]
    async fn test_run_missing_program() {
        let runner = ProcessRunner::new();
        let err = runner.run("nonexistent_command_xyz123", &[]).await.unwrap_err();
        assert!(matches!(err, CommandError::Spawn { .. }));
    }

    #[tokio::test]
    async fn test_run_timeout() {
        let runner = ProcessRunner::new().timeout_ms(Some(100));
        let err = runner.run("sh", &sh("sleep 10")).await.unwrap_err();
        assert!(matches!(err, CommandError::TimedOut { timeout_ms: 100, .. }));
    }
}
