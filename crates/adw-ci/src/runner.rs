//! External command execution.
//!
//! Every failure mode (non-zero exit, timeout, launch failure) comes back as
//! a [`ProcessResult`] with `success == false`; nothing here returns an error,
//! so a single broken check can never interrupt the pipeline around it.

use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

/// Outcome of one external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessResult {
    /// Whether the command exited with code 0.
    pub success: bool,

    /// stdout followed by stderr, or a diagnostic when the command did not run
    /// to completion.
    pub combined_output: String,
}

impl ProcessResult {
    pub fn success(combined_output: impl Into<String>) -> Self {
        Self {
            success: true,
            combined_output: combined_output.into(),
        }
    }

    pub fn failure(combined_output: impl Into<String>) -> Self {
        Self {
            success: false,
            combined_output: combined_output.into(),
        }
    }

    /// The fixed result reported when a command exceeds its timeout.
    pub fn timed_out(timeout: Duration) -> Self {
        Self::failure(timeout_message(timeout))
    }
}

/// Diagnostic used in place of output for a timed-out command.
pub fn timeout_message(timeout: Duration) -> String {
    format!("Command timed out after {} seconds", timeout.as_secs())
}

/// Runs external commands on behalf of checks.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `command` (first element is the executable) in `working_dir`, or
    /// the current directory when `None`, killing it after `timeout`.
    async fn run(
        &self,
        command: &[String],
        working_dir: Option<&Path>,
        timeout: Duration,
    ) -> ProcessResult;
}

/// [`CommandRunner`] backed by real child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(
        &self,
        command: &[String],
        working_dir: Option<&Path>,
        timeout: Duration,
    ) -> ProcessResult {
        let Some((exe, args)) = command.split_first() else {
            return ProcessResult::failure("empty command");
        };

        let mut cmd = Command::new(exe);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = working_dir {
            cmd.current_dir(dir);
        }

        debug!(command = %command.join(" "), timeout_secs = timeout.as_secs(), "Spawning command");

        let child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => return ProcessResult::failure(format!("failed to launch {exe}: {e}")),
        };

        // Dropping the wait future on timeout drops the child, which kills it.
        match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => {
                let mut combined_output = String::from_utf8_lossy(&output.stdout).into_owned();
                combined_output.push_str(&String::from_utf8_lossy(&output.stderr));
                ProcessResult {
                    success: output.status.success(),
                    combined_output,
                }
            }
            Ok(Err(e)) => ProcessResult::failure(format!("failed to wait for {exe}: {e}")),
            Err(_) => ProcessResult::timed_out(timeout),
        }
    }
}
