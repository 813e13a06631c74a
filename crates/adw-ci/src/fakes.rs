//! Scripted command runner for tests.
//!
//! `ScriptedRunner` records every invocation and answers with the result of
//! the most recently added rule whose needle occurs in the joined command
//! line, or with the default result when nothing matches.

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::runner::{CommandRunner, ProcessResult};

/// One recorded call to [`ScriptedRunner::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub command: Vec<String>,
    pub working_dir: Option<PathBuf>,
    pub timeout: Duration,
}

impl RecordedCall {
    pub fn command_line(&self) -> String {
        self.command.join(" ")
    }
}

#[derive(Debug)]
pub struct ScriptedRunner {
    rules: Vec<(String, ProcessResult)>,
    default: ProcessResult,
    calls: Mutex<Vec<RecordedCall>>,
}

impl Default for ScriptedRunner {
    fn default() -> Self {
        Self {
            rules: Vec::new(),
            default: ProcessResult::success(""),
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl ScriptedRunner {
    /// A runner where every command succeeds with empty output.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer commands containing `needle` with `result`.
    pub fn respond(mut self, needle: impl Into<String>, result: ProcessResult) -> Self {
        self.rules.push((needle.into(), result));
        self
    }

    /// Result for commands matching no rule.
    pub fn otherwise(mut self, result: ProcessResult) -> Self {
        self.default = result;
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of recorded calls whose command line contains `needle`.
    pub fn count_matching(&self, needle: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.command_line().contains(needle))
            .count()
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(
        &self,
        command: &[String],
        working_dir: Option<&Path>,
        timeout: Duration,
    ) -> ProcessResult {
        let call = RecordedCall {
            command: command.to_vec(),
            working_dir: working_dir.map(Path::to_path_buf),
            timeout,
        };
        let line = call.command_line();
        self.calls.lock().unwrap().push(call);

        self.rules
            .iter()
            .rev()
            .find(|(needle, _)| line.contains(needle.as_str()))
            .map(|(_, result)| result.clone())
            .unwrap_or_else(|| self.default.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn later_rules_win_and_calls_recorded() {
        let runner = ScriptedRunner::new()
            .respond("node", ProcessResult::failure("first"))
            .respond("verify-env", ProcessResult::success("second"))
            .otherwise(ProcessResult::failure("nope"));

        let env = vec!["node".to_string(), "verify-env.js".to_string()];
        let other = vec!["node".to_string(), "x.js".to_string()];
        let git = vec!["git".to_string()];

        let t = Duration::from_secs(1);
        assert_eq!(runner.run(&env, None, t).await, ProcessResult::success("second"));
        assert_eq!(runner.run(&other, None, t).await, ProcessResult::failure("first"));
        assert_eq!(runner.run(&git, None, t).await, ProcessResult::failure("nope"));

        assert_eq!(runner.calls().len(), 3);
        assert_eq!(runner.count_matching("node"), 2);
    }
}
