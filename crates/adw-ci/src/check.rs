//! Check definitions.
//!
//! A [`CheckSpec`] is a name plus one async action returning a
//! [`CheckVerdict`]. Command-backed checks are described by [`CommandCheck`]
//! and turned into a spec bound to a [`CommandRunner`].

use adw_core::{CheckOutcome, CheckVerdict};
use futures::future::{BoxFuture, FutureExt};
use std::fmt;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::runner::{CommandRunner, ProcessResult};

/// Shared, re-invocable check action.
pub type CheckAction = Arc<dyn Fn() -> BoxFuture<'static, CheckVerdict> + Send + Sync>;

/// One named verification step. Immutable; cloning shares the action.
#[derive(Clone)]
pub struct CheckSpec {
    name: String,
    description: Option<String>,
    action: CheckAction,
}

impl CheckSpec {
    pub fn new<F, Fut>(name: impl Into<String>, action: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = CheckVerdict> + Send + 'static,
    {
        Self {
            name: name.into(),
            description: None,
            action: Arc::new(move || action().boxed()),
        }
    }

    /// Progress line shown while the check runs, e.g. "Testing database connection...".
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Invoke the action once and stamp the verdict.
    pub async fn execute(&self) -> CheckOutcome {
        let verdict = (self.action)().await;
        CheckOutcome::from_verdict(self.name.clone(), verdict)
    }
}

impl fmt::Debug for CheckSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckSpec")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Description of a check backed by a single external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandCheck {
    /// Human-readable check name.
    pub name: String,

    /// Command to execute (first element is executable).
    pub command: Vec<String>,

    /// Directory to run in; `None` means the current directory.
    pub working_dir: Option<PathBuf>,

    /// Timeout in seconds.
    pub timeout_secs: u64,

    pub pass_message: String,
    pub fail_message: String,

    /// `output` detail recorded when the check passes.
    pub pass_detail: String,

    /// Maximum characters of failing output kept in details.
    pub detail_limit: usize,
}

impl CommandCheck {
    /// Create a custom command check with generic messages.
    pub fn custom(name: impl Into<String>, command: Vec<String>, timeout_secs: u64) -> Self {
        Self {
            name: name.into(),
            command,
            working_dir: None,
            timeout_secs,
            pass_message: "Passed".to_string(),
            fail_message: "Failed".to_string(),
            pass_detail: "OK".to_string(),
            detail_limit: adw_core::config::DEFAULT_DETAIL_LIMIT,
        }
    }

    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn with_messages(mut self, pass: impl Into<String>, fail: impl Into<String>) -> Self {
        self.pass_message = pass.into();
        self.fail_message = fail.into();
        self
    }

    pub fn with_pass_detail(mut self, detail: impl Into<String>) -> Self {
        self.pass_detail = detail.into();
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn with_detail_limit(mut self, limit: usize) -> Self {
        self.detail_limit = limit;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Map a process result onto this check's messages.
    pub fn verdict(&self, result: &ProcessResult) -> CheckVerdict {
        if result.success {
            CheckVerdict::pass(&self.pass_message).with_detail("output", &self.pass_detail)
        } else {
            CheckVerdict::fail(&self.fail_message).with_detail(
                "output",
                truncate_chars(&result.combined_output, self.detail_limit),
            )
        }
    }

    /// Bind this description to a runner.
    pub fn into_spec(self, runner: Arc<dyn CommandRunner>) -> CheckSpec {
        let name = self.name.clone();
        let check = Arc::new(self);
        CheckSpec::new(name, move || {
            let check = Arc::clone(&check);
            let runner = Arc::clone(&runner);
            async move {
                let result = runner
                    .run(&check.command, check.working_dir.as_deref(), check.timeout())
                    .await;
                check.verdict(&result)
            }
        })
    }
}

/// First `limit` characters of `s`.
pub fn truncate_chars(s: &str, limit: usize) -> String {
    s.chars().take(limit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::ScriptedRunner;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_spec_execute_stamps_name() {
        let spec = CheckSpec::new("always", || async { CheckVerdict::pass("fine") });
        let outcome = spec.execute().await;
        assert_eq!(outcome.name, "always");
        assert!(outcome.success);
        assert_eq!(outcome.message, "fine");
    }

    #[tokio::test]
    async fn test_spec_reusable_across_runs() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let spec = CheckSpec::new("counted", move || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                CheckVerdict::pass("ok")
            }
        });

        let copy = spec.clone();
        spec.execute().await;
        copy.execute().await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_command_check_verdict_pass() {
        let check = CommandCheck::custom("db", vec!["node".into()], 60)
            .with_messages("Database is accessible", "Database connection failed")
            .with_pass_detail("Connected");
        let verdict = check.verdict(&ProcessResult::success("lots of logs"));
        assert!(verdict.success);
        assert_eq!(verdict.message, "Database is accessible");
        assert_eq!(verdict.details["output"], "Connected");
    }

    #[test]
    fn test_command_check_verdict_truncates_failure_output() {
        let check = CommandCheck::custom("db", vec!["node".into()], 60).with_detail_limit(5);
        let verdict = check.verdict(&ProcessResult::failure("héllo world"));
        assert!(!verdict.success);
        assert_eq!(verdict.message, "Failed");
        assert_eq!(verdict.details["output"], "héllo");
    }

    #[tokio::test]
    async fn test_into_spec_uses_runner() {
        let runner = Arc::new(
            ScriptedRunner::new().respond("tsc", ProcessResult::failure("error TS2322")),
        );
        let spec = CommandCheck::custom(
            "TypeScript Check",
            vec!["npx".into(), "tsc".into(), "--noEmit".into()],
            60,
        )
        .in_dir("kfa-website")
        .into_spec(runner.clone());

        let outcome = spec.execute().await;
        assert!(!outcome.success);
        assert_eq!(outcome.output(), Some("error TS2322"));

        let calls = runner.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].working_dir, Some(PathBuf::from("kfa-website")));
        assert_eq!(calls[0].timeout, Duration::from_secs(60));
    }
}
