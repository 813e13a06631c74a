//! Deploy workflow.
//!
//! `START -> PRE_CHECKS -> {ABORTED, DEPLOY_TRIGGER} -> {ABORTED, POST_CHECKS}
//! -> {SUCCESS, DEGRADED}`
//!
//! The hosting platform deploys whatever is committed on the default branch,
//! so the trigger step refuses to continue while the working tree is dirty.
//! A status query that fails is only a warning: the deploy goes ahead.
//!
//! Every command of a deploy, checks included, runs under the deploy timeout.

use adw_core::obs::{emit_deploy_state, emit_force_override};
use adw_core::{porcelain_changes, status_porcelain_command, PipelineRun, ProjectConfig, Result};
use std::fmt;
use std::io::Write;
use std::sync::Arc;
use tracing::{info, warn};

use crate::builtin::BuiltinCheck;
use crate::check::{truncate_chars, CheckSpec};
use crate::pipeline::CheckPipeline;
use crate::reporter::ResultReporter;
use crate::runner::CommandRunner;

use super::exit_code;
use super::testing::TestWorkflow;

const PLATFORM_STATUS_SCRIPT: &str = "agent-tools/vercel/check-frontend.js";
const PLATFORM_DASHBOARD: &str = "https://vercel.com/dashboard";

/// Operator flags for one deploy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeployOptions {
    /// Leave the nested quick test suite out of the pre-deploy checks.
    pub skip_tests: bool,

    /// Continue to the trigger even when pre-deploy checks failed.
    pub force: bool,
}

/// Why a deploy stopped before reaching the post-deploy checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbortReason {
    PreChecksFailed,
    UncommittedChanges(Vec<String>),
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbortReason::PreChecksFailed => write!(f, "pre-deployment checks failed"),
            AbortReason::UncommittedChanges(paths) => {
                write!(f, "{} uncommitted change(s)", paths.len())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeployState {
    Start,
    PreChecks,
    DeployTrigger,
    PostChecks,
    Success,
    Degraded,
    Aborted(AbortReason),
}

impl DeployState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            DeployState::Success | DeployState::Degraded | DeployState::Aborted(_)
        )
    }
}

impl fmt::Display for DeployState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeployState::Start => write!(f, "start"),
            DeployState::PreChecks => write!(f, "pre_checks"),
            DeployState::DeployTrigger => write!(f, "deploy_trigger"),
            DeployState::PostChecks => write!(f, "post_checks"),
            DeployState::Success => write!(f, "success"),
            DeployState::Degraded => write!(f, "degraded"),
            DeployState::Aborted(reason) => write!(f, "aborted ({reason})"),
        }
    }
}

/// Result of the deploy-trigger step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// The platform picks up the pushed commit. The platform status probe
    /// is informational only.
    Triggered {
        /// Why the working tree could not be inspected, if it could not.
        status_error: Option<String>,
        platform_status_ok: bool,
    },

    UncommittedChanges(Vec<String>),
}

impl TriggerOutcome {
    pub fn triggered(&self) -> bool {
        matches!(self, TriggerOutcome::Triggered { .. })
    }
}

/// Everything one deploy invocation did.
#[derive(Debug, Clone)]
pub struct DeployOutcome {
    /// Every state visited, ending with the terminal state.
    pub transitions: Vec<DeployState>,
    pub forced: bool,
    pub pre_run: PipelineRun,
    pub trigger: Option<TriggerOutcome>,
    pub post_run: Option<PipelineRun>,
}

impl DeployOutcome {
    pub fn state(&self) -> &DeployState {
        static START: DeployState = DeployState::Start;
        self.transitions.last().unwrap_or(&START)
    }

    pub fn success(&self) -> bool {
        *self.state() == DeployState::Success
    }

    pub fn exit_code(&self) -> u8 {
        exit_code(self.success())
    }
}

pub struct DeployWorkflow {
    config: ProjectConfig,
    runner: Arc<dyn CommandRunner>,
}

impl DeployWorkflow {
    pub fn new(config: ProjectConfig, runner: Arc<dyn CommandRunner>) -> Self {
        Self { config, runner }
    }

    pub fn pre_deploy_pipeline(&self, options: DeployOptions) -> CheckPipeline {
        let mut checks: Vec<_> = [
            BuiltinCheck::EnvironmentVariables,
            BuiltinCheck::DatabaseConnection,
            BuiltinCheck::TypeScriptCheck,
            BuiltinCheck::FrontendBuild,
        ]
        .iter()
        .map(|check| self.deploy_check(*check))
        .collect();

        if !options.skip_tests {
            let tests = TestWorkflow::new(self.config.clone(), Arc::clone(&self.runner));
            checks.push(tests.quick_suite_check());
        }

        CheckPipeline::new("pre-deploy", checks)
    }

    pub fn post_deploy_pipeline(&self) -> CheckPipeline {
        CheckPipeline::new(
            "post-deploy",
            vec![self.deploy_check(BuiltinCheck::DeploymentHealth)],
        )
    }

    fn deploy_check(&self, check: BuiltinCheck) -> CheckSpec {
        check.spec_with_timeout(
            &self.config,
            Arc::clone(&self.runner),
            self.config.deploy_timeout_secs,
        )
    }

    pub async fn run<W: Write + Send>(
        &self,
        options: DeployOptions,
        reporter: &mut ResultReporter<W>,
    ) -> Result<DeployOutcome> {
        let mut transitions = Vec::new();
        enter(&mut transitions, DeployState::Start);
        reporter.banner("KFA Deployment Workflow")?;

        enter(&mut transitions, DeployState::PreChecks);
        reporter.section("Running pre-deployment checks...")?;
        let pre_run = self.pre_deploy_pipeline(options).run_observed(reporter).await;
        reporter.report(&pre_run)?;

        let mut outcome = DeployOutcome {
            transitions,
            forced: false,
            pre_run,
            trigger: None,
            post_run: None,
        };

        if outcome.pre_run.success() {
            reporter.success("All pre-deployment checks passed!")?;
        } else {
            reporter.error("Some pre-deployment checks failed!")?;
            for failed in outcome.pre_run.failures() {
                reporter.note(&format!("  Failed: {}", failed.name))?;
            }
            if !options.force {
                reporter.error("Pre-deployment checks failed. Use --force to deploy anyway.")?;
                enter(
                    &mut outcome.transitions,
                    DeployState::Aborted(AbortReason::PreChecksFailed),
                );
                return Ok(outcome);
            }
            outcome.forced = true;
            emit_force_override(outcome.pre_run.failed_count());
            reporter.warn("Pre-deployment checks failed but continuing with --force")?;
        }

        enter(&mut outcome.transitions, DeployState::DeployTrigger);
        let trigger = self.trigger(reporter).await?;
        outcome.trigger = Some(trigger.clone());
        match trigger {
            TriggerOutcome::Triggered { .. } => {}
            TriggerOutcome::UncommittedChanges(paths) => {
                reporter.error("Deployment failed")?;
                enter(
                    &mut outcome.transitions,
                    DeployState::Aborted(AbortReason::UncommittedChanges(paths)),
                );
                return Ok(outcome);
            }
        }

        enter(&mut outcome.transitions, DeployState::PostChecks);
        reporter.section("Running post-deployment checks...")?;
        let post_run = self.post_deploy_pipeline().run_observed(reporter).await;
        reporter.report(&post_run)?;

        if post_run.success() {
            reporter.success("All post-deployment checks passed!")?;
            reporter.success("Deployment completed successfully!")?;
            reporter.note(&format!("URL: {}", self.config.site_url))?;
            enter(&mut outcome.transitions, DeployState::Success);
        } else {
            reporter.error("Some post-deployment checks failed!")?;
            reporter.warn("Deployment completed but post-checks failed")?;
            enter(&mut outcome.transitions, DeployState::Degraded);
        }
        outcome.post_run = Some(post_run);

        Ok(outcome)
    }

    /// Confirm the tree is clean, then probe the hosting platform.
    async fn trigger<W: Write + Send>(
        &self,
        reporter: &mut ResultReporter<W>,
    ) -> Result<TriggerOutcome> {
        reporter.section("Deploying frontend...")?;
        let root = self.config.project_root.as_path();
        let timeout = self.config.deploy_timeout();

        let status = self
            .runner
            .run(&status_porcelain_command(), Some(root), timeout)
            .await;
        let status_error = match porcelain_changes(status.success, &status.combined_output) {
            Ok(changes) if !changes.is_empty() => {
                info!(changes = changes.len(), "Uncommitted changes block deploy");
                reporter.warn("Uncommitted changes detected")?;
                for path in changes.iter().take(10) {
                    reporter.note(&format!("  {path}"))?;
                }
                reporter
                    .note("The hosting platform deploys the latest commit on the main branch")?;
                reporter.note("Commit and push your changes first")?;
                return Ok(TriggerOutcome::UncommittedChanges(changes));
            }
            Ok(_) => {
                reporter.status_line(true, "No uncommitted changes")?;
                None
            }
            Err(err) => {
                let reason = truncate_chars(&err.to_string(), self.config.detail_limit);
                warn!(error = %reason, "Working tree status unavailable, deploying anyway");
                reporter.warn(&format!("Could not read working tree status: {reason}"))?;
                Some(reason)
            }
        };

        let platform = self
            .runner
            .run(&platform_status_command(), Some(root), timeout)
            .await;
        reporter.status_line(platform.success, "Hosting platform deployment check")?;

        reporter.success("Frontend deployment triggered!")?;
        reporter.note("The platform auto-deploys on push to the main branch")?;
        reporter.note(&format!("Check status at: {PLATFORM_DASHBOARD}"))?;

        Ok(TriggerOutcome::Triggered {
            status_error,
            platform_status_ok: platform.success,
        })
    }
}

/// Command probing the hosting platform's view of the latest deployment.
pub fn platform_status_command() -> Vec<String> {
    vec!["node".to_string(), PLATFORM_STATUS_SCRIPT.to_string()]
}

fn enter(transitions: &mut Vec<DeployState>, state: DeployState) {
    emit_deploy_state(&state.to_string());
    transitions.push(state);
}
