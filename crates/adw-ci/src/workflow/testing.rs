//! Test workflow.

use adw_core::obs::emit_report_persisted;
use adw_core::{CheckVerdict, PipelineRun, ProjectConfig, Result, RunReport};
use std::io::Write;
use std::sync::Arc;
use tracing::warn;

use crate::builtin::BuiltinCheck;
use crate::check::CheckSpec;
use crate::pipeline::CheckPipeline;
use crate::reporter::ResultReporter;
use crate::runner::CommandRunner;

use super::exit_code;

/// Which test pipeline to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestMode {
    /// Reachability of the database and the environment only.
    Quick,

    /// Quick checks plus type-check, build and remote health.
    Full,
}

impl TestMode {
    pub fn checks(&self) -> &'static [BuiltinCheck] {
        match self {
            TestMode::Quick => &[
                BuiltinCheck::DatabaseConnection,
                BuiltinCheck::EnvironmentVariables,
            ],
            TestMode::Full => &[
                BuiltinCheck::DatabaseConnection,
                BuiltinCheck::EnvironmentVariables,
                BuiltinCheck::TypeScriptCheck,
                BuiltinCheck::FrontendBuild,
                BuiltinCheck::DeploymentHealth,
            ],
        }
    }

    pub fn stage(&self) -> &'static str {
        match self {
            TestMode::Quick => "test-quick",
            TestMode::Full => "test-full",
        }
    }
}

/// Result of one test workflow invocation.
#[derive(Debug, Clone)]
pub struct TestOutcome {
    pub mode: TestMode,
    pub run: PipelineRun,
}

impl TestOutcome {
    pub fn success(&self) -> bool {
        self.run.success()
    }

    pub fn exit_code(&self) -> u8 {
        exit_code(self.success())
    }
}

pub struct TestWorkflow {
    config: ProjectConfig,
    runner: Arc<dyn CommandRunner>,
}

impl TestWorkflow {
    pub fn new(config: ProjectConfig, runner: Arc<dyn CommandRunner>) -> Self {
        Self { config, runner }
    }

    pub fn pipeline(&self, mode: TestMode) -> CheckPipeline {
        let checks = mode
            .checks()
            .iter()
            .map(|check| check.spec(&self.config, Arc::clone(&self.runner)))
            .collect();
        CheckPipeline::new(mode.stage(), checks)
    }

    /// A single check that runs the quick pipeline in-process and passes only
    /// if every quick check passed. Used by the deploy workflow.
    ///
    /// The nested run writes its own report next to the deploy's reports; a
    /// write failure is logged and leaves the verdict alone.
    pub fn quick_suite_check(&self) -> CheckSpec {
        let quick = Arc::new(self.pipeline(TestMode::Quick));
        let results_dir = Arc::new(self.config.results_path());
        CheckSpec::new("Tests", move || {
            let quick = Arc::clone(&quick);
            let results_dir = Arc::clone(&results_dir);
            async move {
                let run = quick.run().await;
                let report = match RunReport::from_run(&run).write_new(&results_dir) {
                    Ok(path) => {
                        emit_report_persisted(&run.run_id().to_string(), &path);
                        Some(path.display().to_string())
                    }
                    Err(err) => {
                        warn!(error = %err, "Could not persist quick test report");
                        None
                    }
                };
                let failed: Vec<&str> = run.failures().map(|o| o.name.as_str()).collect();
                let verdict = if run.success() {
                    CheckVerdict::pass("Quick test suite passed")
                        .with_detail("output", "All quick checks passed")
                } else {
                    CheckVerdict::fail("Quick test suite failed")
                        .with_detail("output", format!("Failed: {}", failed.join(", ")))
                };
                let verdict = verdict
                    .with_detail("passed", run.passed_count().to_string())
                    .with_detail("failed", run.failed_count().to_string())
                    .with_detail("total", run.total().to_string());
                match report {
                    Some(path) => verdict.with_detail("report", path),
                    None => verdict,
                }
            }
        })
        .with_description("Running tests...")
    }

    /// Run the selected pipeline, render and persist its report.
    pub async fn run<W: Write + Send>(
        &self,
        mode: TestMode,
        reporter: &mut ResultReporter<W>,
    ) -> Result<TestOutcome> {
        reporter.banner("KFA Test Suite")?;
        reporter.section(match mode {
            TestMode::Quick => "Running quick health check...",
            TestMode::Full => "Running full test suite...",
        })?;

        let run = self.pipeline(mode).run_observed(reporter).await;
        reporter.report(&run)?;

        Ok(TestOutcome { mode, run })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::ScriptedRunner;
    use crate::runner::ProcessResult;

    fn workflow(runner: Arc<ScriptedRunner>) -> TestWorkflow {
        TestWorkflow::new(ProjectConfig::default(), runner)
    }

    fn workflow_in(root: &std::path::Path, runner: Arc<ScriptedRunner>) -> TestWorkflow {
        let config = ProjectConfig {
            project_root: root.to_path_buf(),
            ..ProjectConfig::default()
        };
        TestWorkflow::new(config, runner)
    }

    #[test]
    fn test_mode_check_counts() {
        assert_eq!(TestMode::Quick.checks().len(), 2);
        assert_eq!(TestMode::Full.checks().len(), 5);
        assert_eq!(&TestMode::Full.checks()[..2], TestMode::Quick.checks());
    }

    #[test]
    fn test_pipeline_names_follow_mode() {
        let wf = workflow(Arc::new(ScriptedRunner::new()));
        let names: Vec<String> = wf
            .pipeline(TestMode::Full)
            .checks()
            .iter()
            .map(|c| c.name().to_string())
            .collect();
        assert_eq!(
            names,
            vec![
                "Database Connection",
                "Environment Variables",
                "TypeScript Check",
                "Frontend Build",
                "Deployment Health",
            ]
        );
    }

    #[tokio::test]
    async fn quick_suite_check_passes_when_all_pass() {
        let tmp = tempfile::tempdir().unwrap();
        let runner = Arc::new(ScriptedRunner::new());
        let outcome = workflow_in(tmp.path(), runner.clone())
            .quick_suite_check()
            .execute()
            .await;

        assert!(outcome.success);
        assert_eq!(outcome.details["passed"], "2");
        assert_eq!(runner.calls().len(), 2);
    }

    #[tokio::test]
    async fn quick_suite_check_names_failures() {
        let tmp = tempfile::tempdir().unwrap();
        let runner = Arc::new(
            ScriptedRunner::new()
                .respond("test-connection", ProcessResult::failure("ECONNREFUSED")),
        );
        let outcome = workflow_in(tmp.path(), runner)
            .quick_suite_check()
            .execute()
            .await;

        assert!(!outcome.success);
        assert_eq!(outcome.details["failed"], "1");
        assert_eq!(outcome.output(), Some("Failed: Database Connection"));
    }

    #[tokio::test]
    async fn quick_suite_check_persists_nested_run() {
        let tmp = tempfile::tempdir().unwrap();
        let wf = workflow_in(tmp.path(), Arc::new(ScriptedRunner::new()));
        let outcome = wf.quick_suite_check().execute().await;

        let report_path = std::path::PathBuf::from(&outcome.details["report"]);
        assert!(report_path.starts_with(wf.config.results_path()));
        let report: RunReport =
            serde_json::from_str(&std::fs::read_to_string(&report_path).unwrap()).unwrap();
        assert_eq!((report.passed, report.failed, report.total), (2, 0, 2));
    }
}
