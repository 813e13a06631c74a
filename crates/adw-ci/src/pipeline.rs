//! Check pipeline orchestration.

use adw_core::obs::{emit_check_finished, emit_check_started, emit_pipeline_finished, pipeline_span};
use adw_core::{CheckOutcome, PipelineRun};
use chrono::Utc;
use std::time::Instant;
use tracing::{info, Instrument};
use uuid::Uuid;

use crate::check::CheckSpec;

/// Receives progress notifications while a pipeline runs.
pub trait PipelineObserver: Send {
    fn check_started(&mut self, _check: &CheckSpec, _index: usize, _total: usize) {}

    fn check_finished(&mut self, _outcome: &CheckOutcome) {}
}

/// Observer that ignores everything.
#[derive(Debug, Default)]
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {}

/// An ordered batch of checks executed as one unit.
///
/// Every check runs, in declaration order, one at a time, whatever the
/// outcome of the checks before it.
#[derive(Debug, Clone)]
pub struct CheckPipeline {
    stage: String,
    checks: Vec<CheckSpec>,
}

impl CheckPipeline {
    /// `stage` labels the run in logs (e.g. "test-quick", "pre-deploy").
    pub fn new(stage: impl Into<String>, checks: Vec<CheckSpec>) -> Self {
        Self {
            stage: stage.into(),
            checks,
        }
    }

    pub fn stage(&self) -> &str {
        &self.stage
    }

    pub fn checks(&self) -> &[CheckSpec] {
        &self.checks
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// Execute every check and collect the outcomes.
    pub async fn run(&self) -> PipelineRun {
        self.run_observed(&mut NoopObserver).await
    }

    /// Execute every check, notifying `observer` around each one.
    pub async fn run_observed(&self, observer: &mut dyn PipelineObserver) -> PipelineRun {
        let run_id = Uuid::new_v4();
        let span = pipeline_span(&run_id.to_string(), &self.stage);
        self.execute(run_id, observer).instrument(span).await
    }

    async fn execute(&self, run_id: Uuid, observer: &mut dyn PipelineObserver) -> PipelineRun {
        let start = Instant::now();
        let total = self.checks.len();
        info!(checks = total, "Starting check pipeline");

        let mut outcomes = Vec::with_capacity(total);
        for (index, check) in self.checks.iter().enumerate() {
            emit_check_started(check.name(), index + 1, total);
            observer.check_started(check, index + 1, total);

            let check_start = Instant::now();
            let outcome = check.execute().await;
            emit_check_finished(
                &outcome.name,
                outcome.success,
                check_start.elapsed().as_millis() as u64,
            );

            observer.check_finished(&outcome);
            outcomes.push(outcome);
        }

        let run = PipelineRun::new_at(run_id, Utc::now(), outcomes);
        emit_pipeline_finished(
            &run_id.to_string(),
            run.passed_count(),
            run.failed_count(),
            start.elapsed().as_millis() as u64,
        );
        run
    }
}
