//! Structured observability hooks for pipeline and workflow lifecycle events.
//!
//! Events are emitted at `info!` level unless noted; filter with `RUST_LOG`.

use tracing::{debug, info, warn};

/// Span tagging every event of one pipeline run with its id and stage.
///
/// Attach it with `tracing::Instrument` so it follows the run across awaits.
pub fn pipeline_span(run_id: &str, stage: &str) -> tracing::Span {
    tracing::info_span!("adw.pipeline", run_id = %run_id, stage = %stage)
}

pub fn emit_check_started(name: &str, index: usize, total: usize) {
    debug!(event = "check.started", check = %name, index = index, total = total);
}

pub fn emit_check_finished(name: &str, success: bool, duration_ms: u64) {
    info!(
        event = "check.finished",
        check = %name,
        success = success,
        duration_ms = duration_ms,
    );
}

/// Emit event: pipeline finished with aggregate counts.
pub fn emit_pipeline_finished(run_id: &str, passed: usize, failed: usize, duration_ms: u64) {
    info!(
        event = "pipeline.finished",
        run_id = %run_id,
        passed = passed,
        failed = failed,
        duration_ms = duration_ms,
        success = failed == 0,
    );
}

pub fn emit_report_persisted(run_id: &str, path: &std::path::Path) {
    info!(event = "report.persisted", run_id = %run_id, path = %path.display());
}

/// Emit event: deploy workflow entered a new state.
pub fn emit_deploy_state(state: &str) {
    info!(event = "deploy.state", state = %state);
}

/// Emit event: pre-deploy failures overridden by `--force` (warning level).
pub fn emit_force_override(failed: usize) {
    warn!(event = "deploy.force_override", failed_checks = failed);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_span_create() {
        let _guard = pipeline_span("test-run-id", "test").entered();
        emit_check_started("Database Connection", 1, 2);
        emit_check_finished("Database Connection", true, 12);
    }
}
