//! ADW CI - check pipelines for the site lifecycle
//!
//! Provides a check-pipeline orchestrator that:
//! - Runs external commands with a hard timeout, never failing past the runner
//! - Executes every check of a pipeline in order, whatever earlier checks did
//! - Renders results and persists each run as a timestamped JSON report
//! - Composes the `test` and `deploy` workflows

pub mod builtin;
pub mod check;
pub mod fakes;
pub mod pipeline;
pub mod reporter;
pub mod runner;
pub mod workflow;

// Re-export key types
pub use builtin::BuiltinCheck;
pub use check::{CheckAction, CheckSpec, CommandCheck};
pub use pipeline::{CheckPipeline, NoopObserver, PipelineObserver};
pub use reporter::ResultReporter;
pub use runner::{CommandRunner, ProcessResult, ProcessRunner};
pub use workflow::{
    exit_code, AbortReason, DeployOptions, DeployOutcome, DeployState, DeployWorkflow, TestMode,
    TestOutcome, TestWorkflow, TriggerOutcome,
};
