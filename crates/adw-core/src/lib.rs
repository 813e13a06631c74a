//! ADW Core Library
//!
//! Domain model, configuration, git inspection and telemetry shared by the
//! check-pipeline engine (`adw-ci`) and the `adw` binary.

pub mod config;
pub mod domain;
pub mod git;
pub mod obs;
pub mod telemetry;

pub use config::ProjectConfig;
pub use domain::{
    checks_digest, AdwError, CheckOutcome, CheckVerdict, PipelineRun, Result, RunReport,
    REPORT_SCHEMA_VERSION,
};
pub use git::{parse_porcelain, porcelain_changes, status_porcelain_command};
pub use telemetry::init_tracing;

/// ADW version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
