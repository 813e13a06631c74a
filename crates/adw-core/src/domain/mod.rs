//! Domain models for ADW.
//!
//! Canonical definitions for the core entities:
//! - `CheckVerdict` / `CheckOutcome`: result of one verification step
//! - `PipelineRun`: ordered outcomes of one pipeline execution
//! - `RunReport`: the persisted JSON schema for a run

pub mod digest;
pub mod error;
pub mod outcome;
pub mod report;
pub mod run;

// Re-export main types and errors
pub use digest::checks_digest;
pub use error::{AdwError, Result};
pub use outcome::{CheckOutcome, CheckVerdict};
pub use report::{RunReport, REPORT_SCHEMA_VERSION};
pub use run::PipelineRun;
