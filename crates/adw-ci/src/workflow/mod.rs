//! Site workflows built from check pipelines.
//!
//! - `test`: quick (2 checks) or full (5 checks) verification
//! - `deploy`: pre-deploy checks, deploy trigger, post-deploy checks

pub mod deploy;
pub mod testing;

pub use deploy::{
    AbortReason, DeployOptions, DeployOutcome, DeployState, DeployWorkflow, TriggerOutcome,
};
pub use testing::{TestMode, TestOutcome, TestWorkflow};

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;

/// Map an overall result to the process exit code.
pub fn exit_code(success: bool) -> u8 {
    if success {
        EXIT_SUCCESS
    } else {
        EXIT_FAILURE
    }
}
