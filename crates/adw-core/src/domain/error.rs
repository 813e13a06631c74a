//! Domain-level error taxonomy for ADW.
//!
//! Check failures are never errors: they are recorded as outcomes. These
//! variants cover the surrounding plumbing (configuration, persistence, git).

/// ADW domain errors.
#[derive(Debug, thiserror::Error)]
pub enum AdwError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("git error: {0}")]
    GitError(String),

    #[error("report error: {0}")]
    Report(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for ADW domain operations.
pub type Result<T> = std::result::Result<T, AdwError>;
