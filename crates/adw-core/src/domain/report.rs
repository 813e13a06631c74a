//! Persisted run report schema and writer.
//!
//! One JSON file per pipeline run under the results directory, named
//! `test-results-<YYYYMMDD-HHMMSS>.json` after the run timestamp (UTC).
//! Files are created with create-new semantics: an existing report is never
//! overwritten, a same-second collision gets a numeric suffix instead.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

use super::error::{AdwError, Result};
use super::outcome::CheckOutcome;
use super::run::PipelineRun;

/// Current schema version of [`RunReport`].
pub const REPORT_SCHEMA_VERSION: &str = "1";

const MAX_SUFFIX: u32 = 1000;

/// Canonical report artifact for one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunReport {
    pub schema_version: String,
    pub run_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub checks_digest: String,
    pub passed: usize,
    pub failed: usize,
    pub total: usize,
    pub results: Vec<CheckOutcome>,
}

impl RunReport {
    pub fn from_run(run: &PipelineRun) -> Self {
        Self {
            schema_version: REPORT_SCHEMA_VERSION.to_string(),
            run_id: run.run_id(),
            timestamp: run.timestamp(),
            checks_digest: run.checks_digest().to_string(),
            passed: run.passed_count(),
            failed: run.failed_count(),
            total: run.total(),
            results: run.outcomes().to_vec(),
        }
    }

    /// Base file name for this report, without any collision suffix.
    pub fn file_stem(&self) -> String {
        format!("test-results-{}", self.timestamp.format("%Y%m%d-%H%M%S"))
    }

    /// Write the report as pretty JSON into `dir`, creating `dir` if needed.
    ///
    /// Returns the path of the newly created file.
    pub fn write_new(&self, dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let content = serde_json::to_string_pretty(self)?;
        let stem = self.file_stem();

        for attempt in 0..MAX_SUFFIX {
            let name = if attempt == 0 {
                format!("{stem}.json")
            } else {
                format!("{stem}-{attempt}.json")
            };
            let path = dir.join(name);
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    file.write_all(content.as_bytes())?;
                    file.write_all(b"\n")?;
                    return Ok(path);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            }
        }

        Err(AdwError::Report(format!(
            "no free report file name for {stem} in {}",
            dir.display()
        )))
    }
}
