//! Check verdicts and outcomes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// What a check action reports back: pass/fail, a one-line message and
/// optional free-text details.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CheckVerdict {
    pub success: bool,
    pub message: String,
    pub details: BTreeMap<String, String>,
}

impl CheckVerdict {
    /// A passing verdict with no details.
    pub fn pass(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            details: BTreeMap::new(),
        }
    }

    /// A failing verdict with no details.
    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            details: BTreeMap::new(),
        }
    }

    /// Attach a detail entry.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }
}

/// The recorded result of one executed check.
///
/// Produced exactly once per check execution and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CheckOutcome {
    /// Human-readable check name.
    pub name: String,

    /// Whether the check passed.
    pub success: bool,

    /// One-line summary shown in the results table.
    pub message: String,

    /// When the check finished.
    pub timestamp: DateTime<Utc>,

    /// Free-text diagnostics, e.g. `output` for the captured process output.
    #[serde(default)]
    pub details: BTreeMap<String, String>,
}

impl CheckOutcome {
    /// Stamp a verdict with the check name and the current time.
    pub fn from_verdict(name: impl Into<String>, verdict: CheckVerdict) -> Self {
        Self::from_verdict_at(name, verdict, Utc::now())
    }

    /// Stamp a verdict at a fixed timestamp (used for deterministic tests).
    pub fn from_verdict_at(
        name: impl Into<String>,
        verdict: CheckVerdict,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            name: name.into(),
            success: verdict.success,
            message: verdict.message,
            timestamp,
            details: verdict.details,
        }
    }

    /// The captured diagnostic output, if the check recorded one.
    pub fn output(&self) -> Option<&str> {
        self.details
            .get("output")
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_builders() {
        let v = CheckVerdict::pass("ok").with_detail("output", "Connected");
        assert!(v.success);
        assert_eq!(v.details.get("output").map(String::as_str), Some("Connected"));

        let v = CheckVerdict::fail("nope");
        assert!(!v.success);
        assert!(v.details.is_empty());
    }

    #[test]
    fn test_outcome_from_verdict() {
        let outcome = CheckOutcome::from_verdict(
            "TypeScript Check",
            CheckVerdict::fail("TypeScript errors found").with_detail("output", "TS2322"),
        );
        assert_eq!(outcome.name, "TypeScript Check");
        assert!(!outcome.success);
        assert_eq!(outcome.output(), Some("TS2322"));
    }

    #[test]
    fn test_empty_output_is_none() {
        let outcome =
            CheckOutcome::from_verdict("x", CheckVerdict::fail("m").with_detail("output", ""));
        assert_eq!(outcome.output(), None);
    }
}
