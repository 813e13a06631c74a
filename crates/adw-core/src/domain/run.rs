//! Pipeline run records.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::digest::checks_digest;
use super::outcome::CheckOutcome;

/// The ordered outcomes of one pipeline execution.
///
/// Counts are derived from the outcomes at construction, so
/// `passed_count() + failed_count() == total()` always holds. Outcomes keep
/// execution order.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineRun {
    run_id: Uuid,
    timestamp: DateTime<Utc>,
    checks_digest: String,
    outcomes: Vec<CheckOutcome>,
    passed_count: usize,
    failed_count: usize,
}

impl PipelineRun {
    /// Build a run finished now.
    pub fn new(outcomes: Vec<CheckOutcome>) -> Self {
        Self::new_at(Uuid::new_v4(), Utc::now(), outcomes)
    }

    /// Build a run with a fixed identity and timestamp.
    pub fn new_at(run_id: Uuid, timestamp: DateTime<Utc>, outcomes: Vec<CheckOutcome>) -> Self {
        let passed_count = outcomes.iter().filter(|o| o.success).count();
        let failed_count = outcomes.len() - passed_count;
        let names: Vec<&str> = outcomes.iter().map(|o| o.name.as_str()).collect();
        Self {
            run_id,
            timestamp,
            checks_digest: checks_digest(&names),
            outcomes,
            passed_count,
            failed_count,
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// SHA-256 over the ordered check names.
    pub fn checks_digest(&self) -> &str {
        &self.checks_digest
    }

    pub fn outcomes(&self) -> &[CheckOutcome] {
        &self.outcomes
    }

    pub fn passed_count(&self) -> usize {
        self.passed_count
    }

    pub fn failed_count(&self) -> usize {
        self.failed_count
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    /// Whether every check passed.
    pub fn success(&self) -> bool {
        self.failed_count == 0
    }

    /// Outcomes that failed, in execution order.
    pub fn failures(&self) -> impl Iterator<Item = &CheckOutcome> {
        self.outcomes.iter().filter(|o| !o.success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::outcome::CheckVerdict;

    fn outcome(name: &str, success: bool) -> CheckOutcome {
        let verdict = if success {
            CheckVerdict::pass("ok")
        } else {
            CheckVerdict::fail("failed")
        };
        CheckOutcome::from_verdict(name, verdict)
    }

    #[test]
    fn test_counts_all_passed() {
        let run = PipelineRun::new(vec![outcome("a", true), outcome("b", true)]);
        assert_eq!(run.passed_count(), 2);
        assert_eq!(run.failed_count(), 0);
        assert_eq!(run.total(), 2);
        assert!(run.success());
    }

    #[test]
    fn test_counts_with_failures() {
        let run = PipelineRun::new(vec![
            outcome("a", true),
            outcome("b", false),
            outcome("c", false),
        ]);
        assert_eq!(run.passed_count(), 1);
        assert_eq!(run.failed_count(), 2);
        assert_eq!(run.passed_count() + run.failed_count(), run.total());
        assert!(!run.success());

        let failed: Vec<&str> = run.failures().map(|o| o.name.as_str()).collect();
        assert_eq!(failed, vec!["b", "c"]);
    }

    #[test]
    fn test_empty_run_succeeds() {
        let run = PipelineRun::new(Vec::new());
        assert_eq!(run.total(), 0);
        assert!(run.success());
    }

    #[test]
    fn test_outcome_order_preserved() {
        let run = PipelineRun::new(vec![
            outcome("z", true),
            outcome("a", false),
            outcome("m", true),
        ]);
        let names: Vec<&str> = run.outcomes().iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_digest_matches_names() {
        let run = PipelineRun::new(vec![outcome("a", true), outcome("b", false)]);
        assert_eq!(run.checks_digest(), checks_digest(&["a", "b"]));
    }
}
