//! Operator display and run persistence.
//!
//! One [`ResultReporter`] is created per workflow invocation. It writes the
//! human-facing output to any `io::Write` sink and persists every pipeline
//! run it reports as a new JSON file under the results directory.

use adw_core::obs::emit_report_persisted;
use adw_core::{CheckOutcome, PipelineRun, Result, RunReport};
use std::io::{self, Stdout, Write};
use std::path::{Path, PathBuf};

use crate::check::CheckSpec;
use crate::pipeline::PipelineObserver;

const PASS_MARK: &str = "✅";
const FAIL_MARK: &str = "❌";

pub struct ResultReporter<W: Write> {
    out: W,
    results_dir: PathBuf,
    verbose: bool,
    persisted: Vec<PathBuf>,
}

impl ResultReporter<Stdout> {
    /// Reporter printing to the process's stdout.
    pub fn stdout(results_dir: impl Into<PathBuf>, verbose: bool) -> Self {
        Self::new(io::stdout(), results_dir, verbose)
    }
}

impl<W: Write> ResultReporter<W> {
    pub fn new(out: W, results_dir: impl Into<PathBuf>, verbose: bool) -> Self {
        Self {
            out,
            results_dir: results_dir.into(),
            verbose,
            persisted: Vec::new(),
        }
    }

    pub fn results_dir(&self) -> &Path {
        &self.results_dir
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    /// Report files written so far, oldest first.
    pub fn persisted(&self) -> &[PathBuf] {
        &self.persisted
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Render the run, persist it, and say whether every check passed.
    pub fn report(&mut self, run: &PipelineRun) -> Result<bool> {
        self.render(run)?;
        let path = self.persist(run)?;
        writeln!(self.out, "Results saved to: {}", path.display())?;
        writeln!(self.out)?;
        Ok(run.success())
    }

    /// Results table, pass/fail totals and, when verbose, diagnostics of
    /// failed checks.
    pub fn render(&mut self, run: &PipelineRun) -> io::Result<()> {
        let outcomes = run.outcomes();
        let name_width = outcomes
            .iter()
            .map(|o| o.name.chars().count())
            .max()
            .unwrap_or(0)
            .max("Check".len());

        writeln!(self.out)?;
        writeln!(self.out, "{:<name_width$}  {:<6}  Message", "Check", "Status")?;
        writeln!(
            self.out,
            "{}  {}  {}",
            "-".repeat(name_width),
            "-".repeat(6),
            "-".repeat(7)
        )?;
        for outcome in outcomes {
            let status = if outcome.success { "PASS" } else { "FAIL" };
            writeln!(
                self.out,
                "{:<name_width$}  {:<6}  {}",
                outcome.name, status, outcome.message
            )?;
        }

        if self.verbose {
            for outcome in run.failures() {
                self.render_details(outcome)?;
            }
        }

        writeln!(self.out)?;
        writeln!(
            self.out,
            "Passed: {} | Failed: {} | Total: {}",
            run.passed_count(),
            run.failed_count(),
            run.total()
        )?;
        Ok(())
    }

    fn render_details(&mut self, outcome: &CheckOutcome) -> io::Result<()> {
        if outcome.details.is_empty() {
            return Ok(());
        }
        writeln!(self.out)?;
        writeln!(self.out, "Details for {}:", outcome.name)?;
        for (key, value) in &outcome.details {
            if key == "output" {
                for line in value.lines() {
                    writeln!(self.out, "  | {line}")?;
                }
            } else {
                writeln!(self.out, "  {key}: {value}")?;
            }
        }
        Ok(())
    }

    /// Write the run as a new report file.
    pub fn persist(&mut self, run: &PipelineRun) -> Result<PathBuf> {
        let path = RunReport::from_run(run).write_new(&self.results_dir)?;
        emit_report_persisted(&run.run_id().to_string(), &path);
        self.persisted.push(path.clone());
        Ok(path)
    }

    pub fn banner(&mut self, title: &str) -> io::Result<()> {
        let rule = "=".repeat(title.chars().count() + 4);
        writeln!(self.out, "{rule}")?;
        writeln!(self.out, "  {title}")?;
        writeln!(self.out, "{rule}")
    }

    pub fn section(&mut self, title: &str) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "{title}")?;
        writeln!(self.out)
    }

    pub fn note(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{text}")
    }

    pub fn status_line(&mut self, success: bool, text: &str) -> io::Result<()> {
        let mark = if success { PASS_MARK } else { FAIL_MARK };
        writeln!(self.out, "  {mark} {text}")
    }

    pub fn warn(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "⚠ {text}")
    }

    pub fn error(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{FAIL_MARK} {text}")
    }

    pub fn success(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{PASS_MARK} {text}")
    }
}

// Progress lines are best effort: a closed stdout must not stop the pipeline.
impl<W: Write + Send> PipelineObserver for ResultReporter<W> {
    fn check_started(&mut self, check: &CheckSpec, _index: usize, _total: usize) {
        let line = match check.description() {
            Some(description) => description.to_string(),
            None => format!("Running {}...", check.name()),
        };
        writeln!(self.out, "{line}").ok();
    }

    fn check_finished(&mut self, outcome: &CheckOutcome) {
        self.status_line(outcome.success, &outcome.name).ok();
    }
}
