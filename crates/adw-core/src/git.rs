//! Git working-tree inspection.
//!
//! The deploy trigger only needs to know whether anything is uncommitted; the
//! command itself is run through the workflow's command runner so it shares
//! the same timeout and failure handling as every other external call.

use crate::domain::error::{AdwError, Result};

/// Command that lists working-tree changes in machine-readable form.
pub fn status_porcelain_command() -> Vec<String> {
    vec![
        "git".to_string(),
        "status".to_string(),
        "--porcelain".to_string(),
    ]
}

/// Extract changed paths from `git status --porcelain` output.
///
/// Each entry is `XY <path>` or `XY <from> -> <to>` for renames; the path part
/// is returned as-is. Blank lines are ignored, so a clean tree yields an empty
/// list.
pub fn parse_porcelain(output: &str) -> Vec<String> {
    output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| match line.get(3..) {
            Some(path) if line.len() > 3 => path.trim().to_string(),
            _ => line.trim().to_string(),
        })
        .collect()
}

/// Changed paths from a finished status query, or why it could not be read.
pub fn porcelain_changes(succeeded: bool, output: &str) -> Result<Vec<String>> {
    if !succeeded {
        let reason = output.trim();
        return Err(AdwError::GitError(if reason.is_empty() {
            "git status failed".to_string()
        } else {
            reason.to_string()
        }));
    }
    Ok(parse_porcelain(output))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::process::Command as StdCommand;

    fn run_git(repo_dir: &Path, args: &[&str]) -> String {
        let output = StdCommand::new("git")
            .args(args)
            .current_dir(repo_dir)
            .output()
            .unwrap();
        assert!(
            output.status.success(),
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    fn make_git_repo() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        run_git(dir.path(), &["init"]);
        run_git(dir.path(), &["config", "user.name", "test-user"]);
        run_git(dir.path(), &["config", "user.email", "test@example.com"]);
        run_git(dir.path(), &["commit", "--allow-empty", "-m", "initial"]);
        dir
    }

    #[test]
    fn parse_porcelain_clean_tree() {
        assert!(parse_porcelain("").is_empty());
        assert!(parse_porcelain("\n  \n").is_empty());
    }

    #[test]
    fn porcelain_changes_failure_is_git_error() {
        let err = porcelain_changes(false, "fatal: not a git repository\n").unwrap_err();
        assert!(matches!(err, AdwError::GitError(ref m) if m == "fatal: not a git repository"));

        let err = porcelain_changes(false, "").unwrap_err();
        assert_eq!(err.to_string(), "git error: git status failed");

        assert_eq!(porcelain_changes(true, "?? a.txt\n").unwrap(), vec!["a.txt"]);
    }

    #[test]
    fn parse_porcelain_entries() {
        let out = " M src/main.rs\n?? notes.txt\nR  old.rs -> new.rs\n";
        assert_eq!(
            parse_porcelain(out),
            vec!["src/main.rs", "notes.txt", "old.rs -> new.rs"]
        );
    }

    #[test]
    fn status_of_real_repo() {
        let repo = make_git_repo();
        let cmd = status_porcelain_command();
        let args: Vec<&str> = cmd[1..].iter().map(String::as_str).collect();

        assert!(parse_porcelain(&run_git(repo.path(), &args)).is_empty());

        std::fs::write(repo.path().join("dirty.txt"), "x").unwrap();
        assert_eq!(parse_porcelain(&run_git(repo.path(), &args)), vec!["dirty.txt"]);
    }
}
