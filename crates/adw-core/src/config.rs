//! Project configuration for the site workflows.
//!
//! Defaults reproduce the layout the workflows were written against. The
//! `adw` binary overrides them from flags or the `ADW_*` variables below.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::domain::error::{AdwError, Result};

pub const ENV_PROJECT_ROOT: &str = "ADW_PROJECT_ROOT";
pub const ENV_RESULTS_DIR: &str = "ADW_RESULTS_DIR";
pub const ENV_WEBSITE_DIR: &str = "ADW_WEBSITE_DIR";
pub const ENV_SITE_URL: &str = "ADW_SITE_URL";
pub const ENV_CHECK_TIMEOUT_SECS: &str = "ADW_CHECK_TIMEOUT_SECS";
pub const ENV_DEPLOY_TIMEOUT_SECS: &str = "ADW_DEPLOY_TIMEOUT_SECS";

pub const DEFAULT_RESULTS_DIR: &str = "agents/test-results";
pub const DEFAULT_WEBSITE_DIR: &str = "kfa-website";
pub const DEFAULT_SITE_URL: &str = "https://kfa-website.vercel.app";
pub const DEFAULT_CHECK_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_DEPLOY_TIMEOUT_SECS: u64 = 300;
pub const DEFAULT_DETAIL_LIMIT: usize = 500;

/// Settings shared by every workflow invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectConfig {
    /// Directory all commands run from unless a check says otherwise.
    pub project_root: PathBuf,

    /// Where run reports are written. Relative paths resolve against `project_root`.
    pub results_dir: PathBuf,

    /// Frontend package directory (type-check runs here).
    pub website_dir: PathBuf,

    /// Public URL probed by the health check.
    pub site_url: String,

    /// Timeout for individual checks, in seconds.
    pub check_timeout_secs: u64,

    /// Timeout for deploy-stage commands, in seconds.
    pub deploy_timeout_secs: u64,

    /// Maximum characters of failing output kept in a check's details.
    pub detail_limit: usize,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            project_root: PathBuf::from("."),
            results_dir: PathBuf::from(DEFAULT_RESULTS_DIR),
            website_dir: PathBuf::from(DEFAULT_WEBSITE_DIR),
            site_url: DEFAULT_SITE_URL.to_string(),
            check_timeout_secs: DEFAULT_CHECK_TIMEOUT_SECS,
            deploy_timeout_secs: DEFAULT_DEPLOY_TIMEOUT_SECS,
            detail_limit: DEFAULT_DETAIL_LIMIT,
        }
    }
}

impl ProjectConfig {
    /// Reject settings no workflow can run with.
    pub fn validate(&self) -> Result<()> {
        if self.check_timeout_secs == 0 || self.deploy_timeout_secs == 0 {
            return Err(AdwError::Config("timeouts must be at least one second".to_string()));
        }
        if self.site_url.trim().is_empty() {
            return Err(AdwError::Config("site URL must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn results_path(&self) -> PathBuf {
        resolve(&self.project_root, &self.results_dir)
    }

    pub fn website_path(&self) -> PathBuf {
        resolve(&self.project_root, &self.website_dir)
    }

    pub fn check_timeout(&self) -> Duration {
        Duration::from_secs(self.check_timeout_secs)
    }

    pub fn deploy_timeout(&self) -> Duration {
        Duration::from_secs(self.deploy_timeout_secs)
    }
}

fn resolve(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ProjectConfig::default();
        config.validate().unwrap();
        assert_eq!(config.check_timeout(), Duration::from_secs(60));
        assert_eq!(config.deploy_timeout(), Duration::from_secs(300));
        assert_eq!(config.results_path(), PathBuf::from("./agents/test-results"));
        assert_eq!(config.website_path(), PathBuf::from("./kfa-website"));
    }

    #[test]
    fn test_relative_dirs_resolve_against_root() {
        let config = ProjectConfig {
            project_root: PathBuf::from("/srv/site"),
            results_dir: PathBuf::from("out/results"),
            ..ProjectConfig::default()
        };
        assert_eq!(config.results_path(), PathBuf::from("/srv/site/out/results"));
        assert_eq!(config.website_path(), PathBuf::from("/srv/site/kfa-website"));
    }

    #[test]
    fn test_absolute_results_dir_kept() {
        let config = ProjectConfig {
            project_root: PathBuf::from("/srv/site"),
            results_dir: PathBuf::from("/var/adw"),
            ..ProjectConfig::default()
        };
        assert_eq!(config.results_path(), PathBuf::from("/var/adw"));
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let zero_timeout = ProjectConfig {
            deploy_timeout_secs: 0,
            ..ProjectConfig::default()
        };
        assert!(matches!(zero_timeout.validate(), Err(AdwError::Config(_))));

        let no_url = ProjectConfig {
            site_url: "  ".to_string(),
            ..ProjectConfig::default()
        };
        assert!(no_url.validate().is_err());
    }
}
