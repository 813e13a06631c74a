//! ADW - site workflow CLI
//!
//! The `adw` command runs the site's check pipelines.
//!
//! ## Commands
//!
//! - `test`: Run the quick (2 checks) or full (5 checks) verification suite
//! - `deploy`: Pre-deploy checks, deploy trigger, post-deploy checks

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info, Level};

use adw_ci::workflow::EXIT_FAILURE;
use adw_ci::{
    CommandRunner, DeployOptions, DeployWorkflow, ProcessRunner, ResultReporter, TestMode,
    TestWorkflow,
};
use adw_core::config::{
    ENV_CHECK_TIMEOUT_SECS, ENV_DEPLOY_TIMEOUT_SECS, ENV_PROJECT_ROOT, ENV_RESULTS_DIR,
    ENV_SITE_URL, ENV_WEBSITE_DIR,
};
use adw_core::ProjectConfig;

#[derive(Parser, Debug)]
#[command(name = "adw")]
#[command(author = "KFA Web Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Test and deploy workflows for the KFA website", long_about = None)]
struct Cli {
    /// Log at DEBUG instead of INFO
    #[arg(long, global = true)]
    debug: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(flatten)]
    project: ProjectArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Project settings. Each flag falls back to its `ADW_*` variable, then to
/// the built-in default.
#[derive(Args, Debug, Default)]
struct ProjectArgs {
    /// Directory the check commands run from
    #[arg(long, global = true, env = ENV_PROJECT_ROOT)]
    project_root: Option<PathBuf>,

    /// Where run reports are written (relative to the project root)
    #[arg(long, global = true, env = ENV_RESULTS_DIR)]
    results_dir: Option<PathBuf>,

    /// Frontend package directory (relative to the project root)
    #[arg(long, global = true, env = ENV_WEBSITE_DIR)]
    website_dir: Option<PathBuf>,

    /// Public URL probed by the deployment health check
    #[arg(long, global = true, env = ENV_SITE_URL)]
    site_url: Option<String>,

    /// Per-check timeout in seconds
    #[arg(long, global = true, env = ENV_CHECK_TIMEOUT_SECS)]
    check_timeout: Option<u64>,

    /// Timeout for deploy-stage commands in seconds
    #[arg(long, global = true, env = ENV_DEPLOY_TIMEOUT_SECS)]
    deploy_timeout: Option<u64>,
}

impl ProjectArgs {
    fn into_config(self) -> adw_core::Result<ProjectConfig> {
        let mut config = ProjectConfig::default();
        if let Some(root) = self.project_root {
            config.project_root = root;
        }
        if let Some(dir) = self.results_dir {
            config.results_dir = dir;
        }
        if let Some(dir) = self.website_dir {
            config.website_dir = dir;
        }
        if let Some(url) = self.site_url {
            config.site_url = url;
        }
        if let Some(secs) = self.check_timeout {
            config.check_timeout_secs = secs;
        }
        if let Some(secs) = self.deploy_timeout {
            config.deploy_timeout_secs = secs;
        }
        config.validate()?;
        Ok(config)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the verification suite and persist its report
    Test {
        /// Run the quick health check only (database and environment)
        #[arg(long)]
        quick: bool,

        /// Show the output of failing checks
        #[arg(long)]
        verbose: bool,
    },

    /// Check, trigger and verify a frontend deployment
    Deploy {
        /// Leave the quick test suite out of the pre-deployment checks
        #[arg(long)]
        skip_tests: bool,

        /// Deploy even if pre-deployment checks fail
        #[arg(long)]
        force: bool,

        /// Show the output of failing checks
        #[arg(long)]
        verbose: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.debug { Level::DEBUG } else { Level::INFO };
    adw_core::init_tracing(cli.json, level);

    match run(cli).await {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            error!(error = %err, "adw failed");
            eprintln!("Error: {err:#}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

async fn run(cli: Cli) -> Result<u8> {
    let config = cli
        .project
        .into_config()
        .context("Invalid project configuration")?;
    let runner: Arc<dyn CommandRunner> = Arc::new(ProcessRunner::new());

    match cli.command {
        Commands::Test { quick, verbose } => cmd_test(config, runner, quick, verbose).await,
        Commands::Deploy {
            skip_tests,
            force,
            verbose,
        } => {
            let options = DeployOptions { skip_tests, force };
            cmd_deploy(config, runner, options, verbose).await
        }
    }
}

/// Run the test workflow
async fn cmd_test(
    config: ProjectConfig,
    runner: Arc<dyn CommandRunner>,
    quick: bool,
    verbose: bool,
) -> Result<u8> {
    let mode = if quick { TestMode::Quick } else { TestMode::Full };
    info!(?mode, root = %config.project_root.display(), "Starting test workflow");

    let mut reporter = ResultReporter::stdout(config.results_path(), verbose);
    let outcome = TestWorkflow::new(config, runner)
        .run(mode, &mut reporter)
        .await
        .context("Test workflow failed")?;

    Ok(outcome.exit_code())
}

/// Run the deploy workflow
async fn cmd_deploy(
    config: ProjectConfig,
    runner: Arc<dyn CommandRunner>,
    options: DeployOptions,
    verbose: bool,
) -> Result<u8> {
    info!(
        skip_tests = options.skip_tests,
        force = options.force,
        "Starting deploy workflow"
    );

    let mut reporter = ResultReporter::stdout(config.results_path(), verbose);
    let outcome = DeployWorkflow::new(config, runner)
        .run(options, &mut reporter)
        .await
        .context("Deploy workflow failed")?;

    info!(state = %outcome.state(), forced = outcome.forced, "Deploy finished");
    Ok(outcome.exit_code())
}

#[cfg(test)]
mod tests {
    use super::*;
    use adw_ci::fakes::ScriptedRunner;
    use adw_ci::ProcessResult;

    #[test]
    fn parse_test_quick_verbose() {
        let cli = Cli::try_parse_from(["adw", "test", "--quick", "--verbose"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Test {
                quick: true,
                verbose: true
            }
        ));
        assert!(!cli.debug);
    }

    #[test]
    fn parse_deploy_flags() {
        let cli =
            Cli::try_parse_from(["adw", "--json", "deploy", "--skip-tests", "--force"]).unwrap();
        assert!(cli.json);
        assert!(matches!(
            cli.command,
            Commands::Deploy {
                skip_tests: true,
                force: true,
                verbose: false
            }
        ));
    }

    #[test]
    fn parse_requires_subcommand() {
        assert!(Cli::try_parse_from(["adw"]).is_err());
        assert!(Cli::try_parse_from(["adw", "test", "--force"]).is_err());
    }

    #[test]
    fn project_flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "adw",
            "test",
            "--project-root",
            "/srv/site",
            "--site-url",
            "https://staging.example.org",
            "--check-timeout",
            "5",
        ])
        .unwrap();
        let config = cli.project.into_config().unwrap();

        assert_eq!(config.project_root, PathBuf::from("/srv/site"));
        assert_eq!(config.site_url, "https://staging.example.org");
        assert_eq!(config.check_timeout_secs, 5);
        assert_eq!(config.results_path(), PathBuf::from("/srv/site/agents/test-results"));
    }

    #[test]
    fn unset_project_args_give_defaults() {
        let config = ProjectArgs::default().into_config().unwrap();
        assert_eq!(config, ProjectConfig::default());
    }

    #[test]
    fn project_env_vars_fill_unset_flags() {
        // Only fields no other parse test asserts on; values stay parseable.
        std::env::set_var(ENV_WEBSITE_DIR, "frontend");
        std::env::set_var(ENV_DEPLOY_TIMEOUT_SECS, "450");
        let parsed = Cli::try_parse_from(["adw", "deploy", "--project-root", "/srv/site"]);
        std::env::remove_var(ENV_WEBSITE_DIR);
        std::env::remove_var(ENV_DEPLOY_TIMEOUT_SECS);

        let config = parsed.unwrap().project.into_config().unwrap();
        assert_eq!(config.website_path(), PathBuf::from("/srv/site/frontend"));
        assert_eq!(config.deploy_timeout_secs, 450);
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let args = ProjectArgs {
            deploy_timeout: Some(0),
            ..ProjectArgs::default()
        };
        assert!(args.into_config().is_err());
    }

    #[tokio::test]
    async fn cmd_test_exit_code_follows_outcome() {
        let tmp = tempfile::tempdir().unwrap();
        let config = ProjectConfig {
            project_root: tmp.path().to_path_buf(),
            ..ProjectConfig::default()
        };

        let passing: Arc<dyn CommandRunner> = Arc::new(ScriptedRunner::new());
        assert_eq!(
            cmd_test(config.clone(), passing, true, false).await.unwrap(),
            0
        );

        let failing: Arc<dyn CommandRunner> =
            Arc::new(ScriptedRunner::new().otherwise(ProcessResult::failure("down")));
        assert_eq!(cmd_test(config.clone(), failing, true, false).await.unwrap(), 1);

        let reports = std::fs::read_dir(config.results_path()).unwrap().count();
        assert_eq!(reports, 2);
    }
}
