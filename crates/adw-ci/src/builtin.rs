//! Builtin site checks.

use adw_core::ProjectConfig;
use std::sync::Arc;

use crate::check::{CheckSpec, CommandCheck};
use crate::runner::CommandRunner;

/// The external verifications the workflows are assembled from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinCheck {
    /// node agent-tools/deploy/verify-env.js
    EnvironmentVariables,

    /// node agent-tools/supabase/test-connection.js
    DatabaseConnection,

    /// npx tsc --noEmit (in the website directory)
    TypeScriptCheck,

    /// node agent-tools/deploy/build-frontend.js
    FrontendBuild,

    /// node agent-tools/deploy/health-check.js --url=<site url>
    DeploymentHealth,
}

impl BuiltinCheck {
    pub fn name(&self) -> &'static str {
        match self {
            BuiltinCheck::EnvironmentVariables => "Environment Variables",
            BuiltinCheck::DatabaseConnection => "Database Connection",
            BuiltinCheck::TypeScriptCheck => "TypeScript Check",
            BuiltinCheck::FrontendBuild => "Frontend Build",
            BuiltinCheck::DeploymentHealth => "Deployment Health",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            BuiltinCheck::EnvironmentVariables => "Verifying environment variables...",
            BuiltinCheck::DatabaseConnection => "Testing database connection...",
            BuiltinCheck::TypeScriptCheck => "Checking TypeScript types...",
            BuiltinCheck::FrontendBuild => "Testing frontend build...",
            BuiltinCheck::DeploymentHealth => "Checking deployment health...",
        }
    }

    pub fn command(&self, config: &ProjectConfig) -> Vec<String> {
        match self {
            BuiltinCheck::EnvironmentVariables => {
                vec!["node".into(), "agent-tools/deploy/verify-env.js".into()]
            }
            BuiltinCheck::DatabaseConnection => {
                vec!["node".into(), "agent-tools/supabase/test-connection.js".into()]
            }
            BuiltinCheck::TypeScriptCheck => vec!["npx".into(), "tsc".into(), "--noEmit".into()],
            BuiltinCheck::FrontendBuild => {
                vec!["node".into(), "agent-tools/deploy/build-frontend.js".into()]
            }
            BuiltinCheck::DeploymentHealth => vec![
                "node".into(),
                "agent-tools/deploy/health-check.js".into(),
                format!("--url={}", config.site_url),
            ],
        }
    }

    /// (pass message, fail message, pass detail)
    fn messages(&self) -> (&'static str, &'static str, &'static str) {
        match self {
            BuiltinCheck::EnvironmentVariables => (
                "All required env vars present",
                "Missing env vars",
                "All vars present",
            ),
            BuiltinCheck::DatabaseConnection => (
                "Database is accessible",
                "Database connection failed",
                "Connected",
            ),
            BuiltinCheck::TypeScriptCheck => {
                ("No TypeScript errors", "TypeScript errors found", "No errors")
            }
            BuiltinCheck::FrontendBuild => (
                "Frontend builds successfully",
                "Frontend build failed",
                "Build succeeded",
            ),
            BuiltinCheck::DeploymentHealth => (
                "Deployment is healthy",
                "Deployment health check failed",
                "Healthy",
            ),
        }
    }

    /// Describe this check against a project.
    pub fn command_check(&self, config: &ProjectConfig) -> CommandCheck {
        let (pass, fail, detail) = self.messages();
        let dir = match self {
            BuiltinCheck::TypeScriptCheck => config.website_path(),
            _ => config.project_root.clone(),
        };
        CommandCheck::custom(self.name(), self.command(config), config.check_timeout_secs)
            .in_dir(dir)
            .with_messages(pass, fail)
            .with_pass_detail(detail)
            .with_detail_limit(config.detail_limit)
    }

    /// Bind this check to a runner with the per-check timeout.
    pub fn spec(&self, config: &ProjectConfig, runner: Arc<dyn CommandRunner>) -> CheckSpec {
        self.spec_with_timeout(config, runner, config.check_timeout_secs)
    }

    /// Bind this check to a runner, killing the command after `timeout_secs`.
    pub fn spec_with_timeout(
        &self,
        config: &ProjectConfig,
        runner: Arc<dyn CommandRunner>,
        timeout_secs: u64,
    ) -> CheckSpec {
        self.command_check(config)
            .with_timeout_secs(timeout_secs)
            .into_spec(runner)
            .with_description(self.description())
    }
}
