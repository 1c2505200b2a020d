//! Install orchestration
//!
//! Runs the fixed install sequence for an [`InstallPlan`]:
//!
//! clone (SSH, then HTTPS) → verify → composer install → npm install →
//! `.env` from `.env.example` → app identity → database → app key →
//! migrations → fresh git history → optional push → upstream remote.
//!
//! Only a failed clone aborts the run. File rewrites propagate their errors.
//! Every other step is best-effort: a failing command is recorded as a
//! warning in the [`InstallReport`] and the sequence continues.

use crate::config::InstallerConfig;
use crate::environment;
use crate::error::{Error, Result};
use crate::git;
use crate::runner::{CommandRunner, Invocation, Location, WorkingDirs};
use crate::types::{CloneOutcome, DatabaseChoice, InstallPlan, StackChoice};
use camino::Utf8PathBuf;
use serde::Serialize;
use tracing::{debug, info, warn};

/// Install steps, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Step {
    Clone,
    InstallBackendDeps,
    InstallFrontendDeps,
    MaterializeEnvFile,
    PatchAppIdentity,
    ConfigureDatabase,
    GenerateSecret,
    MigrateSchema,
    ReinitVcs,
    PushToRemote,
    AddUpstreamRemote,
}

impl Step {
    /// Progress message for the step
    pub fn description(&self) -> &'static str {
        match self {
            Self::Clone => "Cloning repository",
            Self::InstallBackendDeps => "Installing Composer dependencies",
            Self::InstallFrontendDeps => "Installing NPM dependencies",
            Self::MaterializeEnvFile => "Creating .env file",
            Self::PatchAppIdentity => "Setting application name and URL",
            Self::ConfigureDatabase => "Configuring database connection",
            Self::GenerateSecret => "Generating application key",
            Self::MigrateSchema => "Running database migrations",
            Self::ReinitVcs => "Creating fresh git history",
            Self::PushToRemote => "Pushing to remote repository",
            Self::AddUpstreamRemote => "Adding template remote",
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.description())
    }
}

/// How a step ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "message", rename_all = "kebab-case")]
pub enum StepStatus {
    Ok,
    Warning(String),
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepReport {
    pub step: Step,
    #[serde(flatten)]
    pub status: StepStatus,
}

/// Outcome of a completed install
#[derive(Debug, Clone, Serialize)]
pub struct InstallReport {
    pub stack: StackChoice,
    pub database: DatabaseChoice,
    pub project_dir: Utf8PathBuf,
    pub clone: CloneOutcome,
    pub steps: Vec<StepReport>,
}

impl InstallReport {
    fn new(plan: &InstallPlan, clone: CloneOutcome) -> Self {
        Self {
            stack: plan.stack,
            database: plan.database,
            project_dir: plan.project_dir(),
            clone,
            steps: Vec::new(),
        }
    }

    fn record(&mut self, step: Step, status: StepStatus) {
        self.steps.push(StepReport { step, status });
    }

    /// Steps that ended with a warning
    pub fn warnings(&self) -> impl Iterator<Item = &StepReport> {
        self.steps
            .iter()
            .filter(|r| matches!(r.status, StepStatus::Warning(_)))
    }

    /// Status of `step`, if it was reached
    pub fn status_of(&self, step: Step) -> Option<&StepStatus> {
        self.steps
            .iter()
            .find(|r| r.step == step)
            .map(|r| &r.status)
    }
}

/// Drives the install sequence through a [`CommandRunner`]
pub struct Installer<R> {
    runner: R,
    config: InstallerConfig,
}

impl<R: CommandRunner> Installer<R> {
    pub fn new(runner: R, config: InstallerConfig) -> Self {
        Self { runner, config }
    }

    pub fn config(&self) -> &InstallerConfig {
        &self.config
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Install `plan`
    ///
    /// # Errors
    /// Returns an error if:
    /// - The project directory already exists
    /// - Neither SSH nor HTTPS produced the project directory
    /// - `.env` cannot be created or rewritten
    pub async fn install(&self, plan: &InstallPlan) -> Result<InstallReport> {
        let dirs = WorkingDirs {
            base_dir: plan.base_dir.clone(),
            project_dir: plan.project_dir(),
        };

        if dirs.project_dir.exists() {
            return Err(Error::project_exists(dirs.project_dir.as_str()));
        }
        if let Some(remote) = &plan.remote {
            git::validate_remote_url(remote)?;
        }
        std::fs::create_dir_all(&dirs.base_dir)?;

        info!(
            "Installing Larafast {} in {} directory...",
            plan.stack.title(),
            plan.identity
        );

        let clone = self.clone_template(plan, &dirs).await;
        if !clone.succeeded() {
            return Err(Error::template_unavailable(
                plan.stack.as_str(),
                format!(
                    "Make sure you have access to the {} repository. Get access at {}",
                    plan.stack.repository(),
                    self.config.purchase_url
                ),
            ));
        }

        let mut report = InstallReport::new(plan, clone);
        report.record(Step::Clone, StepStatus::Ok);

        self.run_step(
            &mut report,
            &dirs,
            Step::InstallBackendDeps,
            &[Invocation::new("composer").arg("install")],
        )
        .await;
        self.run_step(
            &mut report,
            &dirs,
            Step::InstallFrontendDeps,
            &[Invocation::new("npm").arg("install")],
        )
        .await;

        self.configure_environment(&mut report, plan, &dirs)?;

        self.run_step(
            &mut report,
            &dirs,
            Step::GenerateSecret,
            &[Invocation::new("php").args(["artisan", "key:generate"])],
        )
        .await;
        self.run_step(
            &mut report,
            &dirs,
            Step::MigrateSchema,
            &[Invocation::new("php").args(["artisan", "migrate:fresh", "--no-interaction"])],
        )
        .await;

        self.reinit_history(&mut report, &dirs).await;

        let git_config = &self.config.git;
        match &plan.remote {
            Some(remote) => {
                self.run_step(
                    &mut report,
                    &dirs,
                    Step::PushToRemote,
                    &[
                        git::add_remote(&git_config.origin_remote, remote.trim()),
                        git::rename_branch(&git_config.default_branch),
                        git::push(&git_config.origin_remote, &git_config.default_branch),
                    ],
                )
                .await;
            }
            None => {
                debug!("No remote supplied, skipping push");
                report.record(Step::PushToRemote, StepStatus::Skipped);
            }
        }

        self.run_step(
            &mut report,
            &dirs,
            Step::AddUpstreamRemote,
            &[git::add_remote(
                &git_config.upstream_remote,
                &plan.stack.https_url(),
            )],
        )
        .await;

        info!("Larafast installed successfully");
        Ok(report)
    }

    /// Try SSH, then HTTPS; the directory appearing is what counts
    async fn clone_template(&self, plan: &InstallPlan, dirs: &WorkingDirs) -> CloneOutcome {
        let attempts = [
            (CloneOutcome::Ssh, plan.stack.ssh_url()),
            (CloneOutcome::HttpsFallback, plan.stack.https_url()),
        ];

        for (outcome, url) in attempts {
            info!("Cloning repository {}...", url);
            let invocation = git::clone(&url, plan.identity.name());
            let output = self
                .runner
                .run(&invocation, dirs.for_location(invocation.location))
                .await;

            if !output.success {
                warn!("{}", output.output);
            }

            if dirs.project_dir.is_dir() {
                debug!("Template cloned via {:?}", outcome);
                return outcome;
            }
        }

        CloneOutcome::Failed
    }

    fn configure_environment(
        &self,
        report: &mut InstallReport,
        plan: &InstallPlan,
        dirs: &WorkingDirs,
    ) -> Result<()> {
        let project_dir = dirs.for_location(Location::Project);

        info!("{}...", Step::MaterializeEnvFile);
        environment::materialize(project_dir)?;
        report.record(Step::MaterializeEnvFile, StepStatus::Ok);

        info!("{}...", Step::PatchAppIdentity);
        environment::patch_app_identity(project_dir, &plan.identity, &self.config.local_domain)?;
        report.record(Step::PatchAppIdentity, StepStatus::Ok);

        info!("{}...", Step::ConfigureDatabase);
        environment::configure(project_dir, plan.database)?;
        report.record(Step::ConfigureDatabase, StepStatus::Ok);

        Ok(())
    }

    /// Drop the template's history and commit the configured project
    async fn reinit_history(&self, report: &mut InstallReport, dirs: &WorkingDirs) {
        let git_dir = dirs.project_dir.join(".git");
        let mut problems = Vec::new();

        if git_dir.exists() {
            if let Err(e) = tokio::fs::remove_dir_all(&git_dir).await {
                problems.push(format!("Failed to remove {}: {}", git_dir, e));
            }
        }

        let git_config = &self.config.git;
        let invocations = [
            git::init(&git_config.default_branch),
            git::add_all(),
            git::commit(&git_config.initial_commit_message),
        ];
        problems.extend(self.run_all(dirs, &invocations).await);

        report.record(Step::ReinitVcs, Self::status_from(Step::ReinitVcs, problems));
    }

    async fn run_step(
        &self,
        report: &mut InstallReport,
        dirs: &WorkingDirs,
        step: Step,
        invocations: &[Invocation],
    ) {
        info!("{}...", step);
        let problems = self.run_all(dirs, invocations).await;
        report.record(step, Self::status_from(step, problems));
    }

    /// Run every invocation, returning the failures
    async fn run_all(&self, dirs: &WorkingDirs, invocations: &[Invocation]) -> Vec<String> {
        let mut problems = Vec::new();
        for invocation in invocations {
            let output = self
                .runner
                .run(invocation, dirs.for_location(invocation.location))
                .await;

            if output.success {
                if !output.output.is_empty() {
                    debug!("{}", output.output);
                }
            } else {
                problems.push(output.output);
            }
        }
        problems
    }

    fn status_from(step: Step, problems: Vec<String>) -> StepStatus {
        if problems.is_empty() {
            return StepStatus::Ok;
        }
        let message = problems.join("\n");
        warn!("{} failed: {}", step, message);
        StepStatus::Warning(message)
    }
}
