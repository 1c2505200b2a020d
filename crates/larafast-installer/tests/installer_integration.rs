//! Integration tests for the install sequence
//!
//! A scripted runner stands in for git/composer/npm/php so the sequence can be
//! checked without network access or a PHP toolchain.

use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use larafast_installer::{
    CloneOutcome, CommandOutput, CommandRunner, DatabaseChoice, Error, InstallPlan, Installer,
    InstallerConfig, Invocation, ProjectIdentity, StackChoice, Step, StepStatus,
};
use std::fs;
use std::sync::Mutex;
use tempfile::TempDir;

const TEMPLATE_ENV: &str = "APP_NAME=Larafast
APP_URL=http://localhost

DB_CONNECTION=mysql
DB_HOST=127.0.0.1
DB_PORT=3306
DB_DATABASE=larafast
DB_USERNAME=root
DB_PASSWORD=
";

#[derive(Default)]
struct ScriptedRunner {
    /// Clone URLs that produce the project directory
    reachable: Vec<String>,
    /// Programs that exit nonzero
    failing: Vec<String>,
    /// Whether a successful clone ships `.env.example`
    omit_env_example: bool,
    calls: Mutex<Vec<(Invocation, Utf8PathBuf)>>,
}

impl ScriptedRunner {
    fn reaching(urls: &[String]) -> Self {
        Self {
            reachable: urls.to_vec(),
            ..Default::default()
        }
    }

    fn calls(&self) -> Vec<(Invocation, Utf8PathBuf)> {
        self.calls.lock().unwrap().clone()
    }

    fn command_lines(&self) -> Vec<String> {
        self.calls().iter().map(|(inv, _)| inv.display()).collect()
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(&self, invocation: &Invocation, working_dir: &Utf8Path) -> CommandOutput {
        self.calls
            .lock()
            .unwrap()
            .push((invocation.clone(), working_dir.to_path_buf()));

        if invocation.program == "git" && invocation.args.first().map(String::as_str) == Some("clone")
        {
            let url = &invocation.args[2];
            if !self.reachable.contains(url) {
                return CommandOutput::failure("git@github.com: Permission denied (publickey).");
            }
            let target = working_dir.join(&invocation.args[3]);
            fs::create_dir_all(target.join(".git")).unwrap();
            fs::write(target.join(".git").join("HEAD"), "ref: refs/heads/main\n").unwrap();
            if !self.omit_env_example {
                fs::write(target.join(".env.example"), TEMPLATE_ENV).unwrap();
            }
            return CommandOutput::success("Cloning into...");
        }

        if self.failing.contains(&invocation.program) {
            return CommandOutput::failure(format!("{} exited with status 1", invocation.program));
        }

        CommandOutput::success("")
    }
}

fn plan(base: &Utf8Path, database: DatabaseChoice) -> InstallPlan {
    InstallPlan::new(
        StackChoice::Tall,
        database,
        ProjectIdentity::new("demo-blog").unwrap(),
        base,
    )
}

fn base_dir(temp_dir: &TempDir) -> Utf8PathBuf {
    Utf8PathBuf::from_path_buf(temp_dir.path().to_path_buf()).unwrap()
}

#[tokio::test]
async fn test_https_fallback_proceeds_past_verification() {
    let temp_dir = TempDir::new().unwrap();
    let base = base_dir(&temp_dir);
    let runner = ScriptedRunner::reaching(&[StackChoice::Tall.https_url()]);
    let installer = Installer::new(runner, InstallerConfig::default());

    let report = installer
        .install(&plan(&base, DatabaseChoice::Pgsql))
        .await
        .expect("install should succeed over HTTPS");

    assert_eq!(report.clone, CloneOutcome::HttpsFallback);
    let lines = installer.runner().command_lines();
    assert_eq!(
        lines[0],
        format!("git clone -- {} demo-blog", StackChoice::Tall.ssh_url())
    );
    assert_eq!(
        lines[1],
        format!("git clone -- {} demo-blog", StackChoice::Tall.https_url())
    );
    assert_eq!(lines[2], "composer install");

    let env = fs::read_to_string(base.join("demo-blog/.env")).unwrap();
    assert!(env.contains("APP_NAME=Demo-blog\n"));
    assert!(env.contains("APP_URL=http://demo-blog.test\n"));
    assert!(env.contains("DB_CONNECTION=pgsql\n"));
    assert!(env.contains("DB_PORT=5432\n"));
    assert!(env.contains("DB_DATABASE=demo_blog\n"));
}

#[tokio::test]
async fn test_ssh_success_skips_https() {
    let temp_dir = TempDir::new().unwrap();
    let base = base_dir(&temp_dir);
    let runner = ScriptedRunner::reaching(&[
        StackChoice::Tall.ssh_url(),
        StackChoice::Tall.https_url(),
    ]);
    let installer = Installer::new(runner, InstallerConfig::default());

    let report = installer
        .install(&plan(&base, DatabaseChoice::Sqlite))
        .await
        .unwrap();

    assert_eq!(report.clone, CloneOutcome::Ssh);
    let clones = installer
        .runner()
        .command_lines()
        .into_iter()
        .filter(|l| l.starts_with("git clone"))
        .count();
    assert_eq!(clones, 1);

    let env = fs::read_to_string(base.join("demo-blog/.env")).unwrap();
    assert!(env.contains("DB_CONNECTION=sqlite\n"));
    assert!(env.contains("# DB_HOST=127.0.0.1\n"));
    assert!(env.contains("# DB_PASSWORD=\n"));
}

#[tokio::test]
async fn test_clone_runs_from_base_and_later_steps_inside_project() {
    let temp_dir = TempDir::new().unwrap();
    let base = base_dir(&temp_dir);
    let runner = ScriptedRunner::reaching(&[StackChoice::Tall.ssh_url()]);
    let installer = Installer::new(runner, InstallerConfig::default());

    installer
        .install(&plan(&base, DatabaseChoice::Mysql))
        .await
        .unwrap();

    let calls = installer.runner().calls();
    assert_eq!(calls[0].1, base);
    for (inv, dir) in &calls[1..] {
        assert_eq!(dir, &base.join("demo-blog"), "{} ran in {}", inv, dir);
    }
}

#[tokio::test]
async fn test_total_clone_failure_aborts_before_other_steps() {
    let temp_dir = TempDir::new().unwrap();
    let base = base_dir(&temp_dir);
    let installer = Installer::new(ScriptedRunner::default(), InstallerConfig::default());

    let err = installer
        .install(&plan(&base, DatabaseChoice::Pgsql))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::TemplateUnavailable { .. }));
    assert!(err.hint().unwrap().contains("https://larafast.com"));
    assert_eq!(installer.runner().calls().len(), 2);
    assert!(!base.join("demo-blog").exists());
}

#[tokio::test]
async fn test_history_is_recreated_without_push_when_no_remote() {
    let temp_dir = TempDir::new().unwrap();
    let base = base_dir(&temp_dir);
    let runner = ScriptedRunner::reaching(&[StackChoice::Tall.ssh_url()]);
    let installer = Installer::new(runner, InstallerConfig::default());

    let report = installer
        .install(&plan(&base, DatabaseChoice::Mysql))
        .await
        .unwrap();

    assert!(!base.join("demo-blog/.git/HEAD").exists());
    assert_eq!(report.status_of(Step::PushToRemote), Some(&StepStatus::Skipped));

    let lines = installer.runner().command_lines();
    assert!(lines.contains(&"git init --initial-branch main".to_string()));
    assert!(lines.contains(&"git commit -m Initial commit".to_string()));
    assert!(!lines.iter().any(|l| l.starts_with("git push")));
    assert_eq!(
        lines.last().unwrap(),
        &format!("git remote add larafast {}", StackChoice::Tall.https_url())
    );
}

#[tokio::test]
async fn test_push_to_supplied_remote_before_upstream() {
    let temp_dir = TempDir::new().unwrap();
    let base = base_dir(&temp_dir);
    let runner = ScriptedRunner::reaching(&[StackChoice::Tall.ssh_url()]);
    let installer = Installer::new(runner, InstallerConfig::default());
    let plan = plan(&base, DatabaseChoice::Mysql)
        .with_remote(Some("git@github.com:me/demo-blog.git".to_string()));

    let report = installer.install(&plan).await.unwrap();

    assert_eq!(report.status_of(Step::PushToRemote), Some(&StepStatus::Ok));
    let lines = installer.runner().command_lines();
    let tail: Vec<&str> = lines[lines.len() - 4..].iter().map(String::as_str).collect();
    assert_eq!(
        tail,
        vec![
            "git remote add origin git@github.com:me/demo-blog.git",
            "git branch -M main",
            "git push -u origin main",
            "git remote add larafast https://github.com/karakhanyans-tools/larafast-tall.git",
        ]
    );
}

#[tokio::test]
async fn test_failed_subprocess_is_a_warning_not_an_abort() {
    let temp_dir = TempDir::new().unwrap();
    let base = base_dir(&temp_dir);
    let runner = ScriptedRunner {
        reachable: vec![StackChoice::Tall.ssh_url()],
        failing: vec!["composer".to_string()],
        ..Default::default()
    };
    let installer = Installer::new(runner, InstallerConfig::default());

    let report = installer
        .install(&plan(&base, DatabaseChoice::Sqlite))
        .await
        .unwrap();

    let warned: Vec<Step> = report.warnings().map(|r| r.step).collect();
    assert_eq!(warned, vec![Step::InstallBackendDeps]);
    assert_eq!(report.status_of(Step::MigrateSchema), Some(&StepStatus::Ok));
    assert_eq!(report.status_of(Step::AddUpstreamRemote), Some(&StepStatus::Ok));
}

#[tokio::test]
async fn test_missing_env_example_is_fatal() {
    let temp_dir = TempDir::new().unwrap();
    let base = base_dir(&temp_dir);
    let runner = ScriptedRunner {
        reachable: vec![StackChoice::Tall.ssh_url()],
        omit_env_example: true,
        ..Default::default()
    };
    let installer = Installer::new(runner, InstallerConfig::default());

    let err = installer
        .install(&plan(&base, DatabaseChoice::Pgsql))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Io(_)));
    assert!(!installer
        .runner()
        .command_lines()
        .iter()
        .any(|l| l.starts_with("php")));
}

#[tokio::test]
async fn test_existing_directory_is_refused() {
    let temp_dir = TempDir::new().unwrap();
    let base = base_dir(&temp_dir);
    fs::create_dir_all(base.join("demo-blog")).unwrap();
    let installer = Installer::new(
        ScriptedRunner::reaching(&[StackChoice::Tall.ssh_url()]),
        InstallerConfig::default(),
    );

    let err = installer
        .install(&plan(&base, DatabaseChoice::Pgsql))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::ProjectExists { .. }));
    assert!(installer.runner().calls().is_empty());
}

#[tokio::test]
async fn test_invalid_remote_is_refused_before_cloning() {
    let temp_dir = TempDir::new().unwrap();
    let base = base_dir(&temp_dir);
    let installer = Installer::new(
        ScriptedRunner::reaching(&[StackChoice::Tall.ssh_url()]),
        InstallerConfig::default(),
    );
    let plan = plan(&base, DatabaseChoice::Pgsql).with_remote(Some("not a url".to_string()));

    let err = installer.install(&plan).await.unwrap_err();

    assert!(matches!(err, Error::InvalidRepoUrl { .. }));
    assert!(installer.runner().calls().is_empty());
}

#[tokio::test]
async fn test_padded_remote_is_pushed_trimmed() {
    let temp_dir = TempDir::new().unwrap();
    let base = base_dir(&temp_dir);
    let runner = ScriptedRunner::reaching(&[StackChoice::Tall.ssh_url()]);
    let installer = Installer::new(runner, InstallerConfig::default());
    let plan = plan(&base, DatabaseChoice::Mysql)
        .with_remote(Some("  git@github.com:me/demo-blog.git ".to_string()));

    let report = installer.install(&plan).await.unwrap();

    assert_eq!(report.status_of(Step::PushToRemote), Some(&StepStatus::Ok));
    assert!(installer
        .runner()
        .command_lines()
        .contains(&"git remote add origin git@github.com:me/demo-blog.git".to_string()));
}
