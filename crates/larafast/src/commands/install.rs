//! `larafast install` command handler

use anyhow::{anyhow, bail, Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use dialoguer::{Input, Select};
use tracing::debug;
use larafast_installer::git::is_valid_repo_url;
use larafast_installer::{
    DatabaseChoice, InstallPlan, InstallReport, Installer, InstallerConfig, ProcessRunner,
    ProjectIdentity, StackChoice, StepStatus,
};

use crate::cli::InstallArgs;
use crate::output;

/// Tools whose absence only degrades the install
const OPTIONAL_TOOLS: [&str; 3] = ["composer", "npm", "php"];

/// Install a Larafast boilerplate
pub async fn run(args: InstallArgs, config_path: Option<&Utf8Path>) -> Result<()> {
    let config = match config_path {
        Some(path) => {
            debug!("Using installer config {}", path);
            InstallerConfig::load_from(path)
        }
        None => InstallerConfig::load(),
    }
    .context("Failed to load installer configuration")?;
    debug!(
        "Git workflow: branch {}, upstream remote {}",
        config.git.default_branch, config.git.upstream_remote
    );

    let identity = ProjectIdentity::new(args.directory.as_str())?;

    let stack = match args.stack {
        Some(stack) => stack,
        None => select_stack()?,
    };
    let database = match args.database {
        Some(database) => database,
        None => select_database()?,
    };
    let remote = match (args.no_remote, args.remote) {
        (true, _) => None,
        (false, Some(remote)) => Some(remote),
        (false, None) => ask_remote()?,
    };

    let base_dir = resolve_base_dir(args.base_dir)?;
    debug!("Cloning into base directory {}", base_dir);
    check_prerequisites(args.json)?;

    let plan = InstallPlan::new(stack, database, identity, base_dir).with_remote(remote);

    if !args.json {
        output::header(&format!("Install Larafast {}", stack.title()));
        output::kv("Stack", stack.description());
        output::kv("Database", database.label());
        output::kv("Location", plan.project_dir().as_str());
        if let Some(remote) = &plan.remote {
            output::kv("Remote", remote);
        }
        println!();
    }

    let installer = Installer::new(ProcessRunner, config);
    let report = match installer.install(&plan).await {
        Ok(report) => report,
        Err(e) => {
            if let Some(hint) = e.hint() {
                output::warning(hint);
            }
            return Err(e).context(format!("Failed to install {}", plan.identity));
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        show_report(&report, &plan, installer.config());
    }

    Ok(())
}

fn select_stack() -> Result<StackChoice> {
    let stacks = StackChoice::all();
    let items: Vec<&str> = stacks.iter().map(StackChoice::description).collect();
    let default = stacks
        .iter()
        .position(|s| *s == StackChoice::default())
        .unwrap_or(0);

    output::info("Make sure you have access to the Larafast git repository you choose");
    let selection = Select::new()
        .with_prompt("Choose your Boilerplate")
        .items(&items)
        .default(default)
        .interact()
        .context("Stack selection failed (pass --stack when not running in a terminal)")?;

    Ok(stacks[selection])
}

fn select_database() -> Result<DatabaseChoice> {
    let databases = DatabaseChoice::all();
    let items: Vec<&str> = databases.iter().map(DatabaseChoice::label).collect();
    let default = databases
        .iter()
        .position(|d| *d == DatabaseChoice::default())
        .unwrap_or(0);

    let selection = Select::new()
        .with_prompt("Choose your Database")
        .items(&items)
        .default(default)
        .interact()
        .context("Database selection failed (pass --database when not running in a terminal)")?;

    Ok(databases[selection])
}

fn ask_remote() -> Result<Option<String>> {
    let remote: String = Input::new()
        .with_prompt("Git remote URL for the new project (leave empty to skip)")
        .allow_empty(true)
        .validate_with(|input: &String| -> std::result::Result<(), String> {
            let input = input.trim();
            if input.is_empty() || is_valid_repo_url(input) {
                Ok(())
            } else {
                Err("Use an https:// or git@ repository URL".to_string())
            }
        })
        .interact_text()
        .context("Remote prompt failed (pass --remote or --no-remote when not running in a terminal)")?;

    let remote = remote.trim();
    Ok((!remote.is_empty()).then(|| remote.to_string()))
}

/// Absolute clone base: `--base-dir`, or the parent of the current directory
fn resolve_base_dir(base_dir: Option<Utf8PathBuf>) -> Result<Utf8PathBuf> {
    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    let cwd = Utf8PathBuf::from_path_buf(cwd)
        .map_err(|p| anyhow!("Current directory is not valid UTF-8: {}", p.display()))?;

    Ok(match base_dir {
        Some(dir) => cwd.join(dir),
        None => cwd.parent().map(Utf8Path::to_path_buf).unwrap_or(cwd),
    })
}

/// git is required; the PHP and Node toolchains only produce warnings later
fn check_prerequisites(quiet: bool) -> Result<()> {
    let spinner = (!quiet).then(|| output::spinner("Checking prerequisites..."));
    let git = which::which("git");
    let missing: Vec<&str> = OPTIONAL_TOOLS
        .into_iter()
        .filter(|tool| match which::which(tool) {
            Ok(path) => {
                debug!("Found {} at {}", tool, path.display());
                false
            }
            Err(_) => true,
        })
        .collect();
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    if git.is_err() {
        bail!("git is required but was not found in PATH");
    }

    for tool in missing {
        output::warning(&format!(
            "{} not found in PATH; the steps that need it will fail",
            tool
        ));
    }

    Ok(())
}

fn show_report(report: &InstallReport, plan: &InstallPlan, config: &InstallerConfig) {
    for step in &report.steps {
        match &step.status {
            StepStatus::Ok => output::success(step.step.description()),
            StepStatus::Warning(message) => output::warning(&format!(
                "{}: {}",
                step.step.description(),
                message.lines().next().unwrap_or_default()
            )),
            StepStatus::Skipped => output::info(&format!("{} (skipped)", step.step.description())),
        }
    }

    println!();
    output::success("Larafast Installed Successfully");
    let warnings = report.warnings().count();
    if warnings > 0 {
        output::warning(&format!(
            "{} step(s) reported problems; re-run them by hand inside the project",
            warnings
        ));
    }

    println!();
    output::info("Next steps:");
    println!("   1. cd {}", report.project_dir);
    println!("   2. npm run dev");
    println!("   3. php artisan serve");
    println!();
    output::kv(
        "Template updates",
        &format!(
            "git pull {} {}",
            config.git.upstream_remote, config.git.default_branch
        ),
    );
    if plan.remote.is_none() {
        output::kv(
            "Publish",
            &format!(
                "git remote add {} <url> && git push -u {} {}",
                config.git.origin_remote, config.git.origin_remote, config.git.default_branch
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_base_dir_defaults_to_parent() {
        let cwd = Utf8PathBuf::from_path_buf(std::env::current_dir().unwrap()).unwrap();
        let base = resolve_base_dir(None).unwrap();
        assert_eq!(Some(base.as_path()), cwd.parent());
    }

    #[test]
    fn test_resolve_base_dir_keeps_absolute_path() {
        let base = resolve_base_dir(Some(Utf8PathBuf::from("/srv/projects"))).unwrap();
        assert_eq!(base, Utf8PathBuf::from("/srv/projects"));
    }

    #[test]
    fn test_resolve_base_dir_joins_relative_path() {
        let cwd = Utf8PathBuf::from_path_buf(std::env::current_dir().unwrap()).unwrap();
        let base = resolve_base_dir(Some(Utf8PathBuf::from("sites"))).unwrap();
        assert_eq!(base, cwd.join("sites"));
    }
}
