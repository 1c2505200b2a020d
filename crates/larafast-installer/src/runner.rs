//! External command execution
//!
//! Every tool the installer drives (git, composer, npm, php) goes through a
//! [`CommandRunner`]. A runner never returns an error: spawn failures and
//! nonzero exits come back as an unsuccessful [`CommandOutput`] and the caller
//! decides what that means.

use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use tokio::process::Command;
use tracing::debug;

/// Where a command runs relative to the plan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    /// The directory the project is cloned into
    CloneBase,
    /// Inside the project directory
    Project,
}

impl Location {
    /// Resolve against a clone base and project directory
    pub fn resolve<'a>(&self, base_dir: &'a Utf8Path, project_dir: &'a Utf8Path) -> &'a Utf8Path {
        match self {
            Self::CloneBase => base_dir,
            Self::Project => project_dir,
        }
    }
}

/// A program with its argument list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub location: Location,
}

impl Invocation {
    /// Create an invocation that runs inside the project directory
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            location: Location::Project,
        }
    }

    /// Append a single argument
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Run from the clone base instead of the project directory
    pub fn from_clone_base(mut self) -> Self {
        self.location = Location::CloneBase;
        self
    }

    /// Command line for logs and reports
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl std::fmt::Display for Invocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display())
    }
}

/// Result of running one command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Standard output on success, diagnostics on failure
    pub output: String,
    pub success: bool,
}

impl CommandOutput {
    pub fn success(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            success: true,
        }
    }

    pub fn failure(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            success: false,
        }
    }
}

/// Executes external commands
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `invocation` in `working_dir` and wait for it to exit
    async fn run(&self, invocation: &Invocation, working_dir: &Utf8Path) -> CommandOutput;
}

/// Runs commands as real child processes
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, invocation: &Invocation, working_dir: &Utf8Path) -> CommandOutput {
        debug!("Running: {} (in {})", invocation, working_dir);

        let result = Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(working_dir)
            .stdin(std::process::Stdio::null())
            .output()
            .await;

        let output = match result {
            Ok(output) => output,
            Err(e) => {
                return CommandOutput::failure(format!(
                    "Failed to execute {}: {}",
                    invocation.program, e
                ));
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

        if output.status.success() {
            return CommandOutput::success(stdout);
        }

        let mut diagnostics = [stdout, stderr]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("\n");
        if diagnostics.is_empty() {
            diagnostics = format!("exited with {}", output.status);
        }

        CommandOutput::failure(format!(
            "The command \"{}\" failed in {}: {}",
            invocation, working_dir, diagnostics
        ))
    }
}

/// Owned working directory pair, handy for callers that build paths once
#[derive(Debug, Clone)]
pub struct WorkingDirs {
    pub base_dir: Utf8PathBuf,
    pub project_dir: Utf8PathBuf,
}

impl WorkingDirs {
    pub fn for_location(&self, location: Location) -> &Utf8Path {
        location.resolve(&self.base_dir, &self.project_dir)
    }
}
