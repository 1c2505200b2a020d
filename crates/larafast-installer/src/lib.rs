//! # larafast-installer
//!
//! Installer library for the Larafast CLI providing:
//! - Stack and database choices with their template and port tables
//! - A command runner for external tools (git, composer, npm, php)
//! - In-place text substitution over project files
//! - `.env` rewriting for the chosen database
//! - The install orchestration sequence and its per-step report
//!
//! # Examples
//!
//! ```no_run
//! use larafast_installer::{
//!     DatabaseChoice, InstallPlan, Installer, InstallerConfig, ProcessRunner, ProjectIdentity,
//!     StackChoice,
//! };
//! use camino::Utf8PathBuf;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let plan = InstallPlan::new(
//!     StackChoice::Tall,
//!     DatabaseChoice::Pgsql,
//!     ProjectIdentity::new("demo-blog")?,
//!     Utf8PathBuf::from("/home/me/code"),
//! );
//! let installer = Installer::new(ProcessRunner, InstallerConfig::default());
//! let report = installer.install(&plan).await?;
//! println!("{} warning(s)", report.warnings().count());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod environment;
pub mod error;
pub mod git;
pub mod installer;
pub mod runner;
pub mod substitution;
pub mod types;

pub use config::{GitWorkflowConfig, InstallerConfig};
pub use error::{Error, Result};
pub use installer::{InstallReport, Installer, Step, StepReport, StepStatus};
pub use runner::{CommandOutput, CommandRunner, Invocation, Location, ProcessRunner};
pub use types::{CloneOutcome, DatabaseChoice, InstallPlan, ProjectIdentity, StackChoice};
