//! CLI argument parsing with clap

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use larafast_installer::{DatabaseChoice, StackChoice};

/// Larafast - scaffold a new project from a Larafast boilerplate
#[derive(Parser, Debug)]
#[command(name = "larafast")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to installer config file (default: ~/.larafast/config.yaml)
    #[arg(short, long, global = true)]
    pub config: Option<Utf8PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Install a Larafast boilerplate into a new directory
    Install(InstallArgs),

    /// List available boilerplate stacks
    Stacks(StacksArgs),

    /// Show version information
    Version(VersionArgs),
}

#[derive(Args, Debug)]
pub struct InstallArgs {
    /// Directory to create (next to the current directory unless --base-dir is set)
    pub directory: String,

    /// Boilerplate stack (prompted when omitted)
    #[arg(short, long)]
    pub stack: Option<StackChoice>,

    /// Database driver (prompted when omitted)
    #[arg(short, long)]
    pub database: Option<DatabaseChoice>,

    /// Git remote to push the new project to (prompted when omitted)
    #[arg(short, long, conflicts_with = "no_remote")]
    pub remote: Option<String>,

    /// Do not push to a remote and do not ask for one
    #[arg(long)]
    pub no_remote: bool,

    /// Directory the project is created in (default: parent of the current directory)
    #[arg(long)]
    pub base_dir: Option<Utf8PathBuf>,

    /// Output the install report as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct StacksArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}
