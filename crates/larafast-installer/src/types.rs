//! Core types for the installer

use crate::error::{Error, Result};
use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

const GITHUB_SSH_PREFIX: &str = "git@github.com:";
const GITHUB_HTTPS_PREFIX: &str = "https://github.com/";

/// Larafast boilerplate stacks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StackChoice {
    /// Tailwind CSS, Alpine.js, Laravel, Livewire
    #[default]
    Tall,
    /// Vue.js, Inertia.js, Laravel, Tailwind CSS
    Vilt,
    /// Directory boilerplate
    Directory,
    /// REST API boilerplate
    Api,
    /// Multi-tenant boilerplate
    Tenancy,
}

impl StackChoice {
    /// Get all available stacks
    pub fn all() -> Vec<Self> {
        vec![
            Self::Tall,
            Self::Vilt,
            Self::Directory,
            Self::Api,
            Self::Tenancy,
        ]
    }

    /// Get the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tall => "tall",
            Self::Vilt => "vilt",
            Self::Directory => "directory",
            Self::Api => "api",
            Self::Tenancy => "tenancy",
        }
    }

    /// Get description for the stack
    pub fn description(&self) -> &'static str {
        match self {
            Self::Tall => "Larafast TALL Stack (Tailwind CSS, Alpine.js, Laravel, Livewire)",
            Self::Vilt => "Larafast VILT Stack (Vue.js, Inertia.js, Laravel, Tailwind CSS)",
            Self::Directory => "Larafast Directory Boilerplate",
            Self::Api => "Larafast API Boilerplate",
            Self::Tenancy => "Larafast Multi-Tenancy Boilerplate",
        }
    }

    /// GitHub `owner/name` of the template repository
    pub fn repository(&self) -> &'static str {
        match self {
            Self::Tall => "karakhanyans-tools/larafast-tall",
            Self::Vilt => "karakhanyans-tools/larafast",
            Self::Directory => "karakhanyans-tools/larafast-directories",
            Self::Api => "karakhanyans-tools/larafast-rest-api",
            Self::Tenancy => "karakhanyans-tools/larafast-tenancy",
        }
    }

    /// SSH remote URL of the template
    pub fn ssh_url(&self) -> String {
        format!("{}{}.git", GITHUB_SSH_PREFIX, self.repository())
    }

    /// HTTPS remote URL of the template
    pub fn https_url(&self) -> String {
        format!("{}{}.git", GITHUB_HTTPS_PREFIX, self.repository())
    }

    /// Display name, e.g. `Tall`
    pub fn title(&self) -> String {
        capitalize_first(self.as_str())
    }
}

impl std::fmt::Display for StackChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for StackChoice {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s_lower = s.trim().to_lowercase();
        Self::all()
            .into_iter()
            .find(|stack| stack.as_str() == s_lower)
            .ok_or_else(|| {
                Error::unknown_stack(
                    s,
                    Self::all()
                        .iter()
                        .map(|t| t.as_str())
                        .collect::<Vec<_>>()
                        .join(", "),
                )
            })
    }
}

/// Database drivers a project can be configured for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseChoice {
    #[default]
    Sqlite,
    Mysql,
    Pgsql,
    Sqlsrv,
}

impl DatabaseChoice {
    /// Get all available databases
    pub fn all() -> Vec<Self> {
        vec![Self::Sqlite, Self::Mysql, Self::Pgsql, Self::Sqlsrv]
    }

    /// Value written to `DB_CONNECTION`
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::Mysql => "mysql",
            Self::Pgsql => "pgsql",
            Self::Sqlsrv => "sqlsrv",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Sqlite => "SQLite",
            Self::Mysql => "MySQL",
            Self::Pgsql => "PostgreSQL",
            Self::Sqlsrv => "SQL Server",
        }
    }

    /// Default port when it differs from the template's baseline (MySQL, 3306)
    pub fn nonstandard_port(&self) -> Option<u16> {
        match self {
            Self::Pgsql => Some(5432),
            Self::Sqlsrv => Some(1433),
            Self::Sqlite | Self::Mysql => None,
        }
    }

    /// Whether the relational host/port/credential block applies
    pub fn uses_network(&self) -> bool {
        !matches!(self, Self::Sqlite)
    }
}

impl std::fmt::Display for DatabaseChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for DatabaseChoice {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s_lower = s.trim().to_lowercase();
        Self::all()
            .into_iter()
            .find(|db| db.as_str() == s_lower)
            .ok_or_else(|| {
                Error::unknown_database(
                    s,
                    Self::all()
                        .iter()
                        .map(|t| t.as_str())
                        .collect::<Vec<_>>()
                        .join(", "),
                )
            })
    }
}

/// The target directory name and the names derived from it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectIdentity {
    name: String,
}

impl ProjectIdentity {
    /// Validate a directory name
    ///
    /// # Errors
    /// Returns an error for empty names, `.`/`..`, names starting with `-`,
    /// or names containing path separators.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let trimmed = name.trim();

        if trimmed.is_empty()
            || trimmed == "."
            || trimmed == ".."
            || trimmed.starts_with('-')
            || trimmed.contains('/')
            || trimmed.contains('\\')
        {
            return Err(Error::invalid_project_name(name));
        }

        Ok(Self {
            name: trimmed.to_string(),
        })
    }

    /// Directory name as given
    pub fn name(&self) -> &str {
        &self.name
    }

    /// `APP_NAME` value: first character uppercased
    pub fn display_name(&self) -> String {
        capitalize_first(&self.name)
    }

    /// Schema-safe database name: lowercased, hyphens replaced with underscores
    pub fn database_name(&self) -> String {
        self.name.to_lowercase().replace('-', "_")
    }

    /// `APP_URL` value for a local development domain
    pub fn local_url(&self, local_domain: &str) -> String {
        format!("http://{}.{}", self.name, local_domain)
    }
}

impl std::fmt::Display for ProjectIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// Everything the user chose, fixed before the first step runs
#[derive(Debug, Clone)]
pub struct InstallPlan {
    pub stack: StackChoice,
    pub database: DatabaseChoice,
    pub identity: ProjectIdentity,
    /// Directory the project is cloned into
    pub base_dir: Utf8PathBuf,
    /// Repository to push the fresh history to
    pub remote: Option<String>,
}

impl InstallPlan {
    /// Create a plan without a push remote
    pub fn new(
        stack: StackChoice,
        database: DatabaseChoice,
        identity: ProjectIdentity,
        base_dir: impl Into<Utf8PathBuf>,
    ) -> Self {
        Self {
            stack,
            database,
            identity,
            base_dir: base_dir.into(),
            remote: None,
        }
    }

    /// Set the remote to push to
    pub fn with_remote(mut self, remote: Option<String>) -> Self {
        self.remote = remote
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());
        self
    }

    /// Path of the project directory
    pub fn project_dir(&self) -> Utf8PathBuf {
        self.base_dir.join(self.identity.name())
    }
}

/// How the template reached the target directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CloneOutcome {
    Ssh,
    HttpsFallback,
    Failed,
}

impl CloneOutcome {
    pub fn succeeded(&self) -> bool {
        !matches!(self, Self::Failed)
    }
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
