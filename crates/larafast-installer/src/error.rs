//! Error types for larafast-installer

use thiserror::Error;

/// Result type alias using larafast-installer's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Installer error types
#[derive(Error, Debug)]
pub enum Error {
    /// Target directory already exists before cloning
    #[error("Project already exists at: {path}")]
    ProjectExists { path: String },

    /// Invalid project directory name
    #[error("Invalid project name: {name}. Must be a single directory name")]
    InvalidProjectName { name: String },

    /// Unknown stack
    #[error("Unknown stack: {stack}. Available stacks: {available}")]
    UnknownStack { stack: String, available: String },

    /// Unknown database
    #[error("Unknown database: {database}. Available databases: {available}")]
    UnknownDatabase { database: String, available: String },

    /// Every clone transport failed
    #[error("Unable to clone the {stack} template over SSH or HTTPS")]
    TemplateUnavailable { stack: String, hint: String },

    /// Invalid repository URL
    #[error("Invalid repository URL: {url}")]
    InvalidRepoUrl { url: String },

    /// Substitution search/replace lists differ in length
    #[error("Substitution mismatch: {searches} search strings but {replaces} replacements")]
    SubstitutionMismatch { searches: usize, replaces: usize },

    /// Invalid path
    #[error("Invalid path: {path}")]
    InvalidPath { path: String },

    /// Invalid installer configuration
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    /// Regex error
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a project exists error
    pub fn project_exists(path: impl Into<String>) -> Self {
        Self::ProjectExists { path: path.into() }
    }

    /// Create an invalid project name error
    pub fn invalid_project_name(name: impl Into<String>) -> Self {
        Self::InvalidProjectName { name: name.into() }
    }

    /// Create an unknown stack error
    pub fn unknown_stack(stack: impl Into<String>, available: impl Into<String>) -> Self {
        Self::UnknownStack {
            stack: stack.into(),
            available: available.into(),
        }
    }

    /// Create an unknown database error
    pub fn unknown_database(database: impl Into<String>, available: impl Into<String>) -> Self {
        Self::UnknownDatabase {
            database: database.into(),
            available: available.into(),
        }
    }

    /// Create a template unavailable error
    pub fn template_unavailable(stack: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::TemplateUnavailable {
            stack: stack.into(),
            hint: hint.into(),
        }
    }

    /// Create an invalid repo URL error
    pub fn invalid_repo_url(url: impl Into<String>) -> Self {
        Self::InvalidRepoUrl { url: url.into() }
    }

    /// Create an invalid path error
    pub fn invalid_path(path: impl Into<String>) -> Self {
        Self::InvalidPath { path: path.into() }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// User-facing hint attached to the error, if any
    pub fn hint(&self) -> Option<&str> {
        match self {
            Self::TemplateUnavailable { hint, .. } => Some(hint),
            _ => None,
        }
    }
}
