//! Installer configuration
//!
//! Loaded with the following precedence (low to high):
//! 1. Built-in defaults
//! 2. Config file (`~/.larafast/config.yaml`, or an explicit path)
//! 3. Environment variables (`LARAFAST_*` prefix)
//! 4. CLI flags (handled by caller)

use crate::error::{Error, Result};
use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use tracing::debug;

const CONFIG_DIR: &str = ".larafast";
const CONFIG_FILE: &str = "config.yaml";

/// Git settings applied when the project history is recreated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct GitWorkflowConfig {
    /// Branch the fresh repository starts on
    #[serde(default = "default_git_branch")]
    pub default_branch: String,

    /// Message of the single initial commit
    #[serde(default = "default_initial_commit_message")]
    pub initial_commit_message: String,

    /// Remote name for the user's repository
    #[serde(default = "default_origin_remote")]
    pub origin_remote: String,

    /// Remote name pointing back at the template
    #[serde(default = "default_upstream_remote")]
    pub upstream_remote: String,
}

impl Default for GitWorkflowConfig {
    fn default() -> Self {
        Self {
            default_branch: default_git_branch(),
            initial_commit_message: default_initial_commit_message(),
            origin_remote: default_origin_remote(),
            upstream_remote: default_upstream_remote(),
        }
    }
}

fn default_git_branch() -> String {
    "main".to_string()
}
fn default_initial_commit_message() -> String {
    "Initial commit".to_string()
}
fn default_origin_remote() -> String {
    "origin".to_string()
}
fn default_upstream_remote() -> String {
    "larafast".to_string()
}

/// Top-level installer configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct InstallerConfig {
    #[serde(default)]
    pub git: GitWorkflowConfig,

    /// TLD used for `APP_URL` (`http://<project>.<local-domain>`)
    #[serde(default = "default_local_domain")]
    pub local_domain: String,

    /// Where to buy access when the template cannot be cloned
    #[serde(default = "default_purchase_url")]
    pub purchase_url: String,
}

impl Default for InstallerConfig {
    fn default() -> Self {
        Self {
            git: GitWorkflowConfig::default(),
            local_domain: default_local_domain(),
            purchase_url: default_purchase_url(),
        }
    }
}

fn default_local_domain() -> String {
    "test".to_string()
}
fn default_purchase_url() -> String {
    "https://larafast.com".to_string()
}

impl InstallerConfig {
    /// Load configuration from the default location plus environment overrides
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        let config = match path {
            Some(path) if path.exists() => Self::from_file(&path)?,
            _ => Self::default(),
        };
        config.with_env_overrides()
    }

    /// Load configuration from an explicit file plus environment overrides
    ///
    /// # Errors
    /// Returns an error if the file is missing or is not valid YAML.
    pub fn load_from(path: &Utf8Path) -> Result<Self> {
        Self::from_file(path)?.with_env_overrides()
    }

    /// Default config path (`~/.larafast/config.yaml`)
    pub fn default_path() -> Option<Utf8PathBuf> {
        let home = dirs::home_dir()?;
        Utf8PathBuf::from_path_buf(home)
            .ok()
            .map(|home| home.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    fn from_file(path: &Utf8Path) -> Result<Self> {
        debug!("Loading installer config from {}", path);
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
            .map_err(|e| Error::invalid_config(format!("Failed to parse {}: {}", path, e)))
    }

    /// Parse a YAML document; missing keys fall back to defaults
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml_ng::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `LARAFAST_*` environment variable overrides
    pub fn with_env_overrides(mut self) -> Result<Self> {
        if let Ok(branch) = env::var("LARAFAST_DEFAULT_BRANCH") {
            self.git.default_branch = branch;
        }
        if let Ok(remote) = env::var("LARAFAST_UPSTREAM_REMOTE") {
            self.git.upstream_remote = remote;
        }
        if let Ok(domain) = env::var("LARAFAST_LOCAL_DOMAIN") {
            self.local_domain = domain;
        }
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<()> {
        if self.git.default_branch.trim().is_empty() {
            return Err(Error::invalid_config("git.default-branch cannot be empty"));
        }
        if self.git.upstream_remote.trim().is_empty() {
            return Err(Error::invalid_config("git.upstream-remote cannot be empty"));
        }
        if self.git.upstream_remote == self.git.origin_remote {
            return Err(Error::invalid_config(format!(
                "git.upstream-remote must differ from git.origin-remote ('{}')",
                self.git.origin_remote
            )));
        }
        if self.local_domain.trim().is_empty() {
            return Err(Error::invalid_config("local-domain cannot be empty"));
        }
        Ok(())
    }
}
