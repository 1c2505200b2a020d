//! Build metadata for `larafast version`

use serde::{Deserialize, Serialize};
use std::fmt;

const BINARY_NAME: &str = "larafast";

/// Version and build metadata embedded at compile time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfo {
    pub version: String,

    /// Short commit SHA, absent when built outside a git checkout
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

impl VersionInfo {
    pub fn current() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            commit: option_env!("GIT_SHA").map(String::from),
            build_date: option_env!("BUILD_DATE").map(String::from),
            target: option_env!("TARGET").map(String::from),
        }
    }

    /// The one-line summary followed by one line per known build detail
    pub fn details(&self) -> Vec<String> {
        let mut lines = vec![self.to_string()];
        let fields = [
            ("Commit", &self.commit),
            ("Built", &self.build_date),
            ("Target", &self.target),
        ];
        for (label, value) in fields {
            if let Some(value) = value {
                lines.push(format!("{}: {}", label, value));
            }
        }
        lines
    }
}

/// `larafast 1.0.0 (abc1234) x86_64-unknown-linux-gnu`
impl fmt::Display for VersionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", BINARY_NAME, self.version)?;
        if let Some(commit) = &self.commit {
            write!(f, " ({})", commit)?;
        }
        if let Some(target) = &self.target {
            write!(f, " {}", target)?;
        }
        Ok(())
    }
}
