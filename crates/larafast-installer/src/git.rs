//! Git invocations used by the installer
//!
//! These only build [`Invocation`]s; running them (and deciding whether a
//! failure matters) is up to the caller.

use crate::error::{Error, Result};
use crate::runner::Invocation;

/// Clone `url` into `directory`, relative to the clone base
///
/// Both are passed after `--` so neither is read as an option.
pub fn clone(url: &str, directory: &str) -> Invocation {
    Invocation::new("git")
        .args(["clone", "--", url, directory])
        .from_clone_base()
}

/// Initialize a repository on `branch`
pub fn init(branch: &str) -> Invocation {
    Invocation::new("git").args(["init", "--initial-branch", branch])
}

/// Stage every file
pub fn add_all() -> Invocation {
    Invocation::new("git").args(["add", "--all"])
}

/// Commit staged files
pub fn commit(message: &str) -> Invocation {
    Invocation::new("git").args(["commit", "-m", message])
}

/// Add a remote
pub fn add_remote(name: &str, url: &str) -> Invocation {
    Invocation::new("git").args(["remote", "add", name, url])
}

/// Force-rename the current branch
pub fn rename_branch(branch: &str) -> Invocation {
    Invocation::new("git").args(["branch", "-M", branch])
}

/// Push `branch` to `remote` and track it
pub fn push(remote: &str, branch: &str) -> Invocation {
    Invocation::new("git").args(["push", "-u", remote, branch])
}

/// Validate if a string is a valid repository URL
pub fn is_valid_repo_url(url: &str) -> bool {
    url.starts_with("https://") || url.starts_with("git@") || url.starts_with("http://")
}

/// Validate a user-supplied remote URL
pub fn validate_remote_url(url: &str) -> Result<()> {
    if is_valid_repo_url(url.trim()) {
        Ok(())
    } else {
        Err(Error::invalid_repo_url(url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::Location;

    #[test]
    fn test_is_valid_repo_url() {
        assert!(is_valid_repo_url("https://github.com/user/repo.git"));
        assert!(is_valid_repo_url("git@github.com:user/repo.git"));
        assert!(is_valid_repo_url("http://example.com/repo.git"));
        assert!(!is_valid_repo_url("invalid-url"));
        assert!(!is_valid_repo_url(""));
    }

    #[test]
    fn test_validate_remote_url() {
        assert!(validate_remote_url("git@github.com:me/app.git").is_ok());
        assert!(matches!(
            validate_remote_url("github.com/me/app"),
            Err(Error::InvalidRepoUrl { .. })
        ));
    }

    #[test]
    fn test_clone_runs_from_clone_base() {
        let inv = clone("git@github.com:org/tpl.git", "my app");
        assert_eq!(inv.location, Location::CloneBase);
        assert_eq!(
            inv.args,
            vec!["clone", "--", "git@github.com:org/tpl.git", "my app"]
        );
    }

    #[test]
    fn test_clone_directory_is_never_an_option() {
        let inv = clone("https://github.com/org/tpl.git", "-shop");
        let separator = inv.args.iter().position(|a| a == "--").unwrap();
        let directory = inv.args.iter().position(|a| a == "-shop").unwrap();
        assert!(separator < directory);
    }

    #[test]
    fn test_project_commands_run_in_project() {
        for inv in [
            init("main"),
            add_all(),
            commit("Initial commit"),
            add_remote("origin", "https://example.com/r.git"),
            rename_branch("main"),
            push("origin", "main"),
        ] {
            assert_eq!(inv.location, Location::Project);
            assert_eq!(inv.program, "git");
        }
    }
}
