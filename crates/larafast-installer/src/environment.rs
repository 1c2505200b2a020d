//! `.env` rewriting for a freshly cloned template
//!
//! The template ships with MySQL-style defaults. [`configure`] switches the
//! connection driver and toggles the relational block so the file matches the
//! chosen database and project.

use crate::error::{Error, Result};
use crate::substitution::{literal_replace, pattern_replace};
use crate::types::{DatabaseChoice, ProjectIdentity};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use tracing::{debug, info};

/// Environment file name inside the project
pub const ENV_FILE: &str = ".env";

/// Example file the template ships with
pub const ENV_EXAMPLE_FILE: &str = ".env.example";

const CONNECTION_PATTERN: &str = "DB_CONNECTION=.*";

/// Present only when the relational block is already commented out
const COMMENTED_MARKER: &str = "# DB_HOST=127.0.0.1";

const COMMENT_PREFIX: &str = "# ";

/// The relational block exactly as the template ships it
const RELATIONAL_DEFAULTS: [&str; 5] = [
    "DB_HOST=127.0.0.1",
    "DB_PORT=3306",
    "DB_DATABASE=larafast",
    "DB_USERNAME=root",
    "DB_PASSWORD=",
];

/// Whole-line matches, so rewritten values are never matched again
const TEMPLATE_PORT_PATTERN: &str = "(?m)^DB_PORT=3306$";
const TEMPLATE_DATABASE_PATTERN: &str = "(?m)^DB_DATABASE=larafast$";
const TEMPLATE_APP_NAME_LINE: &str = "APP_NAME=Larafast";
const TEMPLATE_APP_URL_LINE: &str = "APP_URL=http://localhost";

/// Path of the environment file in a project
pub fn env_path(project_dir: &Utf8Path) -> Utf8PathBuf {
    project_dir.join(ENV_FILE)
}

/// Copy `.env.example` to `.env`
pub fn materialize(project_dir: &Utf8Path) -> Result<()> {
    let source = project_dir.join(ENV_EXAMPLE_FILE);
    let target = env_path(project_dir);
    debug!("Copying {} -> {}", source, target);
    fs::copy(&source, &target)?;
    Ok(())
}

/// Rewrite `APP_NAME` and `APP_URL` for the project
pub fn patch_app_identity(
    project_dir: &Utf8Path,
    identity: &ProjectIdentity,
    local_domain: &str,
) -> Result<()> {
    let name_line = format!("APP_NAME={}", identity.display_name());
    let url_line = format!("APP_URL={}", identity.local_url(local_domain));

    literal_replace(
        &env_path(project_dir),
        &[TEMPLATE_APP_NAME_LINE, TEMPLATE_APP_URL_LINE],
        &[name_line.as_str(), url_line.as_str()],
    )
}

/// Point the project's `.env` at `database`
///
/// The database name is derived from the project directory's name.
///
/// # Errors
/// Returns an error if the directory has no final component or `.env`
/// cannot be read or written.
pub fn configure(project_dir: &Utf8Path, database: DatabaseChoice) -> Result<()> {
    let identity = project_dir
        .file_name()
        .ok_or_else(|| Error::invalid_path(project_dir.as_str()))
        .and_then(ProjectIdentity::new)?;
    let path = env_path(project_dir);

    info!("Configuring {} for {}", path, database.label());

    pattern_replace(
        &path,
        CONNECTION_PATTERN,
        &format!("DB_CONNECTION={}", database),
    )?;

    if !database.uses_network() {
        let content = fs::read_to_string(&path)?;
        if !content.contains(COMMENTED_MARKER) {
            comment_relational_block(&path)?;
        }
        return Ok(());
    }

    // Stripping a prefix that is not there is a no-op, so this stays idempotent
    uncomment_relational_block(&path)?;

    if let Some(port) = database.nonstandard_port() {
        pattern_replace(&path, TEMPLATE_PORT_PATTERN, &format!("DB_PORT={}", port))?;
    }

    pattern_replace(
        &path,
        TEMPLATE_DATABASE_PATTERN,
        &format!("DB_DATABASE={}", identity.database_name()),
    )
}

fn comment_relational_block(path: &Utf8Path) -> Result<()> {
    let commented: Vec<String> = RELATIONAL_DEFAULTS
        .iter()
        .map(|line| format!("{}{}", COMMENT_PREFIX, line))
        .collect();
    literal_replace(path, RELATIONAL_DEFAULTS.as_slice(), commented.as_slice())
}

fn uncomment_relational_block(path: &Utf8Path) -> Result<()> {
    let commented: Vec<String> = RELATIONAL_DEFAULTS
        .iter()
        .map(|line| format!("{}{}", COMMENT_PREFIX, line))
        .collect();
    literal_replace(path, commented.as_slice(), RELATIONAL_DEFAULTS.as_slice())
}
