//! In-place text substitution over whole files
//!
//! Each operation reads the entire file, transforms it in memory, and writes
//! the result to a sibling temporary file that is then renamed over the
//! original. Readers see either the old or the new content, never a mix.

use crate::error::{Error, Result};
use camino::Utf8Path;
use regex::{NoExpand, Regex};
use std::fs;
use std::io::Write;
use tracing::debug;

/// Replace every occurrence of `search` with `replace`
pub fn replace_in_file(path: &Utf8Path, search: &str, replace: &str) -> Result<()> {
    literal_replace(path, &[search], &[replace])
}

/// Replace every occurrence of `searches[i]` with `replaces[i]`
///
/// Pairs are applied in order, each over the result of the previous one.
///
/// # Errors
/// Returns an error if the lists differ in length (the file is left
/// untouched) or the file cannot be read or written.
pub fn literal_replace<S, R>(path: &Utf8Path, searches: &[S], replaces: &[R]) -> Result<()>
where
    S: AsRef<str>,
    R: AsRef<str>,
{
    if searches.len() != replaces.len() {
        return Err(Error::SubstitutionMismatch {
            searches: searches.len(),
            replaces: replaces.len(),
        });
    }

    rewrite(path, |content| {
        searches
            .iter()
            .zip(replaces)
            .fold(content, |acc, (search, replace)| {
                let search = search.as_ref();
                if search.is_empty() {
                    acc
                } else {
                    acc.replace(search, replace.as_ref())
                }
            })
    })
}

/// Replace every match of `pattern` with the literal `replacement`
///
/// `$` in the replacement is not expanded.
pub fn pattern_replace(path: &Utf8Path, pattern: &str, replacement: &str) -> Result<()> {
    let regex = Regex::new(pattern)?;
    rewrite(path, |content| {
        regex.replace_all(&content, NoExpand(replacement)).into_owned()
    })
}

fn rewrite<F>(path: &Utf8Path, transform: F) -> Result<()>
where
    F: FnOnce(String) -> String,
{
    let content = fs::read_to_string(path)?;
    let updated = transform(content);

    let parent = path
        .parent()
        .filter(|p| !p.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let permissions = fs::metadata(path)?.permissions();

    let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
    tmp.write_all(updated.as_bytes())?;
    tmp.flush()?;
    fs::set_permissions(tmp.path(), permissions)?;
    tmp.persist(path).map_err(|e| Error::Io(e.error))?;

    debug!("Rewrote {}", path);
    Ok(())
}
