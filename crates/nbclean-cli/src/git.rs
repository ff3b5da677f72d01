//! Git clean-filter installation
//!
//! `add-filter` registers `nb-clean clean ...` as the `nb-clean` filter in the
//! repository config and routes `*.ipynb` through it via `info/attributes`.
//! `remove-filter` undoes both.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use nbclean_core::{CleanConfig, GIT_ATTRIBUTES_LINE};
use thiserror::Error;

/// A failed Git invocation, carrying Git's exit status for our own exit.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct GitError {
    pub message: String,
    pub code: i32,
}

impl GitError {
    fn io(context: &str, err: io::Error) -> Self {
        GitError {
            message: format!("{}: {}", context, err),
            code: 1,
        }
    }
}

/// Run `git <args>` and return its trimmed stdout.
pub fn git(args: &[&str]) -> Result<String, GitError> {
    tracing::debug!(?args, "running git");
    let output = Command::new("git")
        .args(args)
        .output()
        .map_err(|e| GitError::io("failed to run git", e))?;

    if !output.status.success() {
        return Err(GitError {
            message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            code: output.status.code().unwrap_or(1),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// `<git-dir>/info/attributes` for the current repository.
pub fn attributes_path() -> Result<PathBuf, GitError> {
    let git_dir = git(&["rev-parse", "--git-dir"])?;
    Ok(Path::new(&git_dir).join("info").join("attributes"))
}

pub fn add_filter(config: &CleanConfig) -> Result<(), GitError> {
    let command = config.filter_command().map_err(|e| GitError {
        message: e.to_string(),
        code: 2,
    })?;
    git(&["config", "filter.nb-clean.clean", &command])?;

    let path = attributes_path()?;
    let added = add_attribute(&path)
        .map_err(|e| GitError::io(&format!("failed to update {}", path.display()), e))?;
    tracing::info!(%command, added, "installed nb-clean filter");
    Ok(())
}

pub fn remove_filter() -> Result<(), GitError> {
    let path = attributes_path()?;
    remove_attribute(&path)
        .map_err(|e| GitError::io(&format!("failed to update {}", path.display()), e))?;
    git(&["config", "--remove-section", "filter.nb-clean"])?;
    tracing::info!("removed nb-clean filter");
    Ok(())
}

/// Append the attributes line unless it is already there. Returns whether
/// the file changed.
fn add_attribute(path: &Path) -> io::Result<bool> {
    let existing = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e),
    };
    if existing.lines().any(|line| line == GIT_ATTRIBUTES_LINE) {
        return Ok(false);
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, format!("{}\n{}\n", existing, GIT_ATTRIBUTES_LINE))?;
    Ok(true)
}

/// Drop every occurrence of the attributes line, keeping all other lines.
fn remove_attribute(path: &Path) -> io::Result<()> {
    if !path.is_file() {
        return Ok(());
    }
    let existing = fs::read_to_string(path)?;
    let revised: Vec<&str> = existing
        .split('\n')
        .filter(|line| *line != GIT_ATTRIBUTES_LINE)
        .collect();
    fs::write(path, revised.join("\n"))
}
