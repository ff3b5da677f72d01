//! Notebook inputs: files, directories expanded to notebooks, or stdin.

use std::collections::BTreeSet;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use walkdir::WalkDir;

use nbclean_core::Notebook;

/// Where a notebook comes from and where its cleaned form goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Read from stdin, write to stdout.
    Stdin,
    /// Read from and rewrite in place.
    File(PathBuf),
}

impl Input {
    pub fn name(&self) -> String {
        match self {
            Input::Stdin => "stdin".to_string(),
            Input::File(path) => path.display().to_string(),
        }
    }

    pub fn read_notebook(&self) -> Result<Notebook> {
        match self {
            Input::Stdin => {
                let mut text = String::new();
                io::stdin()
                    .read_to_string(&mut text)
                    .context("failed to read stdin")?;
                Ok(text.parse()?)
            }
            Input::File(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                Ok(text.parse()?)
            }
        }
    }

    /// Emit the cleaned notebook. Files whose content would not change are
    /// left alone so their modification time is kept.
    pub fn write_notebook(&self, original: &Notebook, cleaned: &Notebook) -> Result<()> {
        match self {
            Input::Stdin => {
                let stdout = io::stdout();
                let mut lock = stdout.lock();
                cleaned.write_to(&mut lock)?;
                lock.flush()?;
            }
            Input::File(path) => {
                let text = cleaned.to_string_pretty()?;
                let unchanged = original == cleaned
                    && fs::read_to_string(path).is_ok_and(|current| current == text);
                if unchanged {
                    tracing::debug!(path = %path.display(), "already clean");
                    return Ok(());
                }
                fs::write(path, text)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                tracing::info!(path = %path.display(), "cleaned notebook");
            }
        }
        Ok(())
    }
}

/// Turn command-line paths into inputs. No paths means stdin; directories are
/// searched recursively for `.ipynb` files. The result is sorted and
/// free of duplicates.
pub fn resolve(paths: &[PathBuf]) -> Vec<Input> {
    if paths.is_empty() {
        return vec![Input::Stdin];
    }

    let mut files = BTreeSet::new();
    for path in paths {
        if path.is_dir() {
            files.extend(notebooks_under(path));
        } else {
            files.insert(path.clone());
        }
    }

    files.into_iter().map(Input::File).collect()
}

fn notebooks_under(dir: &Path) -> impl Iterator<Item = PathBuf> {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "ipynb"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_paths_means_stdin() {
        assert_eq!(resolve(&[]), vec![Input::Stdin]);
        assert_eq!(Input::Stdin.name(), "stdin");
    }

    #[test]
    fn test_directories_expand_to_notebooks() {
        let dir = std::env::temp_dir().join("nb_clean_test_resolve");
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(dir.join("nested")).expect("create dir");
        fs::write(dir.join("a.ipynb"), "{}").expect("write");
        fs::write(dir.join("nested/b.ipynb"), "{}").expect("write");
        fs::write(dir.join("notes.txt"), "").expect("write");

        let resolved = resolve(&[dir.clone(), dir.join("a.ipynb")]);
        assert_eq!(
            resolved,
            vec![
                Input::File(dir.join("a.ipynb")),
                Input::File(dir.join("nested/b.ipynb")),
            ]
        );

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_missing_file_is_kept_for_reporting() {
        let missing = PathBuf::from("does-not-exist.ipynb");
        let resolved = resolve(&[missing.clone()]);
        assert_eq!(resolved, vec![Input::File(missing.clone())]);
        assert!(resolved[0].read_notebook().is_err());
    }
}
