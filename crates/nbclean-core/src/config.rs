//! Cleaning configuration
//!
//! A [`CleanConfig`] is threaded explicitly through the checker and cleaner.
//! There is no process-wide default: callers build one (usually from CLI
//! flags) and pass it by reference.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// What to do with cell-level `metadata`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode", content = "fields")]
pub enum CellMetadataPolicy {
    /// Strip all cell metadata.
    #[default]
    Strip,
    /// Keep cell metadata untouched.
    PreserveAll,
    /// Keep only the listed fields. An empty set keeps nothing.
    Preserve(BTreeSet<String>),
}

impl CellMetadataPolicy {
    /// Build a policy from the CLI shape of `--preserve-cell-metadata`.
    ///
    /// `None` means the flag was not given, `Some([])` means it was given
    /// without field names, and anything else is an explicit field list.
    pub fn from_cli(fields: Option<Vec<String>>) -> Self {
        match fields {
            None => CellMetadataPolicy::Strip,
            Some(fields) if fields.is_empty() => CellMetadataPolicy::PreserveAll,
            Some(fields) => CellMetadataPolicy::Preserve(fields.into_iter().collect()),
        }
    }

    /// Whether a cell metadata field survives cleaning under this policy.
    pub fn keeps(&self, field: &str) -> bool {
        match self {
            CellMetadataPolicy::Strip => false,
            CellMetadataPolicy::PreserveAll => true,
            CellMetadataPolicy::Preserve(fields) => fields.contains(field),
        }
    }
}

/// Options controlling which volatile notebook fields are checked and removed.
///
/// `Default` gives the strictest configuration: everything is stripped
/// except `metadata.language_info` minus its `version`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanConfig {
    pub remove_empty_cells: bool,
    pub preserve_cell_metadata: CellMetadataPolicy,
    pub preserve_cell_outputs: bool,
    pub preserve_execution_counts: bool,
    pub preserve_notebook_metadata: bool,
    pub remove_all_notebook_metadata: bool,
}

impl CleanConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_remove_empty_cells(mut self, value: bool) -> Self {
        self.remove_empty_cells = value;
        self
    }

    pub fn with_cell_metadata(mut self, policy: CellMetadataPolicy) -> Self {
        self.preserve_cell_metadata = policy;
        self
    }

    pub fn with_preserve_cell_outputs(mut self, value: bool) -> Self {
        self.preserve_cell_outputs = value;
        self
    }

    pub fn with_preserve_execution_counts(mut self, value: bool) -> Self {
        self.preserve_execution_counts = value;
        self
    }

    pub fn with_preserve_notebook_metadata(mut self, value: bool) -> Self {
        self.preserve_notebook_metadata = value;
        self
    }

    pub fn with_remove_all_notebook_metadata(mut self, value: bool) -> Self {
        self.remove_all_notebook_metadata = value;
        self
    }

    /// Reject contradictory option combinations.
    ///
    /// # Errors
    /// Returns `InvalidArgument` if `preserve_notebook_metadata` and
    /// `remove_all_notebook_metadata` are both set.
    pub fn validate(&self) -> Result<()> {
        if self.preserve_notebook_metadata && self.remove_all_notebook_metadata {
            return Err(Error::InvalidArgument(
                "`preserve_notebook_metadata` and `remove_all_notebook_metadata` cannot both be set"
                    .into(),
            ));
        }
        Ok(())
    }

    /// Command-line flags that reproduce this configuration for `nb-clean clean`.
    ///
    /// `Preserve` with an empty field set strips everything, same as `Strip`,
    /// so it emits no flag.
    pub fn filter_args(&self) -> Vec<String> {
        let mut args = Vec::new();

        if self.remove_empty_cells {
            args.push("--remove-empty-cells".to_string());
        }
        if self.remove_all_notebook_metadata {
            args.push("--remove-all-notebook-metadata".to_string());
        }
        match &self.preserve_cell_metadata {
            CellMetadataPolicy::Strip => {}
            CellMetadataPolicy::PreserveAll => {
                args.push("--preserve-cell-metadata".to_string());
            }
            CellMetadataPolicy::Preserve(fields) if fields.is_empty() => {}
            CellMetadataPolicy::Preserve(fields) => {
                args.push("--preserve-cell-metadata".to_string());
                args.extend(fields.iter().cloned());
            }
        }
        if self.preserve_cell_outputs {
            args.push("--preserve-cell-outputs".to_string());
        }
        if self.preserve_execution_counts {
            args.push("--preserve-execution-counts".to_string());
        }
        if self.preserve_notebook_metadata {
            args.push("--preserve-notebook-metadata".to_string());
        }

        args
    }

    /// Full `nb-clean clean ...` command line for a Git clean filter.
    ///
    /// Git runs the filter through `sh`, so each argument is quoted when it
    /// is not a plain word.
    pub fn filter_command(&self) -> Result<String> {
        self.validate()?;
        let mut command = vec!["nb-clean".to_string(), "clean".to_string()];
        command.extend(self.filter_args().iter().map(|arg| shell_quote(arg)));
        Ok(command.join(" "))
    }
}

/// POSIX single-quoting; `'` becomes `'\''`.
fn shell_quote(arg: &str) -> String {
    let plain = !arg.is_empty()
        && arg.chars().all(|c| {
            c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '/' | ':' | '=' | '@' | '+' | ',')
        });
    if plain {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}
