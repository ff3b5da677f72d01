//! Notebook checker: reports whether a notebook is already clean
//!
//! The checker walks every cell and accumulates all findings rather than
//! stopping at the first one, so a single run tells the user everything the
//! cleaner would change.
//!
//! # Per-cell checks (in order)
//!
//! 1. **Empty cell**: blank `source`, when `remove_empty_cells` is set
//! 2. **Execution count**: non-null count on a code cell
//! 3. **Outputs**: non-empty outputs on a code cell, or, when outputs are
//!    kept, one finding per output still carrying an `execution_count`
//! 4. **Metadata**: one finding per cell metadata field the policy strips
//!
//! Document-level metadata is checked after all cells.

use std::fmt;

use serde::Serialize;

use crate::config::CleanConfig;
use crate::notebook::{CellView, Notebook};
use crate::Result;

// ── Check Result Types ────────────────────────────────────

/// Result of checking a notebook; clean iff there are no findings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    pub findings: Vec<Finding>,
}

impl CheckReport {
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    /// Findings rendered as human-readable lines.
    pub fn messages(&self) -> Vec<String> {
        self.findings.iter().map(ToString::to_string).collect()
    }

    fn push(&mut self, cell: Option<usize>, kind: FindingKind) {
        self.findings.push(Finding { cell, kind });
    }
}

/// Something the cleaner would change
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    /// Index of the offending cell, `None` for document-level findings
    pub cell: Option<usize>,
    pub kind: FindingKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "field")]
pub enum FindingKind {
    EmptyCell,
    ExecutionCount,
    Outputs,
    OutputExecutionCount,
    CellMetadata(String),
    NotebookMetadata,
    LanguageVersion,
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let index = self.cell.unwrap_or_default();
        match &self.kind {
            FindingKind::EmptyCell => write!(f, "empty cell at index {}", index),
            FindingKind::ExecutionCount => write!(f, "execution count in cell {}", index),
            FindingKind::Outputs => write!(f, "output in cell {}", index),
            FindingKind::OutputExecutionCount => {
                write!(f, "output execution count in cell {}", index)
            }
            FindingKind::CellMetadata(field) => {
                write!(f, "metadata in cell {}: {}", index, field)
            }
            FindingKind::NotebookMetadata => write!(f, "notebook metadata present"),
            FindingKind::LanguageVersion => write!(f, "language_info.version present"),
        }
    }
}

// ── Public API ────────────────────────────────────────────

/// Check whether `notebook` is clean under `config`.
///
/// Runs every check on every cell and returns all findings.
///
/// # Errors
/// Returns `InvalidArgument` if the configuration is contradictory; no
/// document inspection happens in that case.
pub fn check_notebook(notebook: &Notebook, config: &CleanConfig) -> Result<CheckReport> {
    config.validate()?;

    let mut report = CheckReport::default();

    for (index, cell) in notebook.cells().enumerate() {
        check_cell(index, &cell, config, &mut report);
    }

    check_notebook_metadata(notebook, config, &mut report);

    tracing::debug!(
        cells = notebook.cell_count(),
        findings = report.findings.len(),
        "checked notebook"
    );

    Ok(report)
}

fn check_cell(index: usize, cell: &CellView<'_>, config: &CleanConfig, report: &mut CheckReport) {
    if config.remove_empty_cells && cell.source().is_blank() {
        report.push(Some(index), FindingKind::EmptyCell);
    }

    if cell.is_code() {
        if !config.preserve_execution_counts && cell.execution_count().is_some() {
            report.push(Some(index), FindingKind::ExecutionCount);
        }
        if !config.preserve_cell_outputs {
            if cell.has_outputs() {
                report.push(Some(index), FindingKind::Outputs);
            }
        } else if !config.preserve_execution_counts {
            for _ in 0..cell.counted_outputs() {
                report.push(Some(index), FindingKind::OutputExecutionCount);
            }
        }
    }

    if let Some(metadata) = cell.metadata() {
        for field in metadata.keys() {
            if !config.preserve_cell_metadata.keeps(field) {
                report.push(Some(index), FindingKind::CellMetadata(field.clone()));
            }
        }
    }
}

fn check_notebook_metadata(notebook: &Notebook, config: &CleanConfig, report: &mut CheckReport) {
    if config.remove_all_notebook_metadata {
        if notebook.metadata().is_some_and(|m| !m.is_empty()) {
            report.push(None, FindingKind::NotebookMetadata);
        }
    } else if !config.preserve_notebook_metadata && notebook.language_version().is_some() {
        report.push(None, FindingKind::LanguageVersion);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CellMetadataPolicy;
    use crate::Error;
    use serde_json::json;

    fn notebook(value: serde_json::Value) -> Notebook {
        Notebook::from_value(value).unwrap()
    }

    fn dirty_code_cell() -> serde_json::Value {
        json!({
            "cell_type": "code",
            "execution_count": 5,
            "metadata": {"tags": ["x"]},
            "outputs": [{"output_type": "stream", "name": "stdout", "text": ["hi\n"]}],
            "source": "print('hi')"
        })
    }

    #[test]
    fn test_clean_notebook_has_no_findings() {
        let nb = notebook(json!({
            "cells": [
                {"cell_type": "markdown", "metadata": {}, "source": "# Title"},
                {"cell_type": "code", "execution_count": null, "metadata": {}, "outputs": [], "source": "1"}
            ],
            "metadata": {"language_info": {"name": "python"}}
        }));
        let report = check_notebook(&nb, &CleanConfig::default()).unwrap();
        assert!(report.is_clean());
    }

    #[test]
    fn test_dirty_code_cell_reports_three_findings() {
        let nb = notebook(json!({"cells": [dirty_code_cell()], "metadata": {}}));
        let report = check_notebook(&nb, &CleanConfig::default()).unwrap();
        assert!(!report.is_clean());
        assert_eq!(
            report.messages(),
            vec![
                "execution count in cell 0",
                "output in cell 0",
                "metadata in cell 0: tags",
            ]
        );
    }

    #[test]
    fn test_preserved_tags_produce_no_metadata_finding() {
        let nb = notebook(json!({"cells": [dirty_code_cell()]}));
        let config = CleanConfig::new()
            .with_cell_metadata(CellMetadataPolicy::from_cli(Some(vec!["tags".into()])));
        let report = check_notebook(&nb, &config).unwrap();
        assert!(!report
            .findings
            .iter()
            .any(|f| matches!(f.kind, FindingKind::CellMetadata(_))));
        assert_eq!(report.findings.len(), 2);
    }

    #[test]
    fn test_metadata_finding_per_stripped_field() {
        let nb = notebook(json!({"cells": [{
            "cell_type": "markdown",
            "metadata": {"tags": [], "collapsed": true, "special": 1},
            "source": "x"
        }]}));
        let config = CleanConfig::new()
            .with_cell_metadata(CellMetadataPolicy::from_cli(Some(vec!["special".into()])));
        let report = check_notebook(&nb, &config).unwrap();
        assert_eq!(
            report.messages(),
            vec!["metadata in cell 0: tags", "metadata in cell 0: collapsed"]
        );

        let config = CleanConfig::new().with_cell_metadata(CellMetadataPolicy::PreserveAll);
        assert!(check_notebook(&nb, &config).unwrap().is_clean());
    }

    #[test]
    fn test_empty_cell_only_flagged_when_removing() {
        let nb = notebook(json!({"cells": [
            {"cell_type": "markdown", "metadata": {}, "source": ""},
            {"cell_type": "code", "metadata": {}, "source": ["  \n"], "outputs": [], "execution_count": null}
        ]}));
        assert!(check_notebook(&nb, &CleanConfig::default()).unwrap().is_clean());

        let config = CleanConfig::new().with_remove_empty_cells(true);
        let report = check_notebook(&nb, &config).unwrap();
        assert_eq!(
            report.messages(),
            vec!["empty cell at index 0", "empty cell at index 1"]
        );
    }

    #[test]
    fn test_does_not_short_circuit() {
        let mut cell = dirty_code_cell();
        cell["source"] = json!("");
        let nb = notebook(json!({"cells": [cell]}));
        let config = CleanConfig::new().with_remove_empty_cells(true);
        let report = check_notebook(&nb, &config).unwrap();
        assert_eq!(report.findings.len(), 4);
        assert_eq!(report.findings[0].kind, FindingKind::EmptyCell);
    }

    #[test]
    fn test_preserve_outputs_and_counts() {
        let nb = notebook(json!({"cells": [dirty_code_cell()]}));
        let config = CleanConfig::new()
            .with_preserve_cell_outputs(true)
            .with_preserve_execution_counts(true)
            .with_cell_metadata(CellMetadataPolicy::PreserveAll);
        assert!(check_notebook(&nb, &config).unwrap().is_clean());

        let config = CleanConfig::new()
            .with_preserve_cell_outputs(true)
            .with_cell_metadata(CellMetadataPolicy::PreserveAll);
        assert_eq!(
            check_notebook(&nb, &config).unwrap().messages(),
            vec!["execution count in cell 0"]
        );
    }

    #[test]
    fn test_kept_output_with_count_is_flagged() {
        let nb = notebook(json!({"cells": [{
            "cell_type": "code",
            "execution_count": null,
            "metadata": {},
            "outputs": [
                {"output_type": "execute_result", "execution_count": 7, "data": {}, "metadata": {}},
                {"output_type": "stream", "name": "stdout", "text": ["hi\n"]},
                {"output_type": "execute_result", "execution_count": null, "data": {}, "metadata": {}}
            ],
            "source": "x"
        }]}));
        let config = CleanConfig::new().with_preserve_cell_outputs(true);
        let report = check_notebook(&nb, &config).unwrap();
        assert_eq!(report.messages(), vec!["output execution count in cell 0"]);
        assert_eq!(report.findings[0].kind, FindingKind::OutputExecutionCount);

        let config = config.with_preserve_execution_counts(true);
        assert!(check_notebook(&nb, &config).unwrap().is_clean());

        assert_eq!(
            check_notebook(&nb, &CleanConfig::default()).unwrap().messages(),
            vec!["output in cell 0"]
        );
    }

    #[test]
    fn test_non_code_cells_ignore_counts_and_outputs() {
        let nb = notebook(json!({"cells": [
            {"cell_type": "markdown", "execution_count": 3, "outputs": [1], "source": "x"}
        ]}));
        assert!(check_notebook(&nb, &CleanConfig::default()).unwrap().is_clean());
    }

    #[test]
    fn test_language_version_finding() {
        let nb = notebook(json!({
            "cells": [],
            "metadata": {"language_info": {"name": "python", "version": "3.9.0"}}
        }));
        let report = check_notebook(&nb, &CleanConfig::default()).unwrap();
        assert_eq!(report.messages(), vec!["language_info.version present"]);

        let config = CleanConfig::new().with_preserve_notebook_metadata(true);
        assert!(check_notebook(&nb, &config).unwrap().is_clean());
    }

    #[test]
    fn test_remove_all_notebook_metadata_finding() {
        let nb = notebook(json!({"cells": [], "metadata": {"kernelspec": {"name": "python3"}}}));
        let config = CleanConfig::new().with_remove_all_notebook_metadata(true);
        let report = check_notebook(&nb, &config).unwrap();
        assert_eq!(report.messages(), vec!["notebook metadata present"]);

        let nb = notebook(json!({"cells": [], "metadata": {}}));
        assert!(check_notebook(&nb, &config).unwrap().is_clean());
    }

    #[test]
    fn test_conflicting_config_is_rejected() {
        let nb = notebook(json!({"cells": [dirty_code_cell()]}));
        let config = CleanConfig::new()
            .with_preserve_notebook_metadata(true)
            .with_remove_all_notebook_metadata(true);
        assert!(matches!(
            check_notebook(&nb, &config),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_finding_serializes_for_json_output() {
        let finding = Finding {
            cell: Some(2),
            kind: FindingKind::CellMetadata("tags".into()),
        };
        assert_eq!(
            serde_json::to_value(&finding).unwrap(),
            json!({"cell": 2, "kind": {"kind": "cell_metadata", "field": "tags"}})
        );
    }
}
