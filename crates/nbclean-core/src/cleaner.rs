//! Notebook cleaner: produces a copy with volatile fields removed
//!
//! # Steps
//!
//! 1. Drop blank cells (only with `remove_empty_cells`)
//! 2. Reset `execution_count` and clear `outputs` on code cells; kept
//!    outputs lose their own `execution_count` unless counts are preserved
//! 3. Strip or filter cell metadata
//! 4. Strip document metadata (`language_info.version`, or everything)
//!
//! # Guarantees
//!
//! - **Idempotent**: `clean(clean(x)) == clean(x)`
//! - **Sound**: `check(clean(x))` has no findings
//! - **Non-mutating**: the input is borrowed immutably; a new document is returned
//! - **Order preserving**: surviving cells keep their relative order

use serde_json::{Map, Value};

use crate::config::{CellMetadataPolicy, CleanConfig};
use crate::notebook::{CellView, JsonMap, Notebook};
use crate::Result;

// ── Public API ─────────────────────────────────────────────

/// Clean `notebook` under `config`, returning a new document.
///
/// # Errors
/// Returns `InvalidArgument` if the configuration is contradictory; nothing
/// is built in that case.
pub fn clean_notebook(notebook: &Notebook, config: &CleanConfig) -> Result<Notebook> {
    config.validate()?;

    let mut cleaned = notebook.clone();
    let root = cleaned.root_mut();

    if let Some(Value::Array(cells)) = root.get_mut("cells") {
        if config.remove_empty_cells {
            let before = cells.len();
            cells.retain(|cell| match cell.as_object() {
                Some(cell) => !CellView::new(cell).source().is_blank(),
                None => true,
            });
            tracing::debug!(removed = before - cells.len(), "dropped empty cells");
        }

        for cell in cells.iter_mut().filter_map(Value::as_object_mut) {
            clean_cell(cell, config);
        }
    }

    clean_notebook_metadata(root, config);

    Ok(cleaned)
}

// ── Per-cell rules ─────────────────────────────────────────

fn clean_cell(cell: &mut JsonMap, config: &CleanConfig) {
    if CellView::new(cell).is_code() {
        if !config.preserve_execution_counts {
            cell.insert("execution_count".into(), Value::Null);
        }
        if !config.preserve_cell_outputs {
            cell.insert("outputs".into(), Value::Array(Vec::new()));
        } else if !config.preserve_execution_counts {
            clear_output_counts(cell);
        }
    }

    match &config.preserve_cell_metadata {
        CellMetadataPolicy::PreserveAll => {}
        CellMetadataPolicy::Strip => {
            cell.insert("metadata".into(), Value::Object(Map::new()));
        }
        CellMetadataPolicy::Preserve(fields) => {
            let kept: JsonMap = match cell.get("metadata") {
                Some(Value::Object(metadata)) => metadata
                    .iter()
                    .filter(|(field, _)| fields.contains(field.as_str()))
                    .map(|(field, value)| (field.clone(), value.clone()))
                    .collect(),
                _ => Map::new(),
            };
            cell.insert("metadata".into(), Value::Object(kept));
        }
    }
}

/// Null `execution_count` on kept outputs that carry one. Outputs without
/// the key (streams, errors) are left as they are.
fn clear_output_counts(cell: &mut JsonMap) {
    if let Some(Value::Array(outputs)) = cell.get_mut("outputs") {
        for output in outputs.iter_mut().filter_map(Value::as_object_mut) {
            if let Some(count) = output.get_mut("execution_count") {
                *count = Value::Null;
            }
        }
    }
}

// ── Document metadata ──────────────────────────────────────

fn clean_notebook_metadata(root: &mut JsonMap, config: &CleanConfig) {
    if config.remove_all_notebook_metadata {
        root.insert("metadata".into(), Value::Object(Map::new()));
        return;
    }
    if config.preserve_notebook_metadata {
        return;
    }

    let language_info = root
        .get_mut("metadata")
        .and_then(Value::as_object_mut)
        .and_then(|metadata| metadata.get_mut("language_info"))
        .and_then(Value::as_object_mut);

    if let Some(language_info) = language_info {
        // shift_remove keeps the remaining keys in their original order
        if language_info.shift_remove("version").is_some() {
            tracing::debug!("removed metadata.language_info.version");
        }
    }
}
