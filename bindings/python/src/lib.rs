//! Python bindings for nb-clean
//!
//! Thin wrapper around `nbclean-core` with ZERO logic here.
//! Notebooks cross the boundary as JSON text.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use nbclean_core::{CellMetadataPolicy, CleanConfig, Notebook};

#[allow(clippy::too_many_arguments)]
fn build_config(
    remove_empty_cells: bool,
    preserve_cell_metadata: Option<Vec<String>>,
    preserve_all_cell_metadata: bool,
    preserve_cell_outputs: bool,
    preserve_execution_counts: bool,
    preserve_notebook_metadata: bool,
    remove_all_notebook_metadata: bool,
) -> PyResult<CleanConfig> {
    let policy = match (preserve_all_cell_metadata, preserve_cell_metadata) {
        (true, None) => CellMetadataPolicy::PreserveAll,
        (true, Some(_)) => {
            return Err(PyValueError::new_err(
                "`preserve_all_cell_metadata` and `preserve_cell_metadata` cannot both be given",
            ))
        }
        (false, None) => CellMetadataPolicy::Strip,
        (false, Some(fields)) => CellMetadataPolicy::Preserve(fields.into_iter().collect()),
    };

    let config = CleanConfig::new()
        .with_remove_empty_cells(remove_empty_cells)
        .with_cell_metadata(policy)
        .with_preserve_cell_outputs(preserve_cell_outputs)
        .with_preserve_execution_counts(preserve_execution_counts)
        .with_preserve_notebook_metadata(preserve_notebook_metadata)
        .with_remove_all_notebook_metadata(remove_all_notebook_metadata);
    config
        .validate()
        .map_err(|e| PyValueError::new_err(e.to_string()))?;
    Ok(config)
}

fn parse(text: &str) -> PyResult<Notebook> {
    text.parse::<Notebook>()
        .map_err(|e| PyValueError::new_err(e.to_string()))
}

/// Check a notebook is clean of execution counts, metadata, and outputs.
///
/// Args:
///     text: notebook JSON text
///
/// Returns:
///     (is_clean, findings) where findings is a list of human-readable strings
///
/// Raises:
///     ValueError: If the notebook is malformed or the options conflict
#[pyfunction]
#[pyo3(signature = (
    text,
    *,
    remove_empty_cells = false,
    preserve_cell_metadata = None,
    preserve_all_cell_metadata = false,
    preserve_cell_outputs = false,
    preserve_execution_counts = false,
    preserve_notebook_metadata = false,
    remove_all_notebook_metadata = false
))]
#[allow(clippy::too_many_arguments)]
fn check_notebook(
    text: &str,
    remove_empty_cells: bool,
    preserve_cell_metadata: Option<Vec<String>>,
    preserve_all_cell_metadata: bool,
    preserve_cell_outputs: bool,
    preserve_execution_counts: bool,
    preserve_notebook_metadata: bool,
    remove_all_notebook_metadata: bool,
) -> PyResult<(bool, Vec<String>)> {
    let config = build_config(
        remove_empty_cells,
        preserve_cell_metadata,
        preserve_all_cell_metadata,
        preserve_cell_outputs,
        preserve_execution_counts,
        preserve_notebook_metadata,
        remove_all_notebook_metadata,
    )?;
    let notebook = parse(text)?;
    let report = nbclean_core::check_notebook(&notebook, &config)
        .map_err(|e| PyValueError::new_err(e.to_string()))?;
    Ok((report.is_clean(), report.messages()))
}

/// Clean a notebook of execution counts, metadata, and outputs.
///
/// Args:
///     text: notebook JSON text
///
/// Returns:
///     Cleaned notebook JSON text in Jupyter's on-disk layout
///
/// Raises:
///     ValueError: If the notebook is malformed or the options conflict
#[pyfunction]
#[pyo3(signature = (
    text,
    *,
    remove_empty_cells = false,
    preserve_cell_metadata = None,
    preserve_all_cell_metadata = false,
    preserve_cell_outputs = false,
    preserve_execution_counts = false,
    preserve_notebook_metadata = false,
    remove_all_notebook_metadata = false
))]
#[allow(clippy::too_many_arguments)]
fn clean_notebook(
    text: &str,
    remove_empty_cells: bool,
    preserve_cell_metadata: Option<Vec<String>>,
    preserve_all_cell_metadata: bool,
    preserve_cell_outputs: bool,
    preserve_execution_counts: bool,
    preserve_notebook_metadata: bool,
    remove_all_notebook_metadata: bool,
) -> PyResult<String> {
    let config = build_config(
        remove_empty_cells,
        preserve_cell_metadata,
        preserve_all_cell_metadata,
        preserve_cell_outputs,
        preserve_execution_counts,
        preserve_notebook_metadata,
        remove_all_notebook_metadata,
    )?;
    let notebook = parse(text)?;
    nbclean_core::clean_notebook(&notebook, &config)
        .and_then(|cleaned| cleaned.to_string_pretty())
        .map_err(|e| PyValueError::new_err(e.to_string()))
}

/// nb-clean Python module: notebook checker and cleaner
#[pymodule]
fn nb_clean_rs(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(check_notebook, m)?)?;
    m.add_function(wrap_pyfunction!(clean_notebook, m)?)?;
    m.add("GIT_ATTRIBUTES_LINE", nbclean_core::GIT_ATTRIBUTES_LINE)?;
    Ok(())
}
