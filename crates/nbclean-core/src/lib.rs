//! nb-clean core: checks and cleans Jupyter notebooks for version control
//!
//! Notebooks accumulate volatile state (execution counts, outputs, editor
//! metadata, interpreter versions) that makes diffs noisy. This crate holds
//! the only real logic in nb-clean: a checker that reports that state and a
//! cleaner that removes it, both parameterized by a [`CleanConfig`].
//!
//! # Architecture
//!
//! ```text
//! .ipynb bytes → Notebook::from_reader → Notebook
//!                                          ├─→ check_notebook → CheckReport
//!                                          └─→ clean_notebook → Notebook → write_to
//! ```
//!
//! # Guarantees
//!
//! - **Pure**: no file, process or network I/O inside checker or cleaner
//! - **Idempotent**: cleaning a clean notebook changes nothing
//! - **Sound**: a cleaned notebook always passes the check with the same config
//! - **Lossless elsewhere**: fields the config does not name round-trip unchanged

pub mod checker;
pub mod cleaner;
pub mod config;
pub mod error;
pub mod notebook;

pub use checker::{check_notebook, CheckReport, Finding, FindingKind};
pub use cleaner::clean_notebook;
pub use config::{CellMetadataPolicy, CleanConfig};
pub use error::{Error, Result};
pub use notebook::{CellType, CellView, Notebook, Source};

/// Line added to Git attributes to route notebooks through the clean filter.
pub const GIT_ATTRIBUTES_LINE: &str = "*.ipynb filter=nb-clean";
