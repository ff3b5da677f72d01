//! Notebook document model
//!
//! A [`Notebook`] owns the parsed JSON tree of an `.ipynb` file. Key order is
//! kept as read (`serde_json` is built with `preserve_order`), so every field
//! the cleaner does not touch is written back exactly as it came in.
//!
//! Notebook producers disagree on which optional fields they emit. Rather than
//! probing the tree ad hoc, cells are read through [`CellView`], whose
//! accessors define the absent-means-empty rules in one place.

use std::io::{Read, Write};
use std::str::FromStr;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};

use crate::{Error, Result};

/// A JSON object as it appears in a notebook.
pub type JsonMap = Map<String, Value>;

/// A parsed notebook whose top-level shape has been validated.
#[derive(Debug, Clone, PartialEq)]
pub struct Notebook {
    root: JsonMap,
}

impl Notebook {
    /// Wrap a parsed JSON value, checking the shape nb-clean relies on.
    ///
    /// # Errors
    /// Returns `MalformedDocument` when the root is not an object, `cells` is
    /// missing or not an array of objects, or `metadata` is present but not
    /// an object.
    pub fn from_value(value: Value) -> Result<Self> {
        let root = match value {
            Value::Object(map) => map,
            other => {
                return Err(Error::MalformedDocument(format!(
                    "expected a JSON object at the top level, found {}",
                    json_kind(&other)
                )))
            }
        };

        match root.get("cells") {
            None => {
                return Err(Error::MalformedDocument(
                    "missing top-level `cells`".into(),
                ))
            }
            Some(Value::Array(cells)) => {
                if let Some(index) = cells.iter().position(|c| !c.is_object()) {
                    return Err(Error::MalformedDocument(format!(
                        "cell {} is not a JSON object",
                        index
                    )));
                }
            }
            Some(other) => {
                return Err(Error::MalformedDocument(format!(
                    "`cells` must be an array, found {}",
                    json_kind(other)
                )))
            }
        }

        if let Some(metadata) = root.get("metadata") {
            if !metadata.is_object() {
                return Err(Error::MalformedDocument(format!(
                    "`metadata` must be an object, found {}",
                    json_kind(metadata)
                )));
            }
        }

        Ok(Self { root })
    }

    /// Parse a notebook from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let value: Value = serde_json::from_reader(reader)?;
        Self::from_value(value)
    }

    pub fn as_value(&self) -> &JsonMap {
        &self.root
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.root)
    }

    /// `(nbformat, nbformat_minor)` if both are present as integers.
    pub fn format_version(&self) -> Option<(u64, u64)> {
        let major = self.root.get("nbformat")?.as_u64()?;
        let minor = self.root.get("nbformat_minor")?.as_u64()?;
        Some((major, minor))
    }

    /// Cells in document order.
    pub fn cells(&self) -> impl Iterator<Item = CellView<'_>> {
        self.cell_values()
            .iter()
            .filter_map(Value::as_object)
            .map(CellView::new)
    }

    pub fn cell_count(&self) -> usize {
        self.cell_values().len()
    }

    /// Document-level metadata; `None` if the document has none.
    pub fn metadata(&self) -> Option<&JsonMap> {
        self.root.get("metadata").and_then(Value::as_object)
    }

    /// `metadata.language_info.version`, if present.
    pub fn language_version(&self) -> Option<&Value> {
        self.metadata()?
            .get("language_info")?
            .as_object()?
            .get("version")
    }

    /// Serialize in the layout Jupyter writes: one-space indent, UTF-8 kept
    /// verbatim, trailing newline.
    pub fn to_string_pretty(&self) -> Result<String> {
        let mut buf = Vec::new();
        self.write_to(&mut buf)?;
        // serde_json only emits valid UTF-8
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Write the notebook to `writer` in the same layout as [`to_string_pretty`].
    ///
    /// [`to_string_pretty`]: Notebook::to_string_pretty
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        let formatter = PrettyFormatter::with_indent(b" ");
        let mut ser = serde_json::Serializer::with_formatter(&mut writer, formatter);
        self.root.serialize(&mut ser)?;
        writer.write_all(b"\n")?;
        Ok(())
    }

    fn cell_values(&self) -> &[Value] {
        match self.root.get("cells") {
            Some(Value::Array(cells)) => cells,
            _ => &[],
        }
    }

    pub(crate) fn root_mut(&mut self) -> &mut JsonMap {
        &mut self.root
    }
}

impl FromStr for Notebook {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(value)
    }
}

impl TryFrom<Value> for Notebook {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        Self::from_value(value)
    }
}

// ── Cells ──────────────────────────────────────────────────

/// Kind of a notebook cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellType {
    Code,
    Markdown,
    Raw,
    /// Unknown or missing `cell_type`; treated like a non-code cell.
    Other(String),
}

impl CellType {
    fn parse(value: Option<&Value>) -> Self {
        match value.and_then(Value::as_str) {
            Some("code") => CellType::Code,
            Some("markdown") => CellType::Markdown,
            Some("raw") => CellType::Raw,
            Some(other) => CellType::Other(other.to_string()),
            None => CellType::Other(String::new()),
        }
    }
}

/// Cell `source`, which nbformat allows as one string or a list of lines.
#[derive(Debug, Clone, PartialEq)]
pub enum Source<'a> {
    /// Missing or `null`.
    Absent,
    Text(&'a str),
    Lines(&'a [Value]),
    /// Any other JSON shape.
    Unrecognized(&'a Value),
}

impl Source<'_> {
    /// True when the source has no non-whitespace characters.
    ///
    /// Unrecognized shapes are never blank, so they are never dropped.
    pub fn is_blank(&self) -> bool {
        match self {
            Source::Absent => true,
            Source::Text(text) => text.trim().is_empty(),
            Source::Lines(lines) => lines.iter().all(|line| match line {
                Value::String(s) => s.trim().is_empty(),
                Value::Null => true,
                _ => false,
            }),
            Source::Unrecognized(_) => false,
        }
    }
}

/// Borrowed view of one cell with absent-means-empty accessors.
#[derive(Debug, Clone, Copy)]
pub struct CellView<'a> {
    cell: &'a JsonMap,
}

impl<'a> CellView<'a> {
    pub fn new(cell: &'a JsonMap) -> Self {
        Self { cell }
    }

    pub fn cell_type(&self) -> CellType {
        CellType::parse(self.cell.get("cell_type"))
    }

    pub fn is_code(&self) -> bool {
        self.cell_type() == CellType::Code
    }

    pub fn source(&self) -> Source<'a> {
        match self.cell.get("source") {
            None | Some(Value::Null) => Source::Absent,
            Some(Value::String(text)) => Source::Text(text),
            Some(Value::Array(lines)) => Source::Lines(lines),
            Some(other) => Source::Unrecognized(other),
        }
    }

    /// `execution_count`, or `None` if missing or `null`.
    pub fn execution_count(&self) -> Option<&'a Value> {
        self.cell.get("execution_count").filter(|v| !v.is_null())
    }

    /// True when `outputs` holds anything. Missing, `null` and `[]` are empty;
    /// a non-array value counts as content.
    pub fn has_outputs(&self) -> bool {
        match self.cell.get("outputs") {
            None | Some(Value::Null) => false,
            Some(Value::Array(outputs)) => !outputs.is_empty(),
            Some(_) => true,
        }
    }

    /// Number of outputs still carrying a non-null `execution_count`.
    pub fn counted_outputs(&self) -> usize {
        match self.cell.get("outputs") {
            Some(Value::Array(outputs)) => outputs
                .iter()
                .filter_map(Value::as_object)
                .filter(|output| output.get("execution_count").is_some_and(|c| !c.is_null()))
                .count(),
            _ => 0,
        }
    }

    /// Cell metadata; missing or non-object metadata reads as empty.
    pub fn metadata(&self) -> Option<&'a JsonMap> {
        self.cell.get("metadata").and_then(Value::as_object)
    }

    pub fn raw(&self) -> &'a JsonMap {
        self.cell
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
