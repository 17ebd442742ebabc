//! In-memory notebook document and typed views over its text-bearing fields.
//!
//! The document is kept as a `serde_json` tree so that every field the
//! sanitizer does not touch survives a round trip, key order included.
//! [`TextOrSequence`] and [`AnyValue`] classify the fields that are touched.
//!
//! License: MIT OR Apache-2.0

use log::debug;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};

use crate::errors::ScrubError;
use crate::lenient::{decode_lossy, encode_non_finite, neutralize_lone_surrogates, NonFiniteMarker};

pub const CELLS: &str = "cells";
pub const SOURCE: &str = "source";
pub const OUTPUTS: &str = "outputs";
pub const TEXT: &str = "text";
pub const DATA: &str = "data";

/// A field that may hold a single string or a sequence of strings.
#[derive(Debug)]
pub enum TextOrSequence<'a> {
    Text(&'a mut String),
    Sequence(&'a mut Vec<Value>),
    /// Numbers, booleans, null and mappings. Never modified.
    Other,
}

impl<'a> From<&'a mut Value> for TextOrSequence<'a> {
    fn from(value: &'a mut Value) -> Self {
        match value {
            Value::String(s) => TextOrSequence::Text(s),
            Value::Array(items) => TextOrSequence::Sequence(items),
            _ => TextOrSequence::Other,
        }
    }
}

/// A single element of a sequence field.
#[derive(Debug)]
pub enum AnyValue<'a> {
    Text(&'a mut String),
    Other,
}

impl<'a> From<&'a mut Value> for AnyValue<'a> {
    fn from(value: &'a mut Value) -> Self {
        match value {
            Value::String(s) => AnyValue::Text(s),
            _ => AnyValue::Other,
        }
    }
}

/// Serialization settings for [`Notebook::to_json_string`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    pub indent: usize,
    pub trailing_newline: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            indent: 1,
            trailing_newline: false,
        }
    }
}

/// A parsed notebook document.
#[derive(Debug, Clone, PartialEq)]
pub struct Notebook {
    root: Map<String, Value>,
    replaced_on_read: usize,
    non_finite: Option<NonFiniteMarker>,
}

impl Notebook {
    /// Parses raw bytes leniently: invalid UTF-8 and lone surrogate escapes
    /// become U+FFFD before the JSON parser sees them.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ScrubError> {
        let decoded = decode_lossy(bytes);
        let neutralized = neutralize_lone_surrogates(&decoded.text);
        let replaced = decoded.replaced + neutralized.replaced;

        let mut notebook = Self::from_json_str(&neutralized.text)?;
        notebook.replaced_on_read = replaced;
        Ok(notebook)
    }

    /// Parses JSON text that is already valid UTF-8. Bare `NaN`, `Infinity`
    /// and `-Infinity` are accepted and written back as they were. The shape
    /// of the document is validated before it is returned.
    pub fn from_json_str(text: &str) -> Result<Self, ScrubError> {
        let (encoded, non_finite) = encode_non_finite(text);
        let value: Value = serde_json::from_str(&encoded)?;
        let mut notebook = Self::from_value(value)?;
        notebook.non_finite = non_finite;
        Ok(notebook)
    }

    /// Wraps an already-parsed value, validating its shape.
    pub fn from_value(value: Value) -> Result<Self, ScrubError> {
        let root = match value {
            Value::Object(root) => root,
            other => {
                return Err(ScrubError::shape(format!(
                    "top level must be a mapping, found {}",
                    kind_of(&other)
                )));
            }
        };
        let notebook = Self {
            root,
            replaced_on_read: 0,
            non_finite: None,
        };
        notebook.validate_shape()?;
        debug!("Parsed notebook with {} cell(s).", notebook.cell_count());
        Ok(notebook)
    }

    /// Number of placeholders the lenient reader substituted.
    pub fn replaced_on_read(&self) -> usize {
        self.replaced_on_read
    }

    /// Number of cells; zero when the document has no `cells` field.
    pub fn cell_count(&self) -> usize {
        match self.root.get(CELLS) {
            Some(Value::Array(cells)) => cells.len(),
            _ => 0,
        }
    }

    /// The cells as mutable mappings, in document order.
    pub fn cells_mut(&mut self) -> impl Iterator<Item = &mut Map<String, Value>> {
        self.root
            .get_mut(CELLS)
            .and_then(Value::as_array_mut)
            .into_iter()
            .flatten()
            .filter_map(Value::as_object_mut)
    }

    /// The document tree. Non-finite literals read from text appear as the
    /// placeholder integers they were parsed as.
    pub fn into_value(self) -> Value {
        Value::Object(self.root)
    }

    /// Serializes with `indent` spaces per level. Non-ASCII characters are
    /// written literally and lines end in `\n`.
    pub fn to_json_string(&self, options: WriteOptions) -> Result<String, ScrubError> {
        let indent = vec![b' '; options.indent];
        let formatter = PrettyFormatter::with_indent(&indent);
        let mut buf = Vec::new();
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.root
            .serialize(&mut serializer)
            .map_err(|e| ScrubError::Serialize(e.to_string()))?;
        if options.trailing_newline {
            buf.push(b'\n');
        }
        let text = String::from_utf8(buf).map_err(|e| ScrubError::Serialize(e.to_string()))?;
        match &self.non_finite {
            Some(marker) => Ok(marker.restore(&text).into_owned()),
            None => Ok(text),
        }
    }

    /// Checks that `cells` and every `outputs` field can be walked. Runs
    /// before any mutation so a bad document is rejected untouched.
    fn validate_shape(&self) -> Result<(), ScrubError> {
        let Some(cells) = self.root.get(CELLS) else {
            return Ok(());
        };
        let Value::Array(cells) = cells else {
            return Err(ScrubError::shape(format!(
                "`cells` must be a sequence, found {}",
                kind_of(cells)
            )));
        };

        for (index, cell) in cells.iter().enumerate() {
            let Value::Object(cell) = cell else {
                return Err(ScrubError::shape(format!(
                    "cell {} must be a mapping, found {}",
                    index,
                    kind_of(cell)
                )));
            };
            let Some(outputs) = cell.get(OUTPUTS) else {
                continue;
            };
            let Value::Array(outputs) = outputs else {
                return Err(ScrubError::shape(format!(
                    "`outputs` of cell {} must be a sequence, found {}",
                    index,
                    kind_of(outputs)
                )));
            };
            if let Some(pos) = outputs.iter().position(|o| !o.is_object()) {
                return Err(ScrubError::shape(format!(
                    "output {} of cell {} must be a mapping, found {}",
                    pos,
                    index,
                    kind_of(&outputs[pos])
                )));
            }
        }
        Ok(())
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}
