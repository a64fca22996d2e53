//! Column layout model
//!
//! A schema line `<label> <start> <end>` becomes one [`Column`] once it has been
//! tokenized, validated and given a safe identifier. Positions are 1-based and
//! inclusive on both ends, so `name 1 20` covers the first twenty characters of
//! a data line. A start of `0` reads from the first character as well.

pub mod names;
pub mod tokenizer;
pub mod validator;

use std::ops::Range;

use serde::Serialize;

pub use names::{to_identifier, IdentifierSanitizer, ReservedWords, Sanitized, FALLBACK_IDENTIFIER};
pub use tokenizer::split_line;
pub use validator::{validate_line, Cursor, ValidatedLine};

/// A single validated field descriptor
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Column {
    name: String,
    start: usize,
    end: usize,
}

impl Column {
    pub(crate) fn new(name: impl Into<String>, start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        Self {
            name: name.into(),
            start,
            end,
        }
    }

    /// Sanitized identifier
    pub fn name(&self) -> &str {
        &self.name
    }

    /// First position, 1-based inclusive
    pub fn start(&self) -> usize {
        self.start
    }

    /// Last position, 1-based inclusive
    pub fn end(&self) -> usize {
        self.end
    }

    /// Zero-based offset of the first character
    pub fn offset(&self) -> usize {
        self.start.saturating_sub(1)
    }

    /// Number of characters the column spans
    pub fn width(&self) -> usize {
        self.end - self.offset()
    }

    /// Zero-based half-open character range, `[start - 1, end)`
    pub fn span(&self) -> Range<usize> {
        self.offset()..self.end
    }
}

/// Ordered, validated columns of one schema
///
/// Order is schema line order. Names are unique and each column starts at or
/// after the previous column's end. Only [`crate::SchemaCompiler`] builds a
/// model, so there is no way to deserialize one that skips those checks:
///
/// ```compile_fail
/// let model: fixed_width_gen::ColumnModel =
///     serde_json::from_str(r#"{"columns":[{"name":"a","start":10,"end":2}]}"#).unwrap();
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ColumnModel {
    columns: Vec<Column>,
}

impl ColumnModel {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Append a column the compiler has already validated
    pub(crate) fn push(&mut self, column: Column) {
        debug_assert!(self.get(column.name()).is_none());
        debug_assert!(self.columns.last().map_or(true, |prev| column.start >= prev.end));
        self.columns.push(column);
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Column> {
        self.columns.iter()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Look up a column by its sanitized name
    pub fn get(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Exact length a data line must have: the last column's end
    pub fn line_length(&self) -> usize {
        self.columns.last().map(|c| c.end).unwrap_or(0)
    }

    /// Pretty JSON view, `{"columns": [...]}`
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl<'a> IntoIterator for &'a ColumnModel {
    type Item = &'a Column;
    type IntoIter = std::slice::Iter<'a, Column>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.iter()
    }
}
