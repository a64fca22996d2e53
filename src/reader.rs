//! Reads fixed-width data against a compiled column model.
//!
//! Behaves like the generated parser: a line is accepted only when its length
//! in characters equals the model's line length, each column is sliced at
//! `[start - 1, end)` and trimmed, and any other line is skipped with a
//! diagnostic.

use std::io::BufRead;

use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::warn;

use crate::diagnostics::Diagnostics;
use crate::error::Result;
use crate::schema::ColumnModel;

/// One parsed data line, fields in column order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    /// Value of a column by name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(column, _)| column == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Single-line JSON object, fields in column order
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Records and skipped-line diagnostics from one read
#[derive(Debug, Clone, Default)]
pub struct ReadOutcome {
    pub records: Vec<Record>,
    pub diagnostics: Diagnostics,
}

/// Parses data lines laid out by a [`ColumnModel`]
#[derive(Debug, Clone, Copy)]
pub struct FixedWidthReader<'a> {
    model: &'a ColumnModel,
}

impl<'a> FixedWidthReader<'a> {
    pub fn new(model: &'a ColumnModel) -> Self {
        Self { model }
    }

    /// Required line length in characters
    pub fn line_length(&self) -> usize {
        self.model.line_length()
    }

    /// Parse one line, or None if its length does not match
    pub fn parse_line(&self, line: &str) -> Option<Record> {
        let chars: Vec<char> = line.chars().collect();
        if chars.len() != self.line_length() {
            return None;
        }

        let fields = self
            .model
            .iter()
            .map(|column| {
                let value: String = chars[column.span()].iter().collect();
                (column.name().to_string(), value.trim().to_string())
            })
            .collect();

        Some(Record { fields })
    }

    /// Parse every line of `data`
    pub fn parse_str(&self, data: &str) -> ReadOutcome {
        self.parse_lines(data.lines())
    }

    /// Parse every line from a buffered reader
    pub fn parse_reader<R: BufRead>(&self, reader: R) -> Result<ReadOutcome> {
        let lines = reader.lines().collect::<std::io::Result<Vec<_>>>()?;
        Ok(self.parse_lines(lines))
    }

    fn parse_lines<I, S>(&self, lines: I) -> ReadOutcome
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut outcome = ReadOutcome::default();

        for (index, line) in lines.into_iter().enumerate() {
            let line = line.as_ref();
            match self.parse_line(line) {
                Some(record) => outcome.records.push(record),
                None => {
                    warn!(line = index + 1, "Data '{}' is not parsed as it does not follow the schema.", line);
                    outcome.diagnostics.malformed_data_line(index + 1, line);
                }
            }
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::SchemaCompiler;
    use crate::diagnostics::DiagnosticCode;

    fn model() -> ColumnModel {
        SchemaCompiler::default()
            .compile_str("name 1 20\ngender 20 21\nage 22 25")
            .unwrap()
            .model
    }

    #[test]
    fn test_parse_line() {
        let model = model();
        let reader = FixedWidthReader::new(&model);
        let line = format!("{:<20}M{:>4}", "John Doe", "25");
        assert_eq!(line.chars().count(), 25);

        let record = reader.parse_line(&line).unwrap();
        assert_eq!(record.get("name"), Some("John Doe"));
        assert_eq!(record.get("gender"), Some("M"));
        assert_eq!(record.get("age"), Some("25"));
        assert_eq!(record.get("missing"), None);
    }

    #[test]
    fn test_wrong_length_rejected() {
        let model = model();
        let reader = FixedWidthReader::new(&model);
        assert!(reader.parse_line("too short").is_none());
        assert!(reader.parse_line(&"x".repeat(26)).is_none());
    }

    #[test]
    fn test_length_counts_characters() {
        let model = model();
        let reader = FixedWidthReader::new(&model);
        let line = format!("{:<20}F{:>4}", "Zoë Ångström", "31");

        let record = reader.parse_line(&line).unwrap();
        assert_eq!(record.get("name"), Some("Zoë Ångström"));
        assert_eq!(record.get("age"), Some("31"));
    }

    #[test]
    fn test_parse_str_reports_bad_lines() {
        let model = model();
        let reader = FixedWidthReader::new(&model);
        let data = format!("{:<20}M{:>4}\nbroken\n{:<20}F{:>4}\n", "John Doe", "25", "Jane Roe", "41");

        let outcome = reader.parse_str(&data);
        assert_eq!(outcome.records.len(), 2);
        assert_eq!(outcome.diagnostics.len(), 1);

        let item = &outcome.diagnostics.all()[0];
        assert_eq!(item.line, 2);
        assert_eq!(item.code, DiagnosticCode::MalformedDataLine);
        assert!(item.message.contains("Data 'broken' is not parsed"));
    }

    #[test]
    fn test_parse_reader() {
        let model = model();
        let reader = FixedWidthReader::new(&model);
        let data = format!("{:<20}M{:>4}\n", "John Doe", "25");

        let outcome = reader.parse_reader(std::io::Cursor::new(data)).unwrap();
        assert_eq!(outcome.records.len(), 1);
        assert!(outcome.diagnostics.is_empty());
    }

    #[test]
    fn test_record_serializes_in_column_order() {
        let model = model();
        let reader = FixedWidthReader::new(&model);
        let record = reader.parse_line(&format!("{:<20}M{:>4}", "John Doe", "25")).unwrap();

        let json = record.to_json().unwrap();
        assert_eq!(json, r#"{"name":"John Doe","gender":"M","age":"25"}"#);
    }
}
