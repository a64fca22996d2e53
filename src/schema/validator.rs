//! Per-line layout validation
//!
//! Checks run in a fixed order and the first failure wins:
//! token count, integer parsing, ordering against the previous column, then
//! the index range itself.

use crate::error::SchemaError;

/// Running "previous end index" carried from one schema line to the next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    previous_end: i64,
}

impl Cursor {
    /// Cursor before the first line; no start index can regress against it
    pub const START: Cursor = Cursor { previous_end: i64::MIN };

    /// End index of the last accepted column, if any
    pub fn previous_end(&self) -> Option<i64> {
        (self.previous_end != i64::MIN).then_some(self.previous_end)
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::START
    }
}

/// A schema line whose layout checks passed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedLine<'a> {
    /// Raw label, trimmed, not yet sanitized
    pub label: &'a str,
    pub start: usize,
    pub end: usize,
}

/// Validate one tokenized line against the cursor.
///
/// Returns the validated triple together with the advanced cursor.
pub fn validate_line<'a>(
    line_no: usize,
    raw: &str,
    tokens: &[&'a str],
    cursor: Cursor,
) -> Result<(ValidatedLine<'a>, Cursor), SchemaError> {
    let invalid_line = || SchemaError::InvalidSchemaLine {
        line: line_no,
        raw: raw.to_string(),
    };

    let &[label, start, end] = tokens else {
        return Err(invalid_line());
    };

    // Untrimmed: any whitespace around an index breaks the single-space format
    let start: i64 = start.parse().map_err(|_| invalid_line())?;
    let end: i64 = end.parse().map_err(|_| invalid_line())?;

    if start < cursor.previous_end {
        return Err(SchemaError::InvalidStartIndex {
            line: line_no,
            raw: raw.to_string(),
        });
    }

    if start > end || start < 0 || end < 0 {
        return Err(SchemaError::InvalidIndexRange {
            line: line_no,
            raw: raw.to_string(),
        });
    }

    // Both non-negative from here
    let validated = ValidatedLine {
        label: label.trim(),
        start: start as usize,
        end: end as usize,
    };

    Ok((validated, Cursor { previous_end: end }))
}
