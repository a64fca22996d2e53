//! Diagnostics
//!
//! Collects the non-fatal findings of a run. Schema errors abort compilation
//! through [`crate::SchemaError`]; everything here is reported and skipped.

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Diagnostic Codes
// =============================================================================

/// Diagnostic code for categorizing issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticCode {
    /// Label sanitized to nothing and was renamed to the fallback identifier
    FallbackIdentifier,
    /// Data line length does not match the layout, line skipped
    MalformedDataLine,
}

impl DiagnosticCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FallbackIdentifier => "W001",
            Self::MalformedDataLine => "W002",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Self::FallbackIdentifier | Self::MalformedDataLine => Severity::Warning,
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Severity
// =============================================================================

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
        }
    }
}

// =============================================================================
// Diagnostic Item
// =============================================================================

/// A single diagnostic item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticItem {
    /// 1-based line the diagnostic refers to
    pub line: usize,
    /// Diagnostic code
    pub code: DiagnosticCode,
    /// Human-readable message
    pub message: String,
}

impl DiagnosticItem {
    pub fn new(line: usize, code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            line,
            code,
            message: message.into(),
        }
    }

    pub fn severity(&self) -> Severity {
        self.code.severity()
    }
}

impl fmt::Display for DiagnosticItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {} (line {})",
            self.code,
            self.code.severity(),
            self.message,
            self.line
        )
    }
}

// =============================================================================
// Diagnostics Collection
// =============================================================================

/// Collection of diagnostics from a compile or read pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    items: Vec<DiagnosticItem>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a diagnostic item
    pub fn push(&mut self, item: DiagnosticItem) {
        self.items.push(item);
    }

    /// Add a warning
    pub fn warning(&mut self, line: usize, code: DiagnosticCode, message: impl Into<String>) {
        self.push(DiagnosticItem::new(line, code, message));
    }

    /// Record that a label fell back to the default identifier
    pub fn fallback_identifier(&mut self, line: usize, label: &str, fallback: &str) {
        self.warning(
            line,
            DiagnosticCode::FallbackIdentifier,
            format!(
                "'{}' is not a valid variable name so it is renamed to '{}'. Please provide a better columnName instead.",
                label, fallback
            ),
        );
    }

    /// Record a data line that was skipped
    pub fn malformed_data_line(&mut self, line: usize, data: &str) {
        self.warning(
            line,
            DiagnosticCode::MalformedDataLine,
            format!("Data '{}' is not parsed as it does not follow the schema.", data),
        );
    }

    /// Get all warnings
    pub fn warnings(&self) -> impl Iterator<Item = &DiagnosticItem> {
        self.items.iter().filter(|i| i.severity() == Severity::Warning)
    }

    /// Get all items
    pub fn all(&self) -> &[DiagnosticItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    /// Format all diagnostics for display
    pub fn format_all(&self) -> String {
        let mut output = String::new();

        for item in &self.items {
            output.push_str(&format!("{}\n", item));
        }

        if !self.is_empty() {
            output.push_str(&format!("\n{} warning(s)\n", self.warning_count()));
        }

        output
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_all())
    }
}

impl IntoIterator for Diagnostics {
    type Item = DiagnosticItem;
    type IntoIter = std::vec::IntoIter<DiagnosticItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a DiagnosticItem;
    type IntoIter = std::slice::Iter<'a, DiagnosticItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_codes() {
        assert_eq!(DiagnosticCode::FallbackIdentifier.as_str(), "W001");
        assert_eq!(DiagnosticCode::MalformedDataLine.severity(), Severity::Warning);
    }

    #[test]
    fn test_diagnostics_collection() {
        let mut diags = Diagnostics::new();
        diags.fallback_identifier(3, "###", "unknown");
        diags.malformed_data_line(9, "short");

        assert_eq!(diags.len(), 2);
        assert_eq!(diags.warning_count(), 2);
        assert!(diags.all()[0].message.contains("'###'"));
        assert!(diags.format_all().ends_with("2 warning(s)\n"));
    }

    #[test]
    fn test_display_item() {
        let item = DiagnosticItem::new(4, DiagnosticCode::MalformedDataLine, "bad");
        assert_eq!(item.to_string(), "[W002] warning: bad (line 4)");
    }
}
