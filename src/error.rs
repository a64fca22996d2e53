//! Error types for the schema compiler

use thiserror::Error;

/// Result type for compiler operations
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error for compiling, rendering and writing artifacts
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config_crate::ConfigError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// The schema error behind this error, if compilation failed
    pub fn as_schema_error(&self) -> Option<&SchemaError> {
        match self {
            Self::Schema(e) => Some(e),
            _ => None,
        }
    }
}

/// Schema validation errors.
///
/// Every variant names the 1-based line number and the raw line text; the
/// identifier variants also carry the sanitized name that was rejected. The
/// messages are stable and safe to show to users as-is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Invalid schema format for line {line}: '{raw}'. Please ensure the strict format of 'columnStr startInt endInt'.")]
    InvalidSchemaLine { line: usize, raw: String },

    #[error("Invalid startIndex for line {line}: '{raw}'. Note that current startIndex must be greater than or equal to previous endIndex.")]
    InvalidStartIndex { line: usize, raw: String },

    #[error("Invalid startIndex and/or endIndex for line {line}: '{raw}'. Note that endIndex must be greater than or equal to startIndex, and they should be non-negative integers.")]
    InvalidIndexRange { line: usize, raw: String },

    #[error("Invalid columnName as '{name}' for line {line}: '{raw}'. Note that columnName should not be a reserved keyword of the target language.")]
    ReservedIdentifier { name: String, line: usize, raw: String },

    #[error("Invalid columnName as '{name}' for line {line}: '{raw}'. Note that there should not be duplicated columnName.")]
    DuplicateIdentifier { name: String, line: usize, raw: String },

    #[error("Schema is empty: at least one column definition is required.")]
    EmptySchema,
}

impl SchemaError {
    /// Line the error was raised on (None for whole-schema errors)
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::InvalidSchemaLine { line, .. }
            | Self::InvalidStartIndex { line, .. }
            | Self::InvalidIndexRange { line, .. }
            | Self::ReservedIdentifier { line, .. }
            | Self::DuplicateIdentifier { line, .. } => Some(*line),
            Self::EmptySchema => None,
        }
    }
}

/// Template parsing and rendering errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("section '{name}' is never closed")]
    UnclosedSection { name: String },

    #[error("section '{found}' closed while '{expected}' is open")]
    MismatchedClose { expected: String, found: String },

    #[error("closing tag '{name}' has no matching open section")]
    UnexpectedClose { name: String },

    #[error("unknown template variable '{name}'")]
    UnknownVariable { name: String },

    #[error("variable '{name}' is a list and cannot be substituted as text")]
    NotAScalar { name: String },

    #[error("no built-in template at '{path}'")]
    MissingBuiltin { path: String },
}
