//! Schema Compiler
//!
//! Drives every schema line through tokenizer → validator → sanitizer and
//! accumulates the [`ColumnModel`]. Fail-fast: the first bad line aborts the
//! whole run and no partial model is returned.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, info};

use crate::codegen::Language;
use crate::diagnostics::Diagnostics;
use crate::error::{Result, SchemaError};
use crate::schema::{
    split_line, validate_line, Column, ColumnModel, Cursor, IdentifierSanitizer, ReservedWords,
};

/// A successful compilation
#[derive(Debug, Clone)]
pub struct Compilation {
    /// The validated columns, in schema order
    pub model: ColumnModel,
    /// Non-fatal findings (fallback identifiers)
    pub diagnostics: Diagnostics,
}

/// Compiles schema text into a [`ColumnModel`].
///
/// Holds only configuration; every call starts from a fresh cursor and an
/// empty set of accepted names.
#[derive(Debug, Clone)]
pub struct SchemaCompiler {
    reserved: ReservedWords,
}

impl Default for SchemaCompiler {
    fn default() -> Self {
        Self::for_language(Language::default())
    }
}

impl SchemaCompiler {
    pub fn new(reserved: ReservedWords) -> Self {
        Self { reserved }
    }

    /// Compiler that rejects the keywords of `language`
    pub fn for_language(language: Language) -> Self {
        Self::new(language.reserved_words())
    }

    pub fn reserved(&self) -> &ReservedWords {
        &self.reserved
    }

    /// Compile schema text held in memory
    pub fn compile_str(&self, source: &str) -> std::result::Result<Compilation, SchemaError> {
        self.compile_lines(source.lines())
    }

    /// Compile a schema file
    pub fn compile_file(&self, path: &Path) -> Result<Compilation> {
        let lines = {
            let reader = BufReader::new(File::open(path)?);
            reader.lines().collect::<std::io::Result<Vec<String>>>()?
        };

        let compilation = self.compile_lines(&lines)?;
        info!(
            path = %path.display(),
            columns = compilation.model.len(),
            line_length = compilation.model.line_length(),
            "compiled schema"
        );
        Ok(compilation)
    }

    /// Compile an ordered sequence of raw schema lines
    pub fn compile_lines<I, S>(&self, lines: I) -> std::result::Result<Compilation, SchemaError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut sanitizer = IdentifierSanitizer::new(self.reserved.clone());
        let mut model = ColumnModel::new();
        let mut diagnostics = Diagnostics::new();
        let mut cursor = Cursor::START;

        for (idx, line) in lines.into_iter().enumerate() {
            let line_no = idx + 1;
            let raw = line.as_ref();

            let tokens = split_line(raw);
            let (validated, next) = validate_line(line_no, raw, &tokens, cursor)?;
            cursor = next;

            let sanitized = sanitizer.sanitize(validated.label, line_no, raw)?;
            if sanitized.fallback {
                diagnostics.fallback_identifier(line_no, validated.label, &sanitized.name);
            }

            let column = Column::new(sanitized.name, validated.start, validated.end);
            debug!(
                line = line_no,
                name = column.name(),
                start = column.start(),
                end = column.end(),
                "accepted column"
            );
            model.push(column);
        }

        if model.is_empty() {
            return Err(SchemaError::EmptySchema);
        }

        Ok(Compilation { model, diagnostics })
    }
}
