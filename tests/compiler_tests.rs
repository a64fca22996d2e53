//! Schema Compiler Tests
//!
//! Runs the fixture schemas under `tests/fixtures` through the full
//! tokenize → validate → sanitize pipeline.

use std::path::Path;

use fixed_width_gen::schema::split_line;
use fixed_width_gen::{ColumnModel, DiagnosticCode, Language, SchemaCompiler, SchemaError};

fn compile(source: &str) -> Result<fixed_width_gen::Compilation, SchemaError> {
    SchemaCompiler::default().compile_str(source)
}

fn triples(model: &ColumnModel) -> Vec<(&str, usize, usize)> {
    model.iter().map(|c| (c.name(), c.start(), c.end())).collect()
}

// =============================================================================
// Tokenizer
// =============================================================================

#[test]
fn test_split_simple_label() {
    assert_eq!(split_line("firstName 1 10"), vec!["firstName", "1", "10"]);
}

#[test]
fn test_split_label_with_space() {
    assert_eq!(split_line("first name 1 10"), vec!["first name", "1", "10"]);
}

#[test]
fn test_split_rejects_extra_tokens() {
    assert_ne!(split_line("firstName 123 1 10").len(), 3);
    assert_ne!(split_line("firstName  1 10").len(), 3);
    assert_ne!(split_line("firstName 1  10").len(), 3);
}

// =============================================================================
// Valid Schemas
// =============================================================================

#[test]
fn test_valid1() {
    let compilation = compile(include_str!("fixtures/valid1.schema")).unwrap();
    assert_eq!(
        triples(&compilation.model),
        vec![("name", 1, 20), ("gender", 20, 21), ("age", 22, 25)]
    );
    assert_eq!(compilation.model.line_length(), 25);
    assert!(compilation.diagnostics.is_empty());
}

#[test]
fn test_valid2() {
    let compilation = compile(include_str!("fixtures/valid2.schema")).unwrap();
    assert_eq!(triples(&compilation.model), vec![("balance", 1, 10), ("date", 11, 20)]);
}

#[test]
fn test_random_labels_are_sanitized() {
    let compilation = compile(include_str!("fixtures/random.schema")).unwrap();
    assert_eq!(
        triples(&compilation.model),
        vec![
            ("student_name", 1, 20),
            ("student1", 21, 22),
            ("student", 23, 24),
            ("abc", 25, 26),
            ("student123", 27, 28),
            ("unknown", 29, 30),
        ]
    );

    let items = compilation.diagnostics.all();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].line, 6);
    assert_eq!(items[0].code, DiagnosticCode::FallbackIdentifier);
    assert!(items[0].message.contains("'!!!'"));
}

#[test]
fn test_unknown_fallback() {
    let compilation = compile(include_str!("fixtures/unknown.schema")).unwrap();
    assert_eq!(triples(&compilation.model), vec![("valid", 1, 2), ("unknown", 3, 4)]);
    assert_eq!(compilation.diagnostics.warning_count(), 1);
}

#[test]
fn test_space_in_name() {
    let compilation = compile(include_str!("fixtures/spaceInName.schema")).unwrap();
    assert_eq!(
        triples(&compilation.model),
        vec![
            ("remainingBalance", 1, 5),
            ("date", 6, 16),
            ("dailyTransactionLimit", 17, 20),
        ]
    );
}

#[test]
fn test_compile_file() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/valid1.schema");
    let compilation = SchemaCompiler::default().compile_file(&path).unwrap();
    assert_eq!(compilation.model.len(), 3);
}

#[test]
fn test_compile_missing_file() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/absent.schema");
    let err = SchemaCompiler::default().compile_file(&path).unwrap_err();
    assert!(err.as_schema_error().is_none());
}

// =============================================================================
// Invalid Schemas
// =============================================================================

#[test]
fn test_extraspace1() {
    let err = compile(include_str!("fixtures/extraspace1.schema")).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Invalid schema format for line 1: 'remaining balance 1  20'. Please ensure the strict format of 'columnStr startInt endInt'."
    );
}

#[test]
fn test_extraspace2() {
    let err = compile(include_str!("fixtures/extraspace2.schema")).unwrap_err();
    assert_eq!(
        err,
        SchemaError::InvalidSchemaLine { line: 1, raw: "remaining balance    1 20".to_string() }
    );
}

#[test]
fn test_non_integer_index() {
    let err = compile(include_str!("fixtures/number.schema")).unwrap_err();
    assert_eq!(
        err,
        SchemaError::InvalidSchemaLine { line: 1, raw: "remaining balance 1.0 5".to_string() }
    );
}

#[test]
fn test_start_before_previous_end() {
    let err = compile(include_str!("fixtures/contIndex.schema")).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Invalid startIndex for line 2: 'today 4 8'. Note that current startIndex must be greater than or equal to previous endIndex."
    );
}

#[test]
fn test_start_after_end() {
    let err = compile(include_str!("fixtures/index.schema")).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Invalid startIndex and/or endIndex for line 1: 'age 2 1'. Note that endIndex must be greater than or equal to startIndex, and they should be non-negative integers."
    );
}

#[test]
fn test_reserved_keyword() {
    let err = compile(include_str!("fixtures/keyword.schema")).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Invalid columnName as 'fun' for line 1: 'fun 1 2'. Note that columnName should not be a reserved keyword of the target language."
    );
}

#[test]
fn test_reserved_keyword_depends_on_language() {
    let compilation = SchemaCompiler::for_language(Language::Java)
        .compile_str(include_str!("fixtures/keyword.schema"))
        .unwrap();
    assert_eq!(triples(&compilation.model), vec![("fun", 1, 2)]);
}

#[test]
fn test_duplicate_name() {
    let err = compile(include_str!("fixtures/duplicate.schema")).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Invalid columnName as 'student' for line 2: 'student 21 40'. Note that there should not be duplicated columnName."
    );
}

#[test]
fn test_two_fallbacks_collide() {
    let err = compile(include_str!("fixtures/double-unknown.schema")).unwrap_err();
    assert_eq!(
        err,
        SchemaError::DuplicateIdentifier {
            name: "unknown".to_string(),
            line: 2,
            raw: "### 3 4".to_string(),
        }
    );
}

#[test]
fn test_empty_schema() {
    assert_eq!(compile("").unwrap_err(), SchemaError::EmptySchema);
}

#[test]
fn test_trailing_space_after_end() {
    let err = compile(include_str!("fixtures/trailingspace1.schema")).unwrap_err();
    assert_eq!(err, SchemaError::InvalidSchemaLine { line: 1, raw: "name 1 10 ".to_string() });

    let err = compile(include_str!("fixtures/trailingspace2.schema")).unwrap_err();
    assert_eq!(err, SchemaError::InvalidSchemaLine { line: 1, raw: "name 1 10  ".to_string() });
}

#[test]
fn test_kotlin_hard_keywords() {
    for word in ["this", "typeof"] {
        let err = compile(&format!("{} 1 5", word)).unwrap_err();
        assert!(
            matches!(err, SchemaError::ReservedIdentifier { ref name, line: 1, .. } if name == word),
            "{} should be reserved in Kotlin",
            word
        );
    }
}

#[test]
fn test_underscore_label_falls_back() {
    for language in [Language::Kotlin, Language::Java, Language::Rust] {
        let compilation = SchemaCompiler::for_language(language).compile_str("_ 1 5").unwrap();
        assert_eq!(triples(&compilation.model), vec![("unknown", 1, 5)]);
        assert_eq!(compilation.diagnostics.warning_count(), 1);
    }
}
