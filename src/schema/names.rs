//! Identifier Sanitization
//!
//! Turns a free-text column label into an identifier that is safe in every
//! supported target language:
//! - camelCase on whitespace boundaries
//! - only `[A-Za-z0-9_]`, never starting with a digit
//! - falls back to `unknown` when nothing usable is left
//!
//! Reserved-word and collision checks are stateful and live in
//! [`IdentifierSanitizer`]; the character-level transformation is the pure
//! function [`to_identifier`].

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::SchemaError;

/// Name used when a label sanitizes to the empty string
pub const FALLBACK_IDENTIFIER: &str = "unknown";

// =============================================================================
// Reserved Words
// =============================================================================

/// Set of words a column may not be named after.
///
/// Usually the keyword list of the target language, see
/// [`crate::codegen::Language::reserved_words`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReservedWords(BTreeSet<String>);

impl ReservedWords {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(words.into_iter().map(Into::into).collect())
    }

    pub fn contains(&self, word: &str) -> bool {
        self.0.contains(word)
    }

    /// Add more words to the set
    pub fn extend<I, S>(&mut self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.0.extend(words.into_iter().map(Into::into));
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for ReservedWords {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

// =============================================================================
// Character-level transformation
// =============================================================================

/// Convert a label to an identifier, or None if nothing usable remains.
///
/// Idempotent: feeding the result back in returns it unchanged.
pub fn to_identifier(label: &str) -> Option<String> {
    let camel = to_camel_case(label);

    let cleaned: String = camel
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();

    let trimmed = cleaned.trim_start_matches(|c: char| c.is_ascii_digit());

    // `_`, `__` and friends are not usable names in any target language
    if trimmed.chars().all(|c| c == '_') {
        return None;
    }

    // Stripping may expose a capital, e.g. "123Abc"
    let mut chars = trimmed.chars();
    let first = chars.next()?;
    let mut ident = String::with_capacity(trimmed.len());
    ident.push(first.to_ascii_lowercase());
    ident.push_str(chars.as_str());
    Some(ident)
}

/// camelCase with whitespace as the only word boundary.
///
/// Only the first character of each word changes case; the rest of the word
/// is kept so an existing camelCase name survives.
fn to_camel_case(label: &str) -> String {
    let mut result = String::with_capacity(label.len());

    for (i, word) in label.split_whitespace().enumerate() {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            if i == 0 {
                result.extend(first.to_lowercase());
            } else {
                result.extend(first.to_uppercase());
            }
            result.push_str(chars.as_str());
        }
    }

    result
}

// =============================================================================
// Identifier Sanitizer
// =============================================================================

/// Result of sanitizing one label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sanitized {
    pub name: String,
    /// True when the label was replaced by [`FALLBACK_IDENTIFIER`]
    pub fallback: bool,
}

/// Sanitizes labels for one compiler run.
///
/// Remembers every accepted name so collisions are caught, including two
/// labels that both fell back to `unknown`.
#[derive(Debug, Clone)]
pub struct IdentifierSanitizer {
    reserved: ReservedWords,
    accepted: HashSet<String>,
}

impl IdentifierSanitizer {
    pub fn new(reserved: ReservedWords) -> Self {
        Self {
            reserved,
            accepted: HashSet::new(),
        }
    }

    pub fn reserved(&self) -> &ReservedWords {
        &self.reserved
    }

    /// Sanitize `label` taken from schema line `line_no` (raw text `raw`).
    pub fn sanitize(&mut self, label: &str, line_no: usize, raw: &str) -> Result<Sanitized, SchemaError> {
        let (name, fallback) = match to_identifier(label) {
            Some(name) => (name, false),
            None => {
                warn!(
                    line = line_no,
                    label = label,
                    "'{}' is not a valid variable name so it is renamed to '{}'",
                    label,
                    FALLBACK_IDENTIFIER
                );
                (FALLBACK_IDENTIFIER.to_string(), true)
            }
        };

        if self.reserved.contains(&name) {
            return Err(SchemaError::ReservedIdentifier {
                name,
                line: line_no,
                raw: raw.to_string(),
            });
        }

        if self.accepted.contains(&name) {
            return Err(SchemaError::DuplicateIdentifier {
                name,
                line: line_no,
                raw: raw.to_string(),
            });
        }

        self.accepted.insert(name.clone());
        Ok(Sanitized { name, fallback })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(label: &str) -> Option<String> {
        to_identifier(label)
    }

    #[test]
    fn test_camel_case_words() {
        assert_eq!(ident("first name").as_deref(), Some("firstName"));
        assert_eq!(ident("daily transaction limit").as_deref(), Some("dailyTransactionLimit"));
        assert_eq!(ident("Remaining Balance").as_deref(), Some("remainingBalance"));
        assert_eq!(ident("firstName").as_deref(), Some("firstName"));
    }

    #[test]
    fn test_strips_special_characters() {
        assert_eq!(ident("student_name").as_deref(), Some("student_name"));
        assert_eq!(ident("student-1").as_deref(), Some("student1"));
        assert_eq!(ident("$student").as_deref(), Some("student"));
        assert_eq!(ident("naïve").as_deref(), Some("nave"));
    }

    #[test]
    fn test_strips_leading_digits() {
        assert_eq!(ident("123abc").as_deref(), Some("abc"));
        assert_eq!(ident("123Abc").as_deref(), Some("abc"));
        assert_eq!(ident("student123").as_deref(), Some("student123"));
    }

    #[test]
    fn test_nothing_usable() {
        assert_eq!(ident("###"), None);
        assert_eq!(ident("123"), None);
        assert_eq!(ident(""), None);
    }

    #[test]
    fn test_underscores_only_is_unusable() {
        assert_eq!(ident("_"), None);
        assert_eq!(ident("__"), None);
        assert_eq!(ident("1_"), None);
        assert_eq!(ident("_id").as_deref(), Some("_id"));
    }

    #[test]
    fn test_only_first_letter_of_each_word_changes_case() {
        assert_eq!(ident("BALANCE DUE").as_deref(), Some("bALANCEDUE"));
        assert_eq!(ident("accountID").as_deref(), Some("accountID"));
        assert_eq!(ident("bALANCEDUE").as_deref(), Some("bALANCEDUE"));
    }

    #[test]
    fn test_reserved_word_rejected() {
        let mut sanitizer = IdentifierSanitizer::new(ReservedWords::new(["fun", "val"]));
        let err = sanitizer.sanitize("fun", 1, "fun 1 2").unwrap_err();
        assert_eq!(
            err,
            SchemaError::ReservedIdentifier {
                name: "fun".to_string(),
                line: 1,
                raw: "fun 1 2".to_string(),
            }
        );
    }

    #[test]
    fn test_reserved_check_uses_sanitized_name() {
        let mut sanitizer = IdentifierSanitizer::new(ReservedWords::new(["fun"]));
        let err = sanitizer.sanitize("Fun!", 3, "Fun! 1 2").unwrap_err();
        assert!(matches!(err, SchemaError::ReservedIdentifier { ref name, line: 3, .. } if name == "fun"));
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut sanitizer = IdentifierSanitizer::new(ReservedWords::default());
        sanitizer.sanitize("student", 1, "student 1 20").unwrap();
        let err = sanitizer.sanitize("student", 2, "student 21 40").unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateIdentifier { ref name, line: 2, .. } if name == "student"));
    }

    #[test]
    fn test_fallback_collides_on_second_use() {
        let mut sanitizer = IdentifierSanitizer::new(ReservedWords::default());
        let first = sanitizer.sanitize("%%", 1, "%% 1 2").unwrap();
        assert_eq!(first, Sanitized { name: "unknown".to_string(), fallback: true });

        let err = sanitizer.sanitize("&&", 2, "&& 3 4").unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateIdentifier { ref name, .. } if name == "unknown"));
    }

    #[test]
    fn test_reserved_words_set() {
        let mut words: ReservedWords = ["if", "else"].into_iter().collect();
        assert!(words.contains("if"));
        words.extend(["line"]);
        assert_eq!(words.len(), 3);
        assert_eq!(words.iter().collect::<Vec<_>>(), vec!["else", "if", "line"]);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Sanitizing an already sanitized identifier returns it unchanged.
        #[test]
        fn sanitization_is_idempotent(label in "\\PC{0,40}") {
            if let Some(once) = to_identifier(&label) {
                prop_assert_eq!(to_identifier(&once), Some(once.clone()));
            }
        }

        /// Output is always an ASCII identifier that does not start with a digit.
        #[test]
        fn output_is_identifier_shaped(label in "[ a-zA-Z0-9_#$-]{0,30}") {
            if let Some(ident) = to_identifier(&label) {
                prop_assert!(!ident.is_empty());
                prop_assert!(ident.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'));
                prop_assert!(!ident.starts_with(|c: char| c.is_ascii_digit()));
                prop_assert!(ident.chars().any(|c| c != '_'));
            }
        }
    }
}
