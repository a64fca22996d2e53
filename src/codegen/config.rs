//! Codegen Configuration
//!
//! Two pieces:
//! - NamingConfig: which words columns may not be called
//! - RenderProfile: target language, generated type names, template source
//!
//! Compilation only sees the reserved-word set; everything else is used at
//! emission time.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::schema::ReservedWords;

// =============================================================================
// Target Language
// =============================================================================

/// Supported target languages
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Kotlin,
    Java,
    Rust,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Kotlin => "kotlin",
            Self::Java => "java",
            Self::Rust => "rust",
        }
    }

    /// Source file extension, without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Kotlin => "kt",
            Self::Java => "java",
            Self::Rust => "rs",
        }
    }

    /// Keywords of this language
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Self::Kotlin => KOTLIN_KEYWORDS,
            Self::Java => JAVA_KEYWORDS,
            Self::Rust => RUST_KEYWORDS,
        }
    }

    /// Keywords of this language as a reserved-word set
    pub fn reserved_words(&self) -> ReservedWords {
        ReservedWords::new(self.keywords().iter().copied())
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "kotlin" | "kt" => Ok(Self::Kotlin),
            "java" => Ok(Self::Java),
            "rust" | "rs" => Ok(Self::Rust),
            other => Err(format!("unsupported language '{}' (expected kotlin, java or rust)", other)),
        }
    }
}

// =============================================================================
// Naming Configuration
// =============================================================================

/// Reserved-word configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamingConfig {
    /// Words rejected in addition to the language keywords
    #[serde(default)]
    pub extra_reserved: Vec<String>,

    /// Replaces the language keywords entirely when set
    #[serde(default)]
    pub reserved_override: Option<Vec<String>>,
}

impl NamingConfig {
    /// Effective reserved-word set for `language`
    pub fn reserved_words(&self, language: Language) -> ReservedWords {
        let mut words = match &self.reserved_override {
            Some(words) => ReservedWords::new(words.iter().cloned()),
            None => language.reserved_words(),
        };
        words.extend(self.extra_reserved.iter().cloned());
        words
    }
}

// =============================================================================
// Render Profile
// =============================================================================

/// Language-specific rendering configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderProfile {
    /// Target language
    #[serde(default)]
    pub language: Language,

    /// Package declaration (ignored for Rust)
    #[serde(default = "default_package")]
    pub package: String,

    /// Name of the generated record type
    #[serde(default = "default_record_name")]
    pub record_name: String,

    /// Name of the generated parser type
    #[serde(default = "default_parser_name")]
    pub parser_name: String,

    /// Directory holding `record.tmpl` / `parser.tmpl` overrides
    #[serde(default)]
    pub template_dir: Option<PathBuf>,
}

fn default_package() -> String {
    "org.example".to_string()
}

fn default_record_name() -> String {
    "Record".to_string()
}

fn default_parser_name() -> String {
    "FixedLengthParser".to_string()
}

impl Default for RenderProfile {
    fn default() -> Self {
        Self::for_language(Language::default())
    }
}

impl RenderProfile {
    /// Default profile for a language
    pub fn for_language(language: Language) -> Self {
        Self {
            language,
            package: default_package(),
            record_name: default_record_name(),
            parser_name: default_parser_name(),
            template_dir: None,
        }
    }

    pub fn kotlin() -> Self {
        Self::for_language(Language::Kotlin)
    }

    pub fn java() -> Self {
        Self::for_language(Language::Java)
    }

    pub fn rust() -> Self {
        Self::for_language(Language::Rust)
    }

    /// File name of the record artifact
    pub fn record_file_name(&self) -> String {
        self.file_name(&self.record_name)
    }

    /// File name of the parser artifact
    pub fn parser_file_name(&self) -> String {
        self.file_name(&self.parser_name)
    }

    fn file_name(&self, type_name: &str) -> String {
        match self.language {
            Language::Rust => format!("{}.{}", to_snake_case(type_name), self.language.extension()),
            Language::Kotlin | Language::Java => format!("{}.{}", type_name, self.language.extension()),
        }
    }
}

/// `FixedLengthParser` -> `fixed_length_parser`
fn to_snake_case(name: &str) -> String {
    let mut result = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                result.push('_');
            }
            result.push(c.to_ascii_lowercase());
        } else {
            result.push(c);
        }
    }
    result
}

// =============================================================================
// Keywords
// =============================================================================

const KOTLIN_KEYWORDS: &[&str] = &[
    "as", "as?", "abstract", "annotation", "break", "class", "companion", "const",
    "continue", "data", "delegate", "do", "dynamic", "else", "enum", "expect",
    "external", "false", "final", "finally", "for", "fun", "if", "import", "in",
    "inline", "interface", "is", "lateinit", "mutable", "noinline", "null",
    "object", "open", "operator", "out", "override", "package", "private",
    "protected", "public", "reified", "return", "sealed", "super", "suspend",
    "tailrec", "this", "throw", "true", "try", "typealias", "typeof", "val", "var",
    "when", "while",
];

const JAVA_KEYWORDS: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class",
    "const", "continue", "default", "do", "double", "else", "enum", "extends", "false",
    "final", "finally", "float", "for", "goto", "if", "implements", "import", "instanceof",
    "int", "interface", "long", "native", "new", "null", "package", "private", "protected",
    "public", "return", "short", "static", "strictfp", "super", "switch", "synchronized",
    "this", "throw", "throws", "transient", "true", "try", "void", "volatile", "while",
    "_",
];

const RUST_KEYWORDS: &[&str] = &[
    "as", "break", "const", "continue", "crate", "else", "enum", "extern",
    "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod",
    "move", "mut", "pub", "ref", "return", "self", "Self", "static", "struct",
    "super", "trait", "true", "type", "unsafe", "use", "where", "while",
    "async", "await", "dyn", "abstract", "become", "box", "do", "final",
    "macro", "override", "priv", "typeof", "unsized", "virtual", "yield", "try",
];
