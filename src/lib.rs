//! Fixed-Width Record Generator
//!
//! Compiles a fixed-width schema (`<label> <start> <end>` per line) into a
//! validated column model and renders a record type plus a line parser for it.
//!
//! ## Pipeline
//!
//! ```text
//! schema text
//!   └─ tokenizer   split each line into label / start / end
//!   └─ validator   integer indices, ordering against the previous column
//!   └─ names       label -> identifier, reserved words, duplicates
//!   └─ compiler    ColumnModel + diagnostics
//!        └─ codegen   record + parser artifacts (Kotlin, Java, Rust)
//!        └─ reader    parse data lines directly against the model
//! ```
//!
//! ## Example
//!
//! ```
//! use fixed_width_gen::{Emitter, RenderProfile, SchemaCompiler};
//!
//! let compilation = SchemaCompiler::default()
//!     .compile_str("name 1 20\ngender 20 21\nage 22 25")
//!     .unwrap();
//! let artifacts = Emitter::from_profile(RenderProfile::kotlin())
//!     .unwrap()
//!     .emit(&compilation.model)
//!     .unwrap();
//! assert!(artifacts.parser.contents.contains("line.length != 25"));
//! ```

pub mod checksum;
pub mod codegen;
pub mod compiler;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod reader;
pub mod schema;

pub use checksum::Checksum;
pub use codegen::{
    Artifact, ArtifactKind, ArtifactRenderer, Artifacts, Drift, Emitter, Language, NamingConfig,
    RenderContext, RenderProfile, TemplateRenderer,
};
pub use compiler::{Compilation, SchemaCompiler};
pub use config::{GeneratorConfig, OutputConfig};
pub use diagnostics::{DiagnosticCode, DiagnosticItem, Diagnostics};
pub use error::{Error, Result, SchemaError, TemplateError};
pub use reader::{FixedWidthReader, ReadOutcome, Record};
pub use schema::{Column, ColumnModel, ReservedWords};
