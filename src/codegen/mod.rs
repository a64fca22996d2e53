//! Code Generation
//!
//! Renders a compiled [`ColumnModel`] into two source artifacts: a record type
//! and a line parser.
//!
//! Architecture:
//! - RenderContext: the column list plus the derived line length, the only
//!   inputs a renderer needs besides the profile's type names
//! - ArtifactRenderer: the swappable templating collaborator
//! - TemplateRenderer: default renderer over `record.tmpl` / `parser.tmpl`
//! - Emitter: binds a renderer to a profile and produces [`Artifacts`]
//!
//! Rendering is pure substitution, so the same model and profile always give
//! byte-identical output.

pub mod builtin;
pub mod config;
pub mod template;

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use similar::{ChangeTag, TextDiff};
use tracing::info;

use crate::checksum::Checksum;
use crate::error::{Result, SchemaError};
use crate::schema::{Column, ColumnModel};

pub use config::{Language, NamingConfig, RenderProfile};
pub use template::{Scope, Template, Value};

// =============================================================================
// Artifact Kind
// =============================================================================

/// Which of the two generated files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Record,
    Parser,
}

impl ArtifactKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Record => "record",
            Self::Parser => "parser",
        }
    }

    /// Template file name inside a template directory
    pub fn template_file(&self) -> &'static str {
        match self {
            Self::Record => "record.tmpl",
            Self::Parser => "parser.tmpl",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Render Context
// =============================================================================

/// Inputs handed to a renderer
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    /// Columns in schema order
    pub columns: &'a [Column],
    /// Required data line length (last column's end)
    pub line_end: usize,
    /// Type names and target language
    pub profile: &'a RenderProfile,
}

impl<'a> RenderContext<'a> {
    pub fn new(model: &'a ColumnModel, profile: &'a RenderProfile) -> Self {
        Self {
            columns: model.columns(),
            line_end: model.line_length(),
            profile,
        }
    }

    /// Template variables for this context
    pub fn to_scope(&self) -> Scope {
        let count = self.columns.len();
        let columns: Vec<Scope> = self
            .columns
            .iter()
            .enumerate()
            .map(|(index, column)| column_scope(column, index, count))
            .collect();

        let mut scope = Scope::new();
        scope.insert("columns".to_string(), columns.into());
        scope.insert("line_end".to_string(), self.line_end.into());
        scope.insert("record_name".to_string(), self.profile.record_name.as_str().into());
        scope.insert("parser_name".to_string(), self.profile.parser_name.as_str().into());
        scope.insert("package".to_string(), self.profile.package.as_str().into());
        scope.insert("language".to_string(), self.profile.language.as_str().into());
        scope
    }
}

fn column_scope(column: &Column, index: usize, count: usize) -> Scope {
    let mut scope = Scope::new();
    scope.insert("name".to_string(), column.name().into());
    scope.insert("pascal_name".to_string(), capitalize(column.name()).into());
    scope.insert("start".to_string(), column.start().into());
    scope.insert("end".to_string(), column.end().into());
    scope.insert("offset".to_string(), column.offset().into());
    scope.insert("width".to_string(), column.width().into());
    scope.insert("index".to_string(), index.into());
    scope.insert("first".to_string(), (index == 0).into());
    scope.insert("last".to_string(), (index + 1 == count).into());
    scope
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

// =============================================================================
// Renderers
// =============================================================================

/// A templating collaborator that turns a context into artifact text
pub trait ArtifactRenderer {
    fn render(&self, kind: ArtifactKind, ctx: &RenderContext<'_>) -> Result<String>;
}

/// Default renderer: one parsed [`Template`] per artifact
#[derive(Debug, Clone)]
pub struct TemplateRenderer {
    record: Template,
    parser: Template,
}

impl TemplateRenderer {
    pub fn new(record: Template, parser: Template) -> Self {
        Self { record, parser }
    }

    /// Built-in templates for a language
    pub fn builtin(language: Language) -> Result<Self> {
        let record = Template::parse(builtin::template_source(language, ArtifactKind::Record)?)?;
        let parser = Template::parse(builtin::template_source(language, ArtifactKind::Parser)?)?;
        Ok(Self::new(record, parser))
    }

    /// `record.tmpl` and `parser.tmpl` from a directory
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let load = |kind: ArtifactKind| -> Result<Template> {
            let source = std::fs::read_to_string(dir.join(kind.template_file()))?;
            Ok(Template::parse(&source)?)
        };
        Ok(Self::new(load(ArtifactKind::Record)?, load(ArtifactKind::Parser)?))
    }

    /// Templates selected by a profile: its template directory, else built-ins
    pub fn for_profile(profile: &RenderProfile) -> Result<Self> {
        match &profile.template_dir {
            Some(dir) => Self::from_dir(dir),
            None => Self::builtin(profile.language),
        }
    }
}

impl ArtifactRenderer for TemplateRenderer {
    fn render(&self, kind: ArtifactKind, ctx: &RenderContext<'_>) -> Result<String> {
        let template = match kind {
            ArtifactKind::Record => &self.record,
            ArtifactKind::Parser => &self.parser,
        };
        Ok(template.render(&ctx.to_scope())?)
    }
}

// =============================================================================
// Generated Output
// =============================================================================

/// One generated file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub kind: ArtifactKind,
    /// File name relative to the output directory
    pub file_name: String,
    pub contents: String,
}

impl Artifact {
    pub fn checksum(&self) -> Checksum {
        Checksum::from_str(&self.contents)
    }
}

/// A generated file that no longer matches the file on disk
#[derive(Debug, Clone)]
pub struct Drift {
    pub kind: ArtifactKind,
    pub path: PathBuf,
    pub expected: Checksum,
    /// None when the file is missing
    pub actual: Option<Checksum>,
    /// Line diff from the file on disk to the generated contents
    pub diff: String,
}

impl fmt::Display for Drift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.actual {
            None => write!(f, "{} artifact missing: {}", self.kind, self.path.display()),
            Some(actual) => write!(
                f,
                "{} artifact out of date: {} (on disk {}, expected {})",
                self.kind,
                self.path.display(),
                actual.short(),
                self.expected.short()
            ),
        }
    }
}

/// Both generated files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifacts {
    pub record: Artifact,
    pub parser: Artifact,
}

impl Artifacts {
    pub fn iter(&self) -> impl Iterator<Item = &Artifact> {
        [&self.record, &self.parser].into_iter()
    }

    /// Write both files into `dir`, creating it if needed
    pub fn write_to(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        std::fs::create_dir_all(dir)?;

        let mut written = Vec::with_capacity(2);
        for artifact in self.iter() {
            let path = dir.join(&artifact.file_name);
            std::fs::write(&path, &artifact.contents)?;
            info!(
                kind = %artifact.kind,
                path = %path.display(),
                checksum = artifact.checksum().short(),
                "wrote artifact"
            );
            written.push(path);
        }
        Ok(written)
    }

    /// Compare both files with what is on disk in `dir`
    pub fn check_against(&self, dir: &Path) -> Result<Vec<Drift>> {
        let mut drifts = Vec::new();

        for artifact in self.iter() {
            let path = dir.join(&artifact.file_name);
            let expected = artifact.checksum();

            let actual = Checksum::of_file(&path)?;
            if actual.as_ref() == Some(&expected) {
                continue;
            }

            let on_disk = match actual {
                Some(_) => std::fs::read_to_string(&path)?,
                None => String::new(),
            };

            drifts.push(Drift {
                kind: artifact.kind,
                diff: line_diff(&on_disk, &artifact.contents),
                path,
                expected,
                actual,
            });
        }

        Ok(drifts)
    }
}

fn line_diff(old: &str, new: &str) -> String {
    let diff = TextDiff::from_lines(old, new);
    let mut output = String::new();

    for change in diff.iter_all_changes() {
        let sign = match change.tag() {
            ChangeTag::Delete => '-',
            ChangeTag::Insert => '+',
            ChangeTag::Equal => continue,
        };
        output.push(sign);
        output.push_str(change.value());
        if !change.value().ends_with('\n') {
            output.push('\n');
        }
    }

    output
}

// =============================================================================
// Emitter
// =============================================================================

/// Renders both artifacts for a model
#[derive(Debug, Clone)]
pub struct Emitter<R = TemplateRenderer> {
    renderer: R,
    profile: RenderProfile,
}

impl Emitter<TemplateRenderer> {
    /// Emitter using the templates the profile selects
    pub fn from_profile(profile: RenderProfile) -> Result<Self> {
        let renderer = TemplateRenderer::for_profile(&profile)?;
        Ok(Self::new(renderer, profile))
    }
}

impl<R: ArtifactRenderer> Emitter<R> {
    pub fn new(renderer: R, profile: RenderProfile) -> Self {
        Self { renderer, profile }
    }

    pub fn profile(&self) -> &RenderProfile {
        &self.profile
    }

    /// Render the record and parser artifacts
    pub fn emit(&self, model: &ColumnModel) -> Result<Artifacts> {
        if model.is_empty() {
            return Err(SchemaError::EmptySchema.into());
        }

        let ctx = RenderContext::new(model, &self.profile);

        Ok(Artifacts {
            record: Artifact {
                kind: ArtifactKind::Record,
                file_name: self.profile.record_file_name(),
                contents: self.renderer.render(ArtifactKind::Record, &ctx)?,
            },
            parser: Artifact {
                kind: ArtifactKind::Parser,
                file_name: self.profile.parser_file_name(),
                contents: self.renderer.render(ArtifactKind::Parser, &ctx)?,
            },
        })
    }
}
