//! Built-in templates, embedded from `templates/<language>/` at compile time.

use include_dir::{include_dir, Dir};

use super::{ArtifactKind, Language};
use crate::error::TemplateError;

static TEMPLATES: Dir<'static> = include_dir!("$CARGO_MANIFEST_DIR/templates");

/// Source of the built-in template for `language` and `kind`
pub fn template_source(language: Language, kind: ArtifactKind) -> Result<&'static str, TemplateError> {
    let path = format!("{}/{}", language.as_str(), kind.template_file());
    TEMPLATES
        .get_file(&path)
        .and_then(|file| file.contents_utf8())
        .ok_or(TemplateError::MissingBuiltin { path })
}
