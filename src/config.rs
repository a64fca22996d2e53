//! Configuration management for the generator
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (fwgen.toml)
//! - Environment variables (FWGEN__*)
//!
//! ## Example config file (fwgen.toml):
//! ```toml
//! [render]
//! language = "kotlin"
//! package = "org.example"
//! record_name = "Record"
//! parser_name = "FixedLengthParser"
//!
//! [naming]
//! extra_reserved = ["line", "records"]
//!
//! [output]
//! dir = "src/main/java/org/example"
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::codegen::{Language, NamingConfig, RenderProfile};
use crate::compiler::SchemaCompiler;

/// Main configuration for the generator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Target language and generated type names
    #[serde(default)]
    pub render: RenderProfile,

    /// Reserved-word settings
    #[serde(default)]
    pub naming: NamingConfig,

    /// Where artifacts are written
    #[serde(default)]
    pub output: OutputConfig,
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory the artifacts are written to
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,

    /// Record file name, overriding the one derived from the record type
    #[serde(default)]
    pub record_file: Option<String>,

    /// Parser file name, overriding the one derived from the parser type
    #[serde(default)]
    pub parser_file: Option<String>,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            record_file: None,
            parser_file: None,
        }
    }
}

impl GeneratorConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration, adding a specific file on top of the defaults
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        let config_locations = ["fwgen.toml", ".fwgen.toml", "config/fwgen.toml"];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        // XDG config directory
        if let Some(config_dir) = directories::ProjectDirs::from("org", "example", "fwgen") {
            let xdg_config = config_dir.config_dir().join("fwgen.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path).required(true));
        }

        // FWGEN__RENDER__LANGUAGE=java and friends
        builder = builder.add_source(
            Environment::with_prefix("FWGEN")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }

    /// Switch the target language, keeping type names and package
    pub fn with_language(mut self, language: Language) -> Self {
        self.render.language = language;
        self
    }

    /// Compiler using this configuration's reserved words
    pub fn compiler(&self) -> SchemaCompiler {
        SchemaCompiler::new(self.naming.reserved_words(self.render.language))
    }

    /// Record file name, preferring the `[output]` override
    pub fn record_file_name(&self) -> String {
        self.output
            .record_file
            .clone()
            .unwrap_or_else(|| self.render.record_file_name())
    }

    pub fn parser_file_name(&self) -> String {
        self.output
            .parser_file
            .clone()
            .unwrap_or_else(|| self.render.parser_file_name())
    }
}
