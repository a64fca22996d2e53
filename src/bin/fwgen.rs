//! Fixed-Width Generator CLI
//!
//! Compiles a schema file and writes, checks or previews the generated code.
//!
//! Usage:
//!   fwgen generate schema.txt -o src/main/java/org/example
//!   fwgen check schema.txt -o src/main/java/org/example
//!   fwgen columns schema.txt --json
//!   fwgen preview schema.txt data.txt

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use fixed_width_gen::{Artifacts, Compilation, Emitter, FixedWidthReader, GeneratorConfig, Language};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fwgen")]
#[command(about = "Generate record and parser sources from a fixed-width schema")]
struct Cli {
    /// Configuration file (added on top of fwgen.toml lookups)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Target language (kotlin, java, rust)
    #[arg(short, long, global = true)]
    language: Option<Language>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the record and parser files
    Generate {
        /// Schema file
        schema: PathBuf,
        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Fail if the files on disk differ from what the schema generates
    Check {
        /// Schema file
        schema: PathBuf,
        /// Directory holding the generated files
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the compiled columns
    Columns {
        /// Schema file
        schema: PathBuf,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Parse a data file and print each record as a JSON line
    Preview {
        /// Schema file
        schema: PathBuf,
        /// Fixed-width data file
        data: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Returns false when the command ran but found a problem
fn run(cli: Cli) -> anyhow::Result<bool> {
    let loaded = match cli.config.as_deref() {
        Some(path) => GeneratorConfig::load_from(Some(path)),
        None => GeneratorConfig::load(),
    };
    let mut config = loaded.context("failed to load configuration")?;
    if let Some(language) = cli.language {
        config = config.with_language(language);
    }

    match cli.command {
        Commands::Generate { schema, output } => {
            let compilation = compile(&config, &schema)?;
            let artifacts = emit(&config, &compilation)?;
            let dir = output.unwrap_or_else(|| config.output.dir.clone());

            for path in artifacts.write_to(&dir)? {
                println!("✅ wrote {}", path.display());
            }
            Ok(true)
        }

        Commands::Check { schema, output } => {
            let compilation = compile(&config, &schema)?;
            let artifacts = emit(&config, &compilation)?;
            let dir = output.unwrap_or_else(|| config.output.dir.clone());

            let drifts = artifacts.check_against(&dir)?;
            if drifts.is_empty() {
                println!("✅ generated files are up to date");
                return Ok(true);
            }

            for drift in &drifts {
                println!("❌ {}", drift);
                if !drift.diff.is_empty() {
                    println!("{}", drift.diff);
                }
            }
            Ok(false)
        }

        Commands::Columns { schema, json } => {
            let compilation = compile(&config, &schema)?;
            if json {
                println!("{}", compilation.model.to_json()?);
            } else {
                println!("{:<24} {:>6} {:>6} {:>6}", "name", "start", "end", "width");
                for column in &compilation.model {
                    println!(
                        "{:<24} {:>6} {:>6} {:>6}",
                        column.name(),
                        column.start(),
                        column.end(),
                        column.width()
                    );
                }
                println!("\nline length: {}", compilation.model.line_length());
            }
            Ok(true)
        }

        Commands::Preview { schema, data } => {
            let compilation = compile(&config, &schema)?;
            let text = std::fs::read_to_string(&data)
                .with_context(|| format!("failed to read data file {}", data.display()))?;

            let outcome = FixedWidthReader::new(&compilation.model).parse_str(&text);
            for record in &outcome.records {
                println!("{}", record.to_json()?);
            }
            if !outcome.diagnostics.is_empty() {
                eprint!("{}", outcome.diagnostics);
            }
            Ok(true)
        }
    }
}

fn compile(config: &GeneratorConfig, schema: &Path) -> anyhow::Result<Compilation> {
    let compilation = config
        .compiler()
        .compile_file(schema)
        .with_context(|| format!("failed to compile schema {}", schema.display()))?;

    if !compilation.diagnostics.is_empty() {
        eprint!("{}", compilation.diagnostics);
    }
    Ok(compilation)
}

fn emit(config: &GeneratorConfig, compilation: &Compilation) -> anyhow::Result<Artifacts> {
    let mut artifacts = Emitter::from_profile(config.render.clone())?.emit(&compilation.model)?;
    artifacts.record.file_name = config.record_file_name();
    artifacts.parser.file_name = config.parser_file_name();
    Ok(artifacts)
}
