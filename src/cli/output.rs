//! Output formatting for CLI commands.
//!
//! Supports text and JSON output formats.

use crate::error::Error;
use crate::mapping::AtomMapping;
use serde::Serialize;
use std::fmt::Write;
use std::path::Path;

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// JSON output.
    Json,
}

impl OutputFormat {
    /// Parses format from string.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Registry entry shown by the `mappers` command.
#[derive(Debug, Clone, Serialize)]
pub struct MapperInfo {
    /// Canonical name.
    pub name: &'static str,
    /// Alternative names accepted by `--mapper`.
    pub aliases: &'static [&'static str],
    /// What the mapper does.
    pub description: &'static str,
}

/// Formats a mapping for printing.
///
/// The text form is the `{a: b, ...}` dictionary from molecule A atom
/// indices to molecule B atom indices.
#[must_use]
pub fn format_mapping(mapping: &AtomMapping, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format!("{mapping}\n"),
        OutputFormat::Json => format_json(mapping),
    }
}

/// Formats the result of drawing a mapping to a file.
///
/// Text output is empty; the file itself is the result.
#[must_use]
pub fn format_written(path: &Path, mapping: &AtomMapping, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => String::new(),
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct Written<'a> {
                output: String,
                mol_a: &'a str,
                mol_b: &'a str,
                mapped_atoms: usize,
            }

            format_json(&Written {
                output: path.to_string_lossy().to_string(),
                mol_a: mapping.mol_a_name(),
                mol_b: mapping.mol_b_name(),
                mapped_atoms: mapping.len(),
            })
        }
    }
}

/// Formats the mapper registry.
#[must_use]
pub fn format_mappers(mappers: &[MapperInfo], format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format_mappers_text(mappers),
        OutputFormat::Json => format_json(&mappers),
    }
}

fn format_mappers_text(mappers: &[MapperInfo]) -> String {
    let mut output = String::new();
    output.push_str("Mappers:\n");
    let _ = writeln!(output, "{:<12} {:<32} Description", "Name", "Aliases");
    output.push_str(&"-".repeat(70));
    output.push('\n');

    for info in mappers {
        let _ = writeln!(
            output,
            "{:<12} {:<32} {}",
            info.name,
            info.aliases.join(", "),
            info.description
        );
    }
    output
}

/// Formats an error for display.
///
/// JSON output is an object with the error kind and message so scripts can
/// branch on it.
#[must_use]
pub fn format_error(error: &Error, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => error.to_string(),
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct ErrorOutput {
                error: &'static str,
                message: String,
            }

            let kind = match error {
                Error::Parameter { .. } => "parameter",
                Error::Usage(_) => "usage",
                Error::Molecule(_) => "molecule",
                Error::Mapping(_) => "mapping",
                Error::Render(_) => "render",
                Error::Io(_) => "io",
            };
            format_json(&ErrorOutput {
                error: kind,
                message: error.to_string(),
            })
        }
    }
}

/// Formats a value as JSON.
fn format_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}
