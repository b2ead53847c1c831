//! CLI layer for atommap.
//!
//! Provides the command-line interface using clap, with commands for
//! generating, printing and drawing atom mappings.

pub mod commands;
pub mod output;
pub mod parser;

pub use commands::execute;
pub use output::OutputFormat;
pub use parser::{Cli, Commands};
