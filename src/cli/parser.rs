//! Command-line argument parsing.
//!
//! Defines the CLI structure using clap derive macros.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// atommap: propose and inspect atom mappings between two small molecules.
///
/// Molecules are given as SMILES strings or as paths to MDL molfile / SD
/// files.
#[derive(Parser, Debug)]
#[command(name = "atommap")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json).
    #[arg(long, default_value = "text", global = true)]
    pub format: String,

    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check the atom mapping of small molecules.
    ///
    /// Prints the mapping from the first molecule onto the second, or draws
    /// it to an image when an output file is given.
    Atommapping {
        /// Molecule as SMILES or molfile / SD path. Must be given exactly twice.
        #[arg(long = "mol", value_name = "MOL")]
        mol: Vec<String>,

        /// Atom mapper to use (see `atommap mappers`).
        #[arg(long, env = "ATOMMAP_MAPPER")]
        mapper: String,

        /// Image file to draw the mapping to; the extension selects the format.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the available atom mappers.
    Mappers,
}
