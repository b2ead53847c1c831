//! # atommap
//!
//! Atom mapping between small molecules.
//!
//! atommap proposes correspondences between the atoms of two molecules, as
//! used when setting up relative free energy transformations, and lets you
//! check them on the command line as a printed dictionary or a drawn image.
//!
//! ## Features
//!
//! - **Readers**: SMILES strings and MDL molfile / SD files
//! - **Mappers**: maximum common substructure and coordinate proximity
//! - **Rendering**: side-by-side PNG drawings highlighting unmapped atoms and
//!   changed bonds

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![warn(unsafe_code)]

pub mod cli;
pub mod error;
pub mod logging;
pub mod mapping;
pub mod molecule;
pub mod render;

// Re-export commonly used types at crate root
pub use error::{Error, Result};

// Re-export molecule types
pub use molecule::{Atom, Bond, BondOrder, Element, Molecule, parse_smiles, resolve_molecule};

// Re-export mapping types
pub use mapping::{
    AtomMapper, AtomMapping, GeometricMapper, McsMapper, available_mappers, create_mapper,
};

// Re-export rendering types
pub use render::{RenderOptions, Renderer, renderer_for, supported_formats};

// Re-export CLI types
pub use cli::{Cli, Commands, OutputFormat};
