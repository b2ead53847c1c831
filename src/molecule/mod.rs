//! Molecule model and readers.
//!
//! Molecules are undirected graphs of [`Atom`]s joined by [`Bond`]s. They
//! can be read from SMILES strings or MDL molfile / SD files, and laid out
//! in 2D for drawing.

pub mod element;
pub mod layout;
pub mod mol;
pub mod resolve;
pub mod sdf;
pub mod smiles;

pub use element::Element;
pub use layout::depict;
pub use mol::{Atom, Bond, BondOrder, Molecule};
pub use resolve::resolve_molecule;
pub use sdf::{parse_molfile, read_first_record, read_sdf};
pub use smiles::parse_smiles;
