//! Atom mapper trait definition.
//!
//! Defines the interface for all mapping strategies, enabling pluggable
//! atom correspondence algorithms.

use super::AtomMapping;
use crate::error::Result;
use crate::molecule::Molecule;

/// Trait for proposing atom mappings between two molecules.
///
/// Implementations must be `Send + Sync` so they can be shared with worker
/// threads. A mapper may suggest any number of mappings, including none;
/// callers decide how many they accept.
///
/// # Examples
///
/// ```
/// use atommap::mapping::{AtomMapper, McsMapper};
/// use atommap::molecule::parse_smiles;
///
/// let a = parse_smiles("c1ccccc1O").unwrap();
/// let b = parse_smiles("c1ccccc1N").unwrap();
/// let mappings = McsMapper::new().suggest_mappings(&a, &b).unwrap();
/// assert_eq!(mappings.len(), 1);
/// ```
pub trait AtomMapper: Send + Sync {
    /// Suggests mappings from `mol_a` onto `mol_b`.
    ///
    /// # Errors
    ///
    /// Returns an error if the mapper cannot run on these inputs, e.g.
    /// missing coordinates or invalid configuration.
    fn suggest_mappings(&self, mol_a: &Molecule, mol_b: &Molecule) -> Result<Vec<AtomMapping>>;

    /// Returns the registry name of the mapper.
    fn name(&self) -> &'static str;

    /// Returns a description of the mapping strategy.
    fn description(&self) -> &'static str {
        "No description available"
    }
}
