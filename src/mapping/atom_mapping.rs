//! Atom correspondence between two molecules.

use crate::error::MappingError;
use crate::molecule::Molecule;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// A mapping of atom indices from molecule A onto molecule B.
///
/// Construction validates that every index exists in its molecule and that
/// no atom of B is the target of two atoms of A.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AtomMapping {
    mol_a: String,
    mol_b: String,
    mol_a_to_mol_b: BTreeMap<usize, usize>,
}

impl AtomMapping {
    /// Builds a mapping from `(index in a, index in b)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`MappingError::AtomOutOfRange`] for indices outside either
    /// molecule and [`MappingError::NotInjective`] when an atom appears twice
    /// on either side.
    pub fn new(
        mol_a: &Molecule,
        mol_b: &Molecule,
        pairs: impl IntoIterator<Item = (usize, usize)>,
    ) -> Result<Self, MappingError> {
        let mut mol_a_to_mol_b = BTreeMap::new();
        let mut targets = vec![false; mol_b.atom_count()];

        for (a, b) in pairs {
            for (index, count) in [(a, mol_a.atom_count()), (b, mol_b.atom_count())] {
                if index >= count {
                    return Err(MappingError::AtomOutOfRange { index, count });
                }
            }
            if targets[b] {
                return Err(MappingError::NotInjective { target: b });
            }
            if mol_a_to_mol_b.insert(a, b).is_some() {
                return Err(MappingError::NotInjective { target: a });
            }
            targets[b] = true;
        }

        Ok(Self {
            mol_a: mol_a.name().to_string(),
            mol_b: mol_b.name().to_string(),
            mol_a_to_mol_b,
        })
    }

    /// Name of molecule A.
    #[must_use]
    pub fn mol_a_name(&self) -> &str {
        &self.mol_a
    }

    /// Name of molecule B.
    #[must_use]
    pub fn mol_b_name(&self) -> &str {
        &self.mol_b
    }

    /// Correspondence table, keyed by atom index in A.
    #[must_use]
    pub const fn mol_a_to_mol_b(&self) -> &BTreeMap<usize, usize> {
        &self.mol_a_to_mol_b
    }

    /// Inverse correspondence table, keyed by atom index in B.
    #[must_use]
    pub fn mol_b_to_mol_a(&self) -> BTreeMap<usize, usize> {
        self.mol_a_to_mol_b.iter().map(|(&a, &b)| (b, a)).collect()
    }

    /// Partner of atom `a`, if mapped.
    #[must_use]
    pub fn get(&self, a: usize) -> Option<usize> {
        self.mol_a_to_mol_b.get(&a).copied()
    }

    /// Number of mapped atom pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.mol_a_to_mol_b.len()
    }

    /// Whether no atoms are mapped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mol_a_to_mol_b.is_empty()
    }

    /// Atoms of A without a partner.
    #[must_use]
    pub fn unmapped_a(&self, mol_a: &Molecule) -> Vec<usize> {
        (0..mol_a.atom_count())
            .filter(|i| !self.mol_a_to_mol_b.contains_key(i))
            .collect()
    }

    /// Atoms of B without a partner.
    #[must_use]
    pub fn unmapped_b(&self, mol_b: &Molecule) -> Vec<usize> {
        let inverse = self.mol_b_to_mol_a();
        (0..mol_b.atom_count())
            .filter(|i| !inverse.contains_key(i))
            .collect()
    }
}

/// Dictionary notation: `{0: 0, 1: 2}`.
impl fmt::Display for AtomMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (n, (a, b)) in self.mol_a_to_mol_b.iter().enumerate() {
            if n > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{a}: {b}")?;
        }
        f.write_str("}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::molecule::parse_smiles;

    fn pair() -> (Molecule, Molecule) {
        (parse_smiles("CCO").unwrap(), parse_smiles("CCN").unwrap())
    }

    #[test]
    fn test_display_as_dict() {
        let (a, b) = pair();
        let mapping = AtomMapping::new(&a, &b, [(1, 1), (0, 0)]).unwrap();
        assert_eq!(mapping.to_string(), "{0: 0, 1: 1}");

        let empty = AtomMapping::new(&a, &b, []).unwrap();
        assert_eq!(empty.to_string(), "{}");
        assert!(empty.is_empty());
    }

    #[test]
    fn test_rejects_out_of_range() {
        let (a, b) = pair();
        let err = AtomMapping::new(&a, &b, [(0, 3)]).unwrap_err();
        assert!(matches!(err, MappingError::AtomOutOfRange { index: 3, count: 3 }));
    }

    #[test]
    fn test_rejects_non_injective() {
        let (a, b) = pair();
        assert!(matches!(
            AtomMapping::new(&a, &b, [(0, 1), (2, 1)]),
            Err(MappingError::NotInjective { target: 1 })
        ));
        assert!(matches!(
            AtomMapping::new(&a, &b, [(0, 1), (0, 2)]),
            Err(MappingError::NotInjective { .. })
        ));
    }

    #[test]
    fn test_inverse_and_unmapped() {
        let (a, b) = pair();
        let mapping = AtomMapping::new(&a, &b, [(0, 1), (1, 0)]).unwrap();
        assert_eq!(mapping.mol_b_to_mol_a().get(&1), Some(&0));
        assert_eq!(mapping.get(1), Some(0));
        assert_eq!(mapping.get(2), None);
        assert_eq!(mapping.unmapped_a(&a), vec![2]);
        assert_eq!(mapping.unmapped_b(&b), vec![2]);
        assert_eq!(mapping.mol_a_name(), "CCO");
        assert_eq!(mapping.mol_b_name(), "CCN");
    }

    #[test]
    fn test_serializes_names_and_table() {
        let (a, b) = pair();
        let mapping = AtomMapping::new(&a, &b, [(0, 0)]).unwrap();
        let json = serde_json::to_value(&mapping).unwrap();
        assert_eq!(json["mol_a"], "CCO");
        assert_eq!(json["mol_a_to_mol_b"]["0"], 0);
    }
}
