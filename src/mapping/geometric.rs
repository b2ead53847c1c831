//! Coordinate-proximity mapper.
//!
//! Pairs atoms of the same element that sit within a distance cutoff of each
//! other, closest pairs first. Useful when both ligands come from the same
//! aligned pose (e.g. docked into one binding site).

use super::{AtomMapper, AtomMapping};
use crate::error::{MappingError, Result};
use crate::molecule::Molecule;
use std::collections::VecDeque;
use tracing::debug;

/// Default maximum distance between mapped atoms, in Å.
pub const DEFAULT_ATOM_MAX_DISTANCE: f64 = 0.95;

/// Configuration for [`GeometricMapper`].
#[derive(Debug, Clone, PartialEq)]
pub struct GeometricOptions {
    /// Maximum distance between paired atoms, in Å.
    pub atom_max_distance: f64,

    /// Whether hydrogens are mapped at all.
    pub map_hydrogens: bool,

    /// Keep only the largest bonded fragment of the mapping.
    pub connected: bool,
}

impl Default for GeometricOptions {
    fn default() -> Self {
        Self {
            atom_max_distance: DEFAULT_ATOM_MAX_DISTANCE,
            map_hydrogens: true,
            connected: true,
        }
    }
}

impl GeometricOptions {
    /// Creates the default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the distance cutoff.
    #[must_use]
    pub const fn atom_max_distance(mut self, distance: f64) -> Self {
        self.atom_max_distance = distance;
        self
    }

    /// Sets whether hydrogens are mapped.
    #[must_use]
    pub const fn map_hydrogens(mut self, map: bool) -> Self {
        self.map_hydrogens = map;
        self
    }

    /// Sets whether only the largest connected fragment is kept.
    #[must_use]
    pub const fn connected(mut self, connected: bool) -> Self {
        self.connected = connected;
        self
    }
}

/// Maps atoms by spatial overlap. Requires coordinates on both molecules.
#[derive(Debug, Clone, Default)]
pub struct GeometricMapper {
    options: GeometricOptions,
}

impl GeometricMapper {
    /// Creates a mapper with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mapper with the given options.
    #[must_use]
    pub const fn with_options(options: GeometricOptions) -> Self {
        Self { options }
    }

    /// Returns the options.
    #[must_use]
    pub const fn options(&self) -> &GeometricOptions {
        &self.options
    }

    fn check_coordinates(&self, mol: &Molecule) -> Result<()> {
        if mol.has_coordinates() {
            Ok(())
        } else {
            Err(MappingError::MissingCoordinates {
                mapper: self.name(),
                molecule: mol.name().to_string(),
            }
            .into())
        }
    }
}

impl AtomMapper for GeometricMapper {
    fn suggest_mappings(&self, mol_a: &Molecule, mol_b: &Molecule) -> Result<Vec<AtomMapping>> {
        let cutoff = self.options.atom_max_distance;
        if !cutoff.is_finite() || cutoff <= 0.0 {
            return Err(MappingError::InvalidConfig {
                reason: format!("atom_max_distance must be positive, got {cutoff}"),
            }
            .into());
        }
        self.check_coordinates(mol_a)?;
        self.check_coordinates(mol_b)?;

        let mut candidates: Vec<(f64, usize, usize)> = Vec::new();
        for (i, x) in mol_a.atoms().enumerate() {
            if x.element.is_hydrogen() && !self.options.map_hydrogens {
                continue;
            }
            for (j, y) in mol_b.atoms().enumerate() {
                if x.element != y.element {
                    continue;
                }
                let (Some(p), Some(q)) = (x.position, y.position) else {
                    continue;
                };
                let d = ((p[0] - q[0]).powi(2) + (p[1] - q[1]).powi(2) + (p[2] - q[2]).powi(2))
                    .sqrt();
                if d <= cutoff {
                    candidates.push((d, i, j));
                }
            }
        }
        candidates.sort_by(|x, y| x.0.total_cmp(&y.0).then((x.1, x.2).cmp(&(y.1, y.2))));

        let mut used_a = vec![false; mol_a.atom_count()];
        let mut used_b = vec![false; mol_b.atom_count()];
        let mut pairs = Vec::new();
        for (_, i, j) in candidates {
            if !used_a[i] && !used_b[j] {
                used_a[i] = true;
                used_b[j] = true;
                pairs.push((i, j));
            }
        }

        if self.options.connected {
            pairs = largest_fragment(mol_a, &pairs);
        }
        debug!(
            mol_a = mol_a.name(),
            mol_b = mol_b.name(),
            mapped = pairs.len(),
            "geometric mapping complete"
        );

        if pairs.is_empty() {
            return Ok(Vec::new());
        }
        Ok(vec![AtomMapping::new(mol_a, mol_b, pairs)?])
    }

    fn name(&self) -> &'static str {
        "geometric"
    }

    fn description(&self) -> &'static str {
        "Same-element atoms within a distance cutoff of each other, closest first"
    }
}

/// Restricts pairs to the largest fragment connected by bonds of `mol`.
fn largest_fragment(mol: &Molecule, pairs: &[(usize, usize)]) -> Vec<(usize, usize)> {
    let mut member = vec![false; mol.atom_count()];
    for &(i, _) in pairs {
        member[i] = true;
    }

    let mut best: Vec<usize> = Vec::new();
    let mut seen = vec![false; mol.atom_count()];
    for &(start, _) in pairs {
        if seen[start] {
            continue;
        }
        let mut fragment = Vec::new();
        let mut queue = VecDeque::from([start]);
        seen[start] = true;
        while let Some(current) = queue.pop_front() {
            fragment.push(current);
            for next in mol.neighbors(current) {
                if member[next] && !seen[next] {
                    seen[next] = true;
                    queue.push_back(next);
                }
            }
        }
        if fragment.len() > best.len() {
            best = fragment;
        }
    }

    let mut keep = vec![false; mol.atom_count()];
    for i in best {
        keep[i] = true;
    }
    pairs.iter().copied().filter(|&(i, _)| keep[i]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::molecule::{Atom, Bond, BondOrder, Element, parse_smiles};

    /// Linear molecule along x with the given elements, 1.5 Å apart.
    fn line(name: &str, elements: &[Element], shift: f64) -> Molecule {
        let mut mol = Molecule::new(name);
        for (k, &element) in elements.iter().enumerate() {
            mol.add_atom(Atom::new(element).at([k as f64 * 1.5 + shift, 0.0, 0.0]));
        }
        for k in 1..elements.len() {
            mol.add_bond(k - 1, k, Bond::new(BondOrder::Single));
        }
        mol
    }

    #[test]
    fn test_maps_overlapping_atoms() {
        let a = line("a", &[Element::C, Element::C, Element::O], 0.0);
        let b = line("b", &[Element::C, Element::C, Element::N], 0.1);
        let mappings = GeometricMapper::new().suggest_mappings(&a, &b).unwrap();
        assert_eq!(mappings.len(), 1);
        assert_eq!(mappings[0].to_string(), "{0: 0, 1: 1}");
    }

    #[test]
    fn test_closest_pair_wins() {
        let a = line("a", &[Element::C], 0.0);
        let mut b = line("b", &[Element::C, Element::C], -0.6);
        // b0 at -0.6 and b1 at 0.3 are both within the cutoff
        b.atom_mut(1).unwrap().position = Some([0.3, 0.0, 0.0]);
        let mappings = GeometricMapper::new().suggest_mappings(&a, &b).unwrap();
        assert_eq!(mappings[0].get(0), Some(1));
    }

    #[test]
    fn test_nothing_in_range_gives_no_mapping() {
        let a = line("a", &[Element::C, Element::C], 0.0);
        let b = line("b", &[Element::C, Element::C], 10.0);
        let mappings = GeometricMapper::new().suggest_mappings(&a, &b).unwrap();
        assert!(mappings.is_empty());
    }

    #[test]
    fn test_keeps_largest_fragment() {
        let a = line("a", &[Element::C, Element::C, Element::O, Element::C], 0.0);
        let b = line("b", &[Element::C, Element::C, Element::N, Element::C], 0.0);
        let mapper = GeometricMapper::new();
        assert_eq!(mapper.suggest_mappings(&a, &b).unwrap()[0].len(), 2);

        let loose = GeometricMapper::with_options(GeometricOptions::new().connected(false));
        assert_eq!(loose.suggest_mappings(&a, &b).unwrap()[0].len(), 3);
    }

    #[test]
    fn test_skips_hydrogens_when_asked() {
        let a = line("a", &[Element::C, Element::H], 0.0);
        let mapper = GeometricMapper::with_options(GeometricOptions::new().map_hydrogens(false));
        assert_eq!(mapper.suggest_mappings(&a, &a).unwrap()[0].len(), 1);
    }

    #[test]
    fn test_requires_coordinates() {
        let a = parse_smiles("CCO").unwrap();
        let b = line("b", &[Element::C], 0.0);
        let err = GeometricMapper::new().suggest_mappings(&a, &b).unwrap_err();
        assert!(matches!(
            err,
            Error::Mapping(MappingError::MissingCoordinates { mapper: "geometric", .. })
        ));
    }

    #[test]
    fn test_rejects_bad_cutoff() {
        let a = line("a", &[Element::C], 0.0);
        let mapper =
            GeometricMapper::with_options(GeometricOptions::new().atom_max_distance(-1.0));
        assert!(mapper.suggest_mappings(&a, &a).is_err());
        assert_eq!(GeometricMapper::new().options().atom_max_distance, DEFAULT_ATOM_MAX_DISTANCE);
    }
}
