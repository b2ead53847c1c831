//! Molecule graph: atoms as nodes, bonds as edges.

use super::element::Element;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use std::collections::{BTreeMap, VecDeque};
use std::fmt::Write;

/// Bond order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BondOrder {
    /// Single bond.
    Single,
    /// Double bond.
    Double,
    /// Triple bond.
    Triple,
    /// Aromatic bond.
    Aromatic,
}

impl BondOrder {
    /// Number of lines used to draw the bond.
    #[must_use]
    pub const fn multiplicity(self) -> u8 {
        match self {
            Self::Single | Self::Aromatic => 1,
            Self::Double => 2,
            Self::Triple => 3,
        }
    }
}

/// A bond between two atoms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bond {
    /// Bond order.
    pub order: BondOrder,
}

impl Bond {
    /// Creates a bond of the given order.
    #[must_use]
    pub const fn new(order: BondOrder) -> Self {
        Self { order }
    }
}

/// An atom.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// Element.
    pub element: Element,
    /// Formal charge.
    pub charge: i8,
    /// Aromatic flag, as written in the input.
    pub aromatic: bool,
    /// Explicit hydrogen count (bracket atoms only).
    pub hydrogens: u8,
    /// Isotope mass number, if specified.
    pub isotope: Option<u16>,
    /// Atom class / map number, if specified.
    pub map_class: Option<u32>,
    /// Cartesian position in Å, when the source carries coordinates.
    pub position: Option<[f64; 3]>,
}

impl Atom {
    /// Creates a neutral, non-aromatic atom without coordinates.
    #[must_use]
    pub const fn new(element: Element) -> Self {
        Self {
            element,
            charge: 0,
            aromatic: false,
            hydrogens: 0,
            isotope: None,
            map_class: None,
            position: None,
        }
    }

    /// Sets the aromatic flag.
    #[must_use]
    pub const fn aromatic(mut self, aromatic: bool) -> Self {
        self.aromatic = aromatic;
        self
    }

    /// Sets the formal charge.
    #[must_use]
    pub const fn charge(mut self, charge: i8) -> Self {
        self.charge = charge;
        self
    }

    /// Sets the position.
    #[must_use]
    pub const fn at(mut self, position: [f64; 3]) -> Self {
        self.position = Some(position);
        self
    }
}

/// A molecule.
///
/// Atom indices are dense, starting at zero, in insertion order. Indices
/// are what mappings refer to.
#[derive(Debug, Clone, Default)]
pub struct Molecule {
    name: String,
    graph: UnGraph<Atom, Bond>,
}

impl Molecule {
    /// Creates an empty molecule.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            graph: UnGraph::default(),
        }
    }

    /// Molecule name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Renames the molecule.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Adds an atom, returning its index.
    pub fn add_atom(&mut self, atom: Atom) -> usize {
        self.graph.add_node(atom).index()
    }

    /// Adds a bond between two existing atoms.
    ///
    /// Returns `false` without modifying the molecule for self-bonds,
    /// duplicate bonds, or out-of-range indices.
    pub fn add_bond(&mut self, a: usize, b: usize, bond: Bond) -> bool {
        let n = self.atom_count();
        if a == b || a >= n || b >= n || self.bond_between(a, b).is_some() {
            return false;
        }
        self.graph
            .add_edge(NodeIndex::new(a), NodeIndex::new(b), bond);
        true
    }

    /// Number of atoms.
    #[must_use]
    pub fn atom_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of bonds.
    #[must_use]
    pub fn bond_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Returns the atom at `index`.
    #[must_use]
    pub fn atom(&self, index: usize) -> Option<&Atom> {
        self.graph.node_weight(NodeIndex::new(index))
    }

    /// Mutable access to the atom at `index`.
    pub fn atom_mut(&mut self, index: usize) -> Option<&mut Atom> {
        self.graph.node_weight_mut(NodeIndex::new(index))
    }

    /// Iterates atoms in index order.
    pub fn atoms(&self) -> impl Iterator<Item = &Atom> {
        self.graph.node_weights()
    }

    /// Iterates bonds as `(a, b, bond)` with `a`, `b` atom indices.
    pub fn bonds(&self) -> impl Iterator<Item = (usize, usize, &Bond)> {
        self.graph
            .edge_references()
            .map(|e| (e.source().index(), e.target().index(), e.weight()))
    }

    /// Indices of atoms bonded to `index`.
    pub fn neighbors(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        self.graph
            .neighbors(NodeIndex::new(index))
            .map(NodeIndex::index)
    }

    /// Number of bonds on the atom.
    #[must_use]
    pub fn degree(&self, index: usize) -> usize {
        self.neighbors(index).count()
    }

    /// Returns the bond between `a` and `b`, if any.
    #[must_use]
    pub fn bond_between(&self, a: usize, b: usize) -> Option<&Bond> {
        let n = self.atom_count();
        if a >= n || b >= n {
            return None;
        }
        self.graph
            .find_edge(NodeIndex::new(a), NodeIndex::new(b))
            .and_then(|e| self.graph.edge_weight(e))
    }

    /// Whether every atom has a position.
    #[must_use]
    pub fn has_coordinates(&self) -> bool {
        self.atom_count() > 0 && self.atoms().all(|a| a.position.is_some())
    }

    /// Flags atoms that lie on at least one ring.
    ///
    /// A bond is a ring bond when its endpoints stay connected after the
    /// bond is removed.
    #[must_use]
    pub fn ring_atoms(&self) -> Vec<bool> {
        let mut in_ring = vec![false; self.atom_count()];
        for (a, b, _) in self.bonds() {
            if (!in_ring[a] || !in_ring[b]) && self.connected_without(a, b) {
                in_ring[a] = true;
                in_ring[b] = true;
            }
        }
        in_ring
    }

    /// Flags whether each bond (by `bonds()` order) is a ring bond.
    #[must_use]
    pub fn ring_bonds(&self) -> Vec<bool> {
        self.bonds()
            .map(|(a, b, _)| self.connected_without(a, b))
            .collect()
    }

    fn connected_without(&self, a: usize, b: usize) -> bool {
        let mut seen = vec![false; self.atom_count()];
        let mut queue = VecDeque::from([a]);
        seen[a] = true;
        while let Some(current) = queue.pop_front() {
            for next in self.neighbors(current) {
                if current == a && next == b {
                    continue;
                }
                if next == b {
                    return true;
                }
                if !seen[next] {
                    seen[next] = true;
                    queue.push_back(next);
                }
            }
        }
        false
    }

    /// Molecular formula in Hill order, counting bracket hydrogens.
    #[must_use]
    pub fn formula(&self) -> String {
        let mut counts: BTreeMap<&'static str, usize> = BTreeMap::new();
        for atom in self.atoms() {
            *counts.entry(atom.element.symbol()).or_default() += 1;
            if atom.hydrogens > 0 {
                *counts.entry("H").or_default() += usize::from(atom.hydrogens);
            }
        }

        let mut formula = String::new();
        let mut push = |symbol: &str, count: usize| {
            formula.push_str(symbol);
            if count > 1 {
                let _ = write!(formula, "{count}");
            }
        };
        if let Some(c) = counts.remove("C") {
            push("C", c);
            if let Some(h) = counts.remove("H") {
                push("H", h);
            }
        }
        for (symbol, count) in counts {
            push(symbol, count);
        }
        formula
    }
}
