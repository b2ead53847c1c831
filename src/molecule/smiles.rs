//! SMILES reader.
//!
//! Supports the organic subset, aromatic lowercase atoms, bracket atoms,
//! explicit bond symbols, branches, ring closures (`1`-`9` and `%nn`) and
//! dot-separated fragments. Stereo markers are accepted and discarded.

use super::element::Element;
use super::mol::{Atom, Bond, BondOrder, Molecule};
use crate::error::MoleculeError;
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Parses a SMILES string into a [`Molecule`] named after the string.
///
/// # Errors
///
/// Returns [`MoleculeError::Smiles`] with the byte offset of the problem,
/// [`MoleculeError::UnknownElement`] for bad bracket symbols, or
/// [`MoleculeError::Empty`] when the string contains no atoms.
///
/// # Examples
///
/// ```
/// use atommap::molecule::parse_smiles;
///
/// let ethanol = parse_smiles("CCO").unwrap();
/// assert_eq!(ethanol.atom_count(), 3);
/// assert_eq!(ethanol.bond_count(), 2);
/// ```
pub fn parse_smiles(smiles: &str) -> Result<Molecule, MoleculeError> {
    Parser::new(smiles).parse()
}

#[allow(clippy::expect_used)]
fn bracket_regex() -> &'static Regex {
    static BRACKET_ATOM: OnceLock<Regex> = OnceLock::new();
    BRACKET_ATOM.get_or_init(|| {
        Regex::new(
            r"^(?P<isotope>\d+)?(?P<symbol>[A-Z][a-z]?|se|as|[bcnops]|\*)(?P<chiral>@{1,2})?(?P<hcount>H\d?)?(?P<charge>\+\+|--|[+-]\d*)?(?::(?P<class>\d+))?$",
        )
        .expect("valid regex")
    })
}

struct RingOpening {
    atom: usize,
    order: Option<BondOrder>,
    position: usize,
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
    mol: Molecule,
    prev: Option<usize>,
    branches: Vec<(usize, usize)>,
    pending: Option<(BondOrder, usize)>,
    rings: HashMap<u32, RingOpening>,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            mol: Molecule::new(input),
            prev: None,
            branches: Vec::new(),
            pending: None,
            rings: HashMap::new(),
        }
    }

    fn error(position: usize, reason: impl Into<String>) -> MoleculeError {
        MoleculeError::Smiles {
            position,
            reason: reason.into(),
        }
    }

    fn parse(mut self) -> Result<Molecule, MoleculeError> {
        let bytes = self.input.as_bytes();

        while self.pos < bytes.len() {
            let start = self.pos;
            match bytes[start] {
                b'(' => {
                    let Some(prev) = self.prev else {
                        return Err(Self::error(start, "branch opened before any atom"));
                    };
                    if self.pending.is_some() {
                        return Err(Self::error(start, "bond symbol before branch"));
                    }
                    self.branches.push((prev, start));
                    self.pos += 1;
                }
                b')' => {
                    let Some((atom, _)) = self.branches.pop() else {
                        return Err(Self::error(start, "unmatched ')'"));
                    };
                    if let Some((_, p)) = self.pending {
                        return Err(Self::error(p, "dangling bond at end of branch"));
                    }
                    self.prev = Some(atom);
                    self.pos += 1;
                }
                b'-' | b'=' | b'#' | b':' | b'/' | b'\\' => {
                    if self.prev.is_none() {
                        return Err(Self::error(start, "bond symbol before any atom"));
                    }
                    if self.pending.is_some() {
                        return Err(Self::error(start, "consecutive bond symbols"));
                    }
                    let order = match bytes[start] {
                        b'=' => BondOrder::Double,
                        b'#' => BondOrder::Triple,
                        b':' => BondOrder::Aromatic,
                        _ => BondOrder::Single,
                    };
                    self.pending = Some((order, start));
                    self.pos += 1;
                }
                b'.' => {
                    if let Some((_, p)) = self.pending {
                        return Err(Self::error(p, "dangling bond before '.'"));
                    }
                    self.prev = None;
                    self.pos += 1;
                }
                digit @ b'0'..=b'9' => {
                    self.ring_closure(u32::from(digit - b'0'), start)?;
                    self.pos += 1;
                }
                b'%' => {
                    let number = self
                        .input
                        .get(start + 1..start + 3)
                        .filter(|s| s.bytes().all(|b| b.is_ascii_digit()))
                        .and_then(|s| s.parse::<u32>().ok())
                        .ok_or_else(|| Self::error(start, "'%' must be followed by two digits"))?;
                    self.ring_closure(number, start)?;
                    self.pos += 3;
                }
                b'[' => {
                    let end = self.input[start..]
                        .find(']')
                        .map(|offset| start + offset)
                        .ok_or_else(|| Self::error(start, "unclosed bracket atom"))?;
                    let atom = Self::bracket_atom(&self.input[start + 1..end], start)?;
                    self.push_atom(atom);
                    self.pos = end + 1;
                }
                _ => {
                    let (atom, len) = self.organic_atom(start)?;
                    self.push_atom(atom);
                    self.pos += len;
                }
            }
        }

        if let Some((_, p)) = self.pending {
            return Err(Self::error(p, "dangling bond at end of input"));
        }
        if let Some((_, p)) = self.branches.last() {
            return Err(Self::error(*p, "unclosed branch"));
        }
        if let Some(open) = self.rings.values().min_by_key(|r| r.position) {
            return Err(Self::error(open.position, "unclosed ring bond"));
        }
        if self.mol.atom_count() == 0 {
            return Err(MoleculeError::Empty);
        }
        Ok(self.mol)
    }

    fn organic_atom(&self, start: usize) -> Result<(Atom, usize), MoleculeError> {
        let rest = &self.input[start..];
        for two in ["Cl", "Br"] {
            if rest.starts_with(two) {
                return Ok((Atom::new(Element::from_symbol(two)?), 2));
            }
        }

        let Some(c) = rest.chars().next() else {
            return Err(Self::error(start, "unexpected end of input"));
        };
        let atom = match c {
            'B' | 'C' | 'N' | 'O' | 'P' | 'S' | 'F' | 'I' => {
                Atom::new(Element::from_symbol(&c.to_string())?)
            }
            'b' | 'c' | 'n' | 'o' | 'p' | 's' => {
                Atom::new(Element::from_symbol(&c.to_ascii_uppercase().to_string())?)
                    .aromatic(true)
            }
            '*' => Atom::new(Element::DUMMY),
            other => {
                return Err(Self::error(start, format!("unexpected character '{other}'")));
            }
        };
        Ok((atom, c.len_utf8()))
    }

    fn bracket_atom(content: &str, start: usize) -> Result<Atom, MoleculeError> {
        let caps = bracket_regex()
            .captures(content)
            .ok_or_else(|| Self::error(start, format!("invalid bracket atom '[{content}]'")))?;

        let symbol = &caps["symbol"];
        let aromatic = symbol.starts_with(|c: char| c.is_ascii_lowercase());
        let element = if aromatic {
            let mut chars = symbol.chars();
            let capitalized: String = chars
                .next()
                .map(|c| c.to_ascii_uppercase())
                .into_iter()
                .chain(chars)
                .collect();
            Element::from_symbol(&capitalized)?
        } else {
            Element::from_symbol(symbol)?
        };

        let number_error = |what: &str| Self::error(start, format!("invalid {what} in '[{content}]'"));

        let isotope = caps
            .name("isotope")
            .map(|m| m.as_str().parse::<u16>())
            .transpose()
            .map_err(|_| number_error("isotope"))?;

        let hydrogens = match caps.name("hcount").map(|m| &m.as_str()[1..]) {
            None => 0,
            Some("") => 1,
            Some(digits) => digits.parse::<u8>().map_err(|_| number_error("hydrogen count"))?,
        };

        let charge = match caps.name("charge").map(|m| m.as_str()) {
            None => 0,
            Some("+") => 1,
            Some("-") => -1,
            Some("++") => 2,
            Some("--") => -2,
            Some(c) => {
                let magnitude = c[1..]
                    .parse::<i8>()
                    .map_err(|_| number_error("charge"))?;
                if c.starts_with('-') { -magnitude } else { magnitude }
            }
        };

        let map_class = caps
            .name("class")
            .map(|m| m.as_str().parse::<u32>())
            .transpose()
            .map_err(|_| number_error("atom class"))?;

        Ok(Atom {
            hydrogens,
            isotope,
            map_class,
            ..Atom::new(element).aromatic(aromatic).charge(charge)
        })
    }

    fn push_atom(&mut self, atom: Atom) {
        let index = self.mol.add_atom(atom);
        if let Some(prev) = self.prev {
            let order = self
                .pending
                .take()
                .map_or_else(|| self.default_order(prev, index), |(order, _)| order);
            self.mol.add_bond(prev, index, Bond::new(order));
        }
        self.prev = Some(index);
    }

    fn ring_closure(&mut self, number: u32, position: usize) -> Result<(), MoleculeError> {
        let Some(current) = self.prev else {
            return Err(Self::error(position, "ring bond before any atom"));
        };
        let pending = self.pending.take().map(|(order, _)| order);

        let Some(open) = self.rings.remove(&number) else {
            self.rings.insert(
                number,
                RingOpening {
                    atom: current,
                    order: pending,
                    position,
                },
            );
            return Ok(());
        };

        let order = match (pending, open.order) {
            (Some(a), Some(b)) if a != b => {
                return Err(Self::error(position, "conflicting ring bond orders"));
            }
            (Some(order), _) | (None, Some(order)) => order,
            (None, None) => self.default_order(open.atom, current),
        };
        if !self.mol.add_bond(open.atom, current, Bond::new(order)) {
            return Err(Self::error(position, "ring closure duplicates an existing bond"));
        }
        Ok(())
    }

    fn default_order(&self, a: usize, b: usize) -> BondOrder {
        let aromatic = |i| self.mol.atom(i).is_some_and(|atom| atom.aromatic);
        if aromatic(a) && aromatic(b) {
            BondOrder::Aromatic
        } else {
            BondOrder::Single
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("C", 1, 0)]
    #[test_case("CCO", 3, 2)]
    #[test_case("CC(=O)O", 4, 3)]
    #[test_case("C1CC1", 3, 3)]
    #[test_case("c1ccccc1", 6, 6)]
    #[test_case("C%10CC%10", 3, 3)]
    #[test_case("CC.O", 3, 1)]
    #[test_case("ClCBr", 3, 2)]
    #[test_case("F/C=C/F", 4, 3)]
    #[test_case("c1ccc2ccccc2c1", 10, 11)]
    fn test_atom_and_bond_counts(smiles: &str, atoms: usize, bonds: usize) {
        let mol = parse_smiles(smiles).unwrap();
        assert_eq!(mol.atom_count(), atoms, "{smiles}");
        assert_eq!(mol.bond_count(), bonds, "{smiles}");
        assert_eq!(mol.name(), smiles);
    }

    #[test]
    fn test_bond_orders() {
        let mol = parse_smiles("C=CC#N").unwrap();
        assert_eq!(mol.bond_between(0, 1).unwrap().order, BondOrder::Double);
        assert_eq!(mol.bond_between(1, 2).unwrap().order, BondOrder::Single);
        assert_eq!(mol.bond_between(2, 3).unwrap().order, BondOrder::Triple);
    }

    #[test]
    fn test_aromatic_bonds() {
        let mol = parse_smiles("c1ccccc1C").unwrap();
        assert_eq!(mol.bond_between(0, 5).unwrap().order, BondOrder::Aromatic);
        assert_eq!(mol.bond_between(5, 6).unwrap().order, BondOrder::Single);
        assert!(mol.atom(0).unwrap().aromatic);
        assert!(!mol.atom(6).unwrap().aromatic);
    }

    #[test]
    fn test_branch_returns_to_anchor() {
        let mol = parse_smiles("CC(C)(C)O").unwrap();
        assert_eq!(mol.degree(1), 4);
        assert!(mol.bond_between(1, 4).is_some());
    }

    #[test]
    fn test_bracket_atoms() {
        let mol = parse_smiles("[NH4+]").unwrap();
        let n = mol.atom(0).unwrap();
        assert_eq!(n.element, Element::N);
        assert_eq!(n.hydrogens, 4);
        assert_eq!(n.charge, 1);

        let mol = parse_smiles("[13CH3:7][O-]").unwrap();
        let c = mol.atom(0).unwrap();
        assert_eq!(c.isotope, Some(13));
        assert_eq!(c.hydrogens, 3);
        assert_eq!(c.map_class, Some(7));
        assert_eq!(mol.atom(1).unwrap().charge, -1);

        let mol = parse_smiles("[Fe+++]").err();
        assert!(mol.is_some());

        let mol = parse_smiles("[Fe+3]").unwrap();
        assert_eq!(mol.atom(0).unwrap().charge, 3);

        let mol = parse_smiles("c1cc[nH]c1").unwrap();
        let n = mol.atom(3).unwrap();
        assert!(n.aromatic);
        assert_eq!(n.hydrogens, 1);

        let mol = parse_smiles("N[C@@H](C)C(=O)O").unwrap();
        assert_eq!(mol.atom_count(), 6);
    }

    #[test]
    fn test_ring_bond_order_on_opening() {
        let mol = parse_smiles("C=1CCC1").unwrap();
        assert_eq!(mol.bond_between(0, 3).unwrap().order, BondOrder::Double);
    }

    #[test_case("C1CC", 1 ; "unclosed ring")]
    #[test_case("C(C", 1 ; "unclosed branch")]
    #[test_case("C)", 1 ; "unmatched paren")]
    #[test_case("C==C", 2 ; "double bond symbol")]
    #[test_case("CQ", 1 ; "unexpected character")]
    #[test_case("C1C1", 3 ; "duplicate ring bond")]
    #[test_case("=C", 0 ; "leading bond")]
    #[test_case("C[CH3", 1 ; "unclosed bracket")]
    #[test_case("C%1", 1 ; "short percent ring")]
    fn test_errors_carry_position(smiles: &str, position: usize) {
        match parse_smiles(smiles) {
            Err(MoleculeError::Smiles { position: p, .. }) => assert_eq!(p, position, "{smiles}"),
            other => panic!("expected SMILES error for {smiles}, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_bracket_element() {
        assert!(matches!(
            parse_smiles("[Xx]"),
            Err(MoleculeError::UnknownElement { .. })
        ));
    }

    #[test]
    fn test_empty() {
        assert!(matches!(parse_smiles(""), Err(MoleculeError::Empty)));
    }
}
