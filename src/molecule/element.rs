//! Chemical elements.

use crate::error::MoleculeError;
use std::fmt;

/// Element symbols indexed by atomic number. Index 0 is the SMILES wildcard.
const SYMBOLS: [&str; 87] = [
    "*", "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne", "Na", "Mg", "Al", "Si", "P", "S",
    "Cl", "Ar", "K", "Ca", "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn", "Ga", "Ge",
    "As", "Se", "Br", "Kr", "Rb", "Sr", "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd",
    "In", "Sn", "Sb", "Te", "I", "Xe", "Cs", "Ba", "La", "Ce", "Pr", "Nd", "Pm", "Sm", "Eu", "Gd",
    "Tb", "Dy", "Ho", "Er", "Tm", "Yb", "Lu", "Hf", "Ta", "W", "Re", "Os", "Ir", "Pt", "Au", "Hg",
    "Tl", "Pb", "Bi", "Po", "At", "Rn",
];

/// A chemical element, identified by atomic number.
///
/// Atomic number 0 stands for the `*` wildcard atom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Element(u8);

impl Element {
    /// Wildcard / dummy atom.
    pub const DUMMY: Self = Self(0);
    /// Hydrogen.
    pub const H: Self = Self(1);
    /// Carbon.
    pub const C: Self = Self(6);
    /// Nitrogen.
    pub const N: Self = Self(7);
    /// Oxygen.
    pub const O: Self = Self(8);
    /// Fluorine.
    pub const F: Self = Self(9);
    /// Sulfur.
    pub const S: Self = Self(16);
    /// Chlorine.
    pub const CL: Self = Self(17);

    /// Looks up an element by its symbol (case-sensitive, e.g. `"Cl"`).
    ///
    /// # Errors
    ///
    /// Returns [`MoleculeError::UnknownElement`] for unrecognised symbols.
    pub fn from_symbol(symbol: &str) -> Result<Self, MoleculeError> {
        SYMBOLS
            .iter()
            .position(|s| *s == symbol)
            .and_then(|n| u8::try_from(n).ok())
            .map(Self)
            .ok_or_else(|| MoleculeError::UnknownElement {
                symbol: symbol.to_string(),
            })
    }

    /// Atomic number (0 for the wildcard).
    #[must_use]
    pub const fn atomic_number(self) -> u8 {
        self.0
    }

    /// Element symbol.
    #[must_use]
    pub fn symbol(self) -> &'static str {
        SYMBOLS[usize::from(self.0)]
    }

    /// Whether this is hydrogen.
    #[must_use]
    pub const fn is_hydrogen(self) -> bool {
        self.0 == 1
    }

    /// Drawing colour for atom labels, as an SVG hex colour.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self.0 {
            7 => "#3050F8",
            8 => "#FF0D0D",
            9 | 17 => "#1FA01F",
            15 => "#FF8000",
            16 => "#C8A000",
            35 => "#A62929",
            53 => "#940094",
            _ => "#202020",
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
