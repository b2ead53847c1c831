//! MDL molfile (V2000) and SD file reader.

use super::element::Element;
use super::mol::{Atom, Bond, BondOrder, Molecule};
use crate::error::MoleculeError;

/// Reads every record of an SD file.
///
/// Records are separated by `$$$$` lines; a trailing empty record is
/// ignored. Data items after `M  END` are skipped.
///
/// # Errors
///
/// Returns the first [`MoleculeError`] encountered, with line numbers
/// relative to the whole file.
pub fn read_sdf(text: &str) -> Result<Vec<Molecule>, MoleculeError> {
    let lines: Vec<&str> = text.lines().collect();
    let mut molecules = Vec::new();
    let mut start = 0;

    for (i, line) in lines.iter().enumerate() {
        if line.starts_with("$$$$") {
            molecules.push(parse_record(&lines[start..i], start)?);
            start = i + 1;
        }
    }
    if lines[start..].iter().any(|l| !l.trim().is_empty()) {
        molecules.push(parse_record(&lines[start..], start)?);
    }
    if molecules.is_empty() {
        return Err(MoleculeError::Empty);
    }
    Ok(molecules)
}

/// Reads only the first record of an SD file or molfile.
///
/// Parsing stops at the first `$$$$` line, so later records are never
/// looked at.
///
/// # Errors
///
/// Returns [`MoleculeError::Empty`] when there is no record and
/// [`MoleculeError::Molfile`] when the first record is malformed.
pub fn read_first_record(text: &str) -> Result<Molecule, MoleculeError> {
    let lines: Vec<&str> = text
        .lines()
        .take_while(|line| !line.starts_with("$$$$"))
        .collect();
    if lines.iter().all(|line| line.trim().is_empty()) {
        return Err(MoleculeError::Empty);
    }
    parse_record(&lines, 0)
}

/// Parses a single molfile block.
///
/// # Errors
///
/// Returns [`MoleculeError::Molfile`] for malformed blocks.
pub fn parse_molfile(text: &str) -> Result<Molecule, MoleculeError> {
    let lines: Vec<&str> = text.lines().collect();
    parse_record(&lines, 0)
}

fn error(line: usize, reason: impl Into<String>) -> MoleculeError {
    MoleculeError::Molfile {
        line: line + 1,
        reason: reason.into(),
    }
}

/// Fixed-width column slice, trimmed. Missing columns read as empty.
fn field(line: &str, start: usize, end: usize) -> &str {
    let end = end.min(line.len());
    line.get(start..end).map_or("", str::trim)
}

fn parse_record(lines: &[&str], offset: usize) -> Result<Molecule, MoleculeError> {
    if lines.len() < 4 {
        return Err(error(offset + lines.len(), "truncated header"));
    }

    let counts_line = offset + 3;
    let counts = lines[3];
    if counts.contains("V3000") {
        return Err(error(counts_line, "V3000 molfiles are not supported"));
    }
    let atom_count: usize = field(counts, 0, 3)
        .parse()
        .map_err(|_| error(counts_line, "bad atom count"))?;
    let bond_count: usize = field(counts, 3, 6)
        .parse()
        .map_err(|_| error(counts_line, "bad bond count"))?;
    if atom_count == 0 {
        return Err(MoleculeError::Empty);
    }

    let atom_start = 4;
    let bond_start = atom_start + atom_count;
    let props_start = bond_start + bond_count;
    if lines.len() < props_start {
        return Err(error(offset + lines.len(), "truncated atom or bond block"));
    }

    let mut mol = Molecule::new(lines[0].trim());

    for (i, line) in lines[atom_start..bond_start].iter().enumerate() {
        let line_no = offset + atom_start + i;
        let coord = |start, end| {
            field(line, start, end)
                .parse::<f64>()
                .map_err(|_| error(line_no, "bad coordinate"))
        };
        let position = [coord(0, 10)?, coord(10, 20)?, coord(20, 30)?];
        let symbol = field(line, 31, 34);
        let element = match symbol {
            "A" | "Q" | "L" | "R#" => Element::DUMMY,
            "D" | "T" => Element::H,
            s => Element::from_symbol(s)?,
        };
        let charge = match field(line, 36, 39) {
            "1" => 3,
            "2" => 2,
            "3" => 1,
            "5" => -1,
            "6" => -2,
            "7" => -3,
            _ => 0,
        };
        mol.add_atom(Atom::new(element).charge(charge).at(position));
    }

    for (i, line) in lines[bond_start..props_start].iter().enumerate() {
        let line_no = offset + bond_start + i;
        let index = |start, end| {
            field(line, start, end)
                .parse::<usize>()
                .ok()
                .filter(|n| (1..=atom_count).contains(n))
                .map(|n| n - 1)
                .ok_or_else(|| error(line_no, "bad bond atom index"))
        };
        let (a, b) = (index(0, 3)?, index(3, 6)?);
        let order = match field(line, 6, 9) {
            "1" => BondOrder::Single,
            "2" => BondOrder::Double,
            "3" => BondOrder::Triple,
            "4" => BondOrder::Aromatic,
            other => return Err(error(line_no, format!("unsupported bond type '{other}'"))),
        };
        if !mol.add_bond(a, b, Bond::new(order)) {
            return Err(error(line_no, "duplicate or self bond"));
        }
        if order == BondOrder::Aromatic {
            for atom in [a, b] {
                if let Some(atom) = mol.atom_mut(atom) {
                    atom.aromatic = true;
                }
            }
        }
    }

    let mut charges_reset = false;
    for (i, line) in lines[props_start..].iter().enumerate() {
        let line_no = offset + props_start + i;
        if line.starts_with("M  END") {
            break;
        }
        if !line.starts_with("M  CHG") {
            continue;
        }
        // Any CHG line supersedes the atom block charges.
        if !charges_reset {
            for index in 0..atom_count {
                if let Some(atom) = mol.atom_mut(index) {
                    atom.charge = 0;
                }
            }
            charges_reset = true;
        }
        let values: Vec<i64> = line[6..]
            .split_whitespace()
            .map(str::parse)
            .collect::<Result<_, _>>()
            .map_err(|_| error(line_no, "bad charge property"))?;
        let Some((&count, pairs)) = values.split_first() else {
            return Err(error(line_no, "bad charge property"));
        };
        if usize::try_from(count).ok() != Some(pairs.len() / 2) || pairs.len() % 2 != 0 {
            return Err(error(line_no, "charge property count mismatch"));
        }
        for pair in pairs.chunks(2) {
            let atom = usize::try_from(pair[0])
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|n| mol.atom_mut(n))
                .ok_or_else(|| error(line_no, "bad charge atom index"))?;
            atom.charge = i8::try_from(pair[1]).map_err(|_| error(line_no, "charge out of range"))?;
        }
    }

    Ok(mol)
}
