//! 2D depiction coordinates.
//!
//! Molecules that carry coordinates are projected onto the XY plane.
//! Everything else gets a deterministic spring-embedder layout: bonded atoms
//! are pulled to [`BOND_LENGTH`], atoms two bonds apart are pushed towards
//! 120° geometry, and all other pairs repel at short range.

use super::mol::Molecule;
use std::collections::HashSet;

/// Target bond length in layout units (Å).
pub const BOND_LENGTH: f64 = 1.5;

const ITERATIONS: usize = 400;
const GOLDEN_ANGLE: f64 = 2.399_963_229_728_653;

/// Computes 2D positions for every atom, indexed like the molecule's atoms.
#[must_use]
pub fn depict(mol: &Molecule) -> Vec<[f64; 2]> {
    if mol.has_coordinates() {
        return mol
            .atoms()
            .map(|a| a.position.map_or([0.0, 0.0], |p| [p[0], p[1]]))
            .collect();
    }
    spring_layout(mol)
}

fn spring_layout(mol: &Molecule) -> Vec<[f64; 2]> {
    let n = mol.atom_count();
    let mut pos: Vec<[f64; 2]> = (0..n)
        .map(|i| {
            let r = BOND_LENGTH * (i as f64).sqrt();
            let t = GOLDEN_ANGLE * i as f64;
            [r * t.cos(), r * t.sin()]
        })
        .collect();
    if n < 2 {
        return pos;
    }

    let bonds: Vec<(usize, usize)> = mol.bonds().map(|(a, b, _)| (a, b)).collect();
    let mut angles: Vec<(usize, usize)> = Vec::new();
    for center in 0..n {
        let neighbors: Vec<usize> = mol.neighbors(center).collect();
        for (i, &a) in neighbors.iter().enumerate() {
            for &b in &neighbors[i + 1..] {
                if mol.bond_between(a, b).is_none() {
                    angles.push((a, b));
                }
            }
        }
    }
    let angle_length = BOND_LENGTH * 3.0_f64.sqrt();
    let constrained: HashSet<(usize, usize)> = bonds
        .iter()
        .chain(&angles)
        .map(|&(a, b)| (a.min(b), a.max(b)))
        .collect();

    for step in 0..ITERATIONS {
        let cooling = 1.0 - step as f64 / ITERATIONS as f64;
        let mut force = vec![[0.0_f64; 2]; n];

        let spring = |a: usize, b: usize, target: f64, k: f64, force: &mut [[f64; 2]]| {
            let d = [pos[b][0] - pos[a][0], pos[b][1] - pos[a][1]];
            let len = d[0].hypot(d[1]).max(1e-6);
            let f = k * (len - target) / len;
            force[a][0] += f * d[0];
            force[a][1] += f * d[1];
            force[b][0] -= f * d[0];
            force[b][1] -= f * d[1];
        };
        for &(a, b) in &bonds {
            spring(a, b, BOND_LENGTH, 0.5, &mut force);
        }
        for &(a, b) in &angles {
            spring(a, b, angle_length, 0.2, &mut force);
        }

        for a in 0..n {
            for b in a + 1..n {
                if constrained.contains(&(a, b)) {
                    continue;
                }
                let d = [pos[b][0] - pos[a][0], pos[b][1] - pos[a][1]];
                let len2 = (d[0] * d[0] + d[1] * d[1]).max(1e-4);
                if len2 > 9.0 * BOND_LENGTH * BOND_LENGTH {
                    continue;
                }
                let f = 0.4 * BOND_LENGTH * BOND_LENGTH / len2;
                let len = len2.sqrt();
                force[a][0] -= f * d[0] / len;
                force[a][1] -= f * d[1] / len;
                force[b][0] += f * d[0] / len;
                force[b][1] += f * d[1] / len;
            }
        }

        let max_step = 0.3 * BOND_LENGTH * cooling + 0.01;
        for (p, f) in pos.iter_mut().zip(&force) {
            let len = f[0].hypot(f[1]);
            let scale = if len > max_step { max_step / len } else { 1.0 };
            p[0] += f[0] * scale;
            p[1] += f[1] * scale;
        }
    }

    center(&mut pos);
    pos
}

fn center(pos: &mut [[f64; 2]]) {
    let n = pos.len() as f64;
    let cx = pos.iter().map(|p| p[0]).sum::<f64>() / n;
    let cy = pos.iter().map(|p| p[1]).sum::<f64>() / n;
    for p in pos.iter_mut() {
        p[0] -= cx;
        p[1] -= cy;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::molecule::{parse_molfile, parse_smiles};

    fn distance(a: [f64; 2], b: [f64; 2]) -> f64 {
        (a[0] - b[0]).hypot(a[1] - b[1])
    }

    #[test]
    fn test_projects_existing_coordinates() {
        let mol = parse_molfile(crate::molecule::sdf::tests::ETHANOL).unwrap();
        let pos = depict(&mol);
        assert!((pos[1][0] - 0.4658).abs() < 1e-9);
        assert!((pos[1][1] + 0.5116).abs() < 1e-9);
    }

    #[test]
    fn test_layout_is_deterministic() {
        let mol = parse_smiles("c1ccccc1CC(=O)O").unwrap();
        assert_eq!(depict(&mol), depict(&mol));
    }

    #[test]
    fn test_bonded_atoms_near_bond_length() {
        let mol = parse_smiles("CC(C)CCO").unwrap();
        let pos = depict(&mol);
        for (a, b, _) in mol.bonds() {
            let d = distance(pos[a], pos[b]);
            assert!(d > 0.8 && d < 2.4, "bond {a}-{b} has length {d}");
        }
    }

    #[test]
    fn test_atoms_do_not_overlap() {
        let mol = parse_smiles("c1ccc2ccccc2c1").unwrap();
        let pos = depict(&mol);
        for a in 0..pos.len() {
            for b in a + 1..pos.len() {
                assert!(distance(pos[a], pos[b]) > 0.5);
            }
        }
    }

    #[test]
    fn test_single_atom() {
        let mol = parse_smiles("O").unwrap();
        assert_eq!(depict(&mol), vec![[0.0, 0.0]]);
    }
}
