//! SVG drawing of a mapping: molecule A on the left, molecule B on the right.
//!
//! Atoms without a partner and bonds the mapping does not preserve are
//! highlighted red; mapped atoms whose element changes are highlighted blue.

use super::RenderOptions;
use crate::mapping::AtomMapping;
use crate::molecule::layout::BOND_LENGTH;
use crate::molecule::{BondOrder, Molecule, depict};
use std::collections::BTreeMap;
use std::fmt::Write;

const UNIQUE_COLOR: &str = "#FF4040";
const ELEMENT_CHANGE_COLOR: &str = "#4060FF";
const BOND_COLOR: &str = "#202020";
const MARGIN: f64 = 24.0;
const MAX_BOND_PIXELS: f64 = 40.0;

/// Atom and bond highlight flags for one side of the drawing.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Highlights {
    /// Atoms with no partner.
    pub unique_atoms: Vec<usize>,
    /// Mapped atoms whose partner is a different element.
    pub element_changes: Vec<usize>,
    /// Bonds (`a < b`) not preserved in the other molecule.
    pub changed_bonds: Vec<(usize, usize)>,
}

/// Computes highlights for `mol`, given its correspondence onto `other`.
#[must_use]
pub fn highlights(
    mol: &Molecule,
    other: &Molecule,
    correspondence: &BTreeMap<usize, usize>,
) -> Highlights {
    let mut result = Highlights::default();
    for index in 0..mol.atom_count() {
        match correspondence.get(&index) {
            None => result.unique_atoms.push(index),
            Some(&partner) => {
                let element = mol.atom(index).map(|a| a.element);
                if element != other.atom(partner).map(|a| a.element) {
                    result.element_changes.push(index);
                }
            }
        }
    }

    for (a, b, bond) in mol.bonds() {
        let preserved = match (correspondence.get(&a), correspondence.get(&b)) {
            (Some(&x), Some(&y)) => other
                .bond_between(x, y)
                .is_some_and(|partner| partner.order == bond.order),
            _ => false,
        };
        if !preserved {
            result.changed_bonds.push((a.min(b), a.max(b)));
        }
    }
    result.changed_bonds.sort_unstable();
    result
}

/// Draws the mapping as an SVG document.
#[must_use]
pub fn draw_mapping(
    mapping: &AtomMapping,
    mol_a: &Molecule,
    mol_b: &Molecule,
    options: &RenderOptions,
) -> String {
    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = options.width,
        h = options.height
    );
    let _ = writeln!(
        svg,
        r##"<rect x="0" y="0" width="{}" height="{}" fill="#FFFFFF"/>"##,
        options.width, options.height
    );

    let inverse = mapping.mol_b_to_mol_a();
    let panels = [
        (mol_a, highlights(mol_a, mol_b, mapping.mol_a_to_mol_b())),
        (mol_b, highlights(mol_b, mol_a, &inverse)),
    ];
    for (k, (mol, marks)) in panels.iter().enumerate() {
        let origin = f64::from(options.panel_width) * k as f64;
        draw_panel(&mut svg, mol, marks, origin, options);
    }

    svg.push_str("</svg>\n");
    svg
}

/// Maps layout coordinates into one panel.
struct Viewport {
    scale: f64,
    offset: [f64; 2],
    center: [f64; 2],
}

impl Viewport {
    fn fit(points: &[[f64; 2]], origin: f64, options: &RenderOptions) -> Self {
        let (mut min, mut max) = ([f64::MAX; 2], [f64::MIN; 2]);
        for p in points {
            for d in 0..2 {
                min[d] = min[d].min(p[d]);
                max[d] = max[d].max(p[d]);
            }
        }
        if points.is_empty() {
            (min, max) = ([0.0; 2], [0.0; 2]);
        }

        let width = f64::from(options.panel_width) - 2.0 * MARGIN;
        // leave room for the caption
        let height = f64::from(options.panel_height) - 3.0 * MARGIN;
        let span = [(max[0] - min[0]).max(1e-6), (max[1] - min[1]).max(1e-6)];
        let scale = (width / span[0])
            .min(height / span[1])
            .min(MAX_BOND_PIXELS / BOND_LENGTH);

        Self {
            scale,
            offset: [
                origin + f64::from(options.panel_width) / 2.0,
                (f64::from(options.panel_height) - MARGIN) / 2.0,
            ],
            center: [(min[0] + max[0]) / 2.0, (min[1] + max[1]) / 2.0],
        }
    }

    fn project(&self, p: [f64; 2]) -> [f64; 2] {
        [
            self.offset[0] + (p[0] - self.center[0]) * self.scale,
            self.offset[1] - (p[1] - self.center[1]) * self.scale,
        ]
    }
}

fn draw_panel(
    svg: &mut String,
    mol: &Molecule,
    marks: &Highlights,
    origin: f64,
    options: &RenderOptions,
) {
    let layout = depict(mol);
    let view = Viewport::fit(&layout, origin, options);
    let points: Vec<[f64; 2]> = layout.iter().map(|&p| view.project(p)).collect();
    let radius = (view.scale * BOND_LENGTH * 0.3).clamp(4.0, 12.0);

    // highlights go underneath
    for &(a, b) in &marks.changed_bonds {
        let (p, q) = (points[a], points[b]);
        let _ = writeln!(
            svg,
            r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{UNIQUE_COLOR}" stroke-opacity="0.5" stroke-width="{:.2}" stroke-linecap="round"/>"#,
            p[0],
            p[1],
            q[0],
            q[1],
            radius * 1.2
        );
    }
    for (atoms, color) in [
        (&marks.unique_atoms, UNIQUE_COLOR),
        (&marks.element_changes, ELEMENT_CHANGE_COLOR),
    ] {
        for &i in atoms {
            let _ = writeln!(
                svg,
                r#"<circle cx="{:.2}" cy="{:.2}" r="{radius:.2}" fill="{color}" fill-opacity="0.5"/>"#,
                points[i][0], points[i][1]
            );
        }
    }

    for (a, b, bond) in mol.bonds() {
        draw_bond(svg, points[a], points[b], bond.order);
    }

    for (i, atom) in mol.atoms().enumerate() {
        let carbon_in_chain = atom.element.atomic_number() == 6 && mol.degree(i) > 0;
        if carbon_in_chain && atom.charge == 0 {
            continue;
        }
        let mut label = atom.element.symbol().to_string();
        match atom.charge {
            0 => {}
            1 => label.push('+'),
            -1 => label.push('-'),
            c if c > 0 => {
                let _ = write!(label, "{c}+");
            }
            c => {
                let _ = write!(label, "{}-", -i16::from(c));
            }
        }
        let p = points[i];
        let _ = writeln!(
            svg,
            r##"<circle cx="{:.2}" cy="{:.2}" r="{:.2}" fill="#FFFFFF"/>"##,
            p[0],
            p[1],
            radius * 0.8
        );
        let _ = writeln!(
            svg,
            r#"<text x="{:.2}" y="{:.2}" font-family="sans-serif" font-size="{:.1}" text-anchor="middle" dominant-baseline="central" fill="{}">{}</text>"#,
            p[0],
            p[1],
            radius * 1.3,
            atom.element.color(),
            escape(&label)
        );
    }

    let _ = writeln!(
        svg,
        r##"<text x="{:.2}" y="{:.2}" font-family="sans-serif" font-size="12" text-anchor="middle" fill="#404040">{}</text>"##,
        origin + f64::from(options.panel_width) / 2.0,
        f64::from(options.panel_height) - MARGIN / 2.0,
        escape(mol.name())
    );
}

fn draw_bond(svg: &mut String, p: [f64; 2], q: [f64; 2], order: BondOrder) {
    let d = [q[0] - p[0], q[1] - p[1]];
    let len = d[0].hypot(d[1]).max(1e-6);
    let normal = [-d[1] / len, d[0] / len];
    let gap = 3.0;

    let mut line = |shift: f64, dashed: bool| {
        let o = [normal[0] * shift, normal[1] * shift];
        let dash = if dashed { r#" stroke-dasharray="3,2""# } else { "" };
        let _ = writeln!(
            svg,
            r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{BOND_COLOR}" stroke-width="1.5"{dash}/>"#,
            p[0] + o[0],
            p[1] + o[1],
            q[0] + o[0],
            q[1] + o[1]
        );
    };

    match order {
        BondOrder::Single => line(0.0, false),
        BondOrder::Double => {
            line(-gap / 2.0, false);
            line(gap / 2.0, false);
        }
        BondOrder::Triple => {
            line(-gap, false);
            line(0.0, false);
            line(gap, false);
        }
        BondOrder::Aromatic => {
            line(0.0, false);
            line(gap, true);
        }
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
