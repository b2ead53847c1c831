//! Turns a `--mol` argument into a [`Molecule`].

use super::mol::Molecule;
use super::sdf::read_first_record;
use super::smiles::parse_smiles;
use crate::error::{Error, Result};
use std::path::Path;
use tracing::debug;

/// File extensions read as MDL molfile / SD file.
pub const MOLFILE_EXTENSIONS: [&str; 2] = ["sdf", "mol"];

/// Resolves a user-supplied molecule reference.
///
/// An existing file with a molfile extension is read (first record);
/// anything else is parsed as SMILES.
///
/// # Errors
///
/// Returns a parameter error on `--mol` naming the input when it can be
/// neither read nor parsed.
pub fn resolve_molecule(input: &str) -> Result<Molecule> {
    let path = Path::new(input);
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    if path.is_file() && extension.as_deref().is_some_and(|e| MOLFILE_EXTENSIONS.contains(&e)) {
        debug!(path = %path.display(), "reading molecule from file");
        return load_molfile(path);
    }

    debug!(smiles = input, "parsing molecule as SMILES");
    parse_smiles(input).map_err(|e| {
        Error::parameter(
            "--mol",
            format!("Unable to load molecule from '{input}': {e}"),
        )
    })
}

fn load_molfile(path: &Path) -> Result<Molecule> {
    let unable = |reason: &dyn std::fmt::Display| {
        Error::parameter(
            "--mol",
            format!("Unable to load molecule from '{}': {reason}", path.display()),
        )
    };

    // Connection tables are ASCII; data items may carry any encoding.
    let bytes = std::fs::read(path).map_err(|e| unable(&e))?;
    let text = String::from_utf8_lossy(&bytes);
    let mut mol = read_first_record(&text).map_err(|e| unable(&e))?;

    if mol.name().is_empty()
        && let Some(stem) = path.file_stem().and_then(|s| s.to_str())
    {
        mol.set_name(stem);
    }
    Ok(mol)
}
