//! CLI command implementations.
//!
//! Contains the business logic for each CLI command.

use crate::cli::output::{
    MapperInfo, OutputFormat, format_mapping, format_mappers, format_written,
};
use crate::cli::parser::{Cli, Commands};
use crate::error::{Error, IoError, Result};
use crate::mapping::{AtomMapper, AtomMapping, available_mappers, create_mapper, mapper_aliases};
use crate::molecule::{Molecule, resolve_molecule};
use crate::render::{RenderOptions, renderer_for};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Executes the CLI command.
///
/// # Arguments
///
/// * `cli` - Parsed CLI arguments.
///
/// # Returns
///
/// Result with output string on success.
///
/// # Errors
///
/// Returns an error if the command fails to execute.
pub fn execute(cli: &Cli) -> Result<String> {
    let format = OutputFormat::parse(&cli.format);

    match &cli.command {
        Commands::Atommapping {
            mol,
            mapper,
            output,
        } => cmd_atommapping(mol, mapper, output.as_deref(), format),
        Commands::Mappers => cmd_mappers(format),
    }
}

/// Checks the atom mapping of two molecules.
///
/// Without `output` the mapping dictionary is returned for printing;
/// otherwise the mapping is drawn to `output` in the format named by its
/// extension.
///
/// # Errors
///
/// Returns a parameter error unless exactly two molecules are given, when a
/// molecule or the mapper cannot be resolved, or when the output format is
/// unknown. Returns a usage error when the mapper does not produce exactly
/// one mapping.
pub fn cmd_atommapping(
    mols: &[String],
    mapper: &str,
    output: Option<&Path>,
    format: OutputFormat,
) -> Result<String> {
    if mols.len() != 2 {
        return Err(Error::parameter(
            "--mol",
            "Must specify --mol exactly twice.",
        ));
    }
    let mol_a = resolve_molecule(&mols[0])?;
    let mol_b = resolve_molecule(&mols[1])?;
    let mapper = create_mapper(mapper)?;
    debug!(
        mapper = mapper.name(),
        mol_a = mol_a.name(),
        formula_a = %mol_a.formula(),
        mol_b = mol_b.name(),
        formula_b = %mol_b.formula(),
        "resolved inputs"
    );

    match output {
        None => {
            let mapping = generate_mapping(mapper.as_ref(), &mol_a, &mol_b)?;
            Ok(format_mapping(&mapping, format))
        }
        Some(path) => {
            let (file, extension) = split_output(path);
            let mapping = generate_mapping(mapper.as_ref(), &mol_a, &mol_b)?;
            let renderer = renderer_for(&extension, RenderOptions::default())?;
            let bytes = renderer.render(&mapping, &mol_a, &mol_b)?;
            write_output(&file, &bytes)?;
            info!(path = %file.display(), bytes = bytes.len(), "wrote mapping image");
            Ok(format_written(&file, &mapping, format))
        }
    }
}

/// Runs `mapper` and returns its only mapping.
///
/// # Errors
///
/// Returns a usage error when the mapper suggests zero or several mappings,
/// and propagates any error the mapper itself raises.
pub fn generate_mapping(
    mapper: &dyn AtomMapper,
    mol_a: &Molecule,
    mol_b: &Molecule,
) -> Result<AtomMapping> {
    let mut mappings = mapper.suggest_mappings(mol_a, mol_b)?;
    if mappings.len() != 1 {
        return Err(Error::Usage(format!(
            "Found {} mappings; this command requires a mapper to provide exactly 1 mapping",
            mappings.len()
        )));
    }
    Ok(mappings.remove(0))
}

/// Splits an output path into the file and its lowercase extension.
///
/// The extension is empty when the file has none.
#[must_use]
pub fn split_output(path: &Path) -> (PathBuf, String) {
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    (path.to_path_buf(), extension)
}

fn write_output(file: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = file.parent()
        && !parent.as_os_str().is_empty()
        && !parent.is_dir()
    {
        return Err(IoError::FileNotFound {
            path: parent.display().to_string(),
        }
        .into());
    }
    std::fs::write(file, bytes).map_err(|e| {
        IoError::WriteFailed {
            path: file.display().to_string(),
            reason: e.to_string(),
        }
        .into()
    })
}

/// Lists the registered mappers.
///
/// # Errors
///
/// Returns an error if a registered mapper cannot be constructed.
pub fn cmd_mappers(format: OutputFormat) -> Result<String> {
    let mut infos = Vec::new();
    for name in available_mappers() {
        let mapper = create_mapper(name)?;
        infos.push(MapperInfo {
            name,
            aliases: mapper_aliases(name),
            description: mapper.description(),
        });
    }
    Ok(format_mappers(&infos, format))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use test_case::test_case;

    /// Mapper that suggests a fixed number of identity mappings.
    struct Fixed(usize);

    impl AtomMapper for Fixed {
        fn suggest_mappings(
            &self,
            mol_a: &Molecule,
            mol_b: &Molecule,
        ) -> Result<Vec<AtomMapping>> {
            (0..self.0)
                .map(|_| Ok(AtomMapping::new(mol_a, mol_b, [(0, 0)])?))
                .collect()
        }

        fn name(&self) -> &'static str {
            "fixed"
        }
    }

    fn mols(smiles: &[&str]) -> Vec<String> {
        smiles.iter().map(ToString::to_string).collect()
    }

    #[test_case(&[] ; "none")]
    #[test_case(&["CCO"] ; "one")]
    #[test_case(&["CCO", "CCN", "CCC"] ; "three")]
    fn test_requires_two_molecules(smiles: &[&str]) {
        let err = cmd_atommapping(&mols(smiles), "mcs", None, OutputFormat::Text).unwrap_err();
        assert!(err.is_usage());
        assert_eq!(
            err.to_string(),
            "Invalid value for '--mol': Must specify --mol exactly twice."
        );
    }

    #[test_case(0)]
    #[test_case(2)]
    #[test_case(3)]
    fn test_generate_mapping_requires_exactly_one(count: usize) {
        let a = crate::molecule::parse_smiles("CC").unwrap();
        let err = generate_mapping(&Fixed(count), &a, &a).unwrap_err();
        assert!(matches!(err, Error::Usage(_)));
        assert_eq!(
            err.to_string(),
            format!(
                "Found {count} mappings; this command requires a mapper to provide exactly 1 mapping"
            )
        );
    }

    #[test]
    fn test_generate_mapping_single() {
        let a = crate::molecule::parse_smiles("CC").unwrap();
        let mapping = generate_mapping(&Fixed(1), &a, &a).unwrap();
        assert_eq!(mapping.to_string(), "{0: 0}");
    }

    #[test]
    fn test_prints_mapping() {
        let output =
            cmd_atommapping(&mols(&["CCO", "CCO"]), "mcs", None, OutputFormat::Text).unwrap();
        assert_eq!(output, "{0: 0, 1: 1, 2: 2}\n");
    }

    #[test]
    fn test_unknown_mapper() {
        let err = cmd_atommapping(&mols(&["CC", "CC"]), "nope", None, OutputFormat::Text)
            .unwrap_err();
        assert!(err.to_string().contains("'--mapper'"));
    }

    #[test]
    fn test_unknown_format_leaves_no_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mapping.bmp");
        let err = cmd_atommapping(
            &mols(&["CCO", "CCN"]),
            "mcs",
            Some(&path),
            OutputFormat::Text,
        )
        .unwrap_err();
        assert!(err.is_usage());
        assert!(err.to_string().contains(
            "Unknown file format: 'bmp'. The following formats are supported: 'png'"
        ));
        assert!(!path.exists());
    }

    #[test]
    fn test_writes_png() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mapping.png");
        let output = cmd_atommapping(
            &mols(&["c1ccccc1O", "c1ccccc1N"]),
            "mcs",
            Some(&path),
            OutputFormat::Text,
        )
        .unwrap();
        assert!(output.is_empty());
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"\x89PNG\r\n\x1a\n"));
    }

    #[test]
    fn test_missing_output_directory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("mapping.png");
        let err = cmd_atommapping(&mols(&["CC", "CC"]), "mcs", Some(&path), OutputFormat::Text)
            .unwrap_err();
        assert!(matches!(err, Error::Io(IoError::FileNotFound { .. })));
    }

    #[test_case("out.png", "png")]
    #[test_case("OUT.PNG", "png")]
    #[test_case("dir/out.tar.bmp", "bmp")]
    #[test_case("noextension", "")]
    fn test_split_output(input: &str, extension: &str) {
        let (file, ext) = split_output(Path::new(input));
        assert_eq!(file, PathBuf::from(input));
        assert_eq!(ext, extension);
    }

    #[test]
    fn test_cmd_mappers() {
        let text = cmd_mappers(OutputFormat::Text).unwrap();
        assert!(text.contains("mcs"));
        assert!(text.contains("geometric"));
        assert!(text.contains("kartograf"));
    }
}
