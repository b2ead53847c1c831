//! Error types for atom mapping operations.
//!
//! This module provides the error hierarchy using `thiserror` for molecule
//! parsing, mapping, rendering, I/O, and the command-line surface.

use thiserror::Error;

/// Result type alias for atom mapping operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type.
#[derive(Error, Debug)]
pub enum Error {
    /// A command-line parameter was given a value that cannot be used.
    #[error("Invalid value for '{param}': {message}")]
    Parameter {
        /// Flag the value was given to, e.g. `--mol`.
        param: String,
        /// Description of the problem.
        message: String,
    },

    /// The command was used in a way it does not support.
    #[error("{0}")]
    Usage(String),

    /// Molecule parsing errors.
    #[error("molecule error: {0}")]
    Molecule(#[from] MoleculeError),

    /// Mapping errors raised by a mapper.
    #[error("mapping error: {0}")]
    Mapping(#[from] MappingError),

    /// Rendering errors.
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// I/O errors (file operations).
    #[error("I/O error: {0}")]
    Io(#[from] IoError),
}

impl Error {
    /// Builds a parameter error for the given flag.
    pub fn parameter(param: &str, message: impl Into<String>) -> Self {
        Self::Parameter {
            param: param.to_string(),
            message: message.into(),
        }
    }

    /// Returns whether this error reports incorrect command-line usage.
    ///
    /// These exit with status 2, everything else with 1.
    #[must_use]
    pub const fn is_usage(&self) -> bool {
        matches!(self, Self::Parameter { .. } | Self::Usage(_))
    }
}

/// Errors from the SMILES and molfile readers.
#[derive(Error, Debug)]
pub enum MoleculeError {
    /// Malformed SMILES string.
    #[error("invalid SMILES at position {position}: {reason}")]
    Smiles {
        /// Byte offset into the SMILES string.
        position: usize,
        /// What went wrong.
        reason: String,
    },

    /// Malformed molfile / SDF record.
    #[error("invalid molfile at line {line}: {reason}")]
    Molfile {
        /// One-based line number.
        line: usize,
        /// What went wrong.
        reason: String,
    },

    /// Element symbol not known to the reader.
    #[error("unknown element: {symbol}")]
    UnknownElement {
        /// The symbol as written.
        symbol: String,
    },

    /// Input contained no atoms.
    #[error("molecule has no atoms")]
    Empty,
}

/// Errors raised while generating mappings.
#[derive(Error, Debug)]
pub enum MappingError {
    /// The mapper needs atom coordinates the molecule does not have.
    #[error("mapper '{mapper}' requires coordinates but molecule '{molecule}' has none")]
    MissingCoordinates {
        /// Mapper name.
        mapper: &'static str,
        /// Molecule name.
        molecule: String,
    },

    /// A mapping referred to an atom outside the molecule.
    #[error("atom index {index} out of range for molecule with {count} atoms")]
    AtomOutOfRange {
        /// Offending index.
        index: usize,
        /// Number of atoms in the molecule.
        count: usize,
    },

    /// Two atoms of one molecule were mapped onto the same partner.
    #[error("mapping is not injective: atom {target} is mapped twice")]
    NotInjective {
        /// Index mapped to more than once.
        target: usize,
    },

    /// Invalid mapper configuration.
    #[error("invalid mapper configuration: {reason}")]
    InvalidConfig {
        /// Reason the configuration is invalid.
        reason: String,
    },
}

/// Errors from the drawing and rasterisation path.
#[derive(Error, Debug)]
pub enum RenderError {
    /// The generated SVG could not be parsed back.
    #[error("failed to build drawing: {0}")]
    Svg(String),

    /// The canvas could not be allocated.
    #[error("invalid canvas size {width}x{height}")]
    Canvas {
        /// Canvas width in pixels.
        width: u32,
        /// Canvas height in pixels.
        height: u32,
    },

    /// Encoding the raster image failed.
    #[error("failed to encode image: {0}")]
    Encode(String),
}

/// I/O-specific errors for file operations.
#[derive(Error, Debug)]
pub enum IoError {
    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path to the file that was not found.
        path: String,
    },

    /// Failed to write file.
    #[error("failed to write file: {path}: {reason}")]
    WriteFailed {
        /// Path to the file.
        path: String,
        /// Reason for failure.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameter_display() {
        let err = Error::parameter("--mol", "Must specify --mol exactly twice.");
        assert_eq!(
            err.to_string(),
            "Invalid value for '--mol': Must specify --mol exactly twice."
        );
        assert!(err.is_usage());
    }

    #[test]
    fn test_usage_display() {
        let err = Error::Usage("Found 2 mappings".to_string());
        assert_eq!(err.to_string(), "Found 2 mappings");
        assert!(err.is_usage());
    }

    #[test]
    fn test_molecule_error_display() {
        let err = MoleculeError::Smiles {
            position: 3,
            reason: "unclosed ring".to_string(),
        };
        assert_eq!(err.to_string(), "invalid SMILES at position 3: unclosed ring");

        let err = MoleculeError::Molfile {
            line: 4,
            reason: "bad counts line".to_string(),
        };
        assert!(err.to_string().contains("line 4"));

        let err = MoleculeError::UnknownElement {
            symbol: "Xx".to_string(),
        };
        assert_eq!(err.to_string(), "unknown element: Xx");
    }

    #[test]
    fn test_mapping_error_display() {
        let err = MappingError::MissingCoordinates {
            mapper: "geometric",
            molecule: "benzene".to_string(),
        };
        assert!(err.to_string().contains("geometric"));
        assert!(err.to_string().contains("benzene"));

        let err = MappingError::NotInjective { target: 7 };
        assert!(err.to_string().contains("7"));
    }

    #[test]
    fn test_error_from_render() {
        let err: Error = RenderError::Canvas {
            width: 0,
            height: 0,
        }
        .into();
        assert!(matches!(err, Error::Render(_)));
        assert!(err.to_string().contains("0x0"));
    }

    #[test]
    fn test_io_error_variants() {
        let err = IoError::WriteFailed {
            path: "/tmp/out.png".to_string(),
            reason: "disk full".to_string(),
        };
        assert!(err.to_string().contains("/tmp/out.png"));
        assert!(err.to_string().contains("disk full"));
    }
}
