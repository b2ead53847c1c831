//! Atom mapping strategies.
//!
//! This module provides a trait-based system for proposing atom
//! correspondences between two molecules. Available strategies:
//!
//! - **MCS**: maximum common connected substructure over the bond graph
//! - **Geometric**: pairs same-element atoms that sit close together in space

pub mod atom_mapping;
pub mod geometric;
pub mod mcs;
pub mod traits;

pub use atom_mapping::AtomMapping;
pub use geometric::{GeometricMapper, GeometricOptions};
pub use mcs::{McsMapper, McsOptions};
pub use traits::AtomMapper;

use crate::error::{Error, Result};

/// Registered mappers: canonical name and accepted aliases.
static REGISTRY: [(&str, &[&str]); 2] = [
    ("mcs", &["lomap", "LomapAtomMapper"]),
    ("geometric", &["kartograf", "KartografAtomMapper"]),
];

/// Creates a default-configured mapper by name.
///
/// # Arguments
///
/// * `name` - Canonical mapper name or one of its aliases, case-insensitive.
///
/// # Errors
///
/// Returns a parameter error on `--mapper` listing the available mappers
/// if the name is not recognized.
pub fn create_mapper(name: &str) -> Result<Box<dyn AtomMapper>> {
    let canonical = REGISTRY.iter().find_map(|(canonical, aliases)| {
        (canonical.eq_ignore_ascii_case(name) || aliases.iter().any(|a| a.eq_ignore_ascii_case(name)))
            .then_some(*canonical)
    });

    match canonical {
        Some("mcs") => Ok(Box::new(McsMapper::new())),
        Some("geometric") => Ok(Box::new(GeometricMapper::new())),
        _ => Err(Error::parameter(
            "--mapper",
            format!(
                "Unknown mapper '{name}'. Available mappers: {}",
                available_mappers().join(", ")
            ),
        )),
    }
}

/// Lists canonical mapper names.
#[must_use]
pub fn available_mappers() -> Vec<&'static str> {
    REGISTRY.iter().map(|(name, _)| *name).collect()
}

/// Aliases accepted for a canonical mapper name.
#[must_use]
pub fn mapper_aliases(name: &str) -> &'static [&'static str] {
    match REGISTRY.iter().find(|(canonical, _)| *canonical == name) {
        Some((_, aliases)) => aliases,
        None => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("mcs", "mcs")]
    #[test_case("MCS", "mcs")]
    #[test_case("lomap", "mcs")]
    #[test_case("LomapAtomMapper", "mcs")]
    #[test_case("geometric", "geometric")]
    #[test_case("Kartograf", "geometric")]
    #[test_case("kartografatommapper", "geometric")]
    fn test_create_mapper(input: &str, expected: &str) {
        let mapper = create_mapper(input).unwrap();
        assert_eq!(mapper.name(), expected);
    }

    #[test]
    fn test_create_mapper_unknown() {
        let Err(err) = create_mapper("unknown") else {
            panic!("unknown mapper should fail");
        };
        assert!(err.is_usage());
        let message = err.to_string();
        assert!(message.contains("'--mapper'"));
        assert!(message.contains("mcs, geometric"));
    }

    #[test]
    fn test_available_mappers() {
        let mappers = available_mappers();
        assert_eq!(mappers, vec!["mcs", "geometric"]);
        for name in mappers {
            assert_eq!(create_mapper(name).unwrap().name(), name);
            assert!(!mapper_aliases(name).is_empty());
        }
        assert!(mapper_aliases("nope").is_empty());
    }
}
