//! PNG output via resvg.

use super::{RenderOptions, Renderer, draw_mapping};
use crate::error::{RenderError, Result};
use crate::mapping::AtomMapping;
use crate::molecule::Molecule;
use resvg::tiny_skia::{Color, Pixmap, Transform};
use resvg::usvg;
use resvg::usvg::fontdb::Database;
use std::sync::{Arc, OnceLock};
use tracing::debug;

/// System font database, scanned on first use.
fn system_fonts() -> Arc<Database> {
    static FONTS: OnceLock<Arc<Database>> = OnceLock::new();
    FONTS
        .get_or_init(|| {
            let mut db = Database::new();
            db.load_system_fonts();
            debug!(faces = db.len(), "loaded system fonts");
            Arc::new(db)
        })
        .clone()
}

/// Rasterises the SVG drawing of a mapping to PNG.
#[derive(Debug, Clone, Default)]
pub struct PngRenderer {
    options: RenderOptions,
}

impl PngRenderer {
    /// Creates a renderer with the given canvas size.
    #[must_use]
    pub const fn new(options: RenderOptions) -> Self {
        Self { options }
    }
}

impl Renderer for PngRenderer {
    fn render(
        &self,
        mapping: &AtomMapping,
        mol_a: &Molecule,
        mol_b: &Molecule,
    ) -> Result<Vec<u8>> {
        let svg = draw_mapping(mapping, mol_a, mol_b, &self.options);

        let opt = usvg::Options {
            fontdb: system_fonts(),
            ..usvg::Options::default()
        };
        let tree = usvg::Tree::from_str(&svg, &opt).map_err(|e| RenderError::Svg(e.to_string()))?;

        let (width, height) = (self.options.width, self.options.height);
        let mut pixmap = Pixmap::new(width, height).ok_or(RenderError::Canvas { width, height })?;
        pixmap.fill(Color::WHITE);
        resvg::render(&tree, Transform::default(), &mut pixmap.as_mut());

        let bytes = pixmap
            .encode_png()
            .map_err(|e| RenderError::Encode(e.to_string()))?;
        debug!(width, height, bytes = bytes.len(), "rendered png");
        Ok(bytes)
    }

    fn extension(&self) -> &'static str {
        "png"
    }
}
