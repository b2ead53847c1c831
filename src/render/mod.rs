//! Rendering of atom mappings to image files.
//!
//! The output format is chosen by file extension. Only PNG is currently
//! supported; the drawing itself is produced as SVG and rasterised.

pub mod draw;
pub mod png;

pub use draw::draw_mapping;
pub use png::PngRenderer;

use crate::error::{Error, Result};
use crate::mapping::AtomMapping;
use crate::molecule::Molecule;

/// Canvas and panel dimensions, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Total image width.
    pub width: u32,
    /// Total image height.
    pub height: u32,
    /// Width of each molecule panel.
    pub panel_width: u32,
    /// Height of each molecule panel.
    pub panel_height: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 600,
            height: 300,
            panel_width: 300,
            panel_height: 300,
        }
    }
}

/// Writes a mapping as image bytes in one file format.
pub trait Renderer: Send + Sync {
    /// Renders `mapping` between `mol_a` and `mol_b`.
    ///
    /// # Errors
    ///
    /// Returns a render error if the image cannot be produced.
    fn render(&self, mapping: &AtomMapping, mol_a: &Molecule, mol_b: &Molecule)
    -> Result<Vec<u8>>;

    /// File extension this renderer produces, without the dot.
    fn extension(&self) -> &'static str;
}

/// File extensions that can be rendered.
#[must_use]
pub const fn supported_formats() -> &'static [&'static str] {
    &["png"]
}

/// Looks up the renderer for a file extension.
///
/// # Errors
///
/// Returns a parameter error on `--output` naming the extension and the
/// supported formats.
pub fn renderer_for(extension: &str, options: RenderOptions) -> Result<Box<dyn Renderer>> {
    match extension {
        "png" => Ok(Box::new(PngRenderer::new(options))),
        _ => Err(Error::parameter(
            "--output",
            format!(
                "Unknown file format: '{extension}'. The following formats are supported: {}",
                supported_formats()
                    .iter()
                    .map(|f| format!("'{f}'"))
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_png_renderer() {
        let renderer = renderer_for("png", RenderOptions::default()).unwrap();
        assert_eq!(renderer.extension(), "png");
    }

    #[test_case("bmp")]
    #[test_case("svg")]
    #[test_case("")]
    fn test_unknown_format(extension: &str) {
        let Err(err) = renderer_for(extension, RenderOptions::default()) else {
            panic!("'{extension}' should not be supported");
        };
        assert!(err.is_usage());
        assert_eq!(
            err.to_string(),
            format!(
                "Invalid value for '--output': Unknown file format: '{extension}'. \
                 The following formats are supported: 'png'"
            )
        );
    }

    #[test]
    fn test_default_panels_tile_canvas() {
        let options = RenderOptions::default();
        assert_eq!(options.panel_width * 2, options.width);
        assert_eq!(options.panel_height, options.height);
        assert_eq!(supported_formats(), ["png"]);
    }
}
