//! Font metrics backed by fontdue for accurate text measurement during
//! layout.
//!
//! This implementation queries fontdue for exact per-character advance
//! widths, providing accurate text measurement for layout. It uses
//! `Font::metrics()` (not `Font::rasterize()`) to avoid the cost of
//! bitmap generation when only measurements are needed. Install it on the
//! engine with [`crate::Engine::set_metrics`] so layout and the
//! rasterizer agree on every advance width.

use fontdue::Font;
use vellum_layout::metrics::FontMetrics;
use vellum_layout::style::FontStyle;

/// Font metrics implementation backed by fontdue's per-glyph metrics.
pub struct FontdueFontMetrics {
    regular: Font,
    bold: Option<Font>,
    italic: Option<Font>,
    bold_italic: Option<Font>,
}

impl FontdueFontMetrics {
    /// Create a metrics provider from a regular face and optional
    /// variants; missing variants fall back toward the regular face.
    #[must_use]
    pub const fn new(
        regular: Font,
        bold: Option<Font>,
        italic: Option<Font>,
        bold_italic: Option<Font>,
    ) -> Self {
        Self {
            regular,
            bold,
            italic,
            bold_italic,
        }
    }

    /// Pick the best face for a style, falling back through
    /// exact match → partial match → regular.
    fn face(&self, style: &FontStyle) -> &Font {
        match (style.bold, style.italic) {
            (true, true) => self
                .bold_italic
                .as_ref()
                .or(self.bold.as_ref())
                .unwrap_or(&self.regular),
            (true, false) => self.bold.as_ref().unwrap_or(&self.regular),
            (false, true) => self.italic.as_ref().unwrap_or(&self.regular),
            (false, false) => &self.regular,
        }
    }
}

impl FontMetrics for FontdueFontMetrics {
    fn text_width(&self, text: &str, style: &FontStyle) -> f32 {
        let font = self.face(style);
        let size = style.size_px();
        // Sum per-character advance widths, matching the cursor
        // advancement used in Renderer::draw_text.
        text.chars()
            .filter(|c| !c.is_control())
            .map(|c| font.metrics(c, size).advance_width)
            .sum()
    }

    fn ascent(&self, style: &FontStyle) -> f32 {
        let font = self.face(style);
        let size = style.size_px();
        font.horizontal_line_metrics(size)
            .map_or(size * 0.96, |m| m.ascent)
    }

    fn descent(&self, style: &FontStyle) -> f32 {
        let font = self.face(style);
        let size = style.size_px();
        font.horizontal_line_metrics(size)
            .map_or(size * 0.24, |m| -m.descent)
    }
}
