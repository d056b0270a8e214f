//! Font metrics interface for text measurement during layout.
//!
//! Implementors provide per-glyph advance widths and vertical extents for
//! a given [`FontStyle`]. The layout engine calls these methods for line
//! breaking and fragment placement; the painter backends provide the real
//! implementations, while [`ApproximateFontMetrics`] is a fixed-ratio
//! fallback used when no font is available and in tests.

use crate::style::FontStyle;

/// Glyph measurement interface consumed by the layout engine.
pub trait FontMetrics {
    /// Measure the total advance width of a text string in the given style.
    ///
    /// This should sum the advance width of each glyph in the string,
    /// matching the cursor advancement used during text rendering.
    fn text_width(&self, text: &str, style: &FontStyle) -> f32;

    /// Height above the baseline for the given style.
    fn ascent(&self, style: &FontStyle) -> f32;

    /// Depth below the baseline for the given style.
    fn descent(&self, style: &FontStyle) -> f32;

    /// Total line height for the given style.
    fn line_height(&self, style: &FontStyle) -> f32 {
        self.ascent(style) + self.descent(style)
    }
}

/// Approximate font metrics using fixed ratios.
///
/// Without access to actual font data we use fixed ratio approximations:
/// the average advance width of Latin glyphs in a proportional font is
/// approximately 0.6× the font size, a fixed-pitch face is a little wider,
/// bold adds a few percent, and the ascent/descent split is the typical
/// 0.8/0.2 of an em plus a small leading allowance.
#[derive(Debug, Default, Clone, Copy)]
pub struct ApproximateFontMetrics;

impl FontMetrics for ApproximateFontMetrics {
    fn text_width(&self, text: &str, style: &FontStyle) -> f32 {
        let ratio = if style.fixed { 0.62 } else { 0.6 };
        let weight = if style.bold { 1.05 } else { 1.0 };
        #[allow(clippy::cast_precision_loss)]
        let count = text.chars().filter(|c| !c.is_control()).count() as f32;
        count * style.size_px() * ratio * weight
    }

    fn ascent(&self, style: &FontStyle) -> f32 {
        style.size_px() * 0.96
    }

    fn descent(&self, style: &FontStyle) -> f32 {
        style.size_px() * 0.24
    }
}
