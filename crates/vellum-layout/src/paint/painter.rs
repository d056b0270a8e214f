//! The painter abstraction.

use serde::Serialize;
use strum_macros::Display;

use crate::metrics::FontMetrics;
use crate::style::{ColorValue, FontStyle};
use crate::tree::Rect;

/// Border rendering style for the legacy beveled look.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
pub enum BorderStyle {
    /// Flat single-color border.
    Solid,
    /// Sunken bevel (table cells, text inputs).
    Inset,
    /// Raised bevel (table frames, buttons).
    Outset,
}

/// A polymorphic drawing backend.
///
/// The layout/draw code is backend-agnostic: the same walk drives the
/// screen recorder and the print backend. All backend-specific coordinate
/// scaling (engine pixel units to the backend's native unit) is hidden
/// behind the implementation; the walk always works in engine pixels.
pub trait Painter {
    /// Begin a drawing pass over the given clip region.
    fn begin(&mut self, clip: Rect);

    /// End the drawing pass.
    fn end(&mut self);

    /// Replace the clip rectangle (`None` restores the pass clip).
    fn set_clip(&mut self, clip: Option<Rect>);

    /// Draw one glyph run. `y` is the baseline.
    fn draw_text(&mut self, x: f32, y: f32, text: &str, style: &FontStyle, color: ColorValue);

    /// Draw a one-pixel line.
    fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, color: ColorValue);

    /// Fill a rectangle.
    fn fill_rect(&mut self, rect: Rect, color: ColorValue);

    /// Outline a rectangle with a one-pixel stroke.
    fn draw_rect(&mut self, rect: Rect, color: ColorValue);

    /// Draw a border of the given thickness and bevel style around the
    /// outside edge of `rect`'s interior.
    fn draw_border(&mut self, rect: Rect, width: f32, style: BorderStyle, color: ColorValue);

    /// Fill a background region.
    fn draw_background(&mut self, rect: Rect, color: ColorValue);

    /// Draw an image resource into `rect`. Backends substitute a
    /// placeholder for sources they cannot resolve.
    fn draw_image(&mut self, rect: Rect, src: &str);

    /// The glyph metrics this backend measures text with.
    fn metrics(&self) -> &dyn FontMetrics;

    /// Size of one engine pixel in the backend's native unit.
    fn pixel_size(&self) -> f32 {
        1.0
    }

    /// Page size in engine pixels, for paged backends only.
    fn page_extents(&self) -> Option<(f32, f32)> {
        None
    }
}
