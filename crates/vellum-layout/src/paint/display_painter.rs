//! The recording painter: the screen path's first half.
//!
//! Records every call into a [`DisplayList`] for an executor (the software
//! rasterizer in the engine crate) to replay. Also the painter the test
//! suite drives, since the recorded commands are directly inspectable.

use super::display_list::{DisplayCommand, DisplayList};
use super::painter::{BorderStyle, Painter};
use crate::metrics::{ApproximateFontMetrics, FontMetrics};
use crate::style::{ColorValue, FontStyle};
use crate::tree::Rect;

/// A painter that records commands instead of rasterizing.
pub struct DisplayListPainter<M: FontMetrics = ApproximateFontMetrics> {
    list: DisplayList,
    metrics: M,
}

impl DisplayListPainter<ApproximateFontMetrics> {
    /// A recorder measuring text with the approximate metrics.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            list: DisplayList::new(),
            metrics: ApproximateFontMetrics,
        }
    }
}

impl Default for DisplayListPainter<ApproximateFontMetrics> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: FontMetrics> DisplayListPainter<M> {
    /// A recorder measuring text with the given metrics implementation
    /// (the rasterizer supplies its font-backed metrics here so layout and
    /// raster agree on every advance width).
    pub const fn with_metrics(metrics: M) -> Self {
        Self {
            list: DisplayList::new(),
            metrics,
        }
    }

    /// Borrow the recorded commands.
    #[must_use]
    pub const fn list(&self) -> &DisplayList {
        &self.list
    }

    /// Take the recorded commands, leaving the recorder empty.
    pub fn take_list(&mut self) -> DisplayList {
        std::mem::take(&mut self.list)
    }
}

impl<M: FontMetrics> Painter for DisplayListPainter<M> {
    fn begin(&mut self, _clip: Rect) {
        self.list.clear();
    }

    fn end(&mut self) {}

    fn set_clip(&mut self, clip: Option<Rect>) {
        self.list.push(DisplayCommand::SetClip { clip });
    }

    fn draw_text(&mut self, x: f32, y: f32, text: &str, style: &FontStyle, color: ColorValue) {
        self.list.push(DisplayCommand::DrawText {
            x,
            y,
            text: text.to_string(),
            style: *style,
            color,
        });
    }

    fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, color: ColorValue) {
        self.list.push(DisplayCommand::DrawLine {
            x1,
            y1,
            x2,
            y2,
            color,
        });
    }

    fn fill_rect(&mut self, rect: Rect, color: ColorValue) {
        self.list.push(DisplayCommand::FillRect { rect, color });
    }

    fn draw_rect(&mut self, rect: Rect, color: ColorValue) {
        self.list.push(DisplayCommand::DrawRect { rect, color });
    }

    fn draw_border(&mut self, rect: Rect, width: f32, style: BorderStyle, color: ColorValue) {
        self.list.push(DisplayCommand::DrawBorder {
            rect,
            width,
            style,
            color,
        });
    }

    fn draw_background(&mut self, rect: Rect, color: ColorValue) {
        self.list.push(DisplayCommand::DrawBackground { rect, color });
    }

    fn draw_image(&mut self, rect: Rect, src: &str) {
        self.list.push(DisplayCommand::DrawImage {
            rect,
            src: src.to_string(),
        });
    }

    fn metrics(&self) -> &dyn FontMetrics {
        &self.metrics
    }
}
