//! The print backend: a point-based vector command recorder with page
//! geometry.
//!
//! The print painter records the same command vocabulary as the screen
//! recorder, but scaled into printer points and bucketed per page. The
//! draw walk stays in engine pixels throughout; the unit conversion lives
//! entirely here, behind [`Painter::pixel_size`] and
//! [`Painter::page_extents`].

use super::display_list::{DisplayCommand, DisplayList};
use super::painter::{BorderStyle, Painter};
use crate::metrics::{ApproximateFontMetrics, FontMetrics};
use crate::style::{ColorValue, FontStyle};
use crate::tree::Rect;

/// Points per engine pixel (the conventional 96 dpi to 72 dpi ratio).
pub const POINTS_PER_PIXEL: f32 = 0.75;

/// US Letter page width in points.
pub const DEFAULT_PAGE_WIDTH_PT: f32 = 612.0;
/// US Letter page height in points.
pub const DEFAULT_PAGE_HEIGHT_PT: f32 = 792.0;

/// A paged, point-unit recording painter.
pub struct PrintPainter<M: FontMetrics = ApproximateFontMetrics> {
    page_width_pt: f32,
    page_height_pt: f32,
    pages: Vec<DisplayList>,
    metrics: M,
}

impl PrintPainter<ApproximateFontMetrics> {
    /// A print painter with the given page size in points.
    #[must_use]
    pub const fn new(page_width_pt: f32, page_height_pt: f32) -> Self {
        Self {
            page_width_pt,
            page_height_pt,
            pages: Vec::new(),
            metrics: ApproximateFontMetrics,
        }
    }

    /// A print painter for a US Letter page.
    #[must_use]
    pub const fn letter() -> Self {
        Self::new(DEFAULT_PAGE_WIDTH_PT, DEFAULT_PAGE_HEIGHT_PT)
    }
}

impl Default for PrintPainter<ApproximateFontMetrics> {
    fn default() -> Self {
        Self::letter()
    }
}

impl<M: FontMetrics> PrintPainter<M> {
    /// Open a new page; subsequent commands record onto it.
    pub fn start_page(&mut self) {
        self.pages.push(DisplayList::new());
    }

    /// The recorded pages, one command list per page, in point units.
    #[must_use]
    pub fn pages(&self) -> &[DisplayList] {
        &self.pages
    }

    /// Number of pages recorded so far.
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn record(&mut self, command: DisplayCommand) {
        debug_assert!(!self.pages.is_empty(), "drawing before start_page");
        if let Some(page) = self.pages.last_mut() {
            page.push(command);
        }
    }

    fn scale_rect(&self, rect: Rect) -> Rect {
        Rect {
            x: rect.x * POINTS_PER_PIXEL,
            y: rect.y * POINTS_PER_PIXEL,
            width: rect.width * POINTS_PER_PIXEL,
            height: rect.height * POINTS_PER_PIXEL,
        }
    }
}

impl<M: FontMetrics> Painter for PrintPainter<M> {
    fn begin(&mut self, _clip: Rect) {}

    fn end(&mut self) {}

    fn set_clip(&mut self, clip: Option<Rect>) {
        let clip = clip.map(|c| self.scale_rect(c));
        self.record(DisplayCommand::SetClip { clip });
    }

    fn draw_text(&mut self, x: f32, y: f32, text: &str, style: &FontStyle, color: ColorValue) {
        self.record(DisplayCommand::DrawText {
            x: x * POINTS_PER_PIXEL,
            y: y * POINTS_PER_PIXEL,
            text: text.to_string(),
            style: *style,
            color,
        });
    }

    fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, color: ColorValue) {
        self.record(DisplayCommand::DrawLine {
            x1: x1 * POINTS_PER_PIXEL,
            y1: y1 * POINTS_PER_PIXEL,
            x2: x2 * POINTS_PER_PIXEL,
            y2: y2 * POINTS_PER_PIXEL,
            color,
        });
    }

    fn fill_rect(&mut self, rect: Rect, color: ColorValue) {
        let rect = self.scale_rect(rect);
        self.record(DisplayCommand::FillRect { rect, color });
    }

    fn draw_rect(&mut self, rect: Rect, color: ColorValue) {
        let rect = self.scale_rect(rect);
        self.record(DisplayCommand::DrawRect { rect, color });
    }

    fn draw_border(&mut self, rect: Rect, width: f32, style: BorderStyle, color: ColorValue) {
        let rect = self.scale_rect(rect);
        self.record(DisplayCommand::DrawBorder {
            rect,
            width: width * POINTS_PER_PIXEL,
            style,
            color,
        });
    }

    fn draw_background(&mut self, rect: Rect, color: ColorValue) {
        let rect = self.scale_rect(rect);
        self.record(DisplayCommand::DrawBackground { rect, color });
    }

    fn draw_image(&mut self, rect: Rect, src: &str) {
        let rect = self.scale_rect(rect);
        self.record(DisplayCommand::DrawImage {
            rect,
            src: src.to_string(),
        });
    }

    fn metrics(&self) -> &dyn FontMetrics {
        &self.metrics
    }

    fn pixel_size(&self) -> f32 {
        POINTS_PER_PIXEL
    }

    fn page_extents(&self) -> Option<(f32, f32)> {
        Some((
            self.page_width_pt / POINTS_PER_PIXEL,
            self.page_height_pt / POINTS_PER_PIXEL,
        ))
    }
}
