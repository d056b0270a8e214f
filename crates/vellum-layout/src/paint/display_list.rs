//! Display List - a sequence of drawing commands.
//!
//! The display list is the output of the screen painting path. It contains
//! every drawing command needed to render a region, in back-to-front
//! order, so an executor can simply iterate and rasterize. It is also the
//! observable surface the test suite asserts on.

use serde::Serialize;

use super::painter::BorderStyle;
use crate::style::{ColorValue, FontStyle};
use crate::tree::Rect;

/// A single drawing command, recorded in painting order.
#[derive(Debug, Clone, Serialize)]
pub enum DisplayCommand {
    /// Fill a rectangle with a solid color.
    FillRect {
        /// Target rectangle.
        rect: Rect,
        /// Fill color.
        color: ColorValue,
    },

    /// Outline a rectangle with a one-pixel stroke.
    DrawRect {
        /// Target rectangle.
        rect: Rect,
        /// Stroke color.
        color: ColorValue,
    },

    /// Draw a beveled or flat border around a rectangle.
    DrawBorder {
        /// Target rectangle.
        rect: Rect,
        /// Border thickness.
        width: f32,
        /// Bevel style.
        style: BorderStyle,
        /// Base color (bevels derive their light/dark edges from it).
        color: ColorValue,
    },

    /// Draw a one-pixel line.
    DrawLine {
        /// Start x.
        x1: f32,
        /// Start y.
        y1: f32,
        /// End x.
        x2: f32,
        /// End y.
        y2: f32,
        /// Line color.
        color: ColorValue,
    },

    /// Draw one glyph run at a baseline position.
    DrawText {
        /// Left edge of the run.
        x: f32,
        /// Baseline.
        y: f32,
        /// The text.
        text: String,
        /// Font style of the run.
        style: FontStyle,
        /// Text color.
        color: ColorValue,
    },

    /// Fill a background region.
    DrawBackground {
        /// Target rectangle.
        rect: Rect,
        /// Background color.
        color: ColorValue,
    },

    /// Draw an image resource; the executor resolves `src` or substitutes
    /// a placeholder.
    DrawImage {
        /// Target rectangle.
        rect: Rect,
        /// The image source key.
        src: String,
    },

    /// Replace the clip rectangle (`None` restores the pass clip).
    SetClip {
        /// The new clip, in engine pixels.
        clip: Option<Rect>,
    },
}

/// A list of drawing commands in painting order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DisplayList {
    commands: Vec<DisplayCommand>,
}

impl DisplayList {
    /// Create an empty display list.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    /// Add a command to the display list.
    pub fn push(&mut self, command: DisplayCommand) {
        self.commands.push(command);
    }

    /// The commands in painting order.
    #[must_use]
    pub fn commands(&self) -> &[DisplayCommand] {
        &self.commands
    }

    /// Number of recorded commands.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.commands.len()
    }

    /// True if nothing was recorded.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Drop every recorded command.
    pub fn clear(&mut self) {
        self.commands.clear();
    }
}
