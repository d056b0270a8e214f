//! Style value types shared between the engine's element stack and the
//! box tree.
//!
//! # Module Structure
//!
//! - [`color`] - color parsing for legacy color attributes
//! - [`font`] - font style flags and the seven-step size scale
//!
//! The remaining types here describe paragraph-level and structural style:
//! horizontal/vertical alignment, the flow (paragraph) style, and the
//! display class ordering that drives the element stack's asymmetric pop
//! rule.

pub mod color;
pub mod font;

pub use color::ColorValue;
pub use font::{DEFAULT_FONT_SIZE, FontStyle};

use serde::Serialize;
use strum_macros::Display;

/// An explicit dimension: absolute pixels or a percentage of the
/// container's propagated max width. Percent-sized boxes recompute their
/// pixel width on every reflow.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Length {
    /// Absolute pixel length.
    Pixels(f32),
    /// Percentage of the container width (0..=100).
    Percent(u8),
}

impl Length {
    /// Resolve against a container width.
    #[must_use]
    pub fn resolve(self, container_width: f32) -> f32 {
        match self {
            Self::Pixels(px) => px,
            Self::Percent(pct) => f32::from(pct) * container_width / 100.0,
        }
    }
}

/// Horizontal alignment of flow content or of a box within its container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, Serialize)]
pub enum HAlign {
    /// No explicit alignment; inherit or fall back to left.
    #[default]
    None,
    /// Flush left.
    Left,
    /// Centered.
    Center,
    /// Flush right.
    Right,
}

impl HAlign {
    /// Parse an `align=` attribute value.
    #[must_use]
    pub fn from_attribute(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "left" => Self::Left,
            "center" | "middle" => Self::Center,
            "right" => Self::Right,
            _ => Self::None,
        }
    }
}

/// Vertical alignment of a box on a line or of content within a table cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, Serialize)]
pub enum VAlign {
    /// Align tops.
    Top,
    /// Center on the line (the table-cell default).
    #[default]
    Middle,
    /// Align bottoms / baselines.
    Bottom,
}

impl VAlign {
    /// Parse a `valign=` attribute value.
    #[must_use]
    pub fn from_attribute(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "top" => Self::Top,
            "bottom" | "baseline" => Self::Bottom,
            _ => Self::Middle,
        }
    }
}

/// The paragraph "kind" of a flow container, affecting default font and
/// spacing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum FlowStyle {
    /// An ordinary paragraph.
    #[default]
    Normal,
    /// A heading; the payload is the level 1..=6.
    Heading(u8),
    /// `<address>`: italic body text.
    Address,
    /// `<pre>`: fixed-pitch, no wrapping.
    Pre,
    /// A list item with a gutter for its marker.
    ListItem,
}

impl FlowStyle {
    /// The font style this paragraph kind imposes on its default text.
    #[must_use]
    pub fn base_font(self) -> FontStyle {
        let mut font = FontStyle::DEFAULT;
        match self {
            Self::Heading(level) => {
                font.bold = true;
                // h1 is two steps above the default, h6 two below it.
                font.size = match level {
                    1 => 6,
                    2 => 5,
                    3 => 4,
                    4 => 3,
                    5 => 2,
                    _ => 1,
                };
            }
            Self::Address => font.italic = true,
            Self::Pre => font.fixed = true,
            Self::Normal | Self::ListItem => {}
        }
        font
    }

    /// Vertical gap inserted above and below a paragraph of this kind.
    #[must_use]
    pub fn vertical_spacing(self) -> f32 {
        match self {
            Self::Heading(_) => 10.0,
            Self::Pre => 8.0,
            _ => 6.0,
        }
    }
}

/// The display class of an open element, ordered by structural "height".
///
/// The ordering is load-bearing: closing a named tag may implicitly pop
/// frames of class less than or equal to its own, but must never cross a
/// frame of a strictly greater class it does not own. An inline close tag
/// can therefore never escape a table cell, while a block close tag may
/// sweep any inline frames above it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Display, Serialize)]
pub enum DisplayClass {
    /// Spans and other character-level formatting.
    Inline,
    /// Paragraph-level blocks (`p`, `div`, `h1..6`, `blockquote`, lists).
    Block,
    /// `<li>` and friends.
    ListItem,
    /// `<caption>`.
    TableCaption,
    /// `<tr>`.
    TableRow,
    /// `<td>`/`<th>`. Style queries stop here: style never crosses a cell
    /// boundary.
    TableCell,
    /// `<table>`. Alignment queries stop here.
    Table,
    /// The document root; nothing pops past it.
    Document,
}

impl DisplayClass {
    /// True if a style query (font, color) may continue past a frame of
    /// this class while walking the stack.
    #[must_use]
    pub fn passes_style(self) -> bool {
        self < Self::TableCell
    }

    /// True if an alignment query may continue past a frame of this class.
    #[must_use]
    pub fn passes_alignment(self) -> bool {
        self < Self::Table
    }
}

/// Which side an aligned (floating) box sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
pub enum FloatSide {
    /// Reserved margin on the left edge.
    Left,
    /// Reserved margin on the right edge.
    Right,
}

/// `<br clear=...>`: which float margins a line break must clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, Serialize)]
pub enum Clear {
    /// No clearing; break to the next line only.
    #[default]
    None,
    /// Drop below left-side floats.
    Left,
    /// Drop below right-side floats.
    Right,
    /// Drop below all floats.
    All,
}

impl Clear {
    /// Parse a `clear=` attribute value.
    #[must_use]
    pub fn from_attribute(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "left" => Self::Left,
            "right" => Self::Right,
            "all" | "both" => Self::All,
            _ => Self::None,
        }
    }
}
