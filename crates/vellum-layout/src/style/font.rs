//! Font style flags and the seven-step legacy size scale.

use serde::Serialize;

/// Pixel sizes for the legacy `<font size=1..7>` scale. Index with
/// `size - 1`. Size 3 is the document default.
const SIZE_SCALE_PX: [f32; 7] = [10.0, 13.0, 16.0, 18.0, 24.0, 32.0, 48.0];

/// The default font size step.
pub const DEFAULT_FONT_SIZE: u8 = 3;

/// The style of one run of text: the legacy bitmask reimagined as a plain
/// flags struct. Deltas accumulate as inline tags are entered; each new
/// text run copies the resolved style at creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FontStyle {
    /// Font size step on the 1..=7 scale.
    pub size: u8,
    /// Bold weight (`<b>`, `<strong>`, headings).
    pub bold: bool,
    /// Italic slant (`<i>`, `<em>`, `<cite>`, `<address>`).
    pub italic: bool,
    /// Underline (`<u>`, links).
    pub underline: bool,
    /// Strike-through (`<strike>`, `<s>`).
    pub strikeout: bool,
    /// Fixed-pitch face (`<tt>`, `<pre>`, `<code>`, `<kbd>`).
    pub fixed: bool,
    /// Subscript baseline shift.
    pub subscript: bool,
    /// Superscript baseline shift.
    pub superscript: bool,
}

impl FontStyle {
    /// The document default style: size 3, no decoration.
    pub const DEFAULT: Self = Self {
        size: DEFAULT_FONT_SIZE,
        bold: false,
        italic: false,
        underline: false,
        strikeout: false,
        fixed: false,
        subscript: false,
        superscript: false,
    };

    /// The size step clamped to the legal 1..=7 range.
    #[must_use]
    pub const fn clamped_size(self) -> u8 {
        if self.size < 1 {
            1
        } else if self.size > 7 {
            7
        } else {
            self.size
        }
    }

    /// Pixel size for this style's size step.
    #[must_use]
    pub fn size_px(self) -> f32 {
        let mut px = SIZE_SCALE_PX[(self.clamped_size() - 1) as usize];
        // Sub/superscripts render smaller, as legacy engines did.
        if self.subscript || self.superscript {
            px *= 0.8;
        }
        px
    }

    /// Adjust the size step by a relative amount (`<font size=+1>`),
    /// clamping to the scale.
    #[must_use]
    pub fn with_size_delta(mut self, delta: i32) -> Self {
        let size = i32::from(self.size) + delta;
        self.size = size.clamp(1, 7).try_into().unwrap_or(DEFAULT_FONT_SIZE);
        self
    }

    /// Set the absolute size step (`<font size=5>`), clamping to the scale.
    #[must_use]
    pub fn with_size(mut self, size: i32) -> Self {
        self.size = size.clamp(1, 7).try_into().unwrap_or(DEFAULT_FONT_SIZE);
        self
    }
}

impl Default for FontStyle {
    fn default() -> Self {
        Self::DEFAULT
    }
}
