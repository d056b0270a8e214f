//! Color values for legacy HTML attributes.

use serde::Serialize;

/// sRGB color represented as RGBA components.
///
/// Legacy HTML colors come from `color=`/`bgcolor=`/`text=`/`link=`
/// attributes: either a named color or a hex triplet, with or without the
/// leading `#` (authors routinely omitted it and engines tolerated that).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColorValue {
    /// Red channel (0-255)
    pub r: u8,
    /// Green channel (0-255)
    pub g: u8,
    /// Blue channel (0-255)
    pub b: u8,
    /// Alpha channel (0-255, 255 = fully opaque)
    pub a: u8,
}

impl ColorValue {
    /// Black (#000000)
    pub const BLACK: Self = Self { r: 0, g: 0, b: 0, a: 255 };

    /// White (#ffffff)
    pub const WHITE: Self = Self {
        r: 255,
        g: 255,
        b: 255,
        a: 255,
    };

    /// The default unvisited-link blue.
    pub const LINK_BLUE: Self = Self {
        r: 0,
        g: 0,
        b: 238,
        a: 255,
    };

    /// Construct an opaque color from components.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse a hex triplet, with or without the leading `#`.
    ///
    /// Both `#RGB` and `#RRGGBB` forms are accepted; the three-digit form
    /// replicates digits.
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        match hex.len() {
            3 => {
                let r = u8::from_str_radix(&hex[0..1].repeat(2), 16).ok()?;
                let g = u8::from_str_radix(&hex[1..2].repeat(2), 16).ok()?;
                let b = u8::from_str_radix(&hex[2..3].repeat(2), 16).ok()?;
                Some(Self::rgb(r, g, b))
            }
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                Some(Self::rgb(r, g, b))
            }
            _ => None,
        }
    }

    /// Look up one of the sixteen legacy named colors (plus the common
    /// aliases engines of this era recognized).
    #[must_use]
    pub fn from_named(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "black" => Some(Self::rgb(0, 0, 0)),
            "silver" => Some(Self::rgb(192, 192, 192)),
            "gray" | "grey" => Some(Self::rgb(128, 128, 128)),
            "white" => Some(Self::rgb(255, 255, 255)),
            "maroon" => Some(Self::rgb(128, 0, 0)),
            "red" => Some(Self::rgb(255, 0, 0)),
            "purple" => Some(Self::rgb(128, 0, 128)),
            "fuchsia" | "magenta" => Some(Self::rgb(255, 0, 255)),
            "green" => Some(Self::rgb(0, 128, 0)),
            "lime" => Some(Self::rgb(0, 255, 0)),
            "olive" => Some(Self::rgb(128, 128, 0)),
            "yellow" => Some(Self::rgb(255, 255, 0)),
            "navy" => Some(Self::rgb(0, 0, 128)),
            "blue" => Some(Self::rgb(0, 0, 255)),
            "teal" => Some(Self::rgb(0, 128, 128)),
            "aqua" | "cyan" => Some(Self::rgb(0, 255, 255)),
            "orange" => Some(Self::rgb(255, 165, 0)),
            "brown" => Some(Self::rgb(165, 42, 42)),
            "pink" => Some(Self::rgb(255, 192, 203)),
            _ => None,
        }
    }

    /// Parse a color attribute value: a named color first, then a hex
    /// triplet (with or without `#`). Unparseable values yield `None` and
    /// the caller keeps its current color.
    #[must_use]
    pub fn from_attribute(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::from_named(value).or_else(|| Self::from_hex(value))
    }

    /// Lighten toward white, for the raised edge of a beveled border.
    #[must_use]
    pub fn lighter(self) -> Self {
        Self::rgb(
            self.r.saturating_add(96),
            self.g.saturating_add(96),
            self.b.saturating_add(96),
        )
    }

    /// Darken toward black, for the sunken edge of a beveled border.
    #[must_use]
    pub fn darker(self) -> Self {
        Self::rgb(self.r / 2, self.g / 2, self.b / 2)
    }
}

impl Default for ColorValue {
    fn default() -> Self {
        Self::BLACK
    }
}
