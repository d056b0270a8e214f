//! Software rasterizer for headless output.
//!
//! Executes a `DisplayList` to a pixel buffer using fontdue for text
//! rasterization. The renderer knows nothing about markup or layout; it
//! simply executes drawing commands from the display list, which is the
//! screen painter backend's second half.

use std::collections::HashMap;
use std::path::Path;

use anyhow::Result;
use fontdue::{Font, FontSettings};
use image::{ImageBuffer, Rgba, RgbaImage};
use vellum_layout::paint::{BorderStyle, DisplayCommand, DisplayList};
use vellum_layout::style::{ColorValue, FontStyle};
use vellum_layout::tree::Rect;

use crate::font_metrics::FontdueFontMetrics;
use crate::images::LoadedImage;

/// Common system font paths to search for a default (regular) font.
const FONT_SEARCH_PATHS: &[&str] = &[
    // macOS
    "/System/Library/Fonts/Helvetica.ttc",
    "/System/Library/Fonts/SFNS.ttf",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    // Linux
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
    // Windows
    "C:\\Windows\\Fonts\\arial.ttf",
    "C:\\Windows\\Fonts\\segoeui.ttf",
];

/// System font paths for bold variants.
const FONT_BOLD_SEARCH_PATHS: &[&str] = &[
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    "/Library/Fonts/Arial Bold.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSansBold.ttf",
    "C:\\Windows\\Fonts\\arialbd.ttf",
];

/// System font paths for italic variants.
const FONT_ITALIC_SEARCH_PATHS: &[&str] = &[
    "/System/Library/Fonts/Supplemental/Arial Italic.ttf",
    "/Library/Fonts/Arial Italic.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Oblique.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Oblique.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Italic.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSansOblique.ttf",
    "C:\\Windows\\Fonts\\ariali.ttf",
];

/// System font paths for bold-italic variants.
const FONT_BOLD_ITALIC_SEARCH_PATHS: &[&str] = &[
    "/System/Library/Fonts/Supplemental/Arial Bold Italic.ttf",
    "/Library/Fonts/Arial Bold Italic.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-BoldOblique.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-BoldOblique.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-BoldItalic.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSansBoldOblique.ttf",
    "C:\\Windows\\Fonts\\arialbi.ttf",
];

/// Placeholder fill for images the engine could not resolve.
const PLACEHOLDER_FILL: ColorValue = ColorValue::rgb(224, 224, 224);
const PLACEHOLDER_EDGE: ColorValue = ColorValue::rgb(128, 128, 128);

/// Software renderer that executes a display list to a pixel buffer.
pub struct Renderer {
    /// RGBA pixel buffer
    buffer: RgbaImage,
    width: u32,
    height: u32,
    /// Regular font for text rendering (None if no font found)
    font: Option<Font>,
    font_bold: Option<Font>,
    font_italic: Option<Font>,
    font_bold_italic: Option<Font>,
    /// Decoded images keyed by src attribute, from the engine.
    images: HashMap<String, LoadedImage>,
    /// Active clip rectangle, if any.
    clip: Option<Rect>,
}

impl Renderer {
    /// Create a renderer with the given dimensions and the decoded image
    /// store (clone of [`crate::Engine::images`]).
    #[must_use]
    pub fn new(width: u32, height: u32, images: HashMap<String, LoadedImage>) -> Self {
        let buffer = ImageBuffer::from_pixel(width, height, Rgba([255, 255, 255, 255]));

        let font = Self::load_font_from_paths(FONT_SEARCH_PATHS);
        let font_bold = Self::load_font_from_paths(FONT_BOLD_SEARCH_PATHS);
        let font_italic = Self::load_font_from_paths(FONT_ITALIC_SEARCH_PATHS);
        let font_bold_italic = Self::load_font_from_paths(FONT_BOLD_ITALIC_SEARCH_PATHS);

        if font.is_none() {
            vellum_common::warning::warn_once(
                "Renderer",
                "no system font found; text will not be rasterized",
            );
        }

        Self {
            buffer,
            width,
            height,
            font,
            font_bold,
            font_italic,
            font_bold_italic,
            images,
            clip: None,
        }
    }

    /// Try to load a font from a list of filesystem paths.
    fn load_font_from_paths(paths: &[&str]) -> Option<Font> {
        for path in paths {
            if let Ok(data) = std::fs::read(path) {
                if let Ok(font) = Font::from_bytes(data, FontSettings::default()) {
                    return Some(font);
                }
            }
        }
        None
    }

    /// A fontdue-backed metrics provider using the same faces this
    /// renderer rasterizes with, for installing on the engine.
    #[must_use]
    pub fn metrics(&self) -> Option<FontdueFontMetrics> {
        self.font.clone().map(|regular| {
            FontdueFontMetrics::new(
                regular,
                self.font_bold.clone(),
                self.font_italic.clone(),
                self.font_bold_italic.clone(),
            )
        })
    }

    /// Execute a display list, drawing all commands to the pixel buffer
    /// in order (back to front).
    pub fn render(&mut self, display_list: &DisplayList) {
        for command in display_list.commands() {
            self.execute_command(command);
        }
    }

    fn execute_command(&mut self, command: &DisplayCommand) {
        match command {
            DisplayCommand::FillRect { rect, color }
            | DisplayCommand::DrawBackground { rect, color } => self.fill_rect(*rect, *color),
            DisplayCommand::DrawRect { rect, color } => self.stroke_rect(*rect, 1.0, *color, *color),
            DisplayCommand::DrawBorder {
                rect,
                width,
                style,
                color,
            } => self.draw_border(*rect, *width, *style, *color),
            DisplayCommand::DrawLine { x1, y1, x2, y2, color } => {
                self.draw_line(*x1, *y1, *x2, *y2, *color);
            }
            DisplayCommand::DrawText {
                x,
                y,
                text,
                style,
                color,
            } => self.draw_text(text, *x, *y, style, *color),
            DisplayCommand::DrawImage { rect, src } => self.draw_image(src, *rect),
            DisplayCommand::SetClip { clip } => self.clip = *clip,
        }
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_possible_wrap)]
    fn put_pixel(&mut self, x: i32, y: i32, pixel: Rgba<u8>) {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return;
        }
        if let Some(clip) = &self.clip {
            let fx = x as f32;
            let fy = y as f32;
            if fx < clip.x || fx >= clip.x + clip.width || fy < clip.y || fy >= clip.y + clip.height
            {
                return;
            }
        }
        self.buffer.put_pixel(x as u32, y as u32, pixel);
    }

    #[allow(clippy::cast_possible_truncation)]
    fn fill_rect(&mut self, rect: Rect, color: ColorValue) {
        let rgba = Rgba([color.r, color.g, color.b, color.a]);
        let x0 = rect.x as i32;
        let y0 = rect.y as i32;
        let x1 = (rect.x + rect.width).ceil() as i32;
        let y1 = (rect.y + rect.height).ceil() as i32;
        for y in y0..y1 {
            for x in x0..x1 {
                self.put_pixel(x, y, rgba);
            }
        }
    }

    /// Stroke the four edges of a rectangle, with separate colors for the
    /// top/left and bottom/right edges (how bevels are made).
    fn stroke_rect(&mut self, rect: Rect, width: f32, top_left: ColorValue, bottom_right: ColorValue) {
        let w = width.max(1.0);
        self.fill_rect(Rect::new(rect.x, rect.y, rect.width, w), top_left);
        self.fill_rect(Rect::new(rect.x, rect.y, w, rect.height), top_left);
        self.fill_rect(
            Rect::new(rect.x, rect.y + rect.height - w, rect.width, w),
            bottom_right,
        );
        self.fill_rect(
            Rect::new(rect.x + rect.width - w, rect.y, w, rect.height),
            bottom_right,
        );
    }

    /// The legacy beveled border: light on two edges, dark on the other
    /// two, flat for solid.
    fn draw_border(&mut self, rect: Rect, width: f32, style: BorderStyle, color: ColorValue) {
        match style {
            BorderStyle::Solid => self.stroke_rect(rect, width, color, color),
            BorderStyle::Outset => self.stroke_rect(rect, width, color.lighter(), color.darker()),
            BorderStyle::Inset => self.stroke_rect(rect, width, color.darker(), color.lighter()),
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, color: ColorValue) {
        let rgba = Rgba([color.r, color.g, color.b, color.a]);
        let dx = x2 - x1;
        let dy = y2 - y1;
        let steps = dx.abs().max(dy.abs()).ceil().max(1.0);
        let mut i = 0.0;
        while i <= steps {
            let x = (dx / steps).mul_add(i, x1);
            let y = (dy / steps).mul_add(i, y1);
            self.put_pixel(x as i32, y as i32, rgba);
            i += 1.0;
        }
    }

    /// Draw an image scaled to the destination rectangle with
    /// nearest-neighbor sampling, or the gray placeholder when the source
    /// never resolved.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_possible_wrap)]
    fn draw_image(&mut self, src: &str, rect: Rect) {
        let Some(img) = self.images.get(src).cloned() else {
            self.fill_rect(rect, PLACEHOLDER_FILL);
            self.stroke_rect(rect, 1.0, PLACEHOLDER_EDGE, PLACEHOLDER_EDGE);
            return;
        };

        let dest_x = rect.x as i32;
        let dest_y = rect.y as i32;
        let dest_w = rect.width as u32;
        let dest_h = rect.height as u32;
        let src_w = img.width();
        let src_h = img.height();
        if src_w == 0 || src_h == 0 || dest_w == 0 || dest_h == 0 {
            return;
        }

        for dy in 0..dest_h {
            for dx in 0..dest_w {
                // Nearest-neighbor sampling
                let sx = ((u64::from(dx) * u64::from(src_w)) / u64::from(dest_w))
                    .min(u64::from(src_w) - 1) as u32;
                let sy = ((u64::from(dy) * u64::from(src_h)) / u64::from(dest_h))
                    .min(u64::from(src_h) - 1) as u32;
                let src_idx = ((sy * src_w + sx) * 4) as usize;

                let data = img.rgba_data();
                let sa = data[src_idx + 3];
                if sa == 0 {
                    continue;
                }
                let fg = Rgba([data[src_idx], data[src_idx + 1], data[src_idx + 2], sa]);
                let px = dest_x + dx as i32;
                let py = dest_y + dy as i32;
                if sa == 255 {
                    self.put_pixel(px, py, fg);
                } else if px >= 0 && py >= 0 && (px as u32) < self.width && (py as u32) < self.height
                {
                    let bg = *self.buffer.get_pixel(px as u32, py as u32);
                    self.put_pixel(px, py, alpha_blend(fg, bg, sa));
                }
            }
        }
    }

    /// Draw one glyph run; `y` is the baseline.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_possible_wrap)]
    fn draw_text(&mut self, text: &str, x: f32, y: f32, style: &FontStyle, color: ColorValue) {
        let is_bold = style.bold;
        let is_italic = style.italic;
        let font = match (is_bold, is_italic) {
            (true, true) => self
                .font_bold_italic
                .as_ref()
                .or(self.font_bold.as_ref())
                .or(self.font.as_ref()),
            (true, false) => self.font_bold.as_ref().or(self.font.as_ref()),
            (false, true) => self.font_italic.as_ref().or(self.font.as_ref()),
            (false, false) => self.font.as_ref(),
        };
        let Some(font) = font else { return };
        let font = font.clone();

        let rgba = Rgba([color.r, color.g, color.b, color.a]);
        let size = style.size_px();
        let mut cursor_x = x;

        for ch in text.chars() {
            if ch.is_control() {
                continue;
            }
            let (metrics, bitmap) = font.rasterize(ch, size);
            let glyph_x = cursor_x as i32 + metrics.xmin;
            let glyph_y = y as i32 - metrics.ymin - metrics.height as i32;

            for gy in 0..metrics.height {
                for gx in 0..metrics.width {
                    let alpha = bitmap[gy * metrics.width + gx];
                    if alpha == 0 {
                        continue;
                    }
                    let px = glyph_x + gx as i32;
                    let py = glyph_y + gy as i32;
                    if px >= 0 && py >= 0 && (px as u32) < self.width && (py as u32) < self.height {
                        let bg = *self.buffer.get_pixel(px as u32, py as u32);
                        self.put_pixel(px, py, alpha_blend(rgba, bg, alpha));
                    }
                }
            }
            cursor_x += metrics.advance_width;
        }
    }

    /// Save the rendered image to a file.
    ///
    /// # Errors
    /// Returns an error if the image cannot be saved to the given path.
    pub fn save(&self, path: &Path) -> Result<()> {
        self.buffer
            .save(path)
            .map_err(|e| anyhow::anyhow!("failed to save output to '{}': {e}", path.display()))?;
        Ok(())
    }

    /// The rendered RGBA buffer.
    #[must_use]
    pub const fn buffer(&self) -> &RgbaImage {
        &self.buffer
    }
}

/// Alpha blend a foreground color onto a background color.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn alpha_blend(fg: Rgba<u8>, bg: Rgba<u8>, alpha: u8) -> Rgba<u8> {
    let a = f32::from(alpha) / 255.0;
    let inv_a = 1.0 - a;
    Rgba([
        f32::from(fg[0]).mul_add(a, f32::from(bg[0]) * inv_a) as u8,
        f32::from(fg[1]).mul_add(a, f32::from(bg[1]) * inv_a) as u8,
        f32::from(fg[2]).mul_add(a, f32::from(bg[2]) * inv_a) as u8,
        255,
    ])
}
