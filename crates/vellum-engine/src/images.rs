//! Decoded image resources.
//!
//! The engine owns no network stack: image bytes arrive from the host
//! through the resource stream contract, are decoded here, and are looked
//! up by `src` when the rasterizer executes `DrawImage` commands.

/// Decoded image data for a resolved image resource.
///
/// Contains the decoded RGBA pixel data and intrinsic dimensions.
#[derive(Clone)]
pub struct LoadedImage {
    /// Intrinsic width of the image in pixels.
    width: u32,
    /// Intrinsic height of the image in pixels.
    height: u32,
    /// Raw RGBA pixel data (width * height * 4 bytes).
    rgba_data: Vec<u8>,
}

impl LoadedImage {
    /// Create a new `LoadedImage` from decoded RGBA pixel data.
    ///
    /// `rgba_data` must be `width * height * 4` bytes.
    #[must_use]
    pub fn new(width: u32, height: u32, rgba_data: Vec<u8>) -> Self {
        debug_assert_eq!(rgba_data.len(), (width * height * 4) as usize);
        Self {
            width,
            height,
            rgba_data,
        }
    }

    /// Decode raw resource bytes into a `LoadedImage`.
    ///
    /// Returns `None` for formats the decoder does not recognize; the
    /// image box then keeps its placeholder.
    #[must_use]
    pub fn decode(bytes: &[u8]) -> Option<Self> {
        let decoded = image::load_from_memory(bytes).ok()?;
        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();
        Some(Self::new(width, height, rgba.into_raw()))
    }

    /// Intrinsic width of the image in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Intrinsic height of the image in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA pixel data.
    #[must_use]
    pub fn rgba_data(&self) -> &[u8] {
        &self.rgba_data
    }
}
