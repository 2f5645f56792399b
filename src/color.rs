//! RGBW pixel representation and transmit-order handling.
//!
//! The bus protocol exposes pixels as raw bytes in strip transmit order,
//! which is selected by a 16-bit pixel type word. [`PixelLayout`] decodes
//! that word into per-channel byte offsets; [`Pixel`] holds the logical
//! color and converts to and from bytes explicitly (no reinterpretation).

use smart_leds::{RGBW, White};

/// RGBW color type used by `smart-leds` compatible strip drivers.
pub type Rgbw = RGBW<u8>;

/// A single RGBW pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub w: u8,
}

impl Pixel {
    /// All channels off.
    pub const OFF: Self = Self::new(0, 0, 0, 0);

    /// Create a pixel from its four channel intensities.
    pub const fn new(r: u8, g: u8, b: u8, w: u8) -> Self {
        Self { r, g, b, w }
    }
}

impl From<Pixel> for Rgbw {
    fn from(pixel: Pixel) -> Self {
        Self {
            r: pixel.r,
            g: pixel.g,
            b: pixel.b,
            a: White(pixel.w),
        }
    }
}

impl From<Rgbw> for Pixel {
    fn from(color: Rgbw) -> Self {
        Self::new(color.r, color.g, color.b, color.a.0)
    }
}

/// Transmit-order byte layout of one pixel, decoded from the pixel type word.
///
/// The low byte of the type word packs four 2-bit channel offsets:
/// `0bWWRRGGBB`. A strip without a white channel encodes the white offset
/// equal to the red offset, giving a 3-byte pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelLayout {
    r: u8,
    g: u8,
    b: u8,
    w: u8,
}

impl PixelLayout {
    /// Decode a layout from the 16-bit pixel type word.
    ///
    /// The high byte carries the signalling rate and is ignored here.
    pub const fn from_type_word(word: u16) -> Self {
        let low = word as u8;
        Self {
            w: (low >> 6) & 0b11,
            r: (low >> 4) & 0b11,
            g: (low >> 2) & 0b11,
            b: low & 0b11,
        }
    }

    /// Number of bytes one pixel occupies on the wire (3 or 4).
    pub const fn bytes_per_pixel(self) -> u8 {
        if self.w == self.r { 3 } else { 4 }
    }

    /// Read the channel byte at `offset` within the transmitted pixel.
    pub const fn byte_of(self, pixel: Pixel, offset: u8) -> u8 {
        // Red is checked first so 3-byte layouts (w == r) never hit white.
        if offset == self.r {
            pixel.r
        } else if offset == self.g {
            pixel.g
        } else if offset == self.b {
            pixel.b
        } else {
            pixel.w
        }
    }

    /// Write the channel byte at `offset` within the transmitted pixel.
    pub const fn set_byte(self, pixel: &mut Pixel, offset: u8, value: u8) {
        if offset == self.r {
            pixel.r = value;
        } else if offset == self.g {
            pixel.g = value;
        } else if offset == self.b {
            pixel.b = value;
        } else {
            pixel.w = value;
        }
    }
}
