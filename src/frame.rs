//! Fixed-capacity RGBW frame buffer with register-style byte addressing.
//!
//! LED register `n` (1-based) maps onto bytes
//! `(n - 1) * bytes_per_pixel .. n * bytes_per_pixel` of the buffer. The
//! active byte span is `led_count * bytes_per_pixel`; byte cursors wrap back
//! to register 1 past the last configured LED.

use crate::color::{Pixel, PixelLayout};

/// Frame buffer sized to the maximum supported LED count.
///
/// The logical length (`led_count`) never exceeds `MAX_LEDS`; out-of-range
/// pixel indices are rejected, never written.
#[derive(Debug, Clone, Copy)]
pub struct FrameBuffer<const MAX_LEDS: usize> {
    pixels: [Pixel; MAX_LEDS],
    layout: PixelLayout,
    led_count: u8,
}

impl<const MAX_LEDS: usize> FrameBuffer<MAX_LEDS> {
    /// Capacity as a register count. Capacities above 255 are not
    /// addressable by the one-byte bus protocol.
    pub const CAPACITY: u8 = {
        assert!(MAX_LEDS > 0 && MAX_LEDS <= 255);
        MAX_LEDS as u8
    };

    /// Create a buffer with the first `led_count` pixels set to `initial`.
    pub const fn new(layout: PixelLayout, led_count: u8, initial: Pixel) -> Self {
        let count = if led_count > Self::CAPACITY {
            Self::CAPACITY
        } else {
            led_count
        };
        let mut pixels = [Pixel::OFF; MAX_LEDS];
        let mut i = 0;
        while i < count as usize {
            pixels[i] = initial;
            i += 1;
        }
        Self {
            pixels,
            layout,
            led_count: count,
        }
    }

    /// Configured (logical) LED count.
    pub const fn led_count(&self) -> u8 {
        self.led_count
    }

    /// Update the logical LED count, clamping to capacity.
    ///
    /// Returns the count actually applied.
    pub fn set_led_count(&mut self, count: u8) -> u8 {
        self.led_count = count.min(Self::CAPACITY);
        self.led_count
    }

    /// Current transmit-order layout.
    pub const fn layout(&self) -> PixelLayout {
        self.layout
    }

    /// Replace the transmit-order layout (changes the byte mapping).
    pub const fn set_layout(&mut self, layout: PixelLayout) {
        self.layout = layout;
    }

    /// Size of the active byte span (`led_count * bytes_per_pixel`).
    pub const fn byte_len(&self) -> usize {
        self.led_count as usize * self.layout.bytes_per_pixel() as usize
    }

    /// Read the byte at `pos` within the active span.
    ///
    /// Positions outside the span read as zero.
    pub fn read_byte(&self, pos: usize) -> u8 {
        let bpp = self.layout.bytes_per_pixel() as usize;
        let index = pos / bpp;
        if index >= self.led_count as usize {
            return 0;
        }
        self.layout.byte_of(self.pixels[index], (pos % bpp) as u8)
    }

    /// Write the byte at `pos` within the active span.
    ///
    /// Positions outside the span are ignored.
    pub fn write_byte(&mut self, pos: usize, value: u8) {
        let bpp = self.layout.bytes_per_pixel() as usize;
        let index = pos / bpp;
        if index >= self.led_count as usize {
            return;
        }
        self.layout
            .set_byte(&mut self.pixels[index], (pos % bpp) as u8, value);
    }

    /// Get the pixel at `index`, or `None` beyond the configured count.
    pub fn pixel(&self, index: u8) -> Option<Pixel> {
        if index >= self.led_count {
            return None;
        }
        Some(self.pixels[index as usize])
    }

    /// Set the pixel at `index`.
    ///
    /// Returns `false` (and writes nothing) beyond the configured count.
    pub fn set_pixel(&mut self, index: u8, pixel: Pixel) -> bool {
        if index >= self.led_count {
            return false;
        }
        self.pixels[index as usize] = pixel;
        true
    }

    /// Fill every configured pixel with one color.
    pub fn fill(&mut self, pixel: Pixel) {
        for led in &mut self.pixels[..self.led_count as usize] {
            *led = pixel;
        }
    }

    /// Zero every configured pixel.
    pub fn clear(&mut self) {
        self.fill(Pixel::OFF);
    }

    /// The configured pixels as a slice.
    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels[..self.led_count as usize]
    }

    /// The configured pixels as a mutable slice.
    pub fn pixels_mut(&mut self) -> &mut [Pixel] {
        &mut self.pixels[..self.led_count as usize]
    }
}
