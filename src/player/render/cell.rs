//! Pixel and terminal cell types.
//!
//! A terminal cell shows two stacked source pixels using the lower
//! half-block glyph: the cell background paints the top half and the
//! foreground (the glyph itself) paints the bottom half.

use image::{Rgb, RgbImage};

/// A single RGB pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Pixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Pixel {
    pub const BLACK: Pixel = Pixel::new(0, 0, 0);
    pub const WHITE: Pixel = Pixel::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Euclidean distance in RGB space, `0.0..=441.67`.
    ///
    /// Used as a change-magnitude heuristic when diffing frames.
    pub fn distance(self, other: Pixel) -> f64 {
        let dr = f64::from(self.r) - f64::from(other.r);
        let dg = f64::from(self.g) - f64::from(other.g);
        let db = f64::from(self.b) - f64::from(other.b);
        (dr * dr + dg * dg + db * db).sqrt()
    }
}

impl From<Rgb<u8>> for Pixel {
    fn from(rgb: Rgb<u8>) -> Self {
        let [r, g, b] = rgb.0;
        Self { r, g, b }
    }
}

impl From<&Rgb<u8>> for Pixel {
    fn from(rgb: &Rgb<u8>) -> Self {
        Self::from(*rgb)
    }
}

/// Free-function form of [`Pixel::distance`].
#[inline]
pub fn distance(p1: Pixel, p2: Pixel) -> f64 {
    p1.distance(p2)
}

/// One character cell: `top` is the background, `bottom` the foreground.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct TerminalCell {
    pub top: Pixel,
    pub bottom: Pixel,
}

impl TerminalCell {
    pub const fn new(top: Pixel, bottom: Pixel) -> Self {
        Self { top, bottom }
    }

    /// Read the cell at (`row`, `col`) out of a decoded frame.
    ///
    /// Cell row `n` covers pixel rows `2n` and `2n + 1`. When the frame height
    /// is odd the last pixel row is paired with itself.
    pub fn from_frame(frame: &RgbImage, row: u32, col: u32) -> Self {
        let y = row * 2;
        let top = Pixel::from(frame.get_pixel(col, y));
        let bottom = if y + 1 < frame.height() {
            Pixel::from(frame.get_pixel(col, y + 1))
        } else {
            top
        };
        Self { top, bottom }
    }

    /// Whether either half moved at least `threshold` away from `other`.
    #[inline]
    pub fn is_dirty(&self, other: &TerminalCell, threshold: f64) -> bool {
        self.top.distance(other.top) >= threshold || self.bottom.distance(other.bottom) >= threshold
    }
}
