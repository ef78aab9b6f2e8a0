//! ANSI escape sequence encoding.
//!
//! Converts grid coordinates and pixel colors to the raw control sequences
//! written to the terminal. Everything here is stateless; the `push_*`
//! variants append to an existing buffer so the render loop never allocates
//! per cell.

use std::fmt::Write;

use super::cell::Pixel;

/// Reset all SGR attributes.
pub const RESET: &str = "\x1b[0m";

/// Erase the whole screen.
pub const CLEAR_SCREEN: &str = "\x1b[2J";

/// Erase from the cursor to the end of the line.
pub const CLEAR_TO_EOL: &str = "\x1b[K";

/// Lower half block. Foreground paints the bottom half, background the top.
pub const HALF_BLOCK: char = '▄';

/// Append an absolute cursor move to `buf`.
///
/// # Arguments
/// * `col` - 0-indexed column
/// * `row` - 0-indexed row
pub fn push_cursor_move(buf: &mut String, col: usize, row: usize) {
    // Writing to a String cannot fail
    let _ = write!(buf, "\x1b[{};{}H", row + 1, col + 1);
}

/// Append a 24-bit SGR color sequence to `buf`.
///
/// # Arguments
/// * `pixel` - The color to select
/// * `is_background` - `true` for SGR 48 (background), `false` for SGR 38
pub fn push_color(buf: &mut String, pixel: Pixel, is_background: bool) {
    let selector = if is_background { 48 } else { 38 };
    let _ = write!(
        buf,
        "\x1b[{};2;{};{};{}m",
        selector, pixel.r, pixel.g, pixel.b
    );
}

/// Encode an absolute cursor move to a 0-indexed grid position.
pub fn encode_cursor_move(col: usize, row: usize) -> String {
    let mut buf = String::with_capacity(12);
    push_cursor_move(&mut buf, col, row);
    buf
}

/// Encode a 24-bit foreground or background color.
pub fn encode_color(pixel: Pixel, is_background: bool) -> String {
    let mut buf = String::with_capacity(20);
    push_color(&mut buf, pixel, is_background);
    buf
}
