//! Status line rendering for the player.
//!
//! Displays frame position, size, elapsed time and timing statistics on the
//! first terminal row.

use std::io::Write;

use anyhow::Result;

use super::ansi::{push_cursor_move, CLEAR_TO_EOL, RESET};
use super::progress::format_duration;

/// Values shown in the status line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusLine {
    /// Current frame number
    pub frame: u64,
    /// Total frame count
    pub total_frames: u64,
    /// Displayed frame width in pixels
    pub width: u32,
    /// Displayed frame height in pixels
    pub height: u32,
    /// Source frame rate
    pub fps: f64,
    /// Most recently measured frame rate
    pub current_fps: f64,
    /// Outstanding frames-to-drop debt
    pub frames_to_drop: f64,
    /// Running average frame rate
    pub average_fps: f64,
}

impl StatusLine {
    /// Format the status text without any escape sequences.
    pub fn text(&self) -> String {
        let (watched, duration) = if self.fps > 0.0 {
            (
                self.frame as f64 / self.fps,
                self.total_frames as f64 / self.fps,
            )
        } else {
            (0.0, 0.0)
        };

        format!(
            "Frame {}/{} {}x{} {}/{} {:.2}fps, drops: {:.2}, avg: {:.2}fps",
            self.frame,
            self.total_frames,
            self.width,
            self.height,
            format_duration(watched),
            format_duration(duration),
            self.current_fps,
            self.frames_to_drop,
            self.average_fps,
        )
    }
}

/// Render the status line on a terminal row.
///
/// The text is cut to `width` characters so it can never wrap and scroll the
/// screen.
///
/// # Arguments
/// * `out` - Writer to append to
/// * `width` - Terminal width
/// * `row` - Row to render at (0-indexed)
/// * `status` - Values to display
pub fn render_status_bar<W: Write>(
    out: &mut W,
    width: u16,
    row: u16,
    status: &StatusLine,
) -> Result<()> {
    let mut output = String::with_capacity(width as usize + 32);
    push_cursor_move(&mut output, 0, row as usize);
    output.push_str(RESET);
    output.extend(status.text().chars().take(width as usize));
    output.push_str(CLEAR_TO_EOL);
    out.write_all(output.as_bytes())?;

    Ok(())
}
