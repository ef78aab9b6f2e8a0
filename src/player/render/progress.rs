//! Progress bar rendering for the player.
//!
//! Draws a full-width bar on a fixed terminal row using partial block glyphs,
//! giving eight sub-character steps of resolution.

use std::io::Write;

use anyhow::Result;

use super::ansi::{push_cursor_move, RESET};

/// Partial blocks indexed by eighths filled (index 0 is empty).
pub const PARTIAL_BLOCKS: [char; 8] = [' ', '▏', '▎', '▍', '▌', '▋', '▊', '▉'];

/// A completely filled cell.
pub const FULL_BLOCK: char = '█';

/// Format a duration in seconds as MM:SS, or H:MM:SS past one hour.
///
/// # Arguments
/// * `seconds` - Duration in seconds
pub fn format_duration(seconds: f64) -> String {
    let total_secs = seconds as u64;
    let hours = total_secs / 3600;
    let mins = (total_secs % 3600) / 60;
    let secs = total_secs % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, mins, secs)
    } else {
        format!("{:02}:{:02}", mins, secs)
    }
}

/// Build the bar glyphs for `current` out of `total` frames.
///
/// # Arguments
/// * `width` - Bar width in cells
/// * `current` - Current frame number
/// * `total` - Total frame count
///
/// # Returns
/// Exactly `width` characters: full blocks, at most one partial block, then spaces.
pub fn build_progress_bar(width: usize, current: u64, total: u64) -> String {
    let progress = if total > 0 {
        (current as f64 / total as f64).clamp(0.0, 1.0)
    } else {
        1.0
    };

    let filled = progress * width as f64;
    let whole = filled.floor() as usize;
    let eighths = ((filled - filled.floor()) * 8.0).floor() as usize;

    let mut bar = String::with_capacity(width * 3);
    for i in 0..width {
        if i < whole {
            bar.push(FULL_BLOCK);
        } else if i == whole {
            bar.push(PARTIAL_BLOCKS[eighths.min(7)]);
        } else {
            bar.push(' ');
        }
    }
    bar
}

/// Render the progress bar on a terminal row.
///
/// # Arguments
/// * `out` - Writer to append to
/// * `width` - Terminal width
/// * `row` - Row to render at (0-indexed)
/// * `current` - Current frame number
/// * `total` - Total frame count
pub fn render_progress_bar<W: Write>(
    out: &mut W,
    width: u16,
    row: u16,
    current: u64,
    total: u64,
) -> Result<()> {
    const RED: &str = "\x1b[31m";

    let mut output = String::with_capacity(width as usize * 4 + 16);
    output.push_str(RESET);
    push_cursor_move(&mut output, 0, row as usize);
    output.push_str(RED);
    output.push_str(&build_progress_bar(width as usize, current, total));
    output.push_str(RESET);
    out.write_all(output.as_bytes())?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_duration_formats_correctly() {
        assert_eq!(format_duration(0.0), "00:00");
        assert_eq!(format_duration(65.0), "01:05");
        assert_eq!(format_duration(3599.0), "59:59");
    }

    #[test]
    fn format_duration_adds_hours() {
        assert_eq!(format_duration(3600.0), "1:00:00");
        assert_eq!(format_duration(3661.0), "1:01:01");
        assert_eq!(format_duration(7325.0), "2:02:05");
    }

    #[test]
    fn format_duration_truncates_fractions() {
        assert_eq!(format_duration(0.9), "00:00");
        assert_eq!(format_duration(59.9), "00:59");
    }

    #[test]
    fn format_duration_negative_treated_as_zero() {
        assert_eq!(format_duration(-5.0), "00:00");
    }

    #[test]
    fn empty_bar_at_zero() {
        let bar = build_progress_bar(10, 0, 100);
        assert_eq!(bar.chars().count(), 10);
        assert!(bar.chars().all(|c| c == ' '));
    }

    #[test]
    fn full_bar_at_end() {
        let bar = build_progress_bar(10, 100, 100);
        assert_eq!(bar, "█".repeat(10));
    }

    #[test]
    fn half_bar() {
        let bar: Vec<char> = build_progress_bar(10, 50, 100).chars().collect();
        assert!(bar[..5].iter().all(|&c| c == FULL_BLOCK));
        assert_eq!(bar[5], ' '); // zero eighths into the sixth cell
        assert!(bar[6..].iter().all(|&c| c == ' '));
    }

    #[test]
    fn partial_block_resolution() {
        // 8 cells at 5/16 = 2.5 cells -> 2 full + 4/8
        let bar: Vec<char> = build_progress_bar(8, 5, 16).chars().collect();
        assert_eq!(bar[0], FULL_BLOCK);
        assert_eq!(bar[1], FULL_BLOCK);
        assert_eq!(bar[2], '▌');
        assert_eq!(bar[3], ' ');

        // 10 cells at 5/16 = 3.125 cells -> 3 full + 1/8
        let bar: Vec<char> = build_progress_bar(10, 5, 16).chars().collect();
        assert_eq!(bar[3], '▏');
    }

    #[test]
    fn progress_clamped_to_one() {
        assert_eq!(build_progress_bar(4, 15, 10), "████");
    }

    #[test]
    fn zero_total_is_full() {
        assert_eq!(build_progress_bar(3, 0, 0), "███");
    }

    #[test]
    fn zero_width_is_empty() {
        assert!(build_progress_bar(0, 5, 10).is_empty());
    }

    #[test]
    fn render_positions_and_colors() {
        let mut out = Vec::new();
        render_progress_bar(&mut out, 4, 23, 2, 4).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "\x1b[0m\x1b[24;1H\x1b[31m██  \x1b[0m");
    }
}
