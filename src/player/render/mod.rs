//! Rendering components for the player.
//!
//! This module turns decoded frames into terminal output: the cell model,
//! escape sequence codec, display state, frame diff engine, and the status
//! and progress overlays.

mod ansi;
mod cell;
mod display;
mod engine;
mod progress;
mod status;

pub use ansi::{
    encode_color, encode_cursor_move, push_color, push_cursor_move, CLEAR_SCREEN, CLEAR_TO_EOL,
    HALF_BLOCK, RESET,
};
pub use cell::{distance, Pixel, TerminalCell};
pub use display::DisplayState;
pub use engine::{
    write_cell, write_full_frame, ColorState, FrameRenderer, RedrawReason, RenderMode,
    RenderOptions, RenderPass, DEFAULT_DISTANCE_THRESHOLD, DEFAULT_REDRAW_RATIO,
};
pub use progress::{build_progress_bar, format_duration, render_progress_bar, FULL_BLOCK, PARTIAL_BLOCKS};
pub use status::{render_status_bar, StatusLine};
