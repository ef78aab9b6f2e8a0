//! Frame diff and render engine.
//!
//! Brings the terminal from the believed [`DisplayState`] to a new decoded
//! frame using as few bytes as possible. Two strategies exist:
//!
//! - **Full redraw**: every cell is emitted in scan order. Consecutive cells
//!   with the same colors share SGR codes.
//! - **Incremental**: only cells whose colors moved at least
//!   `distance_threshold` are rewritten. Runs of adjacent dirty cells share a
//!   single cursor move, since writing a glyph advances the cursor.
//!
//! Scattered cursor moves are expensive, so once the share of dirty cells
//! exceeds `redraw_ratio` a linear full redraw is emitted instead.

use image::RgbImage;

use super::ansi::{push_color, push_cursor_move, HALF_BLOCK, RESET};
use super::cell::{Pixel, TerminalCell};
use super::display::DisplayState;

/// Default RGB distance below which a cell is considered unchanged.
pub const DEFAULT_DISTANCE_THRESHOLD: f64 = 25.0;

/// Default dirty-cell ratio above which a full redraw is emitted.
pub const DEFAULT_REDRAW_RATIO: f64 = 0.40;

/// Tuning knobs for the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    /// Minimum RGB distance for a half to count as changed
    pub distance_threshold: f64,
    /// Dirty-cell ratio above which incremental diffing is abandoned
    pub redraw_ratio: f64,
    /// Always redraw the whole frame (`--redraw`)
    pub always_redraw: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            distance_threshold: DEFAULT_DISTANCE_THRESHOLD,
            redraw_ratio: DEFAULT_REDRAW_RATIO,
            always_redraw: false,
        }
    }
}

/// Why a full redraw was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedrawReason {
    /// No display state exists yet
    Initial,
    /// The frame no longer fits the existing display grid
    Resized,
    /// Requested by the caller (user redraw, terminal resize)
    Requested,
    /// Every frame is redrawn (`--redraw`)
    Always,
    /// Too many cells changed for incremental updates to pay off
    ChangeRatio,
}

impl RedrawReason {
    /// Whether stale content may remain outside the new frame area.
    pub fn needs_clear(self) -> bool {
        !matches!(self, RedrawReason::ChangeRatio | RedrawReason::Always)
    }
}

/// Strategy used for a render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    Full(RedrawReason),
    Incremental,
}

/// Result of rendering one frame.
#[derive(Debug, Clone)]
pub struct RenderPass {
    pub mode: RenderMode,
    /// Cells rewritten by this pass
    pub dirty_cells: usize,
    /// Cells in the frame
    pub total_cells: usize,
    /// Escape sequences and glyphs to write to the terminal
    pub output: String,
}

impl RenderPass {
    /// Fraction of cells rewritten, `0.0` for an empty frame.
    pub fn change_ratio(&self) -> f64 {
        if self.total_cells == 0 {
            0.0
        } else {
            self.dirty_cells as f64 / self.total_cells as f64
        }
    }

    pub fn is_full(&self) -> bool {
        matches!(self.mode, RenderMode::Full(_))
    }
}

/// The SGR colors the terminal is currently set to, as far as we know.
///
/// `None` means unknown (start of output or after a reset), which forces the
/// next cell to emit that channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColorState {
    pub bg: Option<Pixel>,
    pub fg: Option<Pixel>,
}

/// Emit one cell, skipping SGR codes the terminal already has.
///
/// Returns the color state after the glyph is written.
pub fn write_cell(out: &mut String, cell: TerminalCell, colors: ColorState) -> ColorState {
    if colors.bg != Some(cell.top) {
        push_color(out, cell.top, true);
    }
    if colors.fg != Some(cell.bottom) {
        push_color(out, cell.bottom, false);
    }
    out.push(HALF_BLOCK);
    ColorState {
        bg: Some(cell.top),
        fg: Some(cell.bottom),
    }
}

/// Emit every cell of `display`, starting at `origin_row`.
///
/// Each row begins with `left_padding` spaces and ends with a reset and a
/// CRLF, so the output is correct in raw mode as well.
pub fn write_full_frame(out: &mut String, display: &DisplayState, origin_row: usize, left_padding: usize) {
    push_cursor_move(out, 0, origin_row);
    for row in display.iter_rows() {
        out.extend(std::iter::repeat(' ').take(left_padding));
        let mut colors = ColorState::default();
        for &cell in row {
            colors = write_cell(out, cell, colors);
        }
        out.push_str(RESET);
        out.push_str("\r\n");
    }
}

/// Diffs decoded frames against the display state and emits terminal output.
#[derive(Debug)]
pub struct FrameRenderer {
    options: RenderOptions,
    /// Terminal row (0-indexed) where the first cell row is drawn
    origin_row: usize,
    /// Scratch dirty mask, reused between frames
    dirty: Vec<bool>,
}

impl FrameRenderer {
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            origin_row: 0,
            dirty: Vec::new(),
        }
    }

    /// Draw the frame starting at terminal row `row` (0-indexed).
    pub fn with_origin_row(mut self, row: usize) -> Self {
        self.origin_row = row;
        self
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn origin_row(&self) -> usize {
        self.origin_row
    }

    /// Render `frame`, updating `display` to match what was written.
    ///
    /// # Arguments
    /// * `frame` - The resized frame to show
    /// * `display` - Believed screen state; `None` before the first frame
    /// * `left_padding` - Columns to the left of the frame
    /// * `force_full` - Redraw everything regardless of the diff
    pub fn render(
        &mut self,
        frame: &RgbImage,
        display: &mut Option<DisplayState>,
        left_padding: usize,
        force_full: bool,
    ) -> RenderPass {
        let redraw = match display.as_ref() {
            None => Some(RedrawReason::Initial),
            Some(state) if !state.matches_frame(frame) => Some(RedrawReason::Resized),
            Some(_) if force_full => Some(RedrawReason::Requested),
            Some(_) if self.options.always_redraw => Some(RedrawReason::Always),
            Some(_) => None,
        };
        let state = match (redraw, display) {
            (None, Some(state)) => state,
            (reason, display) => {
                let reason = reason.unwrap_or(RedrawReason::Initial);
                let state = display.insert(DisplayState::from_frame(frame));
                return self.full_pass(frame, state, left_padding, reason);
            }
        };

        let dirty_cells = self.mark_dirty(frame, state);
        let total_cells = state.len();
        let ratio = if total_cells == 0 {
            0.0
        } else {
            dirty_cells as f64 / total_cells as f64
        };

        if ratio > self.options.redraw_ratio {
            *state = DisplayState::from_frame(frame);
            return self.full_pass(frame, state, left_padding, RedrawReason::ChangeRatio);
        }

        let output = self.incremental_pass(frame, state, left_padding, dirty_cells);
        RenderPass {
            mode: RenderMode::Incremental,
            dirty_cells,
            total_cells,
            output,
        }
    }

    fn full_pass(
        &self,
        frame: &RgbImage,
        state: &DisplayState,
        left_padding: usize,
        reason: RedrawReason,
    ) -> RenderPass {
        let mut output = String::with_capacity(output_capacity(frame));
        write_full_frame(&mut output, state, self.origin_row, left_padding);
        RenderPass {
            mode: RenderMode::Full(reason),
            dirty_cells: state.len(),
            total_cells: state.len(),
            output,
        }
    }

    /// Fill the dirty mask and return the number of dirty cells.
    fn mark_dirty(&mut self, frame: &RgbImage, state: &DisplayState) -> usize {
        let threshold = self.options.distance_threshold;
        self.dirty.clear();
        self.dirty.resize(state.len(), false);

        let mut count = 0;
        for row in 0..state.rows() {
            for col in 0..state.cols() {
                let new_cell = TerminalCell::from_frame(frame, row as u32, col as u32);
                let is_dirty = state
                    .get(row, col)
                    .map_or(true, |old| new_cell.is_dirty(old, threshold));
                if is_dirty {
                    self.dirty[row * state.cols() + col] = true;
                    count += 1;
                }
            }
        }
        count
    }

    fn incremental_pass(
        &self,
        frame: &RgbImage,
        state: &mut DisplayState,
        left_padding: usize,
        dirty_cells: usize,
    ) -> String {
        if dirty_cells == 0 {
            return String::new();
        }

        let mut output = String::with_capacity(output_capacity(frame));
        let mut colors = ColorState::default();
        let cols = state.cols();

        for row in 0..state.rows() {
            let mut prev_dirty = false;
            for col in 0..cols {
                if !self.dirty[row * cols + col] {
                    prev_dirty = false;
                    continue;
                }

                let cell = TerminalCell::from_frame(frame, row as u32, col as u32);
                if !prev_dirty {
                    push_cursor_move(&mut output, col + left_padding, row + self.origin_row);
                }
                colors = write_cell(&mut output, cell, colors);
                state.set(row, col, cell);
                prev_dirty = true;
            }
        }
        output
    }
}

/// Capacity heuristic: roughly three bytes per source pixel.
fn output_capacity(frame: &RgbImage) -> usize {
    frame.width() as usize * frame.height() as usize * 3
}
