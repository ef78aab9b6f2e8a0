//! Shared helpers for integration tests

use std::collections::HashMap;

use image::{Rgb, RgbImage};
use termvid::player::render::{Pixel, TerminalCell};
use vte::{Params, Perform};

/// Build a frame from a per-pixel color function.
pub fn frame_from_fn(width: u32, height: u32, f: impl Fn(u32, u32) -> [u8; 3]) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| Rgb(f(x, y)))
}

/// Minimal terminal model: tracks cursor, SGR colors, and the half-block
/// cells written at each position.
#[derive(Debug, Default)]
pub struct Screen {
    pub row: usize,
    pub col: usize,
    bg: Option<Pixel>,
    fg: Option<Pixel>,
    pub cells: HashMap<(usize, usize), TerminalCell>,
    /// Non-glyph characters printed (padding, text)
    pub text: String,
    pub cursor_moves: usize,
}

impl Screen {
    pub fn feed(bytes: &[u8]) -> Self {
        let mut screen = Screen::default();
        screen.apply(bytes);
        screen
    }

    pub fn apply(&mut self, bytes: &[u8]) {
        let mut parser = vte::Parser::new();
        parser.advance(self, bytes);
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<TerminalCell> {
        self.cells.get(&(row, col)).copied()
    }

    fn apply_sgr(&mut self, params: &Params) {
        let values: Vec<u16> = params.iter().flat_map(|p| p.iter().copied()).collect();
        match values.as_slice() {
            [] | [0] => {
                self.bg = None;
                self.fg = None;
            }
            [48, 2, r, g, b] => self.bg = Some(Pixel::new(*r as u8, *g as u8, *b as u8)),
            [38, 2, r, g, b] => self.fg = Some(Pixel::new(*r as u8, *g as u8, *b as u8)),
            _ => {}
        }
    }
}

impl Perform for Screen {
    fn print(&mut self, c: char) {
        if c == '▄' {
            // Glyphs written without known colors read back as black
            let cell = TerminalCell::new(
                self.bg.unwrap_or(Pixel::BLACK),
                self.fg.unwrap_or(Pixel::BLACK),
            );
            self.cells.insert((self.row, self.col), cell);
        } else {
            self.text.push(c);
        }
        self.col += 1;
    }

    fn execute(&mut self, byte: u8) {
        match byte {
            b'\r' => self.col = 0,
            b'\n' => self.row += 1,
            _ => {}
        }
    }

    fn csi_dispatch(&mut self, params: &Params, _intermediates: &[u8], _ignore: bool, c: char) {
        match c {
            'H' => {
                let mut iter = params.iter();
                let row = iter.next().and_then(|p| p.first().copied()).unwrap_or(1);
                let col = iter.next().and_then(|p| p.first().copied()).unwrap_or(1);
                self.row = (row as usize).saturating_sub(1);
                self.col = (col as usize).saturating_sub(1);
                self.cursor_moves += 1;
            }
            'm' => self.apply_sgr(params),
            _ => {}
        }
    }
}
