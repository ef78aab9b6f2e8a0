//! Parse renderer output back into a screen model and compare it with the
//! display state the renderer believes it wrote.

use termvid::player::render::{
    DisplayState, FrameRenderer, RedrawReason, RenderMode, RenderOptions, CLEAR_SCREEN,
};

use super::helpers::{frame_from_fn, Screen};

fn gradient(width: u32, height: u32) -> image::RgbImage {
    frame_from_fn(width, height, |x, y| {
        [
            (x * 20) as u8,
            (y * 30) as u8,
            ((x + y) * 10) as u8,
        ]
    })
}

fn assert_screen_matches(screen: &Screen, display: &DisplayState, origin_row: usize, padding: usize) {
    for row in 0..display.rows() {
        for col in 0..display.cols() {
            assert_eq!(
                screen.cell(origin_row + row, padding + col).as_ref(),
                display.get(row, col),
                "cell ({}, {})",
                row,
                col
            );
        }
    }
}

#[test]
fn full_redraw_reconstructs_display_state() {
    let frame = gradient(12, 7);
    let mut renderer = FrameRenderer::new(RenderOptions::default());
    let mut display = None;

    let pass = renderer.render(&frame, &mut display, 3, false);
    assert_eq!(pass.mode, RenderMode::Full(RedrawReason::Initial));

    let screen = Screen::feed(pass.output.as_bytes());
    let display = display.expect("display state after first frame");

    assert_eq!(display.rows(), 4);
    assert_eq!(screen.cells.len(), 12 * 4);
    assert_screen_matches(&screen, &display, 0, 3);
    // One absolute move, then CRLF between rows
    assert_eq!(screen.cursor_moves, 1);
    assert_eq!(screen.text, " ".repeat(3 * 4));
}

#[test]
fn odd_height_pairs_last_row_with_itself() {
    let frame = gradient(4, 3);
    let mut renderer = FrameRenderer::new(RenderOptions::default());
    let mut display = None;

    let pass = renderer.render(&frame, &mut display, 0, false);
    let screen = Screen::feed(pass.output.as_bytes());

    for col in 0..4 {
        let cell = screen.cell(1, col).expect("last row drawn");
        assert_eq!(cell.top, cell.bottom);
    }
}

#[test]
fn incremental_updates_keep_screen_in_sync() {
    let base = gradient(10, 8);
    let changed = frame_from_fn(10, 8, |x, y| {
        if (x == 2 && y < 2) || (x == 7 && (4..6).contains(&y)) {
            [255, 255, 255]
        } else {
            let p = base.get_pixel(x, y);
            [p[0], p[1], p[2]]
        }
    });

    let mut renderer = FrameRenderer::new(RenderOptions::default()).with_origin_row(1);
    let mut display = None;

    let first = renderer.render(&base, &mut display, 0, false);
    let second = renderer.render(&changed, &mut display, 0, false);

    assert_eq!(second.mode, RenderMode::Incremental);
    assert_eq!(second.dirty_cells, 2);
    assert!(!second.output.contains(CLEAR_SCREEN));

    let mut screen = Screen::feed(first.output.as_bytes());
    screen.apply(second.output.as_bytes());

    let display = display.expect("display state");
    assert_eq!(display, DisplayState::from_frame(&changed));
    assert_screen_matches(&screen, &display, 1, 0);
}

#[test]
fn ratio_fallback_output_is_a_complete_frame() {
    let base = gradient(6, 4);
    let inverted = frame_from_fn(6, 4, |x, y| {
        let p = base.get_pixel(x, y);
        [255 - p[0], 255 - p[1], 255 - p[2]]
    });

    let mut renderer = FrameRenderer::new(RenderOptions::default());
    let mut display = None;
    renderer.render(&base, &mut display, 2, false);
    let pass = renderer.render(&inverted, &mut display, 2, false);

    assert!(pass.is_full());
    let screen = Screen::feed(pass.output.as_bytes());
    assert_screen_matches(&screen, &DisplayState::from_frame(&inverted), 0, 2);
}
