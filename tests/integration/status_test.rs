//! Status line and progress bar output

use termvid::player::render::{build_progress_bar, render_status_bar, StatusLine};

fn status(frame: u64) -> StatusLine {
    StatusLine {
        frame,
        total_frames: 3000,
        width: 212,
        height: 118,
        fps: 25.0,
        current_fps: 24.37,
        frames_to_drop: 1.5,
        average_fps: 24.912,
    }
}

#[test]
fn status_text_snapshot() {
    insta::assert_snapshot!(
        status(1500).text(),
        @"Frame 1500/3000 212x118 01:00/02:00 24.37fps, drops: 1.50, avg: 24.91fps"
    );
}

#[test]
fn status_bar_is_positioned_on_first_row() {
    let mut out = Vec::new();
    render_status_bar(&mut out, 200, 0, &status(25)).unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(text.starts_with("\x1b[1;1H"));
    assert!(text.contains("Frame 25/3000"));
    assert!(text.ends_with("\x1b[K"));
}

#[test]
fn progress_bar_fills_proportionally() {
    let bar = build_progress_bar(10, 1500, 3000);
    assert_eq!(bar.chars().count(), 10);
    assert_eq!(bar.chars().filter(|&c| c == '█').count(), 5);
}
