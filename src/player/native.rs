//! Playback on the real terminal with ffmpeg and the system audio device.

use std::io;
use std::path::Path;

use anyhow::Result;
use tracing::{info, warn};

use crate::media::{AudioSink, FfmpegDecoder, RodioAudio, SilentAudio, VideoSource};
use crate::player::input::CrosstermInput;
use crate::player::playback::SystemClock;
use crate::player::session::{PlaybackSummary, Session, SessionOptions};
use crate::terminal::{ensure_tty, SystemTerminal, TerminalSession};

/// Play `path` in the current terminal.
///
/// The video is opened before the terminal is touched, so open errors are
/// reported on a clean screen. The terminal is restored before returning,
/// whether playback succeeded or not.
pub fn play_session(path: &Path, options: &SessionOptions) -> Result<PlaybackSummary> {
    let mut video = FfmpegDecoder::open(path)?;
    let info = video.info().clone();
    info!(
        "opened {} ({}x{}, {:.3}fps, {} frames)",
        path.display(),
        info.width,
        info.height,
        info.fps,
        info.total_frames
    );

    let mut audio: Box<dyn AudioSink> = if options.audio && info.has_audio {
        Box::new(RodioAudio::load(path)?)
    } else {
        if options.audio {
            warn!("{} has no audio stream", path.display());
        }
        Box::new(SilentAudio::default())
    };

    ensure_tty()?;
    let mut terminal = TerminalSession::enter()?;
    let mut input = CrosstermInput;
    let size = SystemTerminal;
    let mut stdout = io::stdout().lock();

    let result = Session::new(
        &mut video,
        audio.as_mut(),
        &mut input,
        &size,
        &mut stdout,
        SystemClock,
        options,
    )
    .run();

    terminal.restore()?;
    result
}
