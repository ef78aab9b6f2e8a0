//! The playback loop.
//!
//! One iteration per frame, on one thread: poll input, decode, fit the frame
//! to the terminal, render or skip, write everything in one go, then pace.
//! All devices are passed in as trait objects so the loop can run against
//! fakes.

use std::io::Write;

use anyhow::Result;
use tracing::{debug, info};

use crate::config::Config;
use crate::media::{fit_frame, AudioSink, VideoSource};
use crate::player::input::InputSource;
use crate::player::playback::{seek_step, AvSync, Clock, FrameTimer};
use crate::player::render::{
    render_progress_bar, render_status_bar, DisplayState, FrameRenderer, RenderMode,
    RenderOptions, StatusLine, CLEAR_SCREEN,
};
use crate::player::state::{Command, InputResult, PlaybackState};
use crate::terminal::TerminalSize;

/// Rows reserved above and below the video (status line and progress bar).
pub const CHROME_ROWS: u16 = 2;

/// Settings for one playback session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionOptions {
    pub render: RenderOptions,
    pub skip_seconds: u32,
    pub resync_interval: u64,
    pub large_frame_pixels: usize,
    pub audio: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for SessionOptions {
    fn from(config: &Config) -> Self {
        Self {
            render: RenderOptions {
                distance_threshold: config.render.optimization_level,
                redraw_ratio: config.render.redraw_ratio,
                always_redraw: config.render.force_redraw,
            },
            skip_seconds: config.playback.skip_seconds,
            resync_interval: config.playback.resync_interval,
            large_frame_pixels: config.timing.large_frame_pixels,
            audio: config.playback.audio,
        }
    }
}

/// How playback ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackResult {
    /// The stream ran out of frames
    Finished,
    /// The user quit
    Interrupted,
}

/// Statistics reported when playback ends.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackSummary {
    pub result: PlaybackResult,
    pub frames_rendered: u64,
    pub frames_skipped: u64,
    pub average_fps: f64,
    pub audio_resyncs: u64,
}

/// A playback session over borrowed devices.
pub struct Session<'a, C: Clock> {
    video: &'a mut dyn VideoSource,
    audio: &'a mut dyn AudioSink,
    input: &'a mut dyn InputSource,
    terminal: &'a dyn TerminalSize,
    out: &'a mut dyn Write,
    timer: FrameTimer<C>,
    renderer: FrameRenderer,
    sync: AvSync,
    state: PlaybackState,
    display: Option<DisplayState>,
    /// Terminal size at the last rendered frame
    last_size: Option<(u16, u16)>,
    frames_rendered: u64,
    frames_skipped: u64,
}

impl<'a, C: Clock> Session<'a, C> {
    pub fn new(
        video: &'a mut dyn VideoSource,
        audio: &'a mut dyn AudioSink,
        input: &'a mut dyn InputSource,
        terminal: &'a dyn TerminalSize,
        out: &'a mut dyn Write,
        clock: C,
        options: &SessionOptions,
    ) -> Self {
        let info = video.info();
        let fps = info.fps;
        let state = PlaybackState::new(
            info.total_frames,
            fps,
            seek_step(options.skip_seconds, fps),
        );
        let timer = FrameTimer::new(clock, fps).with_large_frame_pixels(options.large_frame_pixels);

        Self {
            video,
            audio,
            input,
            terminal,
            out,
            timer,
            renderer: FrameRenderer::new(options.render).with_origin_row(1),
            sync: AvSync::new(options.resync_interval),
            state,
            display: None,
            last_size: None,
            frames_rendered: 0,
            frames_skipped: 0,
        }
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    /// Run until the stream ends or the user quits.
    ///
    /// Decode, seek and audio errors end the session and are returned.
    pub fn run(mut self) -> Result<PlaybackSummary> {
        info!(
            frames = self.state.total_frames,
            fps = self.state.fps,
            "playback started"
        );
        self.audio.play();

        let result = loop {
            if let Some(command) = self.input.poll()? {
                self.handle_command(command)?;
            }
            if self.state.quit {
                break PlaybackResult::Interrupted;
            }

            self.timer.begin_frame();
            let Some(frame) = self.video.next_frame()? else {
                break PlaybackResult::Finished;
            };
            self.state.advance();

            let (cols, rows) = self.terminal.size();
            let max_height = 2 * u32::from(rows.saturating_sub(CHROME_ROWS));
            let frame = fit_frame(frame, u32::from(cols), max_height);
            let status = self.status_line(frame.width(), frame.height());

            let mut buf: Vec<u8> = Vec::new();

            if self.timer.should_skip() {
                self.timer.skip_frame();
                self.frames_skipped += 1;
                render_status_bar(&mut buf, cols, 0, &status)?;
                self.out.write_all(&buf)?;
                self.out.flush()?;
                continue;
            }

            let resized = self.last_size != Some((cols, rows));
            self.last_size = Some((cols, rows));
            let force_full = self.state.take_redraw() || resized;
            let left_padding = (cols as usize).saturating_sub(frame.width() as usize) / 2;

            let pass = self
                .renderer
                .render(&frame, &mut self.display, left_padding, force_full);

            buf.reserve(pass.output.len() + cols as usize * 4 + 64);
            if let RenderMode::Full(reason) = pass.mode {
                if reason.needs_clear() {
                    buf.extend_from_slice(CLEAR_SCREEN.as_bytes());
                }
            }
            render_status_bar(&mut buf, cols, 0, &status)?;
            buf.extend_from_slice(pass.output.as_bytes());
            render_progress_bar(
                &mut buf,
                cols,
                rows.saturating_sub(1),
                self.state.current_frame,
                self.state.total_frames,
            )?;
            self.out.write_all(&buf)?;
            self.out.flush()?;
            self.frames_rendered += 1;

            let pixels = frame.width() as usize * frame.height() as usize;
            self.timer.finish_frame(pixels);
            self.sync
                .on_frame_displayed(self.state.current_frame, self.state.fps, self.audio)?;
        };

        self.audio.pause();
        let summary = PlaybackSummary {
            result,
            frames_rendered: self.frames_rendered,
            frames_skipped: self.frames_skipped,
            average_fps: self.timer.average_fps(),
            audio_resyncs: self.sync.resyncs(),
        };
        info!(
            rendered = summary.frames_rendered,
            skipped = summary.frames_skipped,
            average_fps = summary.average_fps,
            "playback ended: {:?}",
            summary.result
        );
        Ok(summary)
    }

    fn status_line(&self, width: u32, height: u32) -> StatusLine {
        StatusLine {
            frame: self.state.current_frame,
            total_frames: self.state.total_frames,
            width,
            height,
            fps: self.state.fps,
            current_fps: self.timer.current_fps(),
            frames_to_drop: self.timer.frames_to_drop(),
            average_fps: self.timer.average_fps(),
        }
    }

    fn handle_command(&mut self, command: Command) -> Result<()> {
        match self.state.apply(command) {
            InputResult::Continue | InputResult::Quit => {}
            InputResult::Paused => self.pause()?,
            InputResult::Resumed => self.audio.play(),
            InputResult::Seek { frame, seconds } => {
                debug!(frame, seconds, "seeking");
                self.video.seek(seconds)?;
                self.audio.seek_to(seconds)?;
                self.timer.resync();
            }
        }
        Ok(())
    }

    /// Stay paused until the user resumes or quits.
    fn pause(&mut self) -> Result<()> {
        self.audio.pause();
        debug!(frame = self.state.current_frame, "paused");

        while self.state.is_paused() {
            let Some(command) = self.input.wait()? else {
                // Input closed; nothing can resume us
                self.state.quit = true;
                return Ok(());
            };
            match self.state.apply(command) {
                InputResult::Resumed => {
                    self.audio.play();
                    self.timer.resync();
                    debug!("resumed");
                }
                InputResult::Quit => return Ok(()),
                _ => {}
            }
        }
        Ok(())
    }
}
