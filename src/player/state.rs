//! Player state management
//!
//! Contains the central `PlaybackState` struct and the command state machine
//! that maps user commands onto it.

use crate::player::playback::{frame_to_seconds, seek_target};

/// Playback mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerMode {
    Playing,
    /// Waiting for a resume or quit command
    Paused,
}

/// A user command, already decoded from a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    TogglePause,
    SeekForward,
    SeekBackward,
    Redraw,
    Quit,
}

/// Result of applying a command.
///
/// This enum is returned to the main loop, which performs the side effects
/// (audio pause, decoder seek) the transition requires.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputResult {
    /// Nothing for the loop to do
    Continue,
    /// Playback was paused
    Paused,
    /// Playback was resumed
    Resumed,
    /// Decoder and audio must move to `seconds`
    Seek { frame: u64, seconds: f64 },
    /// Exit the player
    Quit,
}

/// Central playback state.
#[derive(Debug, Clone)]
pub struct PlaybackState {
    pub mode: PlayerMode,
    /// 1-based number of the most recently decoded frame, 0 before the first
    pub current_frame: u64,
    pub total_frames: u64,
    pub fps: f64,
    /// Frames moved by one seek command
    pub seek_step: u64,
    /// Set by the redraw command, consumed by the next render
    pub force_redraw: bool,
    pub quit: bool,
}

impl PlaybackState {
    pub fn new(total_frames: u64, fps: f64, seek_step: u64) -> Self {
        Self {
            mode: PlayerMode::Playing,
            current_frame: 0,
            total_frames,
            fps,
            seek_step: seek_step.max(1),
            force_redraw: false,
            quit: false,
        }
    }

    pub fn is_paused(&self) -> bool {
        self.mode == PlayerMode::Paused
    }

    /// Record that one more frame was decoded.
    pub fn advance(&mut self) {
        self.current_frame += 1;
    }

    /// Take the pending redraw request, clearing it.
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.force_redraw)
    }

    /// Apply a command to the state machine.
    ///
    /// While paused only `TogglePause` (resume) and `Quit` are accepted;
    /// everything else is ignored.
    pub fn apply(&mut self, command: Command) -> InputResult {
        match (self.mode, command) {
            (_, Command::Quit) => {
                self.quit = true;
                InputResult::Quit
            }
            (PlayerMode::Playing, Command::TogglePause) => {
                self.mode = PlayerMode::Paused;
                InputResult::Paused
            }
            (PlayerMode::Paused, Command::TogglePause) => {
                self.mode = PlayerMode::Playing;
                InputResult::Resumed
            }
            (PlayerMode::Paused, _) => InputResult::Continue,
            (PlayerMode::Playing, Command::Redraw) => {
                self.force_redraw = true;
                InputResult::Continue
            }
            (PlayerMode::Playing, Command::SeekForward) => self.seek_by(self.seek_step as i64),
            (PlayerMode::Playing, Command::SeekBackward) => self.seek_by(-(self.seek_step as i64)),
        }
    }

    fn seek_by(&mut self, delta: i64) -> InputResult {
        let target = seek_target(self.current_frame, delta, self.total_frames);
        // The next decoded frame is `target`
        self.current_frame = target - 1;
        InputResult::Seek {
            frame: target,
            seconds: frame_to_seconds(self.current_frame, self.fps),
        }
    }
}
