//! Playback pacing for the player.
//!
//! This module handles frame timing and drop accounting, audio resync, and
//! seek arithmetic.

mod seeking;
mod sync;
mod timer;

pub use seeking::{frame_to_seconds, seek_step, seek_target};
pub use sync::{AvSync, DEFAULT_RESYNC_INTERVAL};
#[cfg(test)]
pub use timer::ManualClock;
pub use timer::{Clock, FrameOutcome, FrameTimer, SystemClock, DEFAULT_LARGE_FRAME_PIXELS};
