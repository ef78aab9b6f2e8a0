//! Terminal video player module
//!
//! Plays a video as 24-bit colored half-block characters, one terminal cell
//! per two vertically stacked pixels.
//!
//! # Architecture
//!
//! The player is organized into submodules:
//! - `state`: PlaybackState and the command state machine (Playing/Paused)
//! - `input/`: Keyboard input and the `InputSource` seam
//! - `playback/`: Frame pacing, drop accounting, audio resync and seek math
//! - `render/`: Frame diffing, escape sequence codec, status and progress bars
//! - `session`: The per-frame loop, generic over its devices
//! - `native`: Wiring for the real terminal, ffmpeg and audio device
//!
//! # Usage
//!
//! ```no_run
//! use termvid::player::{play_session, PlaybackResult, SessionOptions};
//! use std::path::Path;
//!
//! let summary = play_session(Path::new("clip.mp4"), &SessionOptions::default()).unwrap();
//! match summary.result {
//!     PlaybackResult::Finished => println!("Finished"),
//!     PlaybackResult::Interrupted => println!("Stopped by user"),
//! }
//! println!("Average FPS: {:.2}", summary.average_fps);
//! ```

pub mod input;
mod native;
pub mod playback;
pub mod render;
pub mod session;
pub mod state;

pub use native::play_session;
pub use session::{PlaybackResult, PlaybackSummary, Session, SessionOptions};
pub use state::{Command, InputResult, PlaybackState, PlayerMode};
