//! termvid - terminal video player
//!
//! Decodes a video with ffmpeg and draws it as 24-bit colored `▄` half-blocks,
//! rewriting only the cells that visibly changed between frames. Playback is
//! paced to the source frame rate, dropping frames when rendering falls
//! behind, and the soundtrack is kept in step by periodic re-seeks.

pub mod cli;
pub mod config;
pub mod error;
pub mod media;
pub mod player;
pub mod terminal;

pub use config::Config;
pub use error::PlayerError;
