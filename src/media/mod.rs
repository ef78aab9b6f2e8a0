//! Media adapters: probing, decoding, resizing and audio.
//!
//! The player core only talks to the [`VideoSource`] and [`AudioSink`]
//! traits. The ffmpeg and rodio implementations live in the submodules.

pub mod audio;
pub mod decoder;
pub mod probe;
pub mod resize;

use image::RgbImage;

use crate::error::PlayerError;

pub use audio::{extract_audio, RodioAudio, SilentAudio};
pub use decoder::FfmpegDecoder;
pub use probe::{probe_video, VideoInfo};
pub use resize::{fit_dimensions, fit_frame};

/// A stream of decoded RGB frames.
pub trait VideoSource {
    /// Stream metadata.
    fn info(&self) -> &VideoInfo;

    /// Decode the next frame, or `None` at end of stream.
    fn next_frame(&mut self) -> Result<Option<RgbImage>, PlayerError>;

    /// Reposition the stream; returns the position actually reached.
    fn seek(&mut self, seconds: f64) -> Result<f64, PlayerError>;
}

/// An audio output that can be started, stopped and repositioned.
pub trait AudioSink {
    fn play(&mut self);

    fn pause(&mut self);

    /// Move playback to `seconds` from the start of the track.
    fn seek_to(&mut self, seconds: f64) -> Result<(), PlayerError>;

    fn sample_rate(&self) -> u32;
}
