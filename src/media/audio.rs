//! Audio playback.
//!
//! The soundtrack is extracted to a temporary WAV file with ffmpeg, then
//! played through rodio. The temporary directory lives as long as the
//! player and is removed when it is dropped.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Duration;

use rodio::{Decoder, OutputStream, Sink, Source};
use tempfile::TempDir;
use tracing::{debug, info};

use super::AudioSink;
use crate::error::PlayerError;

/// Extract the audio track of `video` into `dir` as 16-bit PCM WAV.
pub fn extract_audio(video: &Path, dir: &Path) -> Result<PathBuf, PlayerError> {
    let target = dir.join("audio.wav");
    let output = Command::new("ffmpeg")
        .arg("-hide_banner")
        .arg("-loglevel")
        .arg("error")
        .arg("-y")
        .arg("-i")
        .arg(video)
        .arg("-vn")
        .arg("-acodec")
        .arg("pcm_s16le")
        .arg(&target)
        .stdin(Stdio::null())
        .output()
        .map_err(|e| PlayerError::Audio(format!("failed to run ffmpeg: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(PlayerError::Audio(format!(
            "audio extraction failed ({}): {}",
            output.status,
            stderr.trim()
        )));
    }

    debug!("extracted audio to {}", target.display());
    Ok(target)
}

/// Audio played through the default output device.
pub struct RodioAudio {
    sink: Sink,
    sample_rate: u32,
    // The stream must outlive the sink or playback stops
    _stream: OutputStream,
    _workdir: TempDir,
}

impl RodioAudio {
    /// Extract and load the soundtrack of `video`. Playback starts paused.
    pub fn load(video: &Path) -> Result<Self, PlayerError> {
        let workdir = tempfile::Builder::new()
            .prefix("termvid-")
            .tempdir()
            .map_err(|e| PlayerError::Audio(format!("failed to create temp dir: {}", e)))?;
        let wav = extract_audio(video, workdir.path())?;

        let (stream, handle) = OutputStream::try_default()
            .map_err(|e| PlayerError::Audio(format!("no audio output: {}", e)))?;
        let sink =
            Sink::try_new(&handle).map_err(|e| PlayerError::Audio(format!("sink: {}", e)))?;

        let file = File::open(&wav)
            .map_err(|e| PlayerError::Audio(format!("{}: {}", wav.display(), e)))?;
        let source = Decoder::new(BufReader::new(file))
            .map_err(|e| PlayerError::Audio(format!("decode {}: {}", wav.display(), e)))?;
        let sample_rate = source.sample_rate();

        sink.pause();
        sink.append(source);
        info!(sample_rate, "audio loaded");

        Ok(Self {
            sink,
            sample_rate,
            _stream: stream,
            _workdir: workdir,
        })
    }
}

impl AudioSink for RodioAudio {
    fn play(&mut self) {
        self.sink.play();
    }

    fn pause(&mut self) {
        self.sink.pause();
    }

    fn seek_to(&mut self, seconds: f64) -> Result<(), PlayerError> {
        let position = Duration::from_secs_f64(seconds.max(0.0));
        self.sink
            .try_seek(position)
            .map_err(|e| PlayerError::seek(seconds, format!("audio: {}", e)))
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

/// Audio sink that plays nothing, for `--no-audio` and silent files.
#[derive(Debug, Default, Clone)]
pub struct SilentAudio {
    playing: bool,
    position: f64,
}

impl SilentAudio {
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Last position passed to `seek_to`.
    pub fn position(&self) -> f64 {
        self.position
    }
}

impl AudioSink for SilentAudio {
    fn play(&mut self) {
        self.playing = true;
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn seek_to(&mut self, seconds: f64) -> Result<(), PlayerError> {
        self.position = seconds;
        Ok(())
    }

    fn sample_rate(&self) -> u32 {
        0
    }
}
