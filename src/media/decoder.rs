//! Frame decoding through an `ffmpeg` child process.
//!
//! ffmpeg writes raw `rgb24` frames at the source size to a pipe, and each
//! frame is read with one `read_exact`. Seeking restarts the child with
//! `-ss` before the input, which makes ffmpeg seek in the demuxer.

use std::io::{ErrorKind, Read};
use std::path::Path;
use std::process::{Child, ChildStdout, Command, Stdio};

use image::RgbImage;
use tracing::{debug, warn};

use super::probe::{probe_video, VideoInfo};
use super::VideoSource;
use crate::error::PlayerError;

/// A video stream decoded by ffmpeg.
#[derive(Debug)]
pub struct FfmpegDecoder {
    info: VideoInfo,
    child: Child,
    stdout: ChildStdout,
    frame_size: usize,
}

impl FfmpegDecoder {
    /// Probe and open `path`, positioned at the first frame.
    pub fn open(path: &Path) -> Result<Self, PlayerError> {
        let info = probe_video(path)?;
        let (child, stdout) =
            spawn_ffmpeg(&info.path, 0.0).map_err(|e| PlayerError::open(path, e.to_string()))?;
        let frame_size = info.width as usize * info.height as usize * 3;

        Ok(Self {
            info,
            child,
            stdout,
            frame_size,
        })
    }

    fn stop_child(&mut self) {
        if let Err(e) = self.child.kill() {
            // Already exited
            debug!("ffmpeg kill: {}", e);
        }
        if let Err(e) = self.child.wait() {
            warn!("failed to reap ffmpeg: {}", e);
        }
    }
}

impl VideoSource for FfmpegDecoder {
    fn info(&self) -> &VideoInfo {
        &self.info
    }

    fn next_frame(&mut self) -> Result<Option<RgbImage>, PlayerError> {
        let mut buffer = vec![0u8; self.frame_size];
        match self.stdout.read_exact(&mut buffer) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => return Ok(None),
            Err(e) => return Err(PlayerError::Decode(e.to_string())),
        }

        RgbImage::from_raw(self.info.width, self.info.height, buffer)
            .map(Some)
            .ok_or_else(|| PlayerError::Decode("frame buffer size mismatch".to_string()))
    }

    fn seek(&mut self, seconds: f64) -> Result<f64, PlayerError> {
        let seconds = seconds.max(0.0);
        self.stop_child();
        let (child, stdout) =
            spawn_ffmpeg(&self.info.path, seconds).map_err(|e| PlayerError::seek(seconds, e.to_string()))?;
        self.child = child;
        self.stdout = stdout;
        debug!(seconds, "decoder seeked");
        Ok(seconds)
    }
}

impl Drop for FfmpegDecoder {
    fn drop(&mut self) {
        self.stop_child();
    }
}

fn spawn_ffmpeg(path: &Path, start_seconds: f64) -> std::io::Result<(Child, ChildStdout)> {
    let mut command = Command::new("ffmpeg");
    command.arg("-hide_banner").arg("-loglevel").arg("error");
    if start_seconds > 0.0 {
        command.arg("-ss").arg(format!("{:.3}", start_seconds));
    }
    let mut child = command
        .arg("-i")
        .arg(path)
        .arg("-f")
        .arg("rawvideo")
        .arg("-pix_fmt")
        .arg("rgb24")
        .arg("-")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()?;

    let stdout = match child.stdout.take() {
        Some(stdout) => stdout,
        None => {
            let _ = child.kill();
            let _ = child.wait();
            return Err(std::io::Error::new(
                ErrorKind::BrokenPipe,
                "failed to capture ffmpeg stdout",
            ));
        }
    };
    Ok((child, stdout))
}
