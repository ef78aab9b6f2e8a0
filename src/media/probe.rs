//! Stream metadata via `ffprobe`.

use std::path::{Path, PathBuf};
use std::process::Command;

use serde::Deserialize;
use tracing::debug;

use crate::error::PlayerError;

/// Metadata for the first video stream of a file.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoInfo {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    pub total_frames: u64,
    /// Duration in seconds, when known
    pub duration: Option<f64>,
    /// Whether the file carries an audio stream
    pub has_audio: bool,
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
    #[serde(default)]
    format: Option<ProbeFormat>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    #[serde(default)]
    codec_type: Option<String>,
    #[serde(default)]
    width: Option<u32>,
    #[serde(default)]
    height: Option<u32>,
    #[serde(default)]
    r_frame_rate: Option<String>,
    #[serde(default)]
    avg_frame_rate: Option<String>,
    #[serde(default)]
    nb_frames: Option<String>,
    #[serde(default)]
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProbeFormat {
    #[serde(default)]
    duration: Option<String>,
}

/// Probe `path` with `ffprobe`.
///
/// Every failure here is an open error: a missing file, a missing `ffprobe`
/// binary, or a file without a decodable video stream.
pub fn probe_video(path: &Path) -> Result<VideoInfo, PlayerError> {
    if !path.is_file() {
        return Err(PlayerError::open(path, "No such file"));
    }

    let output = Command::new("ffprobe")
        .arg("-v")
        .arg("error")
        .arg("-show_streams")
        .arg("-show_format")
        .arg("-print_format")
        .arg("json")
        .arg(path)
        .output()
        .map_err(|e| PlayerError::open(path, format!("failed to run ffprobe: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(PlayerError::open(
            path,
            format!("ffprobe failed ({}): {}", output.status, stderr.trim()),
        ));
    }

    let info = parse_probe_output(path, &output.stdout)?;
    debug!(
        width = info.width,
        height = info.height,
        fps = info.fps,
        frames = info.total_frames,
        "probed {}",
        path.display()
    );
    Ok(info)
}

/// Build [`VideoInfo`] from ffprobe's JSON output.
pub fn parse_probe_output(path: &Path, json: &[u8]) -> Result<VideoInfo, PlayerError> {
    let parsed: ProbeOutput = serde_json::from_slice(json)
        .map_err(|e| PlayerError::open(path, format!("invalid ffprobe output: {}", e)))?;

    let stream = parsed
        .streams
        .iter()
        .find(|stream| stream.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| PlayerError::open(path, "no video stream"))?;

    let (width, height) = match (stream.width, stream.height) {
        (Some(w), Some(h)) if w > 0 && h > 0 => (w, h),
        _ => return Err(PlayerError::open(path, "video stream has no dimensions")),
    };

    let fps = stream
        .r_frame_rate
        .as_deref()
        .and_then(parse_rate)
        .or_else(|| stream.avg_frame_rate.as_deref().and_then(parse_rate))
        .ok_or_else(|| PlayerError::open(path, "video stream has no frame rate"))?;

    let duration = stream.duration.as_deref().and_then(parse_positive).or_else(|| {
        parsed
            .format
            .as_ref()
            .and_then(|format| format.duration.as_deref())
            .and_then(parse_positive)
    });

    let total_frames = stream
        .nb_frames
        .as_deref()
        .and_then(|raw| raw.trim().parse::<u64>().ok())
        .filter(|frames| *frames > 0)
        .or_else(|| duration.map(|secs| (secs * fps).round().max(1.0) as u64))
        .unwrap_or(0);

    Ok(VideoInfo {
        path: path.to_path_buf(),
        width,
        height,
        fps,
        total_frames,
        duration,
        has_audio: parsed
            .streams
            .iter()
            .any(|stream| stream.codec_type.as_deref() == Some("audio")),
    })
}

/// Parse an ffprobe rate such as `30000/1001` or `25`.
pub fn parse_rate(raw: &str) -> Option<f64> {
    let value = raw.trim();
    let rate = match value.split_once('/') {
        Some((num, den)) => {
            let num = num.trim().parse::<f64>().ok()?;
            let den = den.trim().parse::<f64>().ok()?;
            if den == 0.0 {
                return None;
            }
            num / den
        }
        None => value.parse::<f64>().ok()?,
    };
    (rate.is_finite() && rate > 0.0).then_some(rate)
}

fn parse_positive(raw: &str) -> Option<f64> {
    let parsed = raw.trim().parse::<f64>().ok()?;
    (parsed.is_finite() && parsed > 0.0).then_some(parsed)
}
