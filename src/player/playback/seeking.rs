//! Seek target arithmetic.

/// Number of frames covered by a seek of `seconds` at `fps`; at least 1.
pub fn seek_step(seconds: u32, fps: f64) -> u64 {
    let frames = (seconds as f64 * fps).round();
    if frames.is_finite() && frames >= 1.0 {
        frames as u64
    } else {
        1
    }
}

/// Apply a relative seek of `delta` frames to `current`.
///
/// The result is clamped to `[1, total_frames - 1]`. A `total_frames` of 0
/// means the length is unknown and only the lower bound applies. Streams of
/// one or two frames always land on frame 1.
pub fn seek_target(current: u64, delta: i64, total_frames: u64) -> u64 {
    let target = if delta >= 0 {
        current.saturating_add(delta.unsigned_abs())
    } else {
        current.saturating_sub(delta.unsigned_abs())
    };
    if total_frames == 0 {
        return target.max(1);
    }
    let last = total_frames.saturating_sub(1).max(1);
    target.clamp(1, last)
}

/// Timestamp of `frame` in seconds.
pub fn frame_to_seconds(frame: u64, fps: f64) -> f64 {
    if fps > 0.0 {
        frame as f64 / fps
    } else {
        0.0
    }
}
