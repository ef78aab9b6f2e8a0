//! Periodic audio realignment.

use tracing::debug;

use crate::error::PlayerError;
use crate::media::AudioSink;

/// Default number of displayed frames between audio re-seeks.
pub const DEFAULT_RESYNC_INTERVAL: u64 = 5;

/// Open-loop A/V sync: every `interval` displayed frames, the audio is
/// forced back to the video's timestamp. The real audio position is never
/// read.
#[derive(Debug, Clone)]
pub struct AvSync {
    interval: u64,
    resyncs: u64,
}

impl AvSync {
    /// An `interval` of 0 disables resyncing.
    pub fn new(interval: u64) -> Self {
        Self {
            interval,
            resyncs: 0,
        }
    }

    pub fn interval(&self) -> u64 {
        self.interval
    }

    /// Number of re-seeks issued so far.
    pub fn resyncs(&self) -> u64 {
        self.resyncs
    }

    /// Call after a frame has been displayed. Skipped frames must not be
    /// reported, so audio keeps playing through drops.
    ///
    /// Returns whether the audio was re-seeked.
    pub fn on_frame_displayed(
        &mut self,
        frame: u64,
        fps: f64,
        audio: &mut dyn AudioSink,
    ) -> Result<bool, PlayerError> {
        if self.interval == 0 || fps <= 0.0 || frame % self.interval != 0 {
            return Ok(false);
        }

        let seconds = frame as f64 / fps;
        audio.seek_to(seconds)?;
        self.resyncs += 1;
        debug!(frame, seconds, "audio resynced");
        Ok(true)
    }
}

impl Default for AvSync {
    fn default() -> Self {
        Self::new(DEFAULT_RESYNC_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingAudio {
        seeks: Vec<f64>,
    }

    impl AudioSink for RecordingAudio {
        fn play(&mut self) {}

        fn pause(&mut self) {}

        fn seek_to(&mut self, seconds: f64) -> Result<(), PlayerError> {
            self.seeks.push(seconds);
            Ok(())
        }

        fn sample_rate(&self) -> u32 {
            44_100
        }
    }

    #[test]
    fn reseeks_every_fifth_frame() {
        let mut sync = AvSync::default();
        let mut audio = RecordingAudio::default();

        for frame in 1..=20 {
            sync.on_frame_displayed(frame, 25.0, &mut audio).unwrap();
        }

        assert_eq!(audio.seeks, vec![0.2, 0.4, 0.6, 0.8]);
        assert_eq!(sync.resyncs(), 4);
    }

    #[test]
    fn frames_between_anchors_do_not_seek() {
        let mut sync = AvSync::new(5);
        let mut audio = RecordingAudio::default();
        assert!(!sync.on_frame_displayed(7, 25.0, &mut audio).unwrap());
        assert!(audio.seeks.is_empty());
    }

    #[test]
    fn zero_interval_disables_resync() {
        let mut sync = AvSync::new(0);
        let mut audio = RecordingAudio::default();
        for frame in 0..10 {
            sync.on_frame_displayed(frame, 30.0, &mut audio).unwrap();
        }
        assert!(audio.seeks.is_empty());
    }

    #[test]
    fn seek_errors_propagate() {
        struct FailingAudio;

        impl AudioSink for FailingAudio {
            fn play(&mut self) {}
            fn pause(&mut self) {}
            fn seek_to(&mut self, seconds: f64) -> Result<(), PlayerError> {
                Err(PlayerError::seek(seconds, "device gone"))
            }
            fn sample_rate(&self) -> u32 {
                0
            }
        }

        let mut sync = AvSync::default();
        let result = sync.on_frame_displayed(5, 25.0, &mut FailingAudio);
        assert!(matches!(result, Err(PlayerError::Seek { .. })));
    }
}
