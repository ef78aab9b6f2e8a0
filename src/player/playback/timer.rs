//! Frame pacing and adaptive frame dropping.
//!
//! Each rendered frame is timed. Fast frames sleep out the rest of their
//! interval, and any oversleep is taken off the next interval so scheduler
//! granularity does not accumulate into drift. Slow frames add to a
//! fractional frames-to-drop debt that the loop pays off by skipping renders.

#[cfg(test)]
use std::cell::Cell;
#[cfg(test)]
use std::rc::Rc;
use std::time::{Duration, Instant};

use tracing::trace;

/// Frames larger than this many pixels add one extra frame of drop debt
/// whenever they run late.
pub const DEFAULT_LARGE_FRAME_PIXELS: usize = 160 * 120;

/// Source of time for the frame timer.
pub trait Clock {
    fn now(&self) -> Instant;

    fn sleep(&self, duration: Duration);
}

/// Wall clock backed by `std::thread::sleep`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Deterministic clock that only moves when told to.
///
/// Clones share the same time, so a simulated decoder can advance the clock
/// the timer reads from.
#[cfg(test)]
#[derive(Debug, Clone)]
pub struct ManualClock {
    base: Instant,
    offset: Rc<Cell<Duration>>,
    oversleep: Duration,
}

#[cfg(test)]
impl ManualClock {
    pub fn new() -> Self {
        Self {
            base: Instant::now(),
            offset: Rc::new(Cell::new(Duration::ZERO)),
            oversleep: Duration::ZERO,
        }
    }

    /// Make every sleep last `extra` longer than requested.
    pub fn with_oversleep(mut self, extra: Duration) -> Self {
        self.oversleep = extra;
        self
    }

    pub fn advance(&self, duration: Duration) {
        self.offset.set(self.offset.get() + duration);
    }

    /// Time elapsed since the clock was created.
    pub fn elapsed(&self) -> Duration {
        self.offset.get()
    }
}

#[cfg(test)]
impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.base + self.offset.get()
    }

    fn sleep(&self, duration: Duration) {
        self.advance(duration + self.oversleep);
    }
}

/// What happened at the end of a rendered frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameOutcome {
    /// The frame finished early and the timer slept for `slept`
    OnSchedule { slept: Duration },
    /// The frame overran its interval
    Late { elapsed: Duration },
}

/// Paces playback to the source frame rate.
#[derive(Debug)]
pub struct FrameTimer<C: Clock> {
    clock: C,
    fps: f64,
    target_interval: Duration,
    /// Interval for the current frame, corrected for the last oversleep
    next_target: Duration,
    frame_start: Instant,
    current_fps: f64,
    average_fps: f64,
    samples: u64,
    frames_to_drop: f64,
    large_frame_pixels: usize,
}

impl<C: Clock> FrameTimer<C> {
    /// Create a timer for a stream at `fps` frames per second.
    ///
    /// A non-positive `fps` is treated as 1 so the interval stays finite.
    pub fn new(clock: C, fps: f64) -> Self {
        let fps = if fps > 0.0 { fps } else { 1.0 };
        let target_interval = Duration::from_secs_f64(1.0 / fps);
        let frame_start = clock.now();
        Self {
            clock,
            fps,
            target_interval,
            next_target: target_interval,
            frame_start,
            current_fps: fps,
            average_fps: 0.0,
            samples: 0,
            frames_to_drop: 0.0,
            large_frame_pixels: DEFAULT_LARGE_FRAME_PIXELS,
        }
    }

    /// Set the pixel area above which late frames add extra drop debt.
    pub fn with_large_frame_pixels(mut self, pixels: usize) -> Self {
        self.large_frame_pixels = pixels;
        self
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn fps(&self) -> f64 {
        self.fps
    }

    pub fn target_interval(&self) -> Duration {
        self.target_interval
    }

    pub fn next_target(&self) -> Duration {
        self.next_target
    }

    /// Frame rate measured for the last rendered frame.
    pub fn current_fps(&self) -> f64 {
        self.current_fps
    }

    /// Running mean of `current_fps` over all rendered frames.
    pub fn average_fps(&self) -> f64 {
        self.average_fps
    }

    pub fn frames_to_drop(&self) -> f64 {
        self.frames_to_drop
    }

    /// Mark the start of an iteration.
    pub fn begin_frame(&mut self) {
        self.frame_start = self.clock.now();
    }

    /// Restart the current interval, e.g. after a seek or while paused, so
    /// the wait is not counted against the schedule.
    pub fn resync(&mut self) {
        self.frame_start = self.clock.now();
        self.next_target = self.target_interval;
    }

    /// Whether the upcoming frame should be skipped to pay off drop debt.
    pub fn should_skip(&self) -> bool {
        self.frames_to_drop > 1.0
    }

    /// Account for one skipped frame.
    pub fn skip_frame(&mut self) {
        self.frames_to_drop -= 1.0;
    }

    /// Finish a rendered frame: sleep out the remaining interval or record
    /// that the frame ran late.
    ///
    /// # Arguments
    /// * `frame_pixels` - Pixel area of the rendered frame
    pub fn finish_frame(&mut self, frame_pixels: usize) -> FrameOutcome {
        let elapsed = self.clock.now().saturating_duration_since(self.frame_start);

        let outcome = if elapsed < self.next_target {
            let requested = self.next_target - elapsed;
            let before = self.clock.now();
            self.clock.sleep(requested);
            let actual = self.clock.now().saturating_duration_since(before);

            // target - (actual - requested), in either direction
            self.next_target = if actual >= requested {
                self.target_interval.saturating_sub(actual - requested)
            } else {
                self.target_interval + (requested - actual)
            };
            self.current_fps = self.fps;
            FrameOutcome::OnSchedule { slept: actual }
        } else {
            let secs = elapsed.as_secs_f64();
            self.current_fps = if secs > 0.0 { 1.0 / secs } else { self.fps };

            // The frame consumed fps/current_fps intervals and occupied one
            self.frames_to_drop += self.fps / self.current_fps - 1.0;
            if frame_pixels > self.large_frame_pixels {
                self.frames_to_drop += 1.0;
            }
            self.frames_to_drop = self.frames_to_drop.max(0.0);
            self.next_target = self.target_interval;

            trace!(
                elapsed_ms = elapsed.as_secs_f64() * 1000.0,
                frames_to_drop = self.frames_to_drop,
                "frame ran late"
            );
            FrameOutcome::Late { elapsed }
        };

        self.samples += 1;
        let n = self.samples as f64;
        self.average_fps = (self.average_fps * (n - 1.0) + self.current_fps) / n;

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FPS: f64 = 40.0; // 25ms interval

    fn timer() -> (ManualClock, FrameTimer<ManualClock>) {
        let clock = ManualClock::new();
        let timer = FrameTimer::new(clock.clone(), FPS);
        (clock, timer)
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    /// Run `frames` iterations where each render costs `cost`, returning
    /// how many were skipped.
    fn simulate(frames: usize, cost: Duration) -> usize {
        let (clock, mut timer) = timer();
        let mut skipped = 0;
        for _ in 0..frames {
            if timer.should_skip() {
                timer.skip_frame();
                skipped += 1;
                continue;
            }
            timer.begin_frame();
            clock.advance(cost);
            timer.finish_frame(100);
        }
        skipped
    }

    #[test]
    fn fast_frame_sleeps_remaining_interval() {
        let (clock, mut timer) = timer();
        timer.begin_frame();
        clock.advance(ms(10));
        let outcome = timer.finish_frame(100);

        assert_eq!(outcome, FrameOutcome::OnSchedule { slept: ms(15) });
        assert_eq!(clock.elapsed(), ms(25));
        assert_eq!(timer.current_fps(), FPS);
        assert_eq!(timer.frames_to_drop(), 0.0);
    }

    #[test]
    fn oversleep_shortens_next_interval() {
        let clock = ManualClock::new().with_oversleep(ms(3));
        let mut timer = FrameTimer::new(clock.clone(), FPS);

        timer.begin_frame();
        clock.advance(ms(10));
        timer.finish_frame(100);

        assert_eq!(timer.next_target(), ms(22));
    }

    #[test]
    fn late_frame_accrues_drop_debt() {
        let (clock, mut timer) = timer();
        timer.begin_frame();
        clock.advance(ms(100));
        let outcome = timer.finish_frame(100);

        assert_eq!(outcome, FrameOutcome::Late { elapsed: ms(100) });
        assert!((timer.current_fps() - 10.0).abs() < 1e-9);
        // 4 intervals consumed, 1 occupied by the frame itself
        assert!((timer.frames_to_drop() - 3.0).abs() < 1e-9);
        assert!(timer.should_skip());
        assert_eq!(timer.next_target(), timer.target_interval());
    }

    #[test]
    fn large_late_frame_adds_extra_debt() {
        let (clock, mut timer) = timer();
        timer.begin_frame();
        clock.advance(ms(50));
        timer.finish_frame(DEFAULT_LARGE_FRAME_PIXELS + 1);
        assert!((timer.frames_to_drop() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn large_frame_threshold_is_configurable() {
        let clock = ManualClock::new();
        let mut timer = FrameTimer::new(clock.clone(), FPS).with_large_frame_pixels(10);
        timer.begin_frame();
        clock.advance(ms(50));
        timer.finish_frame(11);
        assert!((timer.frames_to_drop() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn large_on_time_frame_adds_no_debt() {
        let (clock, mut timer) = timer();
        timer.begin_frame();
        clock.advance(ms(5));
        timer.finish_frame(DEFAULT_LARGE_FRAME_PIXELS * 4);
        assert_eq!(timer.frames_to_drop(), 0.0);
    }

    #[test]
    fn skipping_pays_off_debt() {
        let (clock, mut timer) = timer();
        timer.begin_frame();
        clock.advance(ms(100));
        timer.finish_frame(100);

        let mut skipped = 0;
        while timer.should_skip() {
            timer.skip_frame();
            skipped += 1;
        }
        assert_eq!(skipped, 2);
        assert!(timer.frames_to_drop() <= 1.0);
    }

    #[test]
    fn drop_count_converges_to_cost_ratio() {
        // T = 25ms
        for (cost_ms, frames) in [(50u64, 120usize), (75, 120), (40, 200)] {
            let skipped = simulate(frames, ms(cost_ms));
            let expected = frames as f64 * (1.0 - 25.0 / cost_ms as f64);
            assert!(
                (skipped as f64 - expected).abs() <= 2.0,
                "cost {}ms: skipped {} expected ~{:.1}",
                cost_ms,
                skipped,
                expected
            );
        }
    }

    #[test]
    fn on_schedule_playback_never_skips() {
        assert_eq!(simulate(100, ms(20)), 0);
    }

    #[test]
    fn average_fps_is_running_mean() {
        let (clock, mut timer) = timer();

        timer.begin_frame();
        clock.advance(ms(5));
        timer.finish_frame(100); // 40fps

        timer.begin_frame();
        clock.advance(ms(50));
        timer.finish_frame(100); // 20fps

        assert!((timer.average_fps() - 30.0).abs() < 1e-9);
    }

    #[test]
    fn resync_discards_waiting_time() {
        let (clock, mut timer) = timer();
        timer.begin_frame();
        clock.advance(ms(500)); // e.g. waiting on a seek
        timer.resync();
        clock.advance(ms(5));
        let outcome = timer.finish_frame(100);
        assert!(matches!(outcome, FrameOutcome::OnSchedule { .. }));
    }

    #[test]
    fn non_positive_fps_is_clamped() {
        let timer = FrameTimer::new(ManualClock::new(), 0.0);
        assert_eq!(timer.fps(), 1.0);
        assert_eq!(timer.target_interval(), Duration::from_secs(1));
    }
}
