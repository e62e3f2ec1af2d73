//! Simulation clocks and lightweight performance timing.
//!
//! `FixedStep` turns variable frame intervals into a whole number of fixed
//! simulation steps. `Timer` measures where wall-clock time goes and is only
//! active when enabled programmatically or through the `AF_TIMING`
//! environment variable.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

/// Default simulation step: 60 Hz.
pub const DEFAULT_STEP_S: f64 = 1.0 / 60.0;

/// Fixed-timestep accumulator.
///
/// Frame time is accumulated and drained in whole steps so the physics is
/// independent of the host's frame rate. Dropped frames are caught up, up to
/// `max_steps_per_frame`; anything beyond that is discarded.
#[derive(Clone, Debug)]
pub struct FixedStep {
    step: f64,
    accumulator: f64,
    max_frame_dt: f64,
    max_steps_per_frame: u32,
    elapsed: f64,
}

impl Default for FixedStep {
    fn default() -> Self {
        Self::new(DEFAULT_STEP_S)
    }
}

impl FixedStep {
    pub fn new(step: f64) -> Self {
        let step = if step.is_finite() && step > 0.0 {
            step
        } else {
            DEFAULT_STEP_S
        };
        Self {
            step,
            accumulator: 0.0,
            max_frame_dt: 0.25,
            max_steps_per_frame: 15,
            elapsed: 0.0,
        }
    }

    /// Step length (seconds).
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Total simulated time drained so far (seconds).
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Add a frame interval and return how many fixed steps to run now.
    pub fn accumulate(&mut self, frame_dt: f64) -> u32 {
        if !frame_dt.is_finite() || frame_dt <= 0.0 {
            return 0;
        }
        self.accumulator += frame_dt.min(self.max_frame_dt);

        let mut steps = 0;
        while self.accumulator >= self.step && steps < self.max_steps_per_frame {
            self.accumulator -= self.step;
            steps += 1;
        }
        if steps == self.max_steps_per_frame {
            // Too far behind: drop the backlog instead of spiralling.
            self.accumulator = self.accumulator.min(self.step);
        }
        self.elapsed += f64::from(steps) * self.step;
        steps
    }

    /// Forget any partial step.
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

static ENABLED: AtomicBool = AtomicBool::new(false);

/// Enable performance timing globally.
pub fn enable_timing() {
    ENABLED.store(true, Ordering::Relaxed);
}

/// Disable performance timing globally.
pub fn disable_timing() {
    ENABLED.store(false, Ordering::Relaxed);
}

/// Check if timing is enabled.
pub fn is_enabled() -> bool {
    ENABLED.load(Ordering::Relaxed) || std::env::var("AF_TIMING").is_ok()
}

/// A simple timer that measures elapsed time.
pub struct Timer {
    label: &'static str,
    start: Instant,
    enabled: bool,
}

impl Timer {
    /// Create and start a new timer with the given label.
    pub fn start(label: &'static str) -> Self {
        Self {
            label,
            start: Instant::now(),
            enabled: is_enabled(),
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Stop the timer and return elapsed time in seconds.
    /// If timing is disabled, returns None.
    pub fn stop(self) -> Option<f64> {
        if self.enabled {
            Some(self.start.elapsed().as_secs_f64())
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_steps_are_drained() {
        let mut clock = FixedStep::new(0.01);
        assert_eq!(clock.accumulate(0.035), 3);
        // 0.005 carried over
        assert_eq!(clock.accumulate(0.006), 1);
        assert!((clock.elapsed() - 0.04).abs() < 1e-12);
    }

    #[test]
    fn long_frames_are_capped() {
        let mut clock = FixedStep::new(0.01);
        let steps = clock.accumulate(10.0);
        assert_eq!(steps, 15);
        // Backlog discarded: a tiny frame does not trigger another burst.
        assert!(clock.accumulate(1e-6) <= 1);
    }

    #[test]
    fn invalid_frames_ignored() {
        let mut clock = FixedStep::default();
        assert_eq!(clock.accumulate(f64::NAN), 0);
        assert_eq!(clock.accumulate(-1.0), 0);
        assert_eq!(clock.elapsed(), 0.0);
    }

    #[test]
    fn disabled_timer_returns_none() {
        disable_timing();
        if std::env::var("AF_TIMING").is_err() {
            assert!(Timer::start("noop").stop().is_none());
        }
    }
}
