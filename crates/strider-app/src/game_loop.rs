//! Frame clock for the fixed-timestep loop.
//!
//! Measures (or accepts) the frame time, clamps it to avoid a spiral of death,
//! and hands it to the frame function, which runs the stage schedules. The
//! fixed-step accumulator itself lives in `FrameSchedules`.

use std::time::Instant;

use strider_config::SimulationConfig;
use tracing::warn;

/// Frame time clamp and bookkeeping.
pub struct GameLoop {
    fixed_dt: f64,
    max_frame_time: f64,
    previous_time: Instant,
    total_time: f64,
    frame_count: u64,
    update_count: u64,
}

impl GameLoop {
    /// Creates a loop using the simulation timing from `config`.
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            fixed_dt: config.fixed_dt,
            max_frame_time: config.max_frame_time,
            previous_time: Instant::now(),
            total_time: 0.0,
            frame_count: 0,
            update_count: 0,
        }
    }

    /// Runs one frame with the wall-clock time since the previous frame.
    pub fn tick(&mut self, frame_fn: impl FnMut(f64) -> u32) -> u32 {
        let now = Instant::now();
        let frame_time = now.duration_since(self.previous_time).as_secs_f64();
        self.previous_time = now;
        self.tick_with(frame_time, frame_fn)
    }

    /// Runs one frame with an explicit frame time in seconds.
    ///
    /// `frame_fn(dt)` runs exactly once and returns how many fixed steps it
    /// executed.
    pub fn tick_with(&mut self, frame_time: f64, mut frame_fn: impl FnMut(f64) -> u32) -> u32 {
        let frame_time = self.clamp(frame_time);
        let steps = frame_fn(frame_time);
        self.total_time += frame_time;
        self.frame_count += 1;
        self.update_count += u64::from(steps);
        steps
    }

    fn clamp(&self, frame_time: f64) -> f64 {
        if frame_time > self.max_frame_time {
            warn!(
                "Frame time {:.1}ms exceeds maximum, clamping to {:.1}ms",
                frame_time * 1000.0,
                self.max_frame_time * 1000.0
            );
            self.max_frame_time
        } else {
            frame_time.max(0.0)
        }
    }

    /// Fixed simulation step in seconds.
    pub fn fixed_dt(&self) -> f64 {
        self.fixed_dt
    }

    /// Returns the total number of frames run.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Returns the total number of fixed steps reported by frames.
    pub fn update_count(&self) -> u64 {
        self.update_count
    }

    /// Returns the clamped frame time accumulated so far, in seconds.
    pub fn total_time(&self) -> f64 {
        self.total_time
    }
}
