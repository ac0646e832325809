use std::time::Duration;

use crate::constants::{MAX_CATCH_UP_STEPS, TICK_INTERVAL};

/// Fixed-timestep scheduler (accumulator pattern).
///
/// Feed it the wall-clock time of each rendered frame; it answers how many fixed ticks
/// to run. Pacing only depends on the deltas passed in, never on a real clock.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedTimestep {
    interval: f32,
    max_steps: u32,
    accumulator: f32,
}

impl Default for FixedTimestep {
    fn default() -> Self {
        Self::new(TICK_INTERVAL, MAX_CATCH_UP_STEPS)
    }
}

impl FixedTimestep {
    pub fn new(interval: Duration, max_steps: u32) -> Self {
        Self {
            interval: interval.as_secs_f32().max(f32::EPSILON),
            max_steps: max_steps.max(1),
            accumulator: 0.0,
        }
    }

    /// Seconds per tick.
    pub fn interval(&self) -> f32 {
        self.interval
    }

    /// Add `frame_dt` seconds and return the number of ticks now due.
    ///
    /// If more than `max_steps` ticks are due the excess time is dropped, so a long
    /// stall slows the simulation down instead of freezing the frame.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.max(0.0);

        let due = (self.accumulator / self.interval).floor();
        if due > self.max_steps as f32 {
            log::warn!(
                "dropping {:.3}s of simulation time ({} ticks due, cap {})",
                self.accumulator - self.max_steps as f32 * self.interval,
                due,
                self.max_steps
            );
            self.accumulator = 0.0;
            return self.max_steps;
        }

        let steps = due as u32;
        self.accumulator -= steps as f32 * self.interval;
        steps
    }

    /// Fraction of a tick left in the accumulator, in `[0, 1)`.
    pub fn overshoot(&self) -> f32 {
        (self.accumulator / self.interval).clamp(0.0, 1.0)
    }
}
