//! Real time to fixed steps
//!
//! Animation frames arrive at irregular intervals (throttled mobile browsers,
//! 144 Hz displays). The accumulator turns elapsed seconds into whole
//! simulation steps so physics and the countdown never depend on frame rate.
//!
//! Long gaps are split: at most `MAX_FRAME_DT` per frame becomes physics
//! steps, the remainder is kept as backlog for the countdown so the round
//! still ends on wall-clock time.

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};

#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    accumulator: f32,
    /// Real seconds elapsed but not simulated as steps
    backlog: f64,
    /// Timestamp (ms) of the previous frame, 0 before the first
    last_time: f64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget leftover time (on restart)
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
        self.backlog = 0.0;
        self.last_time = 0.0;
    }

    /// Seconds since the previous frame timestamp (ms). The first frame
    /// counts as one step.
    pub fn frame_delta(&mut self, time_ms: f64) -> f32 {
        let dt = if self.last_time > 0.0 {
            ((time_ms - self.last_time) / 1000.0) as f32
        } else {
            SIM_DT
        };
        self.last_time = time_ms;
        dt
    }

    /// Add a frame's elapsed seconds and return how many steps to run
    pub fn advance(&mut self, dt: f32) -> u32 {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let simulated = dt.min(MAX_FRAME_DT);
        self.backlog += (dt - simulated) as f64;
        self.accumulator += simulated;

        let mut steps = 0;
        while self.accumulator >= SIM_DT && steps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            steps += 1;
        }
        // Whole steps over the substep cap also go to the countdown
        if self.accumulator >= SIM_DT {
            let excess = (self.accumulator / SIM_DT).floor() * SIM_DT;
            self.accumulator -= excess;
            self.backlog += excess as f64;
        }
        steps
    }

    /// Take the real time skipped by the physics clamp (seconds)
    pub fn take_backlog(&mut self) -> f64 {
        std::mem::take(&mut self.backlog)
    }
}
