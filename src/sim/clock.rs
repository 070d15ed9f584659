//! Simulation time
//!
//! One cooperative clock drives everything. The oscillating enemies' direction
//! is derived from the tick count instead of being flipped by a second timer.

use crate::consts::{MAX_SUBSTEPS, SIM_DT};

/// Fixed-timestep accumulator
#[derive(Debug, Clone, Default)]
pub struct FixedStep {
    accumulator: f32,
}

impl FixedStep {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed frame time (seconds) and get the number of ticks to run now
    ///
    /// Frame time is clamped to 0.1 s and at most `MAX_SUBSTEPS` ticks are
    /// returned; any leftover beyond that is dropped.
    pub fn advance(&mut self, dt: f32) -> u32 {
        self.accumulator += dt.clamp(0.0, 0.1);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        if substeps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        substeps
    }

    /// Fraction of a tick left in the accumulator (for interpolation)
    pub fn alpha(&self) -> f32 {
        self.accumulator / SIM_DT
    }
}

/// Oscillation direction for a given tick
///
/// The first `period` ticks rise, the next `period` descend, and so on.
#[inline]
pub fn oscillation_descending(ticks: u64, period: u64) -> bool {
    (ticks / period.max(1)) % 2 == 1
}
