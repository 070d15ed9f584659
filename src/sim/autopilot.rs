//! Demo driver
//!
//! Produces plausible inputs for headless runs: run right, hop over whatever
//! stops progress, shoot now and then. Seeded, so a run is reproducible.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::state::GameState;
use super::tick::TickInput;

/// Ticks without horizontal progress before the autopilot jumps
const STALL_JUMP_TICKS: u32 = 3;
/// Ticks without progress before it backs off instead
const STALL_RETREAT_TICKS: u32 = 90;

pub struct Autopilot {
    rng: Pcg32,
    last_x: i32,
    stalled: u32,
    retreat: u32,
}

impl Autopilot {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            last_x: i32::MIN,
            stalled: 0,
            retreat: 0,
        }
    }

    /// Decide the input for the next tick
    pub fn next_input(&mut self, state: &GameState) -> TickInput {
        let x = state.player.rect.x;
        if x == self.last_x {
            self.stalled += 1;
        } else {
            self.stalled = 0;
        }
        self.last_x = x;

        if self.stalled > STALL_RETREAT_TICKS {
            self.stalled = 0;
            self.retreat = self.rng.random_range(20..60);
        }

        let mut input = TickInput::default();
        if self.retreat > 0 {
            self.retreat -= 1;
            input.left = true;
        } else {
            input.right = true;
        }

        input.up = self.stalled >= STALL_JUMP_TICKS || self.rng.random_bool(0.03);
        input.shoot = self.rng.random_bool(0.15);

        // Flip gravity now and then once the bridge is gone
        input.gravity_shift = state.session.leap_triggered
            && !state.session.boss_dead
            && state.player.can_gravity_shift
            && self.rng.random_bool(0.02);

        input
    }
}
