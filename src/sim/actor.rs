//! The player actor

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::collision::ContactPolicy;
use super::geom::{Axis, Rect, Vector2};
use super::layout::{Block, BlockKind};
use super::projectile::Bullet;
use super::state::VisualHandle;

/// Sign of "down" for the current gravity direction
#[inline]
pub fn gravity_sign(gravity_down: bool) -> i32 {
    if gravity_down { 1 } else { -1 }
}

/// The player-controlled actor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub rect: Rect,
    pub velocity: Vector2,
    pub facing_right: bool,
    pub can_jump: bool,
    pub can_gravity_shift: bool,
    /// At most one live bullet
    pub bullet: Option<Bullet>,
    #[serde(skip)]
    pub visual: Option<VisualHandle>,
}

impl Player {
    pub fn new(start: Vector2, size: Vector2) -> Self {
        Self {
            rect: Rect::from_pos_size(start, size),
            velocity: IVec2::ZERO,
            facing_right: true,
            can_jump: true,
            can_gravity_shift: true,
            bullet: None,
            visual: None,
        }
    }

    /// Add the jump impulse against gravity (only if grounded)
    pub fn jump(&mut self, impulse: i32, gravity_down: bool) {
        if self.can_jump {
            self.velocity.y -= impulse * gravity_sign(gravity_down);
            self.can_jump = false;
        }
    }

    /// Accumulate one tick of gravity, respecting the speed cap
    ///
    /// With gravity inverted the same rule runs mirrored.
    pub fn apply_gravity(&mut self, step: i32, max_speed: i32, gravity_down: bool) {
        if gravity_down {
            if self.velocity.y < max_speed {
                self.velocity.y += step;
            }
        } else if self.velocity.y > -max_speed {
            self.velocity.y -= step;
        }
    }

    /// Teleport to a respawn point and drop any momentum
    pub fn respawn_at(&mut self, position: Vector2) {
        self.rect.set_position(position);
        self.velocity = IVec2::ZERO;
    }
}

/// Something a block contact asks the session to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactTrigger {
    Death,
    Checkpoint { position: Vector2 },
    Finish,
}

/// Contact handling for the player
///
/// Landing (contact in the direction of gravity) backs the player off by one
/// unit and applies the block's effect; a checkpoint records the backed-off
/// position so a respawn starts clear of the floor seam.
/// Bumping a block against gravity only matters for death blocks.
/// Any vertical stop re-arms jumping and gravity shifting.
#[derive(Debug, Default)]
pub struct PlayerContact {
    pub gravity_down: bool,
    pub landed: bool,
    /// Stopped by a block on the vertical axis, from either side
    pub halted: bool,
    pub triggers: Vec<ContactTrigger>,
}

impl PlayerContact {
    pub fn new(gravity_down: bool) -> Self {
        Self {
            gravity_down,
            ..Default::default()
        }
    }
}

impl ContactPolicy for PlayerContact {
    fn on_contact(&mut self, mover: &mut Rect, block: &Block, axis: Axis, sign: i32) {
        if axis != Axis::Y {
            return;
        }
        self.halted = true;

        if sign == gravity_sign(self.gravity_down) {
            mover.shift(axis, -sign);
            self.landed = true;
            match block.kind {
                BlockKind::Death => self.triggers.push(ContactTrigger::Death),
                BlockKind::Checkpoint => self.triggers.push(ContactTrigger::Checkpoint {
                    position: mover.position(),
                }),
                BlockKind::Finish => self.triggers.push(ContactTrigger::Finish),
                BlockKind::Normal => {}
            }
        } else if block.kind == BlockKind::Death {
            self.triggers.push(ContactTrigger::Death);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collision::resolve_axis;

    fn floor(kind: BlockKind) -> Vec<Block> {
        vec![Block {
            rect: Rect::new(0, 100, 60, 60),
            kind,
        }]
    }

    #[test]
    fn test_jump_requires_ground() {
        let mut player = Player::new(IVec2::ZERO, IVec2::new(28, 40));
        player.jump(29, true);
        assert_eq!(player.velocity.y, -29);
        assert!(!player.can_jump);

        // Second jump in the air does nothing
        player.jump(29, true);
        assert_eq!(player.velocity.y, -29);
    }

    #[test]
    fn test_jump_inverted_gravity() {
        let mut player = Player::new(IVec2::ZERO, IVec2::new(28, 40));
        player.jump(29, false);
        assert_eq!(player.velocity.y, 29);
    }

    #[test]
    fn test_gravity_clamps() {
        let mut player = Player::new(IVec2::ZERO, IVec2::new(28, 40));
        for _ in 0..50 {
            player.apply_gravity(1, 10, true);
        }
        assert_eq!(player.velocity.y, 10);
        for _ in 0..50 {
            player.apply_gravity(1, 10, false);
        }
        assert_eq!(player.velocity.y, -10);
    }

    #[test]
    fn test_landing_rearms_and_backs_off() {
        let mut player = Player::new(IVec2::new(0, 50), IVec2::new(28, 40));
        player.can_jump = false;
        player.can_gravity_shift = false;
        let blocks = floor(BlockKind::Normal);
        let mut policy = PlayerContact::new(true);
        resolve_axis(&mut player.rect, Axis::Y, 20, &blocks, &mut policy);
        assert!(policy.landed);
        assert!(policy.halted);
        assert!(policy.triggers.is_empty());
        assert_eq!(player.rect.bottom(), 99);
    }

    #[test]
    fn test_landing_on_death() {
        let mut rect = Rect::new(0, 50, 28, 40);
        let mut policy = PlayerContact::new(true);
        resolve_axis(&mut rect, Axis::Y, 20, &floor(BlockKind::Death), &mut policy);
        assert_eq!(policy.triggers, vec![ContactTrigger::Death]);
    }

    #[test]
    fn test_checkpoint_records_contact_position() {
        let mut rect = Rect::new(10, 50, 28, 40);
        let mut policy = PlayerContact::new(true);
        resolve_axis(&mut rect, Axis::Y, 20, &floor(BlockKind::Checkpoint), &mut policy);
        assert_eq!(
            policy.triggers,
            vec![ContactTrigger::Checkpoint {
                position: IVec2::new(10, 59)
            }]
        );
    }

    #[test]
    fn test_head_bump_on_death_with_inverted_gravity() {
        // Rising into a death block's underside while gravity points up: lands on it
        let mut rect = Rect::new(0, 170, 28, 40);
        let mut policy = PlayerContact::new(false);
        resolve_axis(&mut rect, Axis::Y, -20, &floor(BlockKind::Death), &mut policy);
        assert_eq!(policy.triggers, vec![ContactTrigger::Death]);
        assert!(policy.landed);
        assert_eq!(rect.top(), 161);
    }

    #[test]
    fn test_head_bump_against_gravity() {
        // Jumping up into a death ceiling with normal gravity still kills
        let mut rect = Rect::new(0, 170, 28, 40);
        let mut policy = PlayerContact::new(true);
        resolve_axis(&mut rect, Axis::Y, -20, &floor(BlockKind::Death), &mut policy);
        assert_eq!(policy.triggers, vec![ContactTrigger::Death]);
        assert!(!policy.landed);
        assert!(policy.halted);

        // A normal ceiling is just a stop
        let mut rect = Rect::new(0, 170, 28, 40);
        let mut policy = PlayerContact::new(true);
        resolve_axis(&mut rect, Axis::Y, -20, &floor(BlockKind::Normal), &mut policy);
        assert!(policy.triggers.is_empty());
        assert_eq!(rect.top(), 160);
    }

    #[test]
    fn test_finish_on_landing_only() {
        let mut rect = Rect::new(-28, 110, 28, 40);
        let mut policy = PlayerContact::new(true);
        resolve_axis(&mut rect, Axis::X, 10, &floor(BlockKind::Finish), &mut policy);
        assert!(policy.triggers.is_empty());
        assert!(!policy.halted);

        let mut rect = Rect::new(0, 50, 28, 40);
        let mut policy = PlayerContact::new(true);
        resolve_axis(&mut rect, Axis::Y, 20, &floor(BlockKind::Finish), &mut policy);
        assert_eq!(policy.triggers, vec![ContactTrigger::Finish]);
    }
}
