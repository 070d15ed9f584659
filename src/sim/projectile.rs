//! Bullet lifecycle
//!
//! A firer owns a single `Option<Bullet>` slot. Firing into an occupied slot
//! does nothing; the slot empties on a hit or once the bullet outlives its
//! timeout.

use serde::{Deserialize, Serialize};

use super::collision::{first_contact, step_until_contact};
use super::enemy::EnemyId;
use super::geom::{Axis, Rect, Vector2};
use super::layout::Block;
use super::state::VisualHandle;

/// Who fired a bullet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BulletOwner {
    Player,
    Enemy(EnemyId),
}

/// A live projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub rect: Rect,
    /// Per-tick displacement (player bullets fly straight; enemy bullets are
    /// re-steered every tick)
    pub velocity: Vector2,
    pub owner: BulletOwner,
    /// Tick on which the bullet was fired
    pub fired_at: u64,
    #[serde(skip)]
    pub visual: Option<VisualHandle>,
}

impl Bullet {
    /// Create a square bullet at `origin`
    pub fn spawn(owner: BulletOwner, origin: Vector2, velocity: Vector2, size: i32, now: u64) -> Self {
        Self {
            rect: Rect::new(origin.x, origin.y, size, size),
            velocity,
            owner,
            fired_at: now,
            visual: None,
        }
    }

    /// Ticks since the bullet was fired
    #[inline]
    pub fn age(&self, now: u64) -> u64 {
        now.saturating_sub(self.fired_at)
    }

    /// True once the bullet has been alive longer than `timeout` ticks
    #[inline]
    pub fn expired(&self, now: u64, timeout: u64) -> bool {
        self.age(now) > timeout
    }
}

/// Fire into `slot` if it is empty
///
/// Returns `true` if a bullet was spawned.
pub fn fire(slot: &mut Option<Bullet>, make: impl FnOnce() -> Bullet) -> bool {
    if slot.is_some() {
        return false;
    }
    *slot = Some(make());
    true
}

/// Why a bullet left play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DespawnReason {
    Collision,
    Timeout,
    /// The firing enemy died
    OwnerRemoved,
}

/// What a bullet ran into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulletHit {
    /// Index into the block list
    Block(usize),
    /// Index into the target list
    Target(usize),
}

/// Step a bullet by `displacement`, horizontal first then vertical
///
/// Uses the same unit-step exact-edge rule as actors. Targets are probed
/// before blocks, so a bullet touching both hits the target. With
/// `blocks_solid == false` the bullet passes through blocks.
pub fn advance(
    bullet: &mut Bullet,
    displacement: Vector2,
    blocks: &[Block],
    blocks_solid: bool,
    targets: &[Rect],
) -> Option<BulletHit> {
    for axis in [Axis::X, Axis::Y] {
        let result = step_until_contact(&mut bullet.rect, axis, axis.of(displacement), |r, sign| {
            if let Some(idx) = first_contact(r, targets, axis, sign) {
                return Some(BulletHit::Target(idx));
            }
            if blocks_solid {
                first_contact(r, blocks, axis, sign).map(BulletHit::Block)
            } else {
                None
            }
        });
        if result.contact.is_some() {
            return result.contact;
        }
    }
    None
}
