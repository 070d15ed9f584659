//! Enemy archetypes
//!
//! Each enemy carries its own behavior state (including the aiming enemies'
//! bullet slot) and is updated through a single dispatch point per tick.

use serde::{Deserialize, Serialize};

use super::collision::{first_contact, step_until_contact};
use super::geom::{Axis, Rect, Vector2};
use super::layout::Block;
use super::projectile::{Bullet, BulletHit, BulletOwner, DespawnReason, advance, fire};
use super::state::VisualHandle;
use crate::settings::{BehaviorSpec, EnemySpawn, Tuning};

/// Stable enemy handle (index into the spawn table)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(pub u32);

/// Per-archetype state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Behavior {
    /// Walks horizontally, turning around on wall contact
    Patrol { moving_right: bool },
    /// Bobs vertically on the shared oscillation clock
    Oscillate,
    /// Fires homing bullets at the player
    Aim {
        /// Homing divisor (larger = weaker steering)
        easiness: i32,
        bullet: Option<Bullet>,
    },
}

/// What an aiming enemy's bullet did this tick
#[derive(Debug, Clone)]
pub enum ShotEvent {
    Fired,
    Despawned { bullet: Bullet, reason: DespawnReason },
    HitPlayer { bullet: Bullet },
}

/// Everything an enemy may look at during its update
#[derive(Debug, Clone, Copy)]
pub struct EnemyContext<'a> {
    pub tuning: &'a Tuning,
    pub blocks: &'a [Block],
    pub player: Rect,
    pub now: u64,
    /// Oscillation phase for this tick
    pub descending: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: EnemyId,
    pub rect: Rect,
    pub lives: u32,
    pub behavior: Behavior,
    /// Dormant until the leap trigger fires
    pub boss: bool,
    #[serde(skip)]
    pub visual: Option<VisualHandle>,
}

/// Per-tick homing displacement from `from` toward `to`
#[inline]
pub fn homing_displacement(from: Vector2, to: Vector2, easiness: i32) -> Vector2 {
    (to - from) / easiness.max(1)
}

impl Enemy {
    pub fn from_spawn(id: EnemyId, spawn: &EnemySpawn, tuning: &Tuning) -> Self {
        let behavior = match spawn.behavior {
            BehaviorSpec::Patrol => Behavior::Patrol { moving_right: true },
            BehaviorSpec::Oscillate => Behavior::Oscillate,
            BehaviorSpec::Aim { .. } => Behavior::Aim {
                easiness: tuning.easiness_for(spawn),
                bullet: None,
            },
        };
        Self {
            id,
            rect: Rect::from_pos_size(spawn.position, spawn.size),
            lives: spawn.lives,
            behavior,
            boss: spawn.boss,
            visual: None,
        }
    }

    /// Run this enemy's script for one tick
    pub fn update(&mut self, ctx: &EnemyContext) -> Option<ShotEvent> {
        match &mut self.behavior {
            Behavior::Patrol { moving_right } => {
                let sign = if *moving_right { 1 } else { -1 };
                let result = step_until_contact(
                    &mut self.rect,
                    Axis::X,
                    sign * ctx.tuning.patrol_speed,
                    |r, s| first_contact(r, ctx.blocks, Axis::X, s),
                );
                if result.blocked() {
                    *moving_right = !*moving_right;
                }
                None
            }
            Behavior::Oscillate => {
                let speed = ctx.tuning.oscillate_speed;
                self.rect.y += if ctx.descending { speed } else { -speed };
                None
            }
            Behavior::Aim { easiness, bullet } => {
                aim(self.id, self.rect, *easiness, bullet, ctx)
            }
        }
    }

    /// Remove one life; returns `true` if that was the last
    pub fn take_hit(&mut self) -> bool {
        self.lives = self.lives.saturating_sub(1);
        self.lives == 0
    }

    pub fn bullet(&self) -> Option<&Bullet> {
        match &self.behavior {
            Behavior::Aim { bullet, .. } => bullet.as_ref(),
            _ => None,
        }
    }

    pub fn bullet_mut(&mut self) -> Option<&mut Bullet> {
        match &mut self.behavior {
            Behavior::Aim { bullet, .. } => bullet.as_mut(),
            _ => None,
        }
    }

    /// Empty this enemy's bullet slot
    pub fn take_bullet(&mut self) -> Option<Bullet> {
        match &mut self.behavior {
            Behavior::Aim { bullet, .. } => bullet.take(),
            _ => None,
        }
    }
}

fn aim(
    id: EnemyId,
    body: Rect,
    easiness: i32,
    slot: &mut Option<Bullet>,
    ctx: &EnemyContext,
) -> Option<ShotEvent> {
    let displacement = homing_displacement(body.position(), ctx.player.position(), easiness);

    if slot
        .as_ref()
        .is_some_and(|b| b.expired(ctx.now, ctx.tuning.enemy_bullet_timeout_ticks()))
    {
        let bullet = slot.take()?;
        return Some(ShotEvent::Despawned {
            bullet,
            reason: DespawnReason::Timeout,
        });
    }

    let fired = fire(slot, || {
        let heading = (ctx.player.position() - body.position()).signum();
        Bullet::spawn(
            BulletOwner::Enemy(id),
            body.position(),
            heading * ctx.tuning.bullet_speed,
            ctx.tuning.bullet_size,
            ctx.now,
        )
    });
    if fired {
        return Some(ShotEvent::Fired);
    }

    let bullet = slot.as_mut()?;
    bullet.velocity = displacement;
    match advance(bullet, displacement, ctx.blocks, true, &[ctx.player])? {
        BulletHit::Target(_) => slot.take().map(|bullet| ShotEvent::HitPlayer { bullet }),
        BulletHit::Block(_) => slot.take().map(|bullet| ShotEvent::Despawned {
            bullet,
            reason: DespawnReason::Collision,
        }),
    }
}
