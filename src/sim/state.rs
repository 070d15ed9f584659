//! Game state and session bookkeeping
//!
//! Everything the tick function reads or writes lives here; nothing is global.

use serde::{Deserialize, Serialize};

use super::actor::Player;
use super::enemy::{Enemy, EnemyId};
use super::geom::Vector2;
use super::layout::{LayoutVariant, LevelData, LevelLayout};
use super::projectile::{Bullet, BulletOwner, DespawnReason};
use crate::settings::Tuning;

/// Opaque handle to a presenter-side visual
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VisualHandle(pub u64);

/// Lifecycle of a play session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Ticks advance the world
    Running,
    /// Frozen; only mode toggles are processed
    Paused,
    /// Finish block reached
    Finished,
    /// Torn down, control handed back to the menu
    Exited,
}

/// Why the session handed control back to the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExitReason {
    OutOfLives,
    Escape,
}

/// Per-session flags and counters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub lives: u32,
    /// Respawn point, updated by checkpoint landings
    pub checkpoint_position: Vector2,
    /// Camera offset to restore on respawn
    pub checkpoint_layout_offset: i32,
    pub gravity_down: bool,
    pub god_mode: bool,
    pub invisible: bool,
    pub phase: SessionPhase,
    pub boss_dead: bool,
    pub leap_triggered: bool,
    pub flag_loaded: bool,
}

impl SessionState {
    pub fn new(lives: u32, start: Vector2) -> Self {
        Self {
            lives,
            checkpoint_position: start,
            checkpoint_layout_offset: 0,
            gravity_down: true,
            god_mode: false,
            invisible: false,
            phase: SessionPhase::Running,
            boss_dead: false,
            leap_triggered: false,
            flag_loaded: false,
        }
    }

    #[inline]
    pub fn running(&self) -> bool {
        self.phase == SessionPhase::Running
    }

    /// Finished or exited: no further ticks have any effect
    #[inline]
    pub fn is_over(&self) -> bool {
        matches!(self.phase, SessionPhase::Finished | SessionPhase::Exited)
    }
}

/// Something that happened during a tick, for presentation and logging
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    LayoutSwapped {
        from: LayoutVariant,
        to: LayoutVariant,
    },
    BulletFired {
        owner: BulletOwner,
    },
    BulletDespawned {
        owner: BulletOwner,
        visual: Option<VisualHandle>,
        reason: DespawnReason,
    },
    EnemyHit {
        id: EnemyId,
        lives_left: u32,
    },
    EnemyKilled {
        id: EnemyId,
        visual: Option<VisualHandle>,
        boss: bool,
    },
    PlayerDied {
        lives_left: u32,
    },
    CheckpointSaved {
        position: Vector2,
        layout_offset: i32,
    },
    LevelFinished,
    Paused,
    Resumed,
    GodModeToggled(bool),
    InvisibilityToggled(bool),
    GravityShifted {
        gravity_down: bool,
    },
    ReturnToMenu {
        reason: ExitReason,
    },
}

/// Complete simulation state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub tuning: Tuning,
    /// All overlay rows; the base rows are the revert copy
    pub level: LevelData,
    pub session: SessionState,
    /// Active block set
    pub layout: LevelLayout,
    pub player: Player,
    /// Live enemies in spawn-table order
    pub enemies: Vec<Enemy>,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Camera scroll (negative as the level moves left)
    pub layout_offset: i32,
    pub level_width: i32,
    pub level_height: i32,
    /// Tick of the most recent death, so one tick costs at most one life
    last_death_tick: Option<u64>,
}

impl GameState {
    /// Build a fresh session from validated tuning and level data
    pub fn new(tuning: Tuning, level: LevelData) -> Self {
        let cell = tuning.cell_size;
        let layout = LevelLayout::load(&level, LayoutVariant::Base, cell);
        let enemies = tuning
            .enemies
            .iter()
            .enumerate()
            .map(|(i, spawn)| Enemy::from_spawn(EnemyId(i as u32), spawn, &tuning))
            .collect();

        Self {
            session: SessionState::new(tuning.player_lives, tuning.player_start),
            player: Player::new(tuning.player_start, tuning.player_size),
            level_width: level.pixel_width(cell),
            level_height: level.pixel_height(cell),
            layout,
            enemies,
            time_ticks: 0,
            layout_offset: 0,
            last_death_tick: None,
            level,
            tuning,
        }
    }

    pub fn enemy(&self, id: EnemyId) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id == id)
    }

    pub fn enemy_mut(&mut self, id: EnemyId) -> Option<&mut Enemy> {
        self.enemies.iter_mut().find(|e| e.id == id)
    }

    pub fn boss(&self) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.boss)
    }

    /// The bullet in `owner`'s slot, if live
    pub fn bullet(&self, owner: BulletOwner) -> Option<&Bullet> {
        match owner {
            BulletOwner::Player => self.player.bullet.as_ref(),
            BulletOwner::Enemy(id) => self.enemy(id).and_then(Enemy::bullet),
        }
    }

    pub fn bullet_mut(&mut self, owner: BulletOwner) -> Option<&mut Bullet> {
        match owner {
            BulletOwner::Player => self.player.bullet.as_mut(),
            BulletOwner::Enemy(id) => self.enemy_mut(id).and_then(Enemy::bullet_mut),
        }
    }

    /// Every live bullet, player's first
    pub fn bullets(&self) -> impl Iterator<Item = &Bullet> {
        self.player
            .bullet
            .iter()
            .chain(self.enemies.iter().filter_map(Enemy::bullet))
    }

    /// Record a death on this tick; false if one was already recorded
    pub(crate) fn claim_death(&mut self) -> bool {
        if self.last_death_tick == Some(self.time_ticks) {
            return false;
        }
        self.last_death_tick = Some(self.time_ticks);
        true
    }

    /// Horizontal scroll that keeps the player `screen_offset` from the left
    /// edge, or `None` near either end of the level
    pub fn camera_offset_for(&self, x: i32) -> Option<i32> {
        let margin = self.tuning.screen_offset;
        (x > margin && x < self.level_width - margin).then(|| -(x - margin))
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(Tuning::default(), LevelData::default())
    }
}
