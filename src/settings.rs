//! Gameplay tuning
//!
//! Every constant the simulation reads lives here so a level can be rebalanced
//! from a JSON file without touching code.

use std::path::Path;

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, read_file};
use crate::ms_to_ticks;

/// Difficulty presets (controls homing-bullet accuracy)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" | "medium" | "med" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Homing divisor for aiming enemies (10 = deadly, 70 = lazy)
    pub fn easiness(&self) -> i32 {
        match self {
            Difficulty::Easy => 70,
            Difficulty::Normal => 50,
            Difficulty::Hard => 10,
        }
    }
}

/// Per-archetype behavior as written in the spawn table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BehaviorSpec {
    /// Walks back and forth between walls
    Patrol,
    /// Bobs up and down on the oscillation clock
    Oscillate,
    /// Fires homing bullets; `easiness` overrides the difficulty preset
    Aim {
        #[serde(default)]
        easiness: Option<i32>,
    },
}

/// One entry of the enemy spawn table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemySpawn {
    pub position: IVec2,
    pub size: IVec2,
    pub lives: u32,
    pub behavior: BehaviorSpec,
    /// The boss sleeps until the leap trigger fires; its death loads the flag overlay
    #[serde(default)]
    pub boss: bool,
}

impl EnemySpawn {
    fn new(x: i32, y: i32, w: i32, h: i32, lives: u32, behavior: BehaviorSpec) -> Self {
        Self {
            position: IVec2::new(x, y),
            size: IVec2::new(w, h),
            lives,
            behavior,
            boss: false,
        }
    }
}

/// Gameplay tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub difficulty: Difficulty,

    // === Level grid ===
    pub cell_size: IVec2,

    // === Player ===
    pub player_size: IVec2,
    pub player_start: IVec2,
    pub player_lives: u32,
    /// Horizontal units per tick while a direction key is held
    pub run_speed: i32,
    pub jump_impulse: i32,
    /// Vertical velocity gained per tick toward the current gravity
    pub gravity_step: i32,
    /// Vertical velocity magnitude cap
    pub max_fall_speed: i32,
    /// Distance from the level edge at which movement is refused
    pub edge_margin: i32,

    // === Projectiles ===
    pub bullet_size: i32,
    pub bullet_speed: i32,
    pub player_bullet_timeout_ms: u64,
    pub enemy_bullet_timeout_ms: u64,

    // === Enemies ===
    pub patrol_speed: i32,
    pub oscillate_speed: i32,
    pub oscillate_period_ms: u64,
    pub enemies: Vec<EnemySpawn>,

    // === Triggers / camera ===
    /// Player x beyond which the leap overlay loads
    pub leap_trigger_x: i32,
    /// Player x at which the camera starts following
    pub screen_offset: i32,
}

impl Default for Tuning {
    fn default() -> Self {
        use BehaviorSpec::*;

        let mut boss = EnemySpawn::new(6200, 370, 300, 300, 15, Aim { easiness: None });
        boss.boss = true;

        Self {
            difficulty: Difficulty::Normal,

            cell_size: IVec2::new(crate::consts::BLOCK_WIDTH, crate::consts::BLOCK_HEIGHT),

            player_size: IVec2::new(28, 40),
            player_start: IVec2::new(0, 300),
            player_lives: 3,
            run_speed: 5,
            jump_impulse: 29,
            gravity_step: 1,
            max_fall_speed: 10,
            edge_margin: 5,

            bullet_size: 7,
            bullet_speed: 10,
            player_bullet_timeout_ms: 2000,
            enemy_bullet_timeout_ms: 1500,

            patrol_speed: 1,
            oscillate_speed: 2,
            oscillate_period_ms: 1000,
            enemies: vec![
                EnemySpawn::new(1500, 605, 30, 50, 1, Patrol),
                EnemySpawn::new(2860, 305, 30, 50, 1, Patrol),
                EnemySpawn::new(3300, 300, 100, 100, 2, Oscillate),
                EnemySpawn::new(3700, 400, 100, 100, 2, Oscillate),
                EnemySpawn::new(4150, 120, 76, 50, 3, Aim { easiness: None }),
                EnemySpawn::new(4400, 120, 76, 50, 3, Aim { easiness: None }),
                boss,
            ],

            leap_trigger_x: 5200,
            screen_offset: 640,
        }
    }
}

impl Tuning {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file; missing fields fall back to defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let tuning = Self::from_json(&read_file(path)?)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = |v: IVec2| v.x > 0 && v.y > 0;
        if !positive(self.cell_size) {
            return Err(ConfigError::invalid("cell_size must be positive"));
        }
        if !positive(self.player_size) {
            return Err(ConfigError::invalid("player_size must be positive"));
        }
        if self.bullet_size <= 0 {
            return Err(ConfigError::invalid("bullet_size must be positive"));
        }
        if self.player_lives == 0 {
            return Err(ConfigError::invalid("player_lives must be at least 1"));
        }
        if self.oscillate_period_ms == 0 {
            return Err(ConfigError::invalid("oscillate_period_ms must be non-zero"));
        }
        for (i, spawn) in self.enemies.iter().enumerate() {
            if !positive(spawn.size) {
                return Err(ConfigError::invalid(format!("enemy {i}: size must be positive")));
            }
            if spawn.lives == 0 {
                return Err(ConfigError::invalid(format!("enemy {i}: lives must be at least 1")));
            }
            if let BehaviorSpec::Aim { easiness: Some(e) } = spawn.behavior {
                if e <= 0 {
                    return Err(ConfigError::invalid(format!("enemy {i}: easiness must be positive")));
                }
            }
        }
        if self.enemies.iter().filter(|s| s.boss).count() > 1 {
            return Err(ConfigError::invalid("at most one enemy may be the boss"));
        }
        Ok(())
    }

    /// Effective homing divisor for an aiming enemy
    pub fn easiness_for(&self, spawn: &EnemySpawn) -> i32 {
        match spawn.behavior {
            BehaviorSpec::Aim { easiness: Some(e) } => e,
            _ => self.difficulty.easiness(),
        }
    }

    pub fn player_bullet_timeout_ticks(&self) -> u64 {
        ms_to_ticks(self.player_bullet_timeout_ms)
    }

    pub fn enemy_bullet_timeout_ticks(&self) -> u64 {
        ms_to_ticks(self.enemy_bullet_timeout_ms)
    }

    pub fn oscillate_period_ticks(&self) -> u64 {
        ms_to_ticks(self.oscillate_period_ms).max(1)
    }
}
