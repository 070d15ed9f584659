//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Integer positions, unit-step movement
//! - Seeded RNG only (autopilot)
//! - Stable iteration order (spawn-table order for enemies)
//! - No rendering or platform dependencies

pub mod actor;
pub mod autopilot;
pub mod clock;
pub mod collision;
pub mod enemy;
pub mod geom;
pub mod layout;
pub mod levels;
pub mod projectile;
pub mod state;
pub mod tick;

pub use actor::{ContactTrigger, Player, PlayerContact};
pub use autopilot::Autopilot;
pub use clock::{FixedStep, oscillation_descending};
pub use collision::{AxisMove, ContactPolicy, Solid, StopOnContact, is_contact, resolve_axis};
pub use enemy::{Behavior, Enemy, EnemyId};
pub use geom::{Axis, Rect, Vector2};
pub use layout::{Block, BlockKind, LayoutVariant, LevelData, LevelLayout, build_blocks};
pub use projectile::{Bullet, BulletOwner, DespawnReason};
pub use state::{ExitReason, GameEvent, GameState, SessionPhase, SessionState, VisualHandle};
pub use tick::{TickInput, tick};
