//! Ender Platformer - side-scrolling action core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, collisions, projectiles, enemies, session state)
//! - `platform`: Presentation/input/menu collaborator seams, plus a headless implementation
//! - `session`: Glue that drives `sim` and reports to the collaborators
//! - `settings`: Data-driven tuning
//! - `logging`: env_logger setup for binaries

pub mod error;
pub mod logging;
pub mod platform;
pub mod session;
pub mod settings;
pub mod sim;

pub use error::ConfigError;
pub use logging::init as init_logging;
pub use session::Session;
pub use settings::{Difficulty, Tuning};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation rate (ticks per second)
    pub const TICK_HZ: u32 = 60;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f32 = 1.0 / TICK_HZ as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Level grid cell size
    pub const BLOCK_WIDTH: i32 = 60;
    pub const BLOCK_HEIGHT: i32 = 60;
}

/// Convert a millisecond duration to whole simulation ticks (rounded up)
#[inline]
pub fn ms_to_ticks(ms: u64) -> u64 {
    let hz = consts::TICK_HZ as u64;
    (ms * hz).div_ceil(1000)
}
