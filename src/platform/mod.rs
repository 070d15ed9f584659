//! Platform abstraction layer
//!
//! The simulation never draws or reads devices. It talks to the outside world
//! through three seams:
//! - `Presenter`: turns entities into visuals and positions them
//! - `InputSource`: reports held keys and one-shot presses
//! - `MenuExit`: receives control when the session ends

pub mod headless;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::sim::{BlockKind, BulletOwner, ExitReason, Rect, TickInput, Vector2, VisualHandle};

pub use headless::HeadlessPresenter;

/// What an entity is, for choosing its look
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Enemy { boss: bool },
    Bullet { owner: BulletOwner },
    Block(BlockKind),
}

/// Request to realize a positioned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityDescriptor {
    pub kind: EntityKind,
    pub rect: Rect,
}

/// On-screen indicators
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusFlags {
    pub lives: u32,
    pub paused: bool,
    pub god_mode: bool,
    pub invisible: bool,
}

/// Scene collaborator
pub trait Presenter {
    /// Create a visual for `entity` and return its handle
    fn realize(&mut self, entity: &EntityDescriptor) -> VisualHandle;

    /// Current bounding box of a visual, if it still exists
    fn bounds_of(&self, handle: VisualHandle) -> Option<Rect>;

    fn place(&mut self, handle: VisualHandle, position: Vector2);

    fn remove(&mut self, handle: VisualHandle);

    /// Horizontal scroll of the level layer
    fn scroll_to(&mut self, _offset: i32) {}

    fn show_popup(&mut self, _message: &str) {}

    fn show_status(&mut self, _status: StatusFlags) {}
}

/// Logical keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Up,
    Left,
    Right,
    Shoot,
    Pause,
    GodMode,
    Invisible,
    MenuEscape,
    GravityShift,
}

impl Key {
    pub const ALL: [Key; 9] = [
        Key::Up,
        Key::Left,
        Key::Right,
        Key::Shoot,
        Key::Pause,
        Key::GodMode,
        Key::Invisible,
        Key::MenuEscape,
        Key::GravityShift,
    ];

    /// Mode keys act once per press rather than while held
    pub fn is_toggle(self) -> bool {
        !matches!(self, Key::Up | Key::Left | Key::Right | Key::Shoot)
    }
}

/// Input collaborator
pub trait InputSource {
    fn is_pressed(&self, key: Key) -> bool;

    /// True once per press of `key`, then false until it is pressed again
    fn take_press(&mut self, key: Key) -> bool;

    /// Snapshot for the next tick
    fn tick_input(&mut self) -> TickInput {
        TickInput {
            up: self.is_pressed(Key::Up),
            left: self.is_pressed(Key::Left),
            right: self.is_pressed(Key::Right),
            shoot: self.is_pressed(Key::Shoot),
            pause: self.take_press(Key::Pause),
            god_mode: self.take_press(Key::GodMode),
            invisible: self.take_press(Key::Invisible),
            menu_escape: self.take_press(Key::MenuEscape),
            gravity_shift: self.take_press(Key::GravityShift),
        }
    }
}

/// Keyboard state fed by press/release events
///
/// Event handlers only record; the tick reads a snapshot.
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    held: HashSet<Key>,
    pressed: HashSet<Key>,
}

impl KeyboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: Key) {
        // Auto-repeat arrives as repeated downs; only the first counts
        if self.held.insert(key) && key.is_toggle() {
            self.pressed.insert(key);
        }
    }

    pub fn key_up(&mut self, key: Key) {
        self.held.remove(&key);
    }

    /// Drop everything (focus lost)
    pub fn clear(&mut self) {
        self.held.clear();
        self.pressed.clear();
    }
}

impl InputSource for KeyboardState {
    fn is_pressed(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    fn take_press(&mut self, key: Key) -> bool {
        self.pressed.remove(&key)
    }
}

/// Menu collaborator: receives control exactly once when a session ends
pub trait MenuExit {
    fn return_to_menu(&mut self, reason: ExitReason);
}

impl<F: FnMut(ExitReason)> MenuExit for F {
    fn return_to_menu(&mut self, reason: ExitReason) {
        self(reason)
    }
}
