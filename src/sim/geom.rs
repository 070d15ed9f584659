//! Integer geometry for the tile world
//!
//! All positions are whole units; movement happens one unit at a time so that
//! edge equality is an exact test.

use glam::IVec2;
use serde::{Deserialize, Serialize};

/// Position / velocity / displacement
pub type Vector2 = IVec2;

/// Movement axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    /// Unit vector along this axis with the given sign
    #[inline]
    pub fn unit(self, sign: i32) -> Vector2 {
        match self {
            Axis::X => IVec2::new(sign, 0),
            Axis::Y => IVec2::new(0, sign),
        }
    }

    /// Component of `v` along this axis
    #[inline]
    pub fn of(self, v: Vector2) -> i32 {
        match self {
            Axis::X => v.x,
            Axis::Y => v.y,
        }
    }
}

/// Axis-aligned box (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_pos_size(pos: Vector2, size: Vector2) -> Self {
        Self::new(pos.x, pos.y, size.x, size.y)
    }

    #[inline]
    pub fn left(&self) -> i32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    #[inline]
    pub fn top(&self) -> i32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    #[inline]
    pub fn position(&self) -> Vector2 {
        IVec2::new(self.x, self.y)
    }

    #[inline]
    pub fn size(&self) -> Vector2 {
        IVec2::new(self.width, self.height)
    }

    pub fn set_position(&mut self, pos: Vector2) {
        self.x = pos.x;
        self.y = pos.y;
    }

    /// Move by `amount` units along `axis`
    #[inline]
    pub fn shift(&mut self, axis: Axis, amount: i32) {
        match axis {
            Axis::X => self.x += amount,
            Axis::Y => self.y += amount,
        }
    }

    /// Closed-interval overlap: touching edges count
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() <= other.right()
            && other.left() <= self.right()
            && self.top() <= other.bottom()
            && other.top() <= self.bottom()
    }

    /// Edge of this rect that leads when moving along `axis` with `sign`
    #[inline]
    pub fn leading_edge(&self, axis: Axis, sign: i32) -> i32 {
        match (axis, sign > 0) {
            (Axis::X, true) => self.right(),
            (Axis::X, false) => self.left(),
            (Axis::Y, true) => self.bottom(),
            (Axis::Y, false) => self.top(),
        }
    }

    /// Edge of this rect that faces a mover travelling along `axis` with `sign`
    #[inline]
    pub fn facing_edge(&self, axis: Axis, sign: i32) -> i32 {
        self.leading_edge(axis, -sign)
    }
}
