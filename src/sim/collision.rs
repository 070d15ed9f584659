//! Unit-step collision resolution
//!
//! Movers advance one unit at a time. Before every unit step the mover is
//! tested against each solid; a contact fires only when the boxes overlap
//! (closed test) AND the mover's leading edge sits exactly on the solid's
//! facing edge. Overlap without that equality is not a contact, so a mover
//! that is already inside a solid keeps going. Fast movers can tunnel past a
//! solid whose edge they never land on exactly.

use super::geom::{Axis, Rect};
use super::layout::Block;

/// Anything with a bounding box that can stop a mover
pub trait Solid {
    fn bounds(&self) -> Rect;
}

impl Solid for Rect {
    fn bounds(&self) -> Rect {
        *self
    }
}

impl Solid for Block {
    fn bounds(&self) -> Rect {
        self.rect
    }
}

/// Exact-edge contact test for a mover heading along `axis` with `sign`
#[inline]
pub fn is_contact(mover: &Rect, solid: &Rect, axis: Axis, sign: i32) -> bool {
    sign != 0
        && mover.overlaps(solid)
        && mover.leading_edge(axis, sign) == solid.facing_edge(axis, sign)
}

/// Index of the first solid (in list order) in contact with the mover
pub fn first_contact<S: Solid>(mover: &Rect, solids: &[S], axis: Axis, sign: i32) -> Option<usize> {
    solids
        .iter()
        .position(|s| is_contact(mover, &s.bounds(), axis, sign))
}

/// Result of stepping along one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisMove<H> {
    /// Signed distance actually travelled
    pub moved: i32,
    /// What stopped the mover, if anything
    pub contact: Option<H>,
}

impl<H> AxisMove<H> {
    pub fn blocked(&self) -> bool {
        self.contact.is_some()
    }
}

/// Step `mover` up to `|distance|` units, probing before every unit
///
/// `probe` sees the current box and the direction sign; returning `Some`
/// halts the move without taking that step.
pub fn step_until_contact<H>(
    mover: &mut Rect,
    axis: Axis,
    distance: i32,
    mut probe: impl FnMut(&Rect, i32) -> Option<H>,
) -> AxisMove<H> {
    let sign = distance.signum();
    let mut moved = 0;
    for _ in 0..distance.unsigned_abs() {
        if let Some(hit) = probe(mover, sign) {
            return AxisMove {
                moved,
                contact: Some(hit),
            };
        }
        mover.shift(axis, sign);
        moved += sign;
    }
    AxisMove {
        moved,
        contact: None,
    }
}

/// Kind-specific reaction to a block contact
pub trait ContactPolicy {
    /// Called once when stepping halts against `block`. May adjust `mover`.
    fn on_contact(&mut self, mover: &mut Rect, block: &Block, axis: Axis, sign: i32);
}

/// Policy that only stops
#[derive(Debug, Default, Clone, Copy)]
pub struct StopOnContact;

impl ContactPolicy for StopOnContact {
    fn on_contact(&mut self, _mover: &mut Rect, _block: &Block, _axis: Axis, _sign: i32) {}
}

/// Move along one axis against the block set, invoking `policy` on contact
///
/// Returns the index of the block that stopped the mover.
pub fn resolve_axis(
    mover: &mut Rect,
    axis: Axis,
    distance: i32,
    blocks: &[Block],
    policy: &mut impl ContactPolicy,
) -> AxisMove<usize> {
    let result = step_until_contact(mover, axis, distance, |r, sign| {
        first_contact(r, blocks, axis, sign)
    });
    if let Some(idx) = result.contact {
        policy.on_contact(mover, &blocks[idx], axis, distance.signum());
    }
    result
}
