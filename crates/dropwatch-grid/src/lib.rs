//! Minimal grid types for the attribution crates (no engine dependency).
#![forbid(unsafe_code)]

use core::ops::{Add, Sub};

/// A discrete world tile: x/y grid coordinate plus vertical plane.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub struct WorldPoint {
    pub x: i32,
    pub y: i32,
    pub plane: i32,
}

impl WorldPoint {
    #[inline]
    pub const fn new(x: i32, y: i32, plane: i32) -> Self {
        Self { x, y, plane }
    }

    /// Same tile shifted on the horizontal axes, same plane.
    #[inline]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            plane: self.plane,
        }
    }

    /// Chebyshev distance on the x/y axes. Points on different planes
    /// are unreachable from each other and report `i32::MAX`.
    #[inline]
    pub fn distance_to(self, other: WorldPoint) -> i32 {
        if self.plane != other.plane {
            return i32::MAX;
        }
        let dx = (self.x - other.x).abs();
        let dy = (self.y - other.y).abs();
        dx.max(dy)
    }
}

impl Add<(i32, i32)> for WorldPoint {
    type Output = WorldPoint;
    #[inline]
    fn add(self, (dx, dy): (i32, i32)) -> WorldPoint {
        self.offset(dx, dy)
    }
}

impl Sub for WorldPoint {
    type Output = (i32, i32);
    #[inline]
    fn sub(self, rhs: WorldPoint) -> (i32, i32) {
        (self.x - rhs.x, self.y - rhs.y)
    }
}
